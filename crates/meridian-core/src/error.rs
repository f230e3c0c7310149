//! # Error Types
//!
//! Domain-specific error types for meridian-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  meridian-core errors (this file)                                      │
//! │  ├── CoreError        - Shift rule violations                          │
//! │  └── ValidationError  - Operator input failures                        │
//! │                                                                         │
//! │  meridian-client errors (separate crate)                               │
//! │  └── ClientError      - Transport / backend failures                   │
//! │                                                                         │
//! │  meridian-session errors                                               │
//! │  └── SessionError     - What the operator sees                         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → SessionError → Operator           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Shift rule errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Shift is not in the known open list.
    #[error("Shift not found: {0}")]
    ShiftNotFound(String),

    /// Shift exists but is no longer open.
    ///
    /// ## When This Occurs
    /// - Another operator closed the till from a different device
    /// - The recovery list was fetched before the close landed
    #[error("Shift {shift_id} is already closed")]
    ShiftNotOpen { shift_id: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Operator input validation errors.
///
/// Raised before any request leaves the client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Amount is below zero.
    #[error("{field} cannot be negative")]
    Negative { field: String },

    /// Value must be strictly positive.
    ///
    /// Used for the closing cash count, where zero is far more likely to be a
    /// skipped count than a real empty drawer.
    #[error("{field} must be greater than zero")]
    MustBePositive { field: String },

    /// More decimal places than the currency allows.
    #[error("{field} can have at most {max_decimals} decimal places")]
    TooPrecise { field: String, max_decimals: u32 },

    /// Invalid format (e.g., not a number, invalid date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
