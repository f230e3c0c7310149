//! # Validation Module
//!
//! Operator input validation, run before any request leaves the client.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Operator input (this module)                                 │
//! │  ├── Cash amounts parse, have ≤ 2 decimals, correct sign               │
//! │  └── Ids are present and safe to put in a URL path                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Backend API (authoritative)                                  │
//! │  ├── One open shift per till                                           │
//! │  └── Shift is still OPEN when the close arrives                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use meridian_core::validation::{parse_closing_balance, validate_identifier};
//!
//! validate_identifier("shift id", "s1").unwrap();
//! let closing = parse_closing_balance("137.50").unwrap();
//! assert_eq!(closing.cents(), 13750);
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_IDENTIFIER_LEN, MAX_NOTES_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Field label for the closing cash count.
pub const CLOSING_BALANCE_FIELD: &str = "closing cash balance";

/// Field label for the opening cash count.
pub const OPENING_BALANCE_FIELD: &str = "opening cash balance";

/// Field label for the float handed to the till.
pub const FLOATING_CASH_FIELD: &str = "floating cash";

// =============================================================================
// Cash Validators
// =============================================================================

/// Validates a closing cash count.
///
/// ## Rules
/// - Must not be negative
/// - Must not be zero: an empty or zero entry is treated as a skipped count
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Close Shift                                                            │
/// │                                                                         │
/// │  Operator enters closing count                                         │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_closing_balance ← THIS FUNCTION                              │
/// │       │                                                                 │
/// │       ├── < 0  → "closing cash balance cannot be negative"             │
/// │       ├── == 0 → "closing cash balance must be greater than zero"      │
/// │       │                                                                 │
/// │       └── OK → send close request                                      │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_closing_balance(amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::Negative {
            field: CLOSING_BALANCE_FIELD.to_string(),
        });
    }

    if amount.is_zero() {
        return Err(ValidationError::MustBePositive {
            field: CLOSING_BALANCE_FIELD.to_string(),
        });
    }

    Ok(())
}

/// Validates an amount that may be zero but not negative (opening balance,
/// floating cash).
pub fn validate_non_negative(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Parses and validates closing-count text typed by the operator.
pub fn parse_closing_balance(input: &str) -> ValidationResult<Money> {
    let amount = Money::parse(input, CLOSING_BALANCE_FIELD)?;
    validate_closing_balance(amount)?;
    Ok(amount)
}

/// Parses and validates a non-negative cash amount typed by the operator.
pub fn parse_non_negative(field: &str, input: &str) -> ValidationResult<Money> {
    let amount = Money::parse(input, field)?;
    validate_non_negative(field, amount)?;
    Ok(amount)
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates an opaque identifier (shift, outlet, till, user).
///
/// ## Rules
/// - Must not be empty
/// - At most 64 characters
/// - No whitespace, `/`, `?` or `#` (ids are placed in URL paths)
pub fn validate_identifier(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if id.len() > MAX_IDENTIFIER_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_IDENTIFIER_LEN,
        });
    }

    if id
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '/' | '?' | '#'))
    {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must not contain whitespace, '/', '?' or '#'".to_string(),
        });
    }

    Ok(())
}

/// Normalizes optional shift notes.
///
/// Blank notes become `None`; notes longer than 500 characters are rejected.
pub fn normalize_notes(notes: Option<&str>) -> ValidationResult<Option<String>> {
    let Some(notes) = notes.map(str::trim).filter(|n| !n.is_empty()) else {
        return Ok(None);
    };

    if notes.chars().count() > MAX_NOTES_LEN {
        return Err(ValidationError::TooLong {
            field: "notes".to_string(),
            max: MAX_NOTES_LEN,
        });
    }

    Ok(Some(notes.to_string()))
}

// =============================================================================
// Unit Tests
// =============================================================================
