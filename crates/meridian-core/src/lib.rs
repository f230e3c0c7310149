//! # meridian-core: Pure Domain Logic for the Register Session Client
//!
//! This crate holds the domain types and rules behind the shift/register
//! workflow, as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Meridian Register Client                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 POS screen / meridian-till CLI                  │   │
//! │  │    Register Closed ──► Recover / Open ──► Sell ──► Close        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │          meridian-session (ContextStore, ShiftSessionManager)    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ meridian-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌──────────────┐ ┌───────────┐ │   │
//! │  │   │   types   │  │   money   │  │reconciliation│ │ validation│ │   │
//! │  │   │   Shift   │  │   Money   │  │ difference   │ │   rules   │ │   │
//! │  │   │  Context  │  │  parsing  │  │ over / short │ │   checks  │ │   │
//! │  │   └───────────┘  └───────────┘  └──────────────┘ └───────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              meridian-client (REST service layer)               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Shift, business context and request types
//! - [`money`] - Money type with integer cents and decimal wire format
//! - [`reconciliation`] - Closing cash count vs. opening balance
//! - [`error`] - Domain error types
//! - [`validation`] - Operator input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use meridian_core::money::Money;
//! use meridian_core::reconciliation::CashReconciliation;
//!
//! let opening = Money::from_cents(100_00);
//! let closing = Money::parse("137.50", "closing cash balance").unwrap();
//!
//! let recon = CashReconciliation::new(opening, Money::zero(), closing);
//! assert_eq!(recon.difference.cents(), 37_50);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod reconciliation;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use reconciliation::{CashReconciliation, CountOutcome};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of an opaque identifier (shift, outlet, till, user).
///
/// Identifiers end up in URL paths, so they are bounded and checked for
/// characters that would change the path.
pub const MAX_IDENTIFIER_LEN: usize = 64;

/// Maximum length of free-text shift notes.
pub const MAX_NOTES_LEN: usize = 500;

/// Number of minor-unit decimals accepted for cash amounts.
pub const CASH_DECIMALS: u32 = 2;
