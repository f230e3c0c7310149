//! # Cash Reconciliation
//!
//! The figures shown to an operator before they confirm closing a till.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CLOSE SHIFT                                           Till 2           │
//! │                                                                         │
//! │  Opening cash balance                         $100.00                   │
//! │  Floating cash                                 $25.50                   │
//! │  Closing cash balance (counted)               $137.50                   │
//! │  ───────────────────────────────────────────────────                    │
//! │  Difference                                   +$37.50  (over)           │
//! │                                                                         │
//! │  difference = closing - opening                                         │
//! │  Displayed only: a non-zero difference never blocks the close.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{self, Money};

/// Direction of a reconciliation difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CountOutcome {
    /// Closing count equals the opening balance.
    Balanced,
    /// More cash in the drawer than the opening balance.
    Over,
    /// Less cash in the drawer than the opening balance.
    Short,
}

/// Opening vs. closing cash for one shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CashReconciliation {
    #[serde(with = "money::wire")]
    #[ts(type = "number")]
    pub opening: Money,

    #[serde(with = "money::wire")]
    #[ts(type = "number")]
    pub floating: Money,

    #[serde(with = "money::wire")]
    #[ts(type = "number")]
    pub closing: Money,

    /// `closing - opening`.
    #[serde(with = "money::wire")]
    #[ts(type = "number")]
    pub difference: Money,

    pub outcome: CountOutcome,
}

impl CashReconciliation {
    /// Computes the reconciliation for a closing count.
    ///
    /// ## Example
    /// ```rust
    /// use meridian_core::money::Money;
    /// use meridian_core::reconciliation::{CashReconciliation, CountOutcome};
    ///
    /// let recon = CashReconciliation::new(
    ///     Money::from_cents(10000),
    ///     Money::zero(),
    ///     Money::from_cents(13750),
    /// );
    /// assert_eq!(recon.difference, Money::from_cents(3750));
    /// assert_eq!(recon.outcome, CountOutcome::Over);
    /// ```
    pub fn new(opening: Money, floating: Money, closing: Money) -> Self {
        let difference = closing - opening;
        let outcome = if difference.is_zero() {
            CountOutcome::Balanced
        } else if difference.is_positive() {
            CountOutcome::Over
        } else {
            CountOutcome::Short
        };

        CashReconciliation {
            opening,
            floating,
            closing,
            difference,
            outcome,
        }
    }

    /// Checks if the count matches the opening balance exactly.
    #[inline]
    pub fn is_balanced(&self) -> bool {
        self.outcome == CountOutcome::Balanced
    }

    /// Signed difference for display, e.g. `+$37.50` or `-$2.00`.
    pub fn difference_label(&self) -> String {
        match self.outcome {
            CountOutcome::Balanced => self.difference.to_string(),
            CountOutcome::Over => format!("+{}", self.difference),
            CountOutcome::Short => self.difference.to_string(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
