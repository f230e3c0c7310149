//! # Money Module
//!
//! Provides the `Money` type for handling cash amounts safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  The backend sends cash balances as JSON numbers:                       │
//! │    { "openingCashBalance": 100, "closingCashBalance": 137.5 }          │
//! │                                                                         │
//! │  Subtracting floats for a till count is how drawers end up             │
//! │  "short by $0.0000000001".                                             │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    Wire number ──► Decimal ──► round to 2dp ──► i64 cents              │
//! │    All arithmetic happens on cents; floats exist only on the wire      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use meridian_core::money::Money;
//!
//! let opening = Money::from_cents(10000);                     // $100.00
//! let closing = Money::parse("137.50", "closing cash").unwrap(); // operator input
//!
//! assert_eq!((closing - opening).cents(), 3750);
//! ```

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Sub;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::CASH_DECIMALS;

// =============================================================================
// Money Type
// =============================================================================

/// A cash amount in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: a reconciliation difference can be negative (drawer short)
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Wire format**: see [`wire`] for the decimal JSON representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use meridian_core::money::Money;
    ///
    /// let float = Money::from_cents(2500); // $25.00
    /// assert_eq!(float.cents(), 2500);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// For negative amounts, only the major unit should be negative:
    /// `from_major_minor(-5, 50)` = -$5.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Parses an amount typed by an operator, e.g. `"137.50"`.
    ///
    /// ## Rules
    /// - Surrounding whitespace is ignored
    /// - Empty input is [`ValidationError::Required`]
    /// - At most two decimal places (`"1.005"` is rejected, not rounded)
    /// - Sign is kept; callers decide whether negatives are allowed
    ///
    /// ## User Workflow
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────────┐
    /// │  Close Shift dialog                                                     │
    /// │                                                                         │
    /// │  Operator types: "137.50"                                              │
    /// │       │                                                                 │
    /// │       ▼                                                                 │
    /// │  Money::parse ← THIS FUNCTION                                          │
    /// │       │                                                                 │
    /// │       ├── ""      → "closing cash balance is required"                 │
    /// │       ├── "12,5"  → "closing cash balance has invalid format"          │
    /// │       ├── "1.005" → "at most 2 decimal places"                         │
    /// │       │                                                                 │
    /// │       └── OK → Money(13750) → reconciliation preview                   │
    /// └─────────────────────────────────────────────────────────────────────────┘
    /// ```
    ///
    /// ## Example
    /// ```rust
    /// use meridian_core::money::Money;
    ///
    /// assert_eq!(Money::parse("137.50", "amount").unwrap().cents(), 13750);
    /// assert_eq!(Money::parse(" 100 ", "amount").unwrap().cents(), 10000);
    /// assert!(Money::parse("", "amount").is_err());
    /// assert!(Money::parse("1.005", "amount").is_err());
    /// ```
    pub fn parse(input: &str, field: &str) -> Result<Money, ValidationError> {
        let trimmed = input.trim();

        if trimmed.is_empty() {
            return Err(ValidationError::Required {
                field: field.to_string(),
            });
        }

        let value = Decimal::from_str(trimmed).map_err(|_| ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be a number such as 137.50".to_string(),
        })?;

        if value.normalize().scale() > CASH_DECIMALS {
            return Err(ValidationError::TooPrecise {
                field: field.to_string(),
                max_decimals: CASH_DECIMALS,
            });
        }

        value
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|cents| cents.to_i64())
            .map(Money)
            .ok_or_else(|| ValidationError::OutOfRange {
                field: field.to_string(),
                min: i64::MIN / 100,
                max: i64::MAX / 100,
            })
    }

    /// Converts a decimal in major units to Money, rounding to cents.
    ///
    /// Rounds half-to-even to two decimals. Returns `None` if the value does
    /// not fit.
    pub fn from_decimal(value: Decimal) -> Option<Money> {
        value
            .round_dp(CASH_DECIMALS)
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|cents| cents.to_i64())
            .map(Money)
    }

    /// Returns the amount as a decimal in major units (`13750` → `137.50`).
    #[inline]
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, CASH_DECIMALS)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows money as `$137.50` / `-$5.50`.
///
/// This is for logs and the CLI; the browser front-end formats with its own
/// locale settings.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}.{:02}", sign, self.major().abs(), self.minor())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

// =============================================================================
// Wire Format
// =============================================================================

/// Serde adapter for cash amounts as the backend sends them.
///
/// ## Format
/// ```text
/// JSON number in major units   137.5     ──► Money(13750)
/// JSON integer                 100       ──► Money(10000)
/// Decimal string               "137.50"  ──► Money(13750)
///
/// Money(13750) ──► 137.5
/// ```
///
/// Use with `#[serde(with = "meridian_core::money::wire")]`.
pub mod wire {
    use super::*;
    use serde::de::Error as _;
    use serde::ser::Error as _;
    use serde::{Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum WireAmount {
        Number(f64),
        Text(String),
    }

    fn decode(amount: WireAmount) -> Result<Money, String> {
        let value = match amount {
            WireAmount::Number(n) => {
                Decimal::from_f64(n).ok_or_else(|| format!("amount {} is not finite", n))?
            }
            WireAmount::Text(s) => Decimal::from_str(s.trim())
                .map_err(|e| format!("amount '{}' is not a decimal: {}", s, e))?,
        };

        Money::from_decimal(value).ok_or_else(|| format!("amount {} is out of range", value))
    }

    /// Serializes Money as a JSON number in major units.
    pub fn serialize<S: Serializer>(money: &Money, serializer: S) -> Result<S::Ok, S::Error> {
        let value = money
            .to_decimal()
            .to_f64()
            .ok_or_else(|| S::Error::custom("amount cannot be represented as a number"))?;
        serializer.serialize_f64(value)
    }

    /// Deserializes Money from a JSON number or decimal string.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
        let amount = WireAmount::deserialize(deserializer)?;
        decode(amount).map_err(D::Error::custom)
    }

    /// Same as [`wire`](self) for optional amounts (`null` / missing → `None`).
    pub mod option {
        use super::*;

        pub fn serialize<S: Serializer>(
            money: &Option<Money>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match money {
                Some(m) => super::serialize(m, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Money>, D::Error> {
            let amount = Option::<WireAmount>::deserialize(deserializer)?;
            amount
                .map(|a| decode(a).map_err(D::Error::custom))
                .transpose()
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
