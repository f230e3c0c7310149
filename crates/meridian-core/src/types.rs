//! # Domain Types
//!
//! Shift and business-context types shared by every layer of the client.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────────┐   │
//! │  │ BusinessContext │   │     Shift       │   │   ShiftStatus       │   │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────      │   │
//! │  │  tenant_id      │   │  id (opaque)    │   │  OPEN               │   │
//! │  │  outlet_id?     │──►│  outlet/till/   │   │  CLOSED             │   │
//! │  │  till_id?       │   │  user ids       │   └─────────────────────┘   │
//! │  │  user_id?       │   │  cash balances  │                             │
//! │  └────────┬────────┘   └─────────────────┘                             │
//! │           │ scope()                                                     │
//! │           ▼                                                             │
//! │  ┌─────────────────┐   ┌──────────────────┐  ┌──────────────────────┐  │
//! │  │  OutletScope    │   │ StartShiftRequest│  │ CloseShiftRequest    │  │
//! │  │  (query params) │   │ (POST /shifts)   │  │ (POST /shifts/:id/..)│  │
//! │  └─────────────────┘   └──────────────────┘  └──────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Every id is an opaque server-assigned string. The client never parses or
//! generates them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::{self, Money};
use crate::reconciliation::CashReconciliation;
use crate::validation::validate_closing_balance;

// =============================================================================
// Shift Status
// =============================================================================

/// The status of a register session.
///
/// `Open` → `Closed` is the only transition, and only the backend makes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShiftStatus {
    /// Till is open for transactions.
    #[default]
    Open,
    /// Till was counted and closed. Immutable from here on.
    Closed,
}

impl ShiftStatus {
    /// Returns the wire representation (`"OPEN"` / `"CLOSED"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            ShiftStatus::Open => "OPEN",
            ShiftStatus::Closed => "CLOSED",
        }
    }
}

impl std::fmt::Display for ShiftStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Shift
// =============================================================================

/// A register session: one till, one operator, bracketed by an opening and a
/// closing cash count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    /// Server-assigned identifier.
    pub id: String,

    /// Outlet (branch) the till belongs to.
    pub outlet_id: String,

    /// Till (register) this session runs on.
    pub till_id: String,

    /// Operator who owns the session.
    pub user_id: String,

    /// Business date of the shift. Can differ from the wall-clock date for
    /// shifts that run past midnight.
    #[ts(as = "String")]
    pub operating_date: NaiveDate,

    /// Cash counted into the drawer at open time.
    #[serde(with = "money::wire")]
    #[ts(type = "number")]
    pub opening_cash_balance: Money,

    /// Change float handed to the till at open time.
    #[serde(with = "money::wire", default)]
    #[ts(type = "number")]
    pub floating_cash: Money,

    /// Cash counted at close time.
    #[serde(with = "money::wire::option", default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(type = "number", optional)]
    pub closing_cash_balance: Option<Money>,

    pub status: ShiftStatus,

    #[ts(as = "String")]
    pub start_time: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>", optional)]
    pub end_time: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub notes: Option<String>,
}

impl Shift {
    /// Checks if the shift is still open.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.status == ShiftStatus::Open
    }

    /// Checks if the shift is owned by the given operator.
    #[inline]
    pub fn belongs_to(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }

    /// Checks if the shift runs on the given till.
    #[inline]
    pub fn on_till(&self, till_id: &str) -> bool {
        self.till_id == till_id
    }

    /// Fails with [`CoreError::ShiftNotOpen`] once the shift is closed.
    pub fn ensure_open(&self) -> CoreResult<()> {
        if self.is_open() {
            Ok(())
        } else {
            Err(CoreError::ShiftNotOpen {
                shift_id: self.id.clone(),
            })
        }
    }

    /// Builds the reconciliation the operator sees before confirming a close.
    pub fn reconcile(&self, closing_cash_balance: Money) -> CashReconciliation {
        CashReconciliation::new(
            self.opening_cash_balance,
            self.floating_cash,
            closing_cash_balance,
        )
    }

    /// Checks that this shift can be closed with the given count and returns
    /// the reconciliation to show.
    pub fn close_preview(&self, closing_cash_balance: Money) -> CoreResult<CashReconciliation> {
        self.ensure_open()?;
        validate_closing_balance(closing_cash_balance)?;
        Ok(self.reconcile(closing_cash_balance))
    }
}

/// Finds a shift by id in a fetched list.
pub fn find_shift<'a>(shifts: &'a [Shift], shift_id: &str) -> CoreResult<&'a Shift> {
    shifts
        .iter()
        .find(|s| s.id == shift_id)
        .ok_or_else(|| CoreError::ShiftNotFound(shift_id.to_string()))
}

// =============================================================================
// Business Context
// =============================================================================

/// Which tenant, outlet, till and operator the client is working for.
///
/// Every backend query is parameterized by this. It is plain data; the
/// observable store around it lives in `meridian-session`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BusinessContext {
    /// Tenant (business account). Empty until configured.
    pub tenant_id: String,

    /// Selected outlet, if any.
    pub outlet_id: Option<String>,

    /// Selected till within the outlet, if any.
    pub till_id: Option<String>,

    /// Signed-in operator, if any.
    pub user_id: Option<String>,
}

impl BusinessContext {
    /// Creates a context for a tenant with nothing else selected.
    pub fn for_tenant(tenant_id: impl Into<String>) -> Self {
        BusinessContext {
            tenant_id: tenant_id.into(),
            ..Default::default()
        }
    }

    /// Returns the shift query scope, or `None` when no outlet is selected.
    pub fn scope(&self) -> Option<OutletScope> {
        self.outlet_id.as_ref().map(|outlet_id| OutletScope {
            outlet_id: outlet_id.clone(),
            till_id: self.till_id.clone(),
            user_id: self.user_id.clone(),
        })
    }
}

/// Query scope for open-shift lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutletScope {
    pub outlet_id: String,
    pub till_id: Option<String>,
    pub user_id: Option<String>,
}

impl OutletScope {
    /// Scope covering every till and operator of an outlet.
    pub fn outlet(outlet_id: impl Into<String>) -> Self {
        OutletScope {
            outlet_id: outlet_id.into(),
            till_id: None,
            user_id: None,
        }
    }
}

// =============================================================================
// Requests
// =============================================================================

/// Body of the close-shift call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloseShiftRequest {
    #[serde(with = "money::wire")]
    pub closing_cash_balance: Money,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Body of the start-shift call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartShiftRequest {
    pub outlet_id: String,
    pub till_id: String,
    pub user_id: String,
    pub operating_date: NaiveDate,

    #[serde(with = "money::wire")]
    pub opening_cash_balance: Money,

    #[serde(with = "money::wire")]
    pub floating_cash: Money,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

// =============================================================================
// Unit Tests
// =============================================================================
