//! # Shift Session Manager
//!
//! Single source of truth for "is there a usable open register session right
//! now", plus the recovery, close and open workflows around it.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   ┌──────────────────┐   refresh (one relevant)   ┌─────────────────┐  │
//! │   │                  │ ─────────────────────────► │                 │  │
//! │   │ no session known │   adopt(id in known list)  │  OPEN, known    │  │
//! │   │                  │ ─────────────────────────► │                 │  │
//! │   │                  │   open_shift (success)     │                 │  │
//! │   │                  │ ─────────────────────────► │                 │  │
//! │   │                  │                            │                 │  │
//! │   │                  │ ◄───────────────────────── │                 │  │
//! │   └──────────────────┘   close_shift (success)    └────────┬────────┘  │
//! │            ▲             refresh (none / error)            │           │
//! │            └───────────────────────────────────────────────┘           │
//! │                                                                         │
//! │  Reads  (refresh, list_open_shifts): failures degrade to empty state.  │
//! │  Writes (close_shift, open_shift):   no local change until the backend │
//! │                                      confirms; failures are returned.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Observing State
//! Every change is published as a [`SessionSnapshot`] through a `watch`
//! channel; [`ShiftSessionManager::gate`] reduces it to what a POS screen
//! needs.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use chrono::{Local, NaiveDate};
use meridian_client::{ClientError, ShiftService};
use meridian_core::validation::{
    normalize_notes, validate_closing_balance, validate_identifier, validate_non_negative,
    FLOATING_CASH_FIELD, OPENING_BALANCE_FIELD,
};
use meridian_core::{
    find_shift, BusinessContext, CashReconciliation, CloseShiftRequest, CoreResult, Money,
    OutletScope, Shift, StartShiftRequest,
};
use serde::Serialize;
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use ts_rs::TS;

use crate::context::ContextStore;
use crate::error::{SessionError, SessionResult};

// =============================================================================
// Snapshot & Gate
// =============================================================================

/// Observable session state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    /// The open shift this register is working in, if one is known.
    pub active_shift: Option<Shift>,

    /// True while a refresh is in flight.
    pub is_loading: bool,

    /// Set when the last read failed; cleared by the next successful read.
    pub read_error: Option<String>,
}

/// What a POS screen should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PosGate {
    /// First lookup still running.
    Loading,
    /// Sell against this shift.
    Ready(Shift),
    /// No open shift: offer recovery or "start shift".
    RegisterClosed,
    /// The last lookup failed; shift state is unknown.
    Offline(String),
}

/// Input for [`ShiftSessionManager::open_shift`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpenShift {
    pub opening_cash_balance: Money,
    pub floating_cash: Money,
    /// Defaults to today's local date.
    pub operating_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

// =============================================================================
// Manager
// =============================================================================

pub struct ShiftSessionManager {
    service: Arc<dyn ShiftService>,
    context: ContextStore,
    state: watch::Sender<SessionSnapshot>,
    /// Most recently fetched open shifts for the current outlet.
    known_open: RwLock<Vec<Shift>>,
    /// Bumped by every confirmed local write (close, open, adopt).
    writes: AtomicU64,
}

impl std::fmt::Debug for ShiftSessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShiftSessionManager")
            .field("context", &self.context)
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

impl ShiftSessionManager {
    pub fn new(service: Arc<dyn ShiftService>, context: ContextStore) -> Self {
        let (state, _rx) = watch::channel(SessionSnapshot::default());
        ShiftSessionManager {
            service,
            context,
            state,
            known_open: RwLock::new(Vec::new()),
            writes: AtomicU64::new(0),
        }
    }

    // =========================================================================
    // State Access
    // =========================================================================

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.subscribe()
    }

    pub fn active_shift(&self) -> Option<Shift> {
        self.state.borrow().active_shift.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    pub fn context(&self) -> &ContextStore {
        &self.context
    }

    /// The known open list, as last fetched.
    pub async fn known_open_shifts(&self) -> Vec<Shift> {
        self.known_open.read().await.clone()
    }

    /// Reduces the current snapshot to a screen decision.
    pub fn gate(&self) -> PosGate {
        let state = self.state.borrow();
        match (&state.active_shift, &state.read_error) {
            (Some(shift), _) => PosGate::Ready(shift.clone()),
            (None, _) if state.is_loading => PosGate::Loading,
            (None, Some(reason)) => PosGate::Offline(reason.clone()),
            (None, None) => PosGate::RegisterClosed,
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Re-reads the open shifts of the selected outlet and picks the active
    /// one.
    ///
    /// The whole outlet is fetched so the result can double as the known open
    /// list. The relevant shift is then chosen locally:
    /// 1. the signed-in operator's shifts, when someone is signed in
    /// 2. if more than one remains and a till is selected, the one on that till
    /// 3. anything still ambiguous resolves to no active shift
    ///
    /// Errors are not returned: the active shift becomes `None` and
    /// `read_error` records why.
    ///
    /// A list fetched for a selection that changed mid-request is dropped
    /// and fetched again. A list older than a confirmed close, open or adopt
    /// is dropped and the local state stands.
    pub async fn refresh(&self) -> Option<Shift> {
        loop {
            let context = self.context.current();
            let Some(scope) = context.scope() else {
                debug!("No outlet selected, clearing session");
                self.known_open.write().await.clear();
                self.state.send_replace(SessionSnapshot::default());
                return None;
            };

            let generation = self.writes.load(Ordering::Acquire);
            self.state.send_modify(|s| s.is_loading = true);
            let result = self
                .service
                .list_open_shifts(OutletScope::outlet(scope.outlet_id.clone()))
                .await;

            // The answer was for another outlet, till or operator: drop what
            // belonged to the old selection and ask again.
            if selection(&self.context.current()) != selection(&context) {
                debug!(outlet_id = %scope.outlet_id, "Selection changed during refresh, retrying");
                self.known_open.write().await.clear();
                self.state.send_replace(SessionSnapshot {
                    is_loading: true,
                    ..SessionSnapshot::default()
                });
                continue;
            }

            // A close, open or adopt landed while the list was in flight and
            // is newer than anything in it.
            if self.writes.load(Ordering::Acquire) != generation {
                debug!(outlet_id = %scope.outlet_id, "Discarding refresh older than a local write");
                self.state.send_modify(|s| s.is_loading = false);
                return self.active_shift();
            }

            return self.apply_refresh(&scope.outlet_id, &context, result).await;
        }
    }

    async fn apply_refresh(
        &self,
        outlet_id: &str,
        context: &BusinessContext,
        result: Result<Vec<Shift>, ClientError>,
    ) -> Option<Shift> {
        match result {
            Ok(open) => {
                let active = select_relevant(&open, context);
                debug!(
                    outlet_id,
                    open = open.len(),
                    active = ?active.as_ref().map(|s| &s.id),
                    "Refreshed open shifts"
                );

                *self.known_open.write().await = open;
                self.state.send_replace(SessionSnapshot {
                    active_shift: active.clone(),
                    is_loading: false,
                    read_error: None,
                });
                active
            }
            Err(e) => {
                warn!(outlet_id, error = %e, "Failed to load open shifts");

                self.known_open.write().await.clear();
                self.state.send_replace(SessionSnapshot {
                    active_shift: None,
                    is_loading: false,
                    read_error: Some(e.to_string()),
                });
                None
            }
        }
    }

    /// Lists every open shift in the selected outlet for the recovery screen.
    ///
    /// An empty list is normal. Read failures also produce an empty list.
    /// Either way the result replaces the known open list.
    pub async fn list_open_shifts(&self) -> Vec<Shift> {
        let Some(scope) = self.context.scope() else {
            debug!("No outlet selected, no open shifts to list");
            self.known_open.write().await.clear();
            return Vec::new();
        };

        match self
            .service
            .list_open_shifts(OutletScope::outlet(scope.outlet_id.clone()))
            .await
        {
            Ok(open) => {
                debug!(outlet_id = %scope.outlet_id, open = open.len(), "Listed open shifts");
                *self.known_open.write().await = open.clone();
                self.state.send_if_modified(|s| s.read_error.take().is_some());
                open
            }
            Err(e) => {
                warn!(outlet_id = %scope.outlet_id, error = %e, "Failed to list open shifts");
                self.known_open.write().await.clear();
                self.state.send_modify(|s| s.read_error = Some(e.to_string()));
                Vec::new()
            }
        }
    }

    /// Makes a shift from the known open list the active one. No request is
    /// made. Unknown ids, and entries no longer `OPEN`, leave state untouched
    /// and return `None`.
    pub async fn adopt(&self, shift_id: &str) -> Option<Shift> {
        let shift = self
            .known_open
            .read()
            .await
            .iter()
            .find(|s| s.id == shift_id && s.is_open())
            .cloned();

        match shift {
            Some(shift) => {
                info!(shift_id = %shift.id, till_id = %shift.till_id, "Adopted open shift");
                self.writes.fetch_add(1, Ordering::AcqRel);
                self.state.send_modify(|s| {
                    s.active_shift = Some(shift.clone());
                    s.read_error = None;
                });
                Some(shift)
            }
            None => {
                debug!(shift_id, "Ignoring adopt of unknown shift");
                None
            }
        }
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Reconciliation shown before the operator confirms a close. The shift
    /// must be active or in the known open list.
    pub async fn preview_close(
        &self,
        shift_id: &str,
        closing_cash_balance: Money,
    ) -> SessionResult<CashReconciliation> {
        let shift = self.find_shift(shift_id).await?;
        Ok(shift.close_preview(closing_cash_balance)?)
    }

    /// Closes a shift with the counted cash.
    ///
    /// Negative and zero counts are rejected before any request. On success
    /// the shift leaves the known open list and, if it was active, the
    /// register falls back to "closed". On failure nothing changes locally.
    pub async fn close_shift(
        &self,
        shift_id: &str,
        closing_cash_balance: Money,
        notes: Option<&str>,
    ) -> SessionResult<Shift> {
        validate_identifier("shift id", shift_id)?;
        validate_closing_balance(closing_cash_balance)?;
        let notes = normalize_notes(notes)?;

        let request = CloseShiftRequest {
            closing_cash_balance,
            notes,
        };

        let closed = self
            .service
            .close_shift(shift_id.to_string(), request)
            .await
            .map_err(|e| {
                error!(shift_id, error = %e, "Failed to close shift");
                SessionError::CloseFailed(e)
            })?;

        self.writes.fetch_add(1, Ordering::AcqRel);
        self.known_open.write().await.retain(|s| s.id != shift_id);
        self.state.send_if_modified(|s| {
            if s.active_shift.as_ref().is_some_and(|a| a.id == shift_id) {
                s.active_shift = None;
                true
            } else {
                false
            }
        });

        info!(
            shift_id,
            closing = %closing_cash_balance,
            difference = %closed.reconcile(closing_cash_balance).difference_label(),
            "Shift closed"
        );
        Ok(closed)
    }

    /// Opens a new shift on the selected till for the signed-in operator.
    pub async fn open_shift(&self, input: OpenShift) -> SessionResult<Shift> {
        let context = self.context.current();
        let outlet_id = context.outlet_id.ok_or(SessionError::NoOutletSelected)?;
        let till_id = context.till_id.ok_or(SessionError::NoTillSelected)?;
        let user_id = context.user_id.ok_or(SessionError::NotSignedIn)?;

        if let Some(active) = self.active_shift() {
            return Err(SessionError::ShiftAlreadyActive {
                shift_id: active.id,
            });
        }

        validate_non_negative(OPENING_BALANCE_FIELD, input.opening_cash_balance)?;
        validate_non_negative(FLOATING_CASH_FIELD, input.floating_cash)?;
        let notes = normalize_notes(input.notes.as_deref())?;

        let request = StartShiftRequest {
            outlet_id,
            till_id,
            user_id,
            operating_date: input
                .operating_date
                .unwrap_or_else(|| Local::now().date_naive()),
            opening_cash_balance: input.opening_cash_balance,
            floating_cash: input.floating_cash,
            notes,
        };

        let shift = self.service.start_shift(request).await.map_err(|e| {
            error!(error = %e, "Failed to open shift");
            SessionError::OpenFailed(e)
        })?;

        info!(
            shift_id = %shift.id,
            till_id = %shift.till_id,
            opening = %shift.opening_cash_balance,
            "Shift opened"
        );

        self.writes.fetch_add(1, Ordering::AcqRel);
        self.known_open.write().await.push(shift.clone());
        self.state.send_replace(SessionSnapshot {
            active_shift: Some(shift.clone()),
            is_loading: false,
            read_error: None,
        });
        Ok(shift)
    }

    // =========================================================================
    // Context Following
    // =========================================================================

    /// Spawns a task that refreshes whenever the outlet, till or operator
    /// selection changes.
    ///
    /// The task holds only a weak reference; it exits once the manager is
    /// dropped (noticed on the next context change) or the context store is
    /// gone.
    pub fn follow_context(self: &Arc<Self>) -> JoinHandle<()> {
        let mut rx = self.context.subscribe();
        let manager: Weak<Self> = Arc::downgrade(self);
        let mut last = selection(&rx.borrow_and_update());

        tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let current = selection(&rx.borrow_and_update());
                if current == last {
                    continue;
                }
                last = current;

                let Some(manager) = manager.upgrade() else {
                    break;
                };
                manager.refresh().await;
            }
            debug!("Stopped following business context");
        })
    }

    async fn find_shift(&self, shift_id: &str) -> CoreResult<Shift> {
        if let Some(active) = self.active_shift().filter(|s| s.id == shift_id) {
            return Ok(active);
        }
        find_shift(&self.known_open.read().await, shift_id).cloned()
    }
}

/// The parts of the context that decide which shift is relevant.
fn selection(ctx: &BusinessContext) -> (Option<String>, Option<String>, Option<String>) {
    (ctx.outlet_id.clone(), ctx.till_id.clone(), ctx.user_id.clone())
}

/// Picks the one open shift relevant to `context`, if exactly one is.
fn select_relevant(open: &[Shift], context: &BusinessContext) -> Option<Shift> {
    let mut candidates: Vec<&Shift> = open.iter().filter(|s| s.is_open()).collect();

    if let Some(user_id) = context.user_id.as_deref() {
        candidates.retain(|s| s.belongs_to(user_id));
    }

    if candidates.len() > 1 {
        if let Some(till_id) = context.till_id.as_deref() {
            candidates.retain(|s| s.on_till(till_id));
        }
    }

    match candidates.as_slice() {
        [only] => Some((*only).clone()),
        _ => None,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use chrono::{TimeZone, Utc};
    use async_trait::async_trait;
    use meridian_client::MockShiftService;
    use meridian_core::{ShiftStatus, ValidationError};
    use tokio::sync::Notify;

    fn shift(id: &str, till_id: &str, user_id: &str, opening_cents: i64) -> Shift {
        Shift {
            id: id.to_string(),
            outlet_id: "outlet-1".to_string(),
            till_id: till_id.to_string(),
            user_id: user_id.to_string(),
            operating_date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            opening_cash_balance: Money::from_cents(opening_cents),
            floating_cash: Money::zero(),
            closing_cash_balance: None,
            status: ShiftStatus::Open,
            start_time: Utc.with_ymd_and_hms(2026, 3, 14, 8, 0, 0).unwrap(),
            end_time: None,
            notes: None,
        }
    }

    fn closed(mut shift: Shift, closing: Money) -> Shift {
        shift.status = ShiftStatus::Closed;
        shift.closing_cash_balance = Some(closing);
        shift.end_time = Some(Utc.with_ymd_and_hms(2026, 3, 14, 17, 30, 0).unwrap());
        shift
    }

    fn context(outlet: Option<&str>, till: Option<&str>, user: Option<&str>) -> ContextStore {
        ContextStore::new(BusinessContext {
            tenant_id: "tenant-1".to_string(),
            outlet_id: outlet.map(str::to_string),
            till_id: till.map(str::to_string),
            user_id: user.map(str::to_string),
        })
    }

    fn manager(service: MockShiftService, context: ContextStore) -> ShiftSessionManager {
        ShiftSessionManager::new(Arc::new(service), context)
    }

    fn listing(shifts: Vec<Shift>) -> MockShiftService {
        let mut service = MockShiftService::new();
        service
            .expect_list_open_shifts()
            .returning(move |_| Ok(shifts.clone()));
        service
    }

    /// Holds `list_open_shifts` open until released, so writes can land
    /// while a read is in flight.
    struct HeldList {
        open: Vec<Shift>,
        listing: Notify,
        release: Notify,
    }

    impl HeldList {
        fn new(open: Vec<Shift>) -> Self {
            HeldList {
                open,
                listing: Notify::new(),
                release: Notify::new(),
            }
        }
    }

    #[async_trait]
    impl ShiftService for HeldList {
        async fn list_open_shifts(&self, _scope: OutletScope) -> Result<Vec<Shift>, ClientError> {
            self.listing.notify_one();
            self.release.notified().await;
            Ok(self.open.clone())
        }

        async fn close_shift(
            &self,
            shift_id: String,
            request: CloseShiftRequest,
        ) -> Result<Shift, ClientError> {
            let open = find_shift(&self.open, &shift_id)
                .map_err(|e| ClientError::Status {
                    status: 404,
                    message: e.to_string(),
                })?
                .clone();
            Ok(closed(open, request.closing_cash_balance))
        }

        async fn start_shift(&self, _request: StartShiftRequest) -> Result<Shift, ClientError> {
            Err(ClientError::Timeout)
        }
    }

    // -------------------------------------------------------------------------
    // refresh
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_refresh_without_outlet_makes_no_request() {
        let mut service = MockShiftService::new();
        service.expect_list_open_shifts().never();

        let manager = manager(service, context(None, None, Some("user-3")));
        assert_eq!(manager.refresh().await, None);
        assert_eq!(manager.snapshot(), SessionSnapshot::default());
        assert_eq!(manager.gate(), PosGate::RegisterClosed);
    }

    #[tokio::test]
    async fn test_refresh_with_no_open_shifts() {
        let manager = manager(listing(vec![]), context(Some("outlet-1"), None, None));

        assert_eq!(manager.refresh().await, None);
        assert_eq!(manager.active_shift(), None);
        assert!(manager.known_open_shifts().await.is_empty());
        assert!(manager.list_open_shifts().await.is_empty());
        assert_eq!(manager.gate(), PosGate::RegisterClosed);
    }

    #[tokio::test]
    async fn test_refresh_picks_single_open_shift() {
        let mut service = MockShiftService::new();
        service
            .expect_list_open_shifts()
            .once()
            .withf(|scope| scope.outlet_id == "outlet-1")
            .return_once(|_| Ok(vec![shift("s1", "till-2", "user-3", 10000)]));

        let manager = manager(service, context(Some("outlet-1"), Some("till-2"), Some("user-3")));

        let active = manager.refresh().await.unwrap();
        assert_eq!(active.id, "s1");
        assert_eq!(manager.active_shift().map(|s| s.id), Some("s1".to_string()));
        assert!(!manager.is_loading());
        assert!(matches!(manager.gate(), PosGate::Ready(s) if s.id == "s1"));
    }

    #[tokio::test]
    async fn test_refresh_filters_by_user_then_till() {
        let open = vec![
            shift("s1", "till-1", "user-3", 10000),
            shift("s2", "till-2", "user-3", 5000),
            shift("s3", "till-2", "user-4", 5000),
        ];

        let by_user = manager(listing(open.clone()), context(Some("outlet-1"), None, Some("user-4")));
        assert_eq!(by_user.refresh().await.map(|s| s.id), Some("s3".to_string()));

        let by_till = manager(
            listing(open.clone()),
            context(Some("outlet-1"), Some("till-2"), Some("user-3")),
        );
        assert_eq!(by_till.refresh().await.map(|s| s.id), Some("s2".to_string()));
        assert_eq!(by_till.known_open_shifts().await.len(), 3);
    }

    #[tokio::test]
    async fn test_refresh_ambiguous_resolves_to_none() {
        let open = vec![
            shift("s1", "till-1", "user-3", 10000),
            shift("s2", "till-2", "user-3", 5000),
        ];
        let manager = manager(listing(open), context(Some("outlet-1"), None, Some("user-3")));

        assert_eq!(manager.refresh().await, None);
        assert_eq!(manager.known_open_shifts().await.len(), 2);
        assert_eq!(manager.gate(), PosGate::RegisterClosed);
    }

    #[tokio::test]
    async fn test_refresh_error_degrades_to_offline() {
        let mut service = MockShiftService::new();
        service
            .expect_list_open_shifts()
            .returning(|_| Err(ClientError::ConnectionFailed("refused".into())));

        let manager = manager(service, context(Some("outlet-1"), None, None));

        assert_eq!(manager.refresh().await, None);
        let snapshot = manager.snapshot();
        assert_eq!(snapshot.active_shift, None);
        assert!(!snapshot.is_loading);
        assert!(snapshot.read_error.is_some());
        assert!(matches!(manager.gate(), PosGate::Offline(_)));

        assert!(manager.list_open_shifts().await.is_empty());
    }

    #[tokio::test]
    async fn test_refresh_error_clears_previous_active_shift() {
        let mut service = MockShiftService::new();
        let mut seq = mockall::Sequence::new();
        service
            .expect_list_open_shifts()
            .once()
            .in_sequence(&mut seq)
            .return_once(|_| Ok(vec![shift("s1", "till-2", "user-3", 10000)]));
        service
            .expect_list_open_shifts()
            .once()
            .in_sequence(&mut seq)
            .return_once(|_| Err(ClientError::Timeout));

        let manager = manager(service, context(Some("outlet-1"), None, None));
        assert!(manager.refresh().await.is_some());
        assert_eq!(manager.refresh().await, None);
        assert_eq!(manager.active_shift(), None);
    }

    #[tokio::test]
    async fn test_refresh_after_outlet_change_drops_old_outlet_state() {
        let store = context(Some("outlet-1"), None, Some("user-3"));
        let moved = store.clone();
        let mut service = MockShiftService::new();
        let mut seq = mockall::Sequence::new();
        service
            .expect_list_open_shifts()
            .once()
            .in_sequence(&mut seq)
            .return_once(|_| Ok(vec![shift("s1", "till-1", "user-3", 10000)]));
        service
            .expect_list_open_shifts()
            .once()
            .in_sequence(&mut seq)
            .return_once(move |_| {
                moved.select_outlet(Some("outlet-2".to_string()));
                Ok(vec![shift("s1", "till-1", "user-3", 10000)])
            });
        service
            .expect_list_open_shifts()
            .once()
            .in_sequence(&mut seq)
            .withf(|scope| scope.outlet_id == "outlet-2")
            .return_once(|_| Ok(vec![]));

        let manager = manager(service, store);
        assert!(manager.refresh().await.is_some());

        assert_eq!(manager.refresh().await, None);
        assert_eq!(manager.active_shift(), None);
        assert!(!manager.is_loading());
        assert!(manager.known_open_shifts().await.is_empty());
        assert_eq!(manager.gate(), PosGate::RegisterClosed);
    }

    #[tokio::test]
    async fn test_refresh_after_operator_change_uses_new_operator() {
        let store = context(Some("outlet-1"), None, Some("user-3"));
        let moved = store.clone();
        let mut service = MockShiftService::new();
        service.expect_list_open_shifts().times(2).returning(move |_| {
            moved.sign_in("user-4".to_string());
            Ok(vec![shift("s-user3", "till-1", "user-3", 10000)])
        });

        let manager = manager(service, store.clone());

        assert_eq!(manager.refresh().await, None);
        assert_eq!(store.current().user_id.as_deref(), Some("user-4"));
        assert_eq!(manager.active_shift(), None);
        assert_eq!(manager.known_open_shifts().await.len(), 1);
    }

    #[tokio::test]
    async fn test_refresh_does_not_revive_shift_closed_meanwhile() {
        let service = Arc::new(HeldList::new(vec![shift("s1", "till-2", "user-3", 10000)]));
        let manager = ShiftSessionManager::new(
            service.clone(),
            context(Some("outlet-1"), Some("till-2"), Some("user-3")),
        );

        let close = async {
            service.listing.notified().await;
            let closed = manager.close_shift("s1", Money::from_cents(10000), None).await;
            service.release.notify_one();
            closed
        };
        let (active, closed) = tokio::join!(manager.refresh(), close);

        assert_eq!(closed.unwrap().status, ShiftStatus::Closed);
        assert_eq!(active, None);
        assert_eq!(manager.active_shift(), None);
        assert!(!manager.is_loading());
        assert!(manager.known_open_shifts().await.is_empty());
    }

    // -------------------------------------------------------------------------
    // recovery: list + adopt
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_adopt_known_shift() {
        let open = vec![
            shift("s1", "till-1", "user-3", 10000),
            shift("s2", "till-2", "user-4", 5000),
        ];
        let mut service = MockShiftService::new();
        service
            .expect_list_open_shifts()
            .once()
            .return_once(move |_| Ok(open));

        let manager = manager(service, context(Some("outlet-1"), None, None));
        assert_eq!(manager.list_open_shifts().await.len(), 2);

        // No further request is allowed: adopt trusts the known list.
        let adopted = manager.adopt("s2").await.unwrap();
        assert_eq!(adopted.id, "s2");
        assert_eq!(manager.active_shift().map(|s| s.id), Some("s2".to_string()));
    }

    #[tokio::test]
    async fn test_adopt_unknown_shift_is_noop() {
        let manager = manager(
            listing(vec![shift("s1", "till-1", "user-3", 10000)]),
            context(Some("outlet-1"), None, Some("user-3")),
        );
        manager.refresh().await;
        let before = manager.snapshot();

        let mut rx = manager.subscribe();
        rx.borrow_and_update();

        assert_eq!(manager.adopt("s404").await, None);
        assert_eq!(manager.snapshot(), before);
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_adopt_skips_entries_no_longer_open() {
        let open = vec![
            closed(shift("s1", "till-1", "user-3", 10000), Money::from_cents(10000)),
            shift("s2", "till-2", "user-3", 5000),
        ];
        let manager = manager(listing(open), context(Some("outlet-1"), None, None));
        manager.list_open_shifts().await;

        assert_eq!(manager.adopt("s1").await, None);
        assert_eq!(manager.active_shift(), None);
    }

    #[tokio::test]
    async fn test_adopt_clears_read_error() {
        let manager = manager(
            listing(vec![shift("s2", "till-2", "user-3", 5000)]),
            context(Some("outlet-1"), None, None),
        );
        manager.list_open_shifts().await;
        manager
            .state
            .send_modify(|s| s.read_error = Some("Request timed out".to_string()));

        manager.adopt("s2").await.unwrap();
        assert_eq!(manager.snapshot().read_error, None);
        assert!(matches!(manager.gate(), PosGate::Ready(s) if s.id == "s2"));
    }

    // -------------------------------------------------------------------------
    // close
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_close_rejects_negative_and_zero_without_request() {
        let mut service = listing(vec![shift("s1", "till-2", "user-3", 10000)]);
        service.expect_close_shift().never();

        let manager = manager(service, context(Some("outlet-1"), None, None));
        manager.refresh().await;

        let err = manager
            .close_shift("s1", Money::from_cents(-1), None)
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::Validation(ValidationError::Negative { .. })));

        let err = manager.close_shift("s1", Money::zero(), None).await.unwrap_err();
        assert!(matches!(
            err,
            SessionError::Validation(ValidationError::MustBePositive { .. })
        ));

        assert_eq!(manager.active_shift().map(|s| s.id), Some("s1".to_string()));
    }

    #[tokio::test]
    async fn test_close_success_clears_active_shift() {
        let active = shift("s1", "till-2", "user-3", 10000);
        let mut service = listing(vec![active.clone()]);
        service
            .expect_close_shift()
            .once()
            .withf(|id, request| {
                id == "s1"
                    && request.closing_cash_balance == Money::from_cents(5000)
                    && request.notes.is_none()
            })
            .return_once(move |_, _| Ok(closed(active, Money::from_cents(5000))));

        let manager = manager(service, context(Some("outlet-1"), None, None));
        manager.refresh().await;

        let result = manager
            .close_shift("s1", Money::from_cents(5000), Some("  "))
            .await
            .unwrap();
        assert_eq!(result.status, ShiftStatus::Closed);
        assert_eq!(manager.active_shift(), None);
        assert!(manager.known_open_shifts().await.is_empty());
        assert_eq!(manager.gate(), PosGate::RegisterClosed);
    }

    #[tokio::test]
    async fn test_close_failure_keeps_state() {
        let mut service = listing(vec![shift("s1", "till-2", "user-3", 10000)]);
        service
            .expect_close_shift()
            .once()
            .return_once(|_, _| Err(ClientError::Timeout));

        let manager = manager(service, context(Some("outlet-1"), None, None));
        manager.refresh().await;
        let before = manager.snapshot();

        let err = manager
            .close_shift("s1", Money::from_cents(5000), None)
            .await
            .unwrap_err();

        assert!(matches!(err, SessionError::CloseFailed(ClientError::Timeout)));
        assert!(err.is_retryable());
        assert_eq!(manager.snapshot(), before);
        assert_eq!(manager.known_open_shifts().await.len(), 1);
    }

    #[tokio::test]
    async fn test_close_of_other_shift_keeps_active() {
        let open = vec![
            shift("s1", "till-1", "user-3", 10000),
            shift("s2", "till-2", "user-4", 5000),
        ];
        let other = open[1].clone();
        let mut service = listing(open);
        service
            .expect_close_shift()
            .once()
            .return_once(move |_, _| Ok(closed(other, Money::from_cents(5000))));

        let manager = manager(service, context(Some("outlet-1"), None, Some("user-3")));
        manager.refresh().await;

        manager
            .close_shift("s2", Money::from_cents(5000), None)
            .await
            .unwrap();
        assert_eq!(manager.active_shift().map(|s| s.id), Some("s1".to_string()));
        assert_eq!(manager.known_open_shifts().await.len(), 1);
    }

    #[tokio::test]
    async fn test_close_scenario_with_preview() {
        let active = shift("s1", "till-2", "user-3", 10000);
        let mut service = listing(vec![active.clone()]);
        service
            .expect_close_shift()
            .once()
            .withf(|id, request| id == "s1" && request.closing_cash_balance.cents() == 13750)
            .return_once(move |_, _| Ok(closed(active, Money::from_cents(13750))));

        let manager = manager(service, context(Some("outlet-1"), None, None));
        manager.refresh().await;

        let closing = Money::parse("137.50", "closing cash balance").unwrap();
        let preview = manager.preview_close("s1", closing).await.unwrap();
        assert_eq!(preview.difference, Money::from_cents(3750));
        assert_eq!(preview.difference_label(), "+$37.50");

        manager.close_shift("s1", closing, None).await.unwrap();
        assert_eq!(manager.active_shift(), None);
    }

    #[tokio::test]
    async fn test_preview_unknown_shift() {
        let manager = manager(listing(vec![]), context(Some("outlet-1"), None, None));
        manager.refresh().await;

        let err = manager
            .preview_close("s1", Money::from_cents(100))
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::UnknownShift(id) if id == "s1"));
    }

    // -------------------------------------------------------------------------
    // open
    // -------------------------------------------------------------------------

    fn opening() -> OpenShift {
        OpenShift {
            opening_cash_balance: Money::from_cents(10000),
            floating_cash: Money::from_cents(2500),
            operating_date: NaiveDate::from_ymd_opt(2026, 3, 14),
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_open_requires_full_context() {
        let mut service = MockShiftService::new();
        service.expect_start_shift().never();
        let service = Arc::new(service);

        let no_till = ShiftSessionManager::new(service.clone(), context(Some("outlet-1"), None, Some("u")));
        assert!(matches!(
            no_till.open_shift(opening()).await,
            Err(SessionError::NoTillSelected)
        ));

        let no_user = ShiftSessionManager::new(service.clone(), context(Some("outlet-1"), Some("t"), None));
        assert!(matches!(
            no_user.open_shift(opening()).await,
            Err(SessionError::NotSignedIn)
        ));

        let no_outlet = ShiftSessionManager::new(service, context(None, None, None));
        assert!(matches!(
            no_outlet.open_shift(opening()).await,
            Err(SessionError::NoOutletSelected)
        ));
    }

    #[tokio::test]
    async fn test_open_rejects_negative_float() {
        let mut service = MockShiftService::new();
        service.expect_start_shift().never();
        let manager = manager(service, context(Some("outlet-1"), Some("till-2"), Some("user-3")));

        let input = OpenShift {
            floating_cash: Money::from_cents(-100),
            ..opening()
        };
        assert!(matches!(
            manager.open_shift(input).await,
            Err(SessionError::Validation(ValidationError::Negative { .. }))
        ));
    }

    #[tokio::test]
    async fn test_open_success_becomes_active() {
        let mut service = MockShiftService::new();
        service
            .expect_start_shift()
            .once()
            .withf(|request| {
                request.outlet_id == "outlet-1"
                    && request.till_id == "till-2"
                    && request.user_id == "user-3"
                    && request.opening_cash_balance.cents() == 10000
                    && request.floating_cash.cents() == 2500
            })
            .return_once(|_| Ok(shift("s9", "till-2", "user-3", 10000)));

        let manager = manager(service, context(Some("outlet-1"), Some("till-2"), Some("user-3")));

        let opened = manager.open_shift(opening()).await.unwrap();
        assert_eq!(opened.id, "s9");
        assert!(matches!(manager.gate(), PosGate::Ready(s) if s.id == "s9"));

        // A second open on the same register is refused locally.
        assert!(matches!(
            manager.open_shift(opening()).await,
            Err(SessionError::ShiftAlreadyActive { shift_id }) if shift_id == "s9"
        ));
    }

    #[tokio::test]
    async fn test_open_failure_keeps_state() {
        let mut service = MockShiftService::new();
        service.expect_start_shift().once().return_once(|_| {
            Err(ClientError::Status {
                status: 409,
                message: "Till already has an open shift".into(),
            })
        });

        let manager = manager(service, context(Some("outlet-1"), Some("till-2"), Some("user-3")));
        let err = manager.open_shift(opening()).await.unwrap_err();

        assert!(matches!(err, SessionError::OpenFailed(_)));
        assert!(!err.is_retryable());
        assert_eq!(manager.snapshot(), SessionSnapshot::default());
    }

    // -------------------------------------------------------------------------
    // gate + follow_context
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_gate_prefers_known_shift_while_loading() {
        let manager = manager(
            listing(vec![shift("s1", "till-2", "user-3", 10000)]),
            context(Some("outlet-1"), None, Some("user-3")),
        );
        manager.state.send_modify(|s| s.is_loading = true);
        assert_eq!(manager.gate(), PosGate::Loading);

        manager.refresh().await;
        manager.state.send_modify(|s| s.is_loading = true);
        assert!(matches!(manager.gate(), PosGate::Ready(s) if s.id == "s1"));
    }

    #[test]
    fn test_select_relevant_ignores_closed() {
        let ctx = BusinessContext::for_tenant("tenant-1");
        let done = closed(shift("s1", "t", "u", 100), Money::from_cents(100));
        assert_eq!(select_relevant(&[done], &ctx), None);
    }

    #[tokio::test]
    async fn test_follow_context_refreshes_on_outlet_change() {
        let mut service = MockShiftService::new();
        service.expect_list_open_shifts().returning(|scope| {
            if scope.outlet_id == "outlet-2" {
                Ok(vec![shift("s7", "till-1", "user-3", 2000)])
            } else {
                Ok(vec![])
            }
        });

        let store = context(Some("outlet-1"), None, Some("user-3"));
        let manager = Arc::new(manager(service, store.clone()));
        let task = manager.follow_context();
        let mut rx = manager.subscribe();

        store.select_outlet(Some("outlet-2".to_string()));

        let snapshot = tokio::time::timeout(
            Duration::from_secs(2),
            rx.wait_for(|s| s.active_shift.is_some()),
        )
        .await
        .expect("refresh did not run")
        .unwrap()
        .clone();
        assert_eq!(snapshot.active_shift.map(|s| s.id), Some("s7".to_string()));

        task.abort();
    }

    #[tokio::test]
    async fn test_follow_context_stops_when_everything_is_dropped() {
        let store = context(Some("outlet-1"), None, None);
        let manager = Arc::new(manager(listing(vec![]), store.clone()));
        let task = manager.follow_context();

        drop(manager);
        drop(store);

        tokio::time::timeout(Duration::from_secs(2), task)
            .await
            .expect("follow task kept running")
            .unwrap();
    }

    #[test]
    fn test_snapshot_json() {
        let snapshot = SessionSnapshot {
            active_shift: None,
            is_loading: true,
            read_error: None,
        };
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "activeShift": null, "isLoading": true, "readError": null })
        );
    }
}
