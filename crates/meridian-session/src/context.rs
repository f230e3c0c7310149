//! # Business Context Store
//!
//! Observable holder of the selected tenant, outlet, till and operator.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Writers (CLI flags, selectors)          Readers                        │
//! │                                                                         │
//! │  select_tenant ─┐                        current()   (snapshot)         │
//! │  select_outlet ─┤    watch::Sender       subscribe() (change stream)    │
//! │  select_till   ─┼──► BusinessContext ──►                                │
//! │  sign_in       ─┤                        ShiftSessionManager            │
//! │  sign_out      ─┘                        follow_context task            │
//! │                                                                         │
//! │  Cascade: tenant change clears outlet + till; outlet change clears till │
//! │  A write that leaves the value unchanged notifies nobody.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use meridian_core::{BusinessContext, OutletScope};
use tokio::sync::watch;
use tracing::debug;

/// Shared handle to the current business context. Clones share one value.
#[derive(Debug, Clone)]
pub struct ContextStore {
    tx: Arc<watch::Sender<BusinessContext>>,
}

impl ContextStore {
    pub fn new(initial: BusinessContext) -> Self {
        let (tx, _rx) = watch::channel(initial);
        ContextStore { tx: Arc::new(tx) }
    }

    // =========================================================================
    // Read Contract
    // =========================================================================

    /// Snapshot of the current context.
    pub fn current(&self) -> BusinessContext {
        self.tx.borrow().clone()
    }

    /// Query scope for the selected outlet, if any.
    pub fn scope(&self) -> Option<OutletScope> {
        self.tx.borrow().scope()
    }

    /// Receiver that is notified on every effective change.
    pub fn subscribe(&self) -> watch::Receiver<BusinessContext> {
        self.tx.subscribe()
    }

    // =========================================================================
    // Write Contract
    // =========================================================================
    // Each writer returns true if the context actually changed.

    /// Switches tenant. Clears the outlet and till selections.
    pub fn select_tenant(&self, tenant_id: impl Into<String>) -> bool {
        let tenant_id = tenant_id.into();
        self.update(|ctx| {
            if ctx.tenant_id == tenant_id {
                return false;
            }
            ctx.tenant_id = tenant_id;
            ctx.outlet_id = None;
            ctx.till_id = None;
            true
        })
    }

    /// Selects (or clears) the outlet. Clears the till selection when the
    /// outlet changes.
    pub fn select_outlet(&self, outlet_id: Option<String>) -> bool {
        self.update(|ctx| {
            if ctx.outlet_id == outlet_id {
                return false;
            }
            ctx.outlet_id = outlet_id;
            ctx.till_id = None;
            true
        })
    }

    /// Selects (or clears) the till within the current outlet.
    pub fn select_till(&self, till_id: Option<String>) -> bool {
        self.update(|ctx| {
            if ctx.till_id == till_id {
                return false;
            }
            ctx.till_id = till_id;
            true
        })
    }

    pub fn sign_in(&self, user_id: impl Into<String>) -> bool {
        let user_id = Some(user_id.into());
        self.update(|ctx| {
            if ctx.user_id == user_id {
                return false;
            }
            ctx.user_id = user_id;
            true
        })
    }

    pub fn sign_out(&self) -> bool {
        self.update(|ctx| ctx.user_id.take().is_some())
    }

    fn update(&self, modify: impl FnOnce(&mut BusinessContext) -> bool) -> bool {
        let changed = self.tx.send_if_modified(modify);
        if changed {
            let ctx = self.tx.borrow();
            debug!(
                tenant_id = %ctx.tenant_id,
                outlet_id = ?ctx.outlet_id,
                till_id = ?ctx.till_id,
                user_id = ?ctx.user_id,
                "Business context changed"
            );
        }
        changed
    }
}

impl Default for ContextStore {
    fn default() -> Self {
        ContextStore::new(BusinessContext::default())
    }
}
