//! # meridian-session: Register Session State
//!
//! Tracks whether this register has a usable open shift and mediates the
//! recovery, close and open workflows.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ContextStore ──(outlet/till/user changes)──► follow_context task      │
//! │       │                                              │                  │
//! │       │ current()                                    │ refresh()        │
//! │       ▼                                              ▼                  │
//! │  ┌───────────────────────────────────────────────────────────────┐     │
//! │  │                    ShiftSessionManager                        │     │
//! │  │                                                               │     │
//! │  │  known open list ◄── list_open_shifts / refresh               │     │
//! │  │        │                                                      │     │
//! │  │        └──► adopt(id) ──► active shift ◄── open_shift         │     │
//! │  │                               │                               │     │
//! │  │                               └──► close_shift ──► cleared    │     │
//! │  └───────────────────────────────┬───────────────────────────────┘     │
//! │                                  │ watch<SessionSnapshot>               │
//! │                                  ▼                                      │
//! │                       gate(): Loading | Ready | RegisterClosed | Offline│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use meridian_client::{ClientConfig, HttpShiftService};
//! use meridian_session::{ContextStore, PosGate, ShiftSessionManager};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::load(None)?;
//! let context = ContextStore::new(config.initial_context());
//! let service = Arc::new(HttpShiftService::new(&config)?);
//!
//! let manager = Arc::new(ShiftSessionManager::new(service, context));
//! manager.refresh().await;
//! let _follower = manager.follow_context();
//!
//! if let PosGate::Ready(shift) = manager.gate() {
//!     println!("selling on till {}", shift.till_id);
//! }
//! # Ok(())
//! # }
//! ```

pub mod context;
pub mod error;
pub mod manager;

pub use context::ContextStore;
pub use error::{SessionError, SessionResult};
pub use manager::{OpenShift, PosGate, SessionSnapshot, ShiftSessionManager};
