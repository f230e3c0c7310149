//! # meridian-client: Service Layer for the Shift API
//!
//! Typed wrappers around the backend REST calls the register client needs.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Service Layer                                    │
//! │                                                                         │
//! │  ShiftSessionManager (meridian-session)                                │
//! │          │                                                              │
//! │          │  Arc<dyn ShiftService>                                       │
//! │          ▼                                                              │
//! │  ┌────────────────────────────────────────────────────────────────┐    │
//! │  │  ShiftService (trait)                                          │    │
//! │  │  • list_open_shifts(scope)  ──► GET  /api/v1/shifts?status=OPEN│    │
//! │  │  • close_shift(id, body)    ──► POST /api/v1/shifts/{id}/close │    │
//! │  │  • start_shift(body)        ──► POST /api/v1/shifts            │    │
//! │  └──────────────┬─────────────────────────────────┬───────────────┘    │
//! │                 │                                 │                     │
//! │        HttpShiftService                   MockShiftService             │
//! │        (reqwest, production)              (mockall, tests)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use meridian_client::{ClientConfig, HttpShiftService, ShiftService};
//! use meridian_core::OutletScope;
//!
//! # async fn run() -> meridian_client::ClientResult<()> {
//! let config = ClientConfig::load(None)?;
//! let service = HttpShiftService::new(&config)?;
//!
//! let open = service.list_open_shifts(OutletScope::outlet("outlet-1")).await?;
//! println!("{} open registers", open.len());
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod http;
pub mod service;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{ApiSettings, ClientConfig, ContextSettings};
pub use error::{ClientError, ClientResult};
pub use http::HttpShiftService;
pub use service::{MockShiftService, ShiftService};
