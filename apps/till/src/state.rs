//! # Application State
//!
//! Everything a command needs, wired once per invocation.
//!
//! ```text
//! ClientConfig ──► ContextStore (config context + CLI selection)
//!      │                 │
//!      ▼                 ▼
//! HttpShiftService ──► ShiftSessionManager
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use meridian_client::{ClientConfig, HttpShiftService, ShiftService};
use meridian_session::{ContextStore, ShiftSessionManager};

use crate::cli::Selection;
use crate::error::CliResult;

pub struct AppState {
    pub context: ContextStore,
    pub manager: Arc<ShiftSessionManager>,
    /// `--config` path, if one was given. `None` means the platform default.
    pub config_path: Option<PathBuf>,
}

impl AppState {
    /// Builds state talking to the configured backend.
    pub fn from_config(
        config: ClientConfig,
        config_path: Option<PathBuf>,
        selection: Selection,
    ) -> CliResult<Self> {
        let service = Arc::new(HttpShiftService::new(&config)?);
        let mut state = AppState::with_service(&config, service, selection);
        state.config_path = config_path;
        Ok(state)
    }

    /// Builds state over any [`ShiftService`].
    pub fn with_service(
        config: &ClientConfig,
        service: Arc<dyn ShiftService>,
        selection: Selection,
    ) -> Self {
        let context = ContextStore::new(config.initial_context());

        // Outlet first: selecting it clears any configured till.
        if let Some(outlet) = selection.outlet {
            context.select_outlet(Some(outlet));
        }
        if let Some(till) = selection.till {
            context.select_till(Some(till));
        }
        if let Some(user) = selection.user {
            context.sign_in(user);
        }

        let manager = Arc::new(ShiftSessionManager::new(service, context.clone()));
        AppState {
            context,
            manager,
            config_path: None,
        }
    }
}
