//! # Meridian Till Library
//!
//! Wires configuration, logging, the business context and the shift session
//! manager together for the `meridian-till` binary.
//!
//! ## Module Structure
//! ```text
//! meridian_till/
//! ├── lib.rs          ◄─── You are here (run + tracing setup)
//! ├── cli.rs          ◄─── clap definitions
//! ├── error.rs        ◄─── CliError (code, message, exit code)
//! ├── state.rs        ◄─── AppState (config, context, manager)
//! └── commands/
//!     ├── mod.rs      ◄─── dispatch + rendering
//!     ├── status.rs   ◄─── status, open-shifts
//!     ├── shift.rs    ◄─── open, close
//!     └── config.rs   ◄─── save-context
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod state;

use meridian_client::ClientConfig;
use tracing::debug;
use tracing_subscriber::EnvFilter;

pub use cli::{Cli, Command, Selection};
pub use error::{CliError, CliResult, ErrorCode};
pub use state::AppState;

/// Loads configuration, builds state and runs the requested command.
pub async fn run(cli: Cli) -> CliResult<String> {
    let config = ClientConfig::load(cli.config.clone())?;
    debug!(base_url = %config.api.base_url, tenant_id = %config.context.tenant_id, "Loaded config");

    let state = AppState::from_config(config, cli.config.clone(), cli.selection())?;
    commands::dispatch(&state, cli.command, cli.json).await
}

/// Initializes the tracing subscriber for logging.
///
/// ## Log Levels
/// - `ERROR`: write failures (close/open rejected or unreachable)
/// - `WARN`: read failures degraded to an empty state
/// - `INFO`: shift opened, adopted or closed
/// - `DEBUG`: context changes, request details
///
/// Logs go to stderr; stdout carries command output only.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,meridian=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
