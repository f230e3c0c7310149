//! `save-context`: persist where this register works.
//!
//! The file is re-read without environment overrides before writing, so only
//! the outlet, till and operator change on disk.

use meridian_client::ClientConfig;
use tracing::info;

use super::to_json;
use crate::error::CliResult;
use crate::state::AppState;

/// Writes the current outlet, till and operator selection to the config file.
pub fn save_context(state: &AppState, json: bool) -> CliResult<String> {
    let ctx = state.context.current();

    let mut config = ClientConfig::load_file(state.config_path.clone())?;
    config.context.outlet_id = ctx.outlet_id.clone();
    config.context.till_id = ctx.till_id.clone();
    config.context.user_id = ctx.user_id.clone();
    config.save(state.config_path.clone())?;

    info!(
        outlet_id = ?ctx.outlet_id,
        till_id = ?ctx.till_id,
        user_id = ?ctx.user_id,
        "Saved register context"
    );

    if json {
        return to_json(&ctx);
    }

    let show = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());
    Ok(format!(
        "Saved register context\n  outlet    {}\n  till      {}\n  operator  {}",
        show(&ctx.outlet_id),
        show(&ctx.till_id),
        show(&ctx.user_id),
    ))
}
