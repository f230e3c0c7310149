//! `status` and `open-shifts`: read-only views of the register.

use meridian_session::PosGate;
use tracing::info;

use super::{describe_shift, to_json};
use crate::error::{CliError, CliResult, ErrorCode};
use crate::state::AppState;

/// Shows whether this register has an open shift, optionally adopting one
/// from the outlet's open list first.
pub async fn status(state: &AppState, adopt: Option<&str>, json: bool) -> CliResult<String> {
    let manager = &state.manager;
    manager.refresh().await;

    if let Some(shift_id) = adopt {
        if manager.adopt(shift_id).await.is_none() {
            return Err(CliError::not_found("Shift", shift_id));
        }
        info!(shift_id, "Resumed shift from open list");
    }

    if json {
        return to_json(&manager.snapshot());
    }

    let text = match manager.gate() {
        PosGate::Ready(shift) => format!("Register open\n{}", describe_shift(&shift)),
        PosGate::RegisterClosed => {
            let open = manager.known_open_shifts().await.len();
            match open {
                0 => "Register closed. Start a shift with `meridian-till open`.".to_string(),
                n => format!(
                    "Register closed. {n} open shift(s) in this outlet; see `meridian-till open-shifts` and resume one with `status --adopt <id>`."
                ),
            }
        }
        PosGate::Offline(reason) => format!("Shift state unknown: {reason}"),
        PosGate::Loading => "Loading".to_string(),
    };
    Ok(text)
}

/// Lists every open shift in the outlet (the recovery list).
pub async fn open_shifts(state: &AppState, json: bool) -> CliResult<String> {
    if state.context.scope().is_none() {
        return Err(CliError::new(ErrorCode::Context, "Select an outlet first."));
    }

    let open = state.manager.list_open_shifts().await;

    if json {
        return to_json(&open);
    }

    if let Some(reason) = state.manager.snapshot().read_error {
        return Ok(format!("Open shifts unavailable: {reason}"));
    }

    if open.is_empty() {
        return Ok("No open shifts in this outlet.".to_string());
    }

    let mut lines = vec![format!(
        "{:<38} {:<12} {:<12} {:<17} {:>12}",
        "SHIFT", "TILL", "OPERATOR", "OPENED (UTC)", "OPENING"
    )];
    lines.extend(open.iter().map(|s| {
        format!(
            "{:<38} {:<12} {:<12} {:<17} {:>12}",
            s.id,
            s.till_id,
            s.user_id,
            s.start_time.format("%Y-%m-%d %H:%M").to_string(),
            s.opening_cash_balance.to_string(),
        )
    }));
    Ok(lines.join("\n"))
}
