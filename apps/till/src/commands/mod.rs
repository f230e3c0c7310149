//! # Till Commands
//!
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (dispatch + shared rendering)
//! ├── status.rs   ◄─── status [--adopt], open-shifts
//! ├── shift.rs    ◄─── open, close
//! └── config.rs   ◄─── save-context
//! ```
//!
//! Every command returns the text to print on success. Logging goes to
//! stderr, so stdout only ever carries this output.

mod config;
mod shift;
mod status;

pub use config::save_context;
pub use shift::{close, open};
pub use status::{open_shifts, status};

use meridian_core::{CashReconciliation, CountOutcome, Shift};
use serde::Serialize;

use crate::cli::Command;
use crate::error::{CliError, CliResult, ErrorCode};
use crate::state::AppState;

/// Runs one command against prepared state.
pub async fn dispatch(state: &AppState, command: Command, json: bool) -> CliResult<String> {
    match command {
        Command::Status { adopt } => status(state, adopt.as_deref(), json).await,
        Command::OpenShifts => open_shifts(state, json).await,
        Command::Open {
            opening,
            floating,
            date,
            notes,
        } => open(state, &opening, &floating, date, notes, json).await,
        Command::Close {
            shift_id,
            amount,
            notes,
            yes,
        } => close(state, &shift_id, &amount, notes.as_deref(), yes, json).await,
        Command::SaveContext => save_context(state, json),
    }
}

// =============================================================================
// Rendering
// =============================================================================

fn to_json<T: Serialize>(value: &T) -> CliResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| CliError::new(ErrorCode::Backend, format!("Failed to encode output: {e}")))
}

fn describe_shift(shift: &Shift) -> String {
    let mut out = format!(
        "Shift {}  till {}  operator {}\n  operating date  {}\n  opened          {}\n  opening cash    {}\n  floating cash   {}",
        shift.id,
        shift.till_id,
        shift.user_id,
        shift.operating_date,
        shift.start_time.format("%Y-%m-%d %H:%M UTC"),
        shift.opening_cash_balance,
        shift.floating_cash,
    );
    if let Some(notes) = &shift.notes {
        out.push_str(&format!("\n  notes           {notes}"));
    }
    out
}

fn describe_reconciliation(recon: &CashReconciliation) -> String {
    let outcome = match recon.outcome {
        CountOutcome::Balanced => "balanced",
        CountOutcome::Over => "over",
        CountOutcome::Short => "short",
    };
    format!(
        "  opening cash    {}\n  floating cash   {}\n  counted         {}\n  difference      {} ({outcome})",
        recon.opening,
        recon.floating,
        recon.closing,
        recon.difference_label(),
    )
}
