//! `open` and `close`: the two register mutations.
//!
//! Neither changes local state until the backend confirms.

use chrono::NaiveDate;
use meridian_core::validation::{
    parse_closing_balance, parse_non_negative, FLOATING_CASH_FIELD, OPENING_BALANCE_FIELD,
};
use meridian_session::OpenShift;
use serde::Serialize;

use super::{describe_reconciliation, describe_shift, to_json};
use crate::error::CliResult;
use crate::state::AppState;

/// Opens a shift on the selected till.
pub async fn open(
    state: &AppState,
    opening: &str,
    floating: &str,
    operating_date: Option<NaiveDate>,
    notes: Option<String>,
    json: bool,
) -> CliResult<String> {
    let input = OpenShift {
        opening_cash_balance: parse_non_negative(OPENING_BALANCE_FIELD, opening)?,
        floating_cash: parse_non_negative(FLOATING_CASH_FIELD, floating)?,
        operating_date,
        notes,
    };

    // Learn about any shift already open on this register first.
    state.manager.refresh().await;
    let shift = state.manager.open_shift(input).await?;

    if json {
        return to_json(&shift);
    }
    Ok(format!("Shift opened\n{}", describe_shift(&shift)))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CloseOutput<'a> {
    closed: bool,
    reconciliation: &'a meridian_core::CashReconciliation,
    #[serde(skip_serializing_if = "Option::is_none")]
    shift: Option<&'a meridian_core::Shift>,
}

/// Counts and closes a shift. Without `confirm` only the reconciliation
/// preview is produced.
pub async fn close(
    state: &AppState,
    shift_id: &str,
    amount: &str,
    notes: Option<&str>,
    confirm: bool,
    json: bool,
) -> CliResult<String> {
    let closing = parse_closing_balance(amount)?;

    state.manager.refresh().await;
    let preview = state.manager.preview_close(shift_id, closing).await?;

    if !confirm {
        if json {
            return to_json(&CloseOutput {
                closed: false,
                reconciliation: &preview,
                shift: None,
            });
        }
        return Ok(format!(
            "Close shift {shift_id}?\n{}\nRe-run with --yes to close.",
            describe_reconciliation(&preview)
        ));
    }

    let closed = state.manager.close_shift(shift_id, closing, notes).await?;

    if json {
        return to_json(&CloseOutput {
            closed: true,
            reconciliation: &preview,
            shift: Some(&closed),
        });
    }
    Ok(format!(
        "Shift {shift_id} closed\n{}",
        describe_reconciliation(&preview)
    ))
}
