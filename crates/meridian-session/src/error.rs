//! # Session Error Types
//!
//! Errors from register session operations.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Session Error Categories                          │
//! │                                                                         │
//! │  ┌──────────────────┐  ┌──────────────────┐  ┌──────────────────────┐  │
//! │  │  Context         │  │  Input           │  │  Backend Write       │  │
//! │  │                  │  │                  │  │                      │  │
//! │  │  NoOutletSelected│  │  Validation      │  │  CloseFailed         │  │
//! │  │  NoTillSelected  │  │  UnknownShift    │  │  OpenFailed          │  │
//! │  │  NotSignedIn     │  │  ShiftAlready-   │  │                      │  │
//! │  │                  │  │  Active          │  │                      │  │
//! │  └──────────────────┘  └──────────────────┘  └──────────────────────┘  │
//! │                                                                         │
//! │  Read failures never appear here: they degrade to an empty state.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use meridian_client::ClientError;
use meridian_core::{CoreError, ValidationError};
use thiserror::Error;

/// Result type alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

#[derive(Debug, Error)]
pub enum SessionError {
    // =========================================================================
    // Context Errors
    // =========================================================================
    #[error("No outlet selected")]
    NoOutletSelected,

    #[error("No till selected")]
    NoTillSelected,

    #[error("No operator signed in")]
    NotSignedIn,

    // =========================================================================
    // Input Errors
    // =========================================================================
    /// A shift is already active on this register.
    #[error("Shift {shift_id} is already open on this register")]
    ShiftAlreadyActive { shift_id: String },

    /// The shift is neither active nor in the known open list.
    #[error("Shift {0} is not in the known open list")]
    UnknownShift(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    // =========================================================================
    // Backend Write Errors
    // =========================================================================
    /// The backend did not confirm the close. Nothing changed locally.
    #[error("Failed to close shift: {0}")]
    CloseFailed(#[source] ClientError),

    /// The backend did not confirm the open. Nothing changed locally.
    #[error("Failed to open shift: {0}")]
    OpenFailed(#[source] ClientError),
}

impl From<CoreError> for SessionError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ShiftNotFound(shift_id) | CoreError::ShiftNotOpen { shift_id } => {
                SessionError::UnknownShift(shift_id)
            }
            CoreError::Validation(e) => SessionError::Validation(e),
        }
    }
}

impl SessionError {
    /// Returns true if repeating the same action may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            SessionError::CloseFailed(e) | SessionError::OpenFailed(e) => e.is_retryable(),
            _ => false,
        }
    }

    /// Message suitable for showing to the operator at the till.
    pub fn user_message(&self) -> String {
        match self {
            SessionError::NoOutletSelected => "Select an outlet first.".to_string(),
            SessionError::NoTillSelected => "Select a till first.".to_string(),
            SessionError::NotSignedIn => "Sign in before opening a shift.".to_string(),
            SessionError::ShiftAlreadyActive { .. } => {
                "A shift is already open on this register. Close it first.".to_string()
            }
            SessionError::UnknownShift(_) => {
                "That shift is no longer open. Refresh the list of open shifts.".to_string()
            }
            SessionError::Validation(e) => capitalize(&e.to_string()),
            SessionError::CloseFailed(e) => write_failure("close", e),
            SessionError::OpenFailed(e) => write_failure("open", e),
        }
    }
}

fn write_failure(action: &str, err: &ClientError) -> String {
    match err {
        ClientError::Status { message, .. } if !err.is_retryable() => {
            format!("Could not {action} the shift: {message}")
        }
        _ if err.is_retryable() => {
            format!("Could not {action} the shift. Check the connection and try again.")
        }
        _ => format!("Could not {action} the shift: {err}"),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
