//! # CLI Error Type
//!
//! Unified error type for till commands.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ClientError  (config, transport) ──┐                                   │
//! │  SessionError (context, writes)   ──┼──► CliError { code, message }     │
//! │  ValidationError (amount input)   ──┘          │                        │
//! │                                                ├──► stderr / --json     │
//! │                                                └──► process exit code   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The message is always the operator-facing text; the underlying error is
//! logged where it happens.

use meridian_client::ClientError;
use meridian_core::ValidationError;
use meridian_session::SessionError;
use serde::Serialize;

pub type CliResult<T> = Result<T, CliError>;

/// Error printed by the till CLI.
///
/// With `--json`:
/// ```json
/// { "code": "BACKEND", "message": "Could not close the shift. ...", "retryable": true }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CliError {
    pub code: ErrorCode,
    pub message: String,
    pub retryable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Bad or missing configuration
    Config,
    /// Outlet, till or operator not selected
    Context,
    /// Operator input rejected before any request
    Validation,
    /// Shift is not in the open list
    NotFound,
    /// Register already has an open shift
    Conflict,
    /// Backend refused or could not be reached
    Backend,
}

impl CliError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        CliError {
            code,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        CliError::new(ErrorCode::NotFound, format!("{resource} {id} is not open in this outlet"))
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self.code {
            ErrorCode::Validation => 2,
            ErrorCode::Config | ErrorCode::Context => 3,
            ErrorCode::NotFound | ErrorCode::Conflict => 4,
            ErrorCode::Backend => 5,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CliError {}

impl From<ClientError> for CliError {
    fn from(err: ClientError) -> Self {
        let code = if err.is_config_error() {
            ErrorCode::Config
        } else {
            ErrorCode::Backend
        };
        CliError {
            code,
            message: err.to_string(),
            retryable: err.is_retryable(),
        }
    }
}

impl From<SessionError> for CliError {
    fn from(err: SessionError) -> Self {
        let code = match &err {
            SessionError::NoOutletSelected
            | SessionError::NoTillSelected
            | SessionError::NotSignedIn => ErrorCode::Context,
            SessionError::ShiftAlreadyActive { .. } => ErrorCode::Conflict,
            SessionError::UnknownShift(_) => ErrorCode::NotFound,
            SessionError::Validation(_) => ErrorCode::Validation,
            SessionError::CloseFailed(_) | SessionError::OpenFailed(_) => ErrorCode::Backend,
        };
        CliError {
            code,
            message: err.user_message(),
            retryable: err.is_retryable(),
        }
    }
}

impl From<ValidationError> for CliError {
    fn from(err: ValidationError) -> Self {
        SessionError::from(err).into()
    }
}
