//! Shift service contract.
//!
//! The session manager only ever talks to this trait. Production code plugs
//! in [`crate::HttpShiftService`]; tests use the generated `MockShiftService`.

use async_trait::async_trait;
use meridian_core::{CloseShiftRequest, OutletScope, Shift, StartShiftRequest};
use mockall::automock;

use crate::error::ClientError;

#[automock]
#[async_trait]
/// Backend operations on register sessions.
pub trait ShiftService: Send + Sync {
    /// Lists open shifts in an outlet, optionally narrowed by till and user.
    async fn list_open_shifts(&self, scope: OutletScope) -> Result<Vec<Shift>, ClientError>;

    /// Closes a shift with the counted cash. Returns the closed shift.
    async fn close_shift(
        &self,
        shift_id: String,
        request: CloseShiftRequest,
    ) -> Result<Shift, ClientError>;

    /// Opens a new shift on a till. Returns the created shift.
    async fn start_shift(&self, request: StartShiftRequest) -> Result<Shift, ClientError>;
}
