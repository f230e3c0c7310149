//! # HTTP Shift Service
//!
//! reqwest-backed implementation of [`ShiftService`].
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  list_open_shifts / close_shift / start_shift                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  endpoint()      {base}/api/v1/shifts[/{id}/close]                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  send()          Authorization: Bearer <token>   (when configured)      │
//! │                  X-Tenant-Id:   <tenant>                                │
//! │                  X-Request-Id:  <uuid v4>        (also on the span)     │
//! │       │                                                                 │
//! │       ├── 2xx     → decode JSON body                                    │
//! │       └── non-2xx → ClientError::Status { status, message }             │
//! │                     message from {"message": ...} when present          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is no retry loop here. The only timeout is the client's configured
//! request timeout.

use async_trait::async_trait;
use meridian_core::{CloseShiftRequest, OutletScope, Shift, ShiftStatus, StartShiftRequest};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, debug_span, warn, Instrument};
use url::Url;
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::service::ShiftService;

/// Path segments of the shifts collection, relative to the base URL.
const SHIFTS_PATH: [&str; 3] = ["api", "v1", "shifts"];

/// HTTP client for the backend shift endpoints.
#[derive(Debug, Clone)]
pub struct HttpShiftService {
    http: Client,
    base_url: Url,
    token: Option<String>,
    tenant_id: String,
}

impl HttpShiftService {
    /// Creates a service from validated client configuration.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let http = Client::builder().timeout(config.request_timeout()).build()?;

        Ok(HttpShiftService {
            http,
            base_url: config.base_url()?,
            token: config.api.token.clone(),
            tenant_id: config.context.tenant_id.clone(),
        })
    }

    /// Builds `{base}/api/v1/shifts/{tail...}`. Each tail element is one
    /// percent-encoded path segment.
    fn endpoint(&self, tail: &[&str]) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                ClientError::InvalidUrl(format!("{} cannot be used as a base URL", self.base_url))
            })?;
            segments.pop_if_empty().extend(SHIFTS_PATH).extend(tail);
        }
        Ok(url)
    }

    /// Attaches the standard headers and sends the request.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let request_id = Uuid::new_v4();

        let mut request = request
            .header("X-Tenant-Id", &self.tenant_id)
            .header("X-Request-Id", request_id.to_string());
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let span = debug_span!("shift_api", %request_id);
        execute(request).instrument(span).await
    }
}

async fn execute<T: DeserializeOwned>(request: RequestBuilder) -> ClientResult<T> {
    let response = request.send().await?;
    let status = response.status();

    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        let message = error_message(&text)
            .or_else(|| status.canonical_reason().map(str::to_string))
            .unwrap_or_else(|| "request failed".to_string());

        warn!(status = status.as_u16(), %message, "Backend rejected request");
        return Err(ClientError::Status {
            status: status.as_u16(),
            message,
        });
    }

    let body = response.bytes().await?;
    debug!(status = status.as_u16(), bytes = body.len(), "Backend responded");
    Ok(serde_json::from_slice(&body)?)
}

/// Error body shape used by the backend.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Extracts a human-readable message from an error response body.
fn error_message(body: &str) -> Option<String> {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        return Some(parsed.message);
    }

    let trimmed = body.trim();
    (!trimmed.is_empty() && trimmed.len() <= 200).then(|| trimmed.to_string())
}

// =============================================================================
// ShiftService Implementation
// =============================================================================

#[async_trait]
impl ShiftService for HttpShiftService {
    async fn list_open_shifts(&self, scope: OutletScope) -> Result<Vec<Shift>, ClientError> {
        let url = self.endpoint(&[])?;

        let mut query = vec![
            ("status", ShiftStatus::Open.as_str()),
            ("outletId", scope.outlet_id.as_str()),
        ];
        if let Some(till_id) = scope.till_id.as_deref() {
            query.push(("tillId", till_id));
        }
        if let Some(user_id) = scope.user_id.as_deref() {
            query.push(("userId", user_id));
        }

        debug!(outlet_id = %scope.outlet_id, "Listing open shifts");
        self.send(self.http.get(url).query(&query)).await
    }

    async fn close_shift(
        &self,
        shift_id: String,
        request: CloseShiftRequest,
    ) -> Result<Shift, ClientError> {
        let url = self.endpoint(&[shift_id.as_str(), "close"])?;

        debug!(shift_id = %shift_id, "Closing shift");
        self.send(self.http.post(url).json(&request)).await
    }

    async fn start_shift(&self, request: StartShiftRequest) -> Result<Shift, ClientError> {
        let url = self.endpoint(&[])?;

        debug!(outlet_id = %request.outlet_id, till_id = %request.till_id, "Starting shift");
        self.send(self.http.post(url).json(&request)).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
