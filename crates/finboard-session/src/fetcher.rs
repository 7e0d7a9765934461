//! Identity endpoint fetch with error classification.

use std::sync::Arc;

use tracing::debug;

use finboard_core::config::api::ApiConfig;
use finboard_core::error::{AppError, ErrorKind};
use finboard_entity::session::SessionResponse;

use crate::transport::HttpTransport;

/// Fetches the current identity, roles, and permission grants from the
/// backend.
///
/// Returns the response exactly as delivered; normalization is the
/// resolver's job. Failures are classified into the application error
/// taxonomy so the store can branch on kind:
///
/// - 401/403 from the backend → [`ErrorKind::Unauthorized`]
/// - any other transport failure → [`ErrorKind::Network`]
/// - a decodable body of the wrong shape → [`ErrorKind::MalformedResponse`]
#[derive(Clone)]
pub struct SessionFetcher {
    /// The transport collaborator.
    transport: Arc<dyn HttpTransport>,
    /// Path of the identity endpoint.
    identity_path: String,
}

impl std::fmt::Debug for SessionFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionFetcher")
            .field("identity_path", &self.identity_path)
            .finish()
    }
}

impl SessionFetcher {
    /// Creates a fetcher running against the given identity endpoint path.
    pub fn new(transport: Arc<dyn HttpTransport>, identity_path: impl Into<String>) -> Self {
        Self {
            transport,
            identity_path: identity_path.into(),
        }
    }

    /// Creates a fetcher from API configuration.
    pub fn from_config(transport: Arc<dyn HttpTransport>, config: &ApiConfig) -> Self {
        Self::new(transport, config.identity_path.clone())
    }

    /// Fetches the raw session response.
    ///
    /// Has no side effects beyond the network call and never mutates
    /// shared state.
    pub async fn fetch(&self) -> Result<SessionResponse, AppError> {
        debug!(path = %self.identity_path, "fetching session identity");

        let body = self
            .transport
            .get_json(&self.identity_path)
            .await
            .map_err(|e| {
                if e.is_auth_rejection() {
                    AppError::unauthorized("Identity endpoint rejected the session")
                } else {
                    AppError::with_source(
                        ErrorKind::Network,
                        format!("Failed to reach identity endpoint: {e}"),
                        e,
                    )
                }
            })?;

        serde_json::from_value(body).map_err(|e| {
            AppError::with_source(
                ErrorKind::MalformedResponse,
                "Identity response did not match the expected shape",
                e,
            )
        })
    }
}
