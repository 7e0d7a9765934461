//! HTTP transport boundary.
//!
//! The authorization core only ever issues GET requests through the
//! [`HttpTransport`] trait. Credentials (cookies, bearer token) are ambient:
//! attached by the transport, never handled by the callers.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use finboard_core::config::api::ApiConfig;
use finboard_core::error::AppError;

/// A transport-level failure, carrying the HTTP status when one was
/// received.
#[derive(Debug, Clone)]
pub struct HttpError {
    /// HTTP status code, if the request reached the server.
    pub status: Option<u16>,
    /// A human-readable error message.
    pub message: String,
}

impl HttpError {
    /// Whether the server rejected the request as unauthenticated or
    /// forbidden.
    pub fn is_auth_rejection(&self) -> bool {
        matches!(self.status, Some(401) | Some(403))
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "HTTP {status}: {}", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for HttpError {}

/// GET-only JSON transport the session fetcher runs against.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Issues a GET request and decodes the body as JSON.
    async fn get_json(&self, path: &str) -> Result<serde_json::Value, HttpError>;
}

/// Production [`HttpTransport`] backed by reqwest.
///
/// Maintains a cookie jar for session cookies and optionally attaches a
/// configured bearer token.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    /// Shared reqwest client.
    client: reqwest::Client,
    /// Base URL without trailing slash.
    base_url: String,
    /// Optional bearer token.
    bearer_token: Option<String>,
}

impl ReqwestTransport {
    /// Builds a transport from API configuration.
    pub fn new(config: &ApiConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .cookie_store(true)
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            bearer_token: config.bearer_token.clone(),
        })
    }

    /// Builds a transport and wraps it in an `Arc` trait object.
    pub fn shared(config: &ApiConfig) -> Result<Arc<dyn HttpTransport>, AppError> {
        Ok(Arc::new(Self::new(config)?))
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get_json(&self, path: &str) -> Result<serde_json::Value, HttpError> {
        let url = self.url_for(path);

        let mut request = self.client.get(&url);
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| HttpError {
            status: None,
            message: format!("Request to {url} failed: {e}"),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(HttpError {
                status: Some(status.as_u16()),
                message: format!("Request to {url} returned {status}"),
            });
        }

        response.json().await.map_err(|e| HttpError {
            status: None,
            message: format!("Undecodable body from {url}: {e}"),
        })
    }
}
