//! Backend API configuration.

use serde::{Deserialize, Serialize};

/// Settings for the backend the dashboard fetches its session from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the backend API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Path of the identity endpoint, resolved against `base_url`.
    #[serde(default = "default_identity_path")]
    pub identity_path: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Optional bearer token attached to every request. Cookie-based
    /// credentials are used when absent.
    #[serde(default)]
    pub bearer_token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            identity_path: default_identity_path(),
            timeout_seconds: default_timeout(),
            bearer_token: None,
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_identity_path() -> String {
    "/auth/me".to_string()
}

fn default_timeout() -> u64 {
    10
}
