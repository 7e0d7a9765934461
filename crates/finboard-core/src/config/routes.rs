//! Client-side route configuration.

use serde::{Deserialize, Serialize};

/// Routes the authorization core needs to know about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutesConfig {
    /// The unauthenticated entry point. Access guards redirect here and
    /// never guard it themselves.
    #[serde(default = "default_login_path")]
    pub login_path: String,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            login_path: default_login_path(),
        }
    }
}

fn default_login_path() -> String {
    "/login".to_string()
}
