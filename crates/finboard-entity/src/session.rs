//! Raw identity endpoint response.

use serde::{Deserialize, Serialize};

use super::identity::Identity;
use super::permission::PermissionGrant;
use super::role::Role;

/// The body of a successful identity endpoint response, exactly as
/// delivered by the backend. No normalization happens at this layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    /// The authenticated identity. Some backend versions deliver this
    /// field as `user`.
    #[serde(alias = "user")]
    pub identity: Identity,
    /// Roles attached to the identity. May contain duplicates; the
    /// resolver normalizes to set semantics.
    #[serde(default)]
    pub roles: Vec<Role>,
    /// Raw permission grants for the identity.
    #[serde(default)]
    pub permissions: Vec<PermissionGrant>,
}
