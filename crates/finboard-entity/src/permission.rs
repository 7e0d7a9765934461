//! Permission grant model.

use serde::{Deserialize, Serialize};

use super::module::{Action, Module};

/// A backend-asserted (module, action, allowed) fact for the current
/// identity.
///
/// One row per (module, action) pair known to the backend. Not every pair
/// need be present; absence resolves to deny (closed-world default).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionGrant {
    /// The module the grant applies to.
    pub module: Module,
    /// The action the grant applies to.
    pub action: Action,
    /// Whether the action is allowed. An explicit `false` is recorded
    /// distinctly from an absent grant, though both deny.
    pub allowed: bool,
}
