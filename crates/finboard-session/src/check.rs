//! Synchronous fine-grained permission queries.
//!
//! UI consumers never branch on session status to ask a permission
//! question: any status other than `Authenticated` uniformly answers
//! deny.

use std::sync::Arc;

use crate::matrix::GrantState;
use crate::snapshot::SessionStatus;
use crate::store::SessionStore;

/// Pure query handle over the session store.
///
/// Side-effect-free and synchronous; never triggers a fetch. Cheap to
/// clone and hand to every UI subtree.
#[derive(Debug, Clone)]
pub struct PermissionChecker {
    store: Arc<SessionStore>,
}

impl PermissionChecker {
    /// Creates a checker reading from the given store.
    pub fn new(store: Arc<SessionStore>) -> Self {
        Self { store }
    }

    /// Whether the current identity may perform `action` on the module at
    /// `module_path`.
    ///
    /// Returns `false` whenever the session is not `Authenticated`,
    /// regardless of matrix contents.
    pub fn can_perform(&self, module_path: &str, action: &str) -> bool {
        let snapshot = self.store.current();
        if snapshot.status != SessionStatus::Authenticated {
            return false;
        }
        snapshot.permissions.is_allowed(module_path, action)
    }

    /// Resolved grant state for a key, for UI that distinguishes an
    /// explicit denial from an unconfigured permission.
    ///
    /// Outside `Authenticated` every key reads as not configured.
    pub fn grant_state(&self, module_path: &str, action: &str) -> GrantState {
        let snapshot = self.store.current();
        if snapshot.status != SessionStatus::Authenticated {
            return GrantState::NotConfigured;
        }
        snapshot.permissions.state_of(module_path, action)
    }
}
