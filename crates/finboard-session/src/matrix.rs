//! Normalized permission matrix.
//!
//! The single source of truth for "can the current identity do X on
//! module Y". Built once per session snapshot from the raw grant list;
//! every query afterwards is a pure lookup.

use std::collections::{HashMap, HashSet};

use finboard_entity::permission::PermissionGrant;
use finboard_entity::role::Role;

/// Resolved state of one (module path, action name) key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantState {
    /// Explicitly granted.
    Allowed,
    /// Explicitly denied by the backend.
    Denied,
    /// No grant delivered for this key. Resolves to deny, but UI may
    /// present it differently from an explicit denial.
    NotConfigured,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct PermissionKey {
    module_path: String,
    action: String,
}

/// Queryable mapping from (module path, action name) to allowed.
///
/// Closed-world default: any key absent from the matrix resolves to
/// `false`. Allow is never inferred from absence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PermissionMatrix {
    entries: HashMap<PermissionKey, bool>,
}

impl PermissionMatrix {
    /// An empty matrix. Every query resolves to deny.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds the matrix from the raw grant list.
    ///
    /// Deterministic and free of I/O. Duplicate keys are not expected
    /// from the backend but must not crash; last write wins.
    pub fn from_grants(grants: &[PermissionGrant]) -> Self {
        let mut entries = HashMap::with_capacity(grants.len());
        for grant in grants {
            entries.insert(
                PermissionKey {
                    module_path: grant.module.path.clone(),
                    action: grant.action.name.clone(),
                },
                grant.allowed,
            );
        }
        Self { entries }
    }

    /// Whether the action is allowed on the module. Absent keys deny.
    pub fn is_allowed(&self, module_path: &str, action: &str) -> bool {
        self.entries
            .get(&PermissionKey {
                module_path: module_path.to_string(),
                action: action.to_string(),
            })
            .copied()
            .unwrap_or(false)
    }

    /// Resolved state of a key, keeping explicit denial distinct from
    /// absence.
    pub fn state_of(&self, module_path: &str, action: &str) -> GrantState {
        match self.entries.get(&PermissionKey {
            module_path: module_path.to_string(),
            action: action.to_string(),
        }) {
            Some(true) => GrantState::Allowed,
            Some(false) => GrantState::Denied,
            None => GrantState::NotConfigured,
        }
    }

    /// Number of resolved keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the matrix holds no keys at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over (module path, action name, allowed) entries in
    /// arbitrary order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str, bool)> {
        self.entries
            .iter()
            .map(|(key, allowed)| (key.module_path.as_str(), key.action.as_str(), *allowed))
    }
}

/// Normalizes a role list to set semantics: duplicates by id are dropped,
/// first occurrence wins.
pub fn normalize_roles(roles: Vec<Role>) -> Vec<Role> {
    let mut seen = HashSet::with_capacity(roles.len());
    roles.into_iter().filter(|role| seen.insert(role.id)).collect()
}
