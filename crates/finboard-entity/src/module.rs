//! Module and action models.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A protected, navigable area of the application.
///
/// The `path` is the lookup key used by route-level permission checks;
/// `id` uniqueness is a backend guarantee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Module {
    /// Unique module identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Routable path, e.g. `"financial"`.
    pub path: String,
    /// Optional human-readable description.
    pub description: Option<String>,
}

/// A verb scoped to a module (e.g. view, create, export).
///
/// Unique by id within a module's action set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Action {
    /// Unique action identifier.
    pub id: Uuid,
    /// Action name, e.g. `"view"`.
    pub name: String,
}
