//! Role model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A role attached to an identity.
///
/// An identity may carry multiple roles. The collection has set semantics:
/// no duplicates by id, order irrelevant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    /// Unique role identifier.
    pub id: Uuid,
    /// Role name.
    pub name: String,
    /// Optional human-readable description.
    pub description: Option<String>,
    /// Whether the role is active.
    pub active: bool,
}
