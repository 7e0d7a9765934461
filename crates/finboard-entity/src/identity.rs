//! Authenticated identity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The authenticated identity delivered by the backend.
///
/// Immutable for the lifetime of a session snapshot; replaced wholesale
/// on refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    /// Unique identity identifier.
    pub id: Uuid,
    /// Email address used as the login name.
    pub email: String,
    /// Whether the account is active.
    pub active: bool,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}
