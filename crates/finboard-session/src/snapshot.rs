//! Session snapshot and status lifecycle.

use finboard_entity::identity::Identity;
use finboard_entity::role::Role;

use crate::matrix::PermissionMatrix;

/// Lifecycle status of the session snapshot.
///
/// Transitions are totally ordered per fetch cycle:
/// `Unresolved → Loading → {Authenticated | Unauthenticated | Error}`.
/// Exactly one terminal status per fetch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// No fetch has been attempted yet.
    Unresolved,
    /// A fetch is in flight.
    Loading,
    /// The identity was resolved and the matrix is populated.
    Authenticated,
    /// The backend rejected the session. Expected flow, not a failure.
    Unauthenticated,
    /// The fetch failed (network or contract violation). Retryable.
    Error,
}

impl SessionStatus {
    /// Whether this status ends a fetch cycle.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Authenticated | Self::Unauthenticated | Self::Error
        )
    }
}

/// The full authorization state at a point in time.
///
/// Owned and mutated exclusively by the session store; read-only for
/// every other component.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    /// The authenticated identity, present only when `Authenticated`.
    pub identity: Option<Identity>,
    /// Normalized roles (no duplicates by id).
    pub roles: Vec<Role>,
    /// The resolved permission matrix. Empty unless `Authenticated`.
    pub permissions: PermissionMatrix,
    /// Lifecycle status.
    pub status: SessionStatus,
    /// Error detail retained for display when status is `Error`.
    pub error: Option<String>,
}

impl SessionSnapshot {
    /// The empty snapshot every session starts from.
    pub fn unresolved() -> Self {
        Self {
            identity: None,
            roles: Vec::new(),
            permissions: PermissionMatrix::empty(),
            status: SessionStatus::Unresolved,
            error: None,
        }
    }

    /// A fully resolved, authenticated snapshot.
    pub fn authenticated(identity: Identity, roles: Vec<Role>, permissions: PermissionMatrix) -> Self {
        Self {
            identity: Some(identity),
            roles,
            permissions,
            status: SessionStatus::Authenticated,
            error: None,
        }
    }

    /// The snapshot after an authentication rejection. Identity, roles,
    /// and matrix are cleared.
    pub fn unauthenticated() -> Self {
        Self {
            status: SessionStatus::Unauthenticated,
            ..Self::unresolved()
        }
    }

    /// The snapshot after a failed fetch, retaining the error detail.
    pub fn errored(detail: impl Into<String>) -> Self {
        Self {
            status: SessionStatus::Error,
            error: Some(detail.into()),
            ..Self::unresolved()
        }
    }

    /// Whether the snapshot carries a resolved identity.
    pub fn is_authenticated(&self) -> bool {
        self.status == SessionStatus::Authenticated
    }
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self::unresolved()
    }
}
