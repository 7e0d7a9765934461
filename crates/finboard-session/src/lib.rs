//! # finboard-session
//!
//! The session & permission authorization core of the Finboard dashboard
//! client.
//!
//! ## Modules
//!
//! - `transport` - HTTP transport boundary and the reqwest implementation
//! - `fetcher` - identity endpoint fetch with error classification
//! - `matrix` - normalized permission matrix and role normalization
//! - `snapshot` - session snapshot and status lifecycle
//! - `store` - observable process-wide session state
//! - `guard` - route-level access guarding state machine
//! - `check` - synchronous fine-grained permission queries

pub mod check;
pub mod fetcher;
pub mod guard;
pub mod matrix;
pub mod snapshot;
pub mod store;
pub mod transport;

pub use check::PermissionChecker;
pub use fetcher::SessionFetcher;
pub use guard::{AccessGuard, GuardState, GuardView, Navigator, RouteContext};
pub use matrix::{GrantState, PermissionMatrix};
pub use snapshot::{SessionSnapshot, SessionStatus};
pub use store::{SessionStore, SubscriberId};
pub use transport::{HttpError, HttpTransport, ReqwestTransport};
