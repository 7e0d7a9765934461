//! Observable process-wide session state.
//!
//! The store is the single owner and sole mutator of the session
//! snapshot. Every other component (guards, permission checks, arbitrary
//! UI) reads through [`SessionStore::current`] or observes transitions
//! through [`SessionStore::subscribe`].
//!
//! Fetch cycles are tagged with a generation counter. A `clear()` or a
//! newer cycle bumps the generation, so a superseded in-flight fetch can
//! never commit its result.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::fetcher::SessionFetcher;
use crate::matrix::{normalize_roles, PermissionMatrix};
use crate::snapshot::{SessionSnapshot, SessionStatus};

/// Handle returned by [`SessionStore::subscribe`], used to detach.
pub type SubscriberId = u64;

type SubscriberFn = Arc<dyn Fn(&SessionSnapshot) + Send + Sync>;

struct StoreInner {
    snapshot: SessionSnapshot,
    generation: u64,
    next_subscriber: SubscriberId,
    subscribers: Vec<(SubscriberId, SubscriberFn)>,
}

impl StoreInner {
    /// Starts a new fetch cycle: bumps the generation and moves the
    /// snapshot to `Loading`. Returns the cycle's generation.
    fn begin_cycle(&mut self) -> u64 {
        self.generation += 1;
        self.snapshot.status = SessionStatus::Loading;
        self.snapshot.error = None;
        self.generation
    }

    /// Clones the subscriber list and the snapshot so notification can
    /// happen after the lock is released.
    fn pending_notification(&self) -> (Vec<SubscriberFn>, SessionSnapshot) {
        let subscribers = self
            .subscribers
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();
        (subscribers, self.snapshot.clone())
    }
}

/// Process-wide holder of the session snapshot.
///
/// Constructed once at startup and shared as `Arc<SessionStore>` across
/// every UI subtree. Exposes exactly three verbs (`load`, `refresh`,
/// `clear`) plus the read accessor and the observer contract.
pub struct SessionStore {
    fetcher: SessionFetcher,
    inner: Mutex<StoreInner>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("fetcher", &self.fetcher)
            .finish()
    }
}

impl SessionStore {
    /// Creates a store in the `Unresolved` state. No fetch happens until
    /// `load()` or `refresh()`.
    pub fn new(fetcher: SessionFetcher) -> Self {
        Self {
            fetcher,
            inner: Mutex::new(StoreInner {
                snapshot: SessionSnapshot::unresolved(),
                generation: 0,
                next_subscriber: 0,
                subscribers: Vec::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        // A poisoned lock means a subscriber panicked mid-notification;
        // the snapshot itself is still consistent.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the current snapshot.
    pub fn current(&self) -> SessionSnapshot {
        self.lock().snapshot.clone()
    }

    /// Returns the current lifecycle status.
    pub fn status(&self) -> SessionStatus {
        self.lock().snapshot.status
    }

    /// Registers an observer invoked on every status transition.
    ///
    /// The callback receives the snapshot as of the transition. Observers
    /// registered before a transition never miss it.
    pub fn subscribe<F>(&self, callback: F) -> SubscriberId
    where
        F: Fn(&SessionSnapshot) + Send + Sync + 'static,
    {
        let mut inner = self.lock();
        let id = inner.next_subscriber;
        inner.next_subscriber += 1;
        inner.subscribers.push((id, Arc::new(callback)));
        id
    }

    /// Detaches a previously registered observer.
    pub fn unsubscribe(&self, id: SubscriberId) {
        let mut inner = self.lock();
        inner.subscribers.retain(|(existing, _)| *existing != id);
    }

    /// Resolves the session if it is not already resolved or resolving.
    ///
    /// No-op while `Loading` (duplicate calls from concurrently mounting
    /// consumers coalesce into the in-flight fetch) and while
    /// `Authenticated` (the snapshot is already the source of truth).
    pub async fn load(&self) {
        let generation = {
            let mut inner = self.lock();
            if matches!(
                inner.snapshot.status,
                SessionStatus::Loading | SessionStatus::Authenticated
            ) {
                return;
            }
            let generation = inner.begin_cycle();
            let (subscribers, snapshot) = inner.pending_notification();
            drop(inner);
            Self::notify(&subscribers, &snapshot);
            generation
        };

        self.run_fetch(generation).await;
    }

    /// Forces a new fetch regardless of the current terminal status.
    ///
    /// Used after login/logout. A refresh issued while a fetch is already
    /// in flight coalesces into that attempt instead of queueing a second
    /// one.
    pub async fn refresh(&self) {
        let generation = {
            let mut inner = self.lock();
            if inner.snapshot.status == SessionStatus::Loading {
                return;
            }
            let generation = inner.begin_cycle();
            let (subscribers, snapshot) = inner.pending_notification();
            drop(inner);
            Self::notify(&subscribers, &snapshot);
            generation
        };

        self.run_fetch(generation).await;
    }

    /// Synchronously resets to `Unresolved` without a network call.
    ///
    /// Used on explicit logout. Any in-flight fetch is superseded; its
    /// eventual result is discarded.
    pub fn clear(&self) {
        let (subscribers, snapshot) = {
            let mut inner = self.lock();
            inner.generation += 1;
            inner.snapshot = SessionSnapshot::unresolved();
            inner.pending_notification()
        };
        Self::notify(&subscribers, &snapshot);
    }

    async fn run_fetch(&self, generation: u64) {
        let result = self.fetcher.fetch().await;

        let (subscribers, snapshot) = {
            let mut inner = self.lock();
            if inner.generation != generation {
                debug!(
                    generation,
                    current = inner.generation,
                    "discarding superseded session fetch result"
                );
                return;
            }

            inner.snapshot = match result {
                Ok(response) => {
                    let roles = normalize_roles(response.roles);
                    let matrix = PermissionMatrix::from_grants(&response.permissions);
                    info!(
                        identity = %response.identity.email,
                        roles = roles.len(),
                        grants = matrix.len(),
                        "session authenticated"
                    );
                    SessionSnapshot::authenticated(response.identity, roles, matrix)
                }
                Err(error) if error.is_unauthorized() => {
                    info!("session unauthenticated: {error}");
                    SessionSnapshot::unauthenticated()
                }
                Err(error) => {
                    warn!("session fetch failed: {error}");
                    SessionSnapshot::errored(error.to_string())
                }
            };
            inner.pending_notification()
        };

        Self::notify(&subscribers, &snapshot);
    }

    fn notify(subscribers: &[SubscriberFn], snapshot: &SessionSnapshot) {
        for callback in subscribers {
            callback(snapshot);
        }
    }
}
