//! Route-level access guarding.
//!
//! An [`AccessGuard`] wraps one protected UI subtree. It is an explicit
//! three-state machine (checking / allowed / denied) driven by the
//! session store's status, never ad hoc per-page conditionals. The
//! routing side (redirect, current route) stays behind the [`Navigator`]
//! and [`RouteContext`] collaborator traits.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::info;

use crate::snapshot::{SessionSnapshot, SessionStatus};
use crate::store::{SessionStore, SubscriberId};

/// Redirect primitive supplied by the routing layer.
pub trait Navigator: Send + Sync {
    /// Navigates the application to the given path.
    fn navigate(&self, path: &str);
}

/// Read access to the current route, supplied by the routing layer.
pub trait RouteContext: Send + Sync {
    /// The path the application is currently on.
    fn current_path(&self) -> String;
}

/// Guard state machine states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    /// Waiting for the store to reach a terminal status.
    Checking,
    /// The session is authenticated; the subtree may render.
    Allowed,
    /// The session is unauthenticated or errored; the subtree must not
    /// render.
    Denied,
}

/// What the wrapped subtree should render right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardView {
    /// Neutral loading indicator; no redirect yet.
    Loading,
    /// Render the protected subtree.
    Protected,
    /// Unauthenticated; a redirect to login has been issued and the
    /// subtree renders nothing.
    Blocked,
    /// The session fetch failed. Render a retry affordance, never a
    /// silent blank page.
    RecoverableError {
        /// Error detail retained by the store.
        detail: String,
    },
}

struct GuardInner {
    state: GuardState,
    denied_status: Option<SessionStatus>,
    redirected: bool,
    subscription: Option<SubscriberId>,
}

/// Blocks rendering of a protected subtree until the session store
/// reaches a terminal status, then renders or redirects accordingly.
pub struct AccessGuard {
    store: Arc<SessionStore>,
    navigator: Arc<dyn Navigator>,
    route: Arc<dyn RouteContext>,
    login_path: String,
    inner: Mutex<GuardInner>,
}

impl std::fmt::Debug for AccessGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessGuard")
            .field("login_path", &self.login_path)
            .field("state", &self.lock().state)
            .finish()
    }
}

impl AccessGuard {
    /// Creates a guard in the `Checking` state. Nothing happens until
    /// [`AccessGuard::mount`].
    pub fn new(
        store: Arc<SessionStore>,
        navigator: Arc<dyn Navigator>,
        route: Arc<dyn RouteContext>,
        login_path: impl Into<String>,
    ) -> Self {
        Self {
            store,
            navigator,
            route,
            login_path: login_path.into(),
            inner: Mutex::new(GuardInner {
                state: GuardState::Checking,
                denied_status: None,
                redirected: false,
                subscription: None,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, GuardInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether the guard sits on the unauthenticated entry point itself.
    ///
    /// The login route is unprotected; a redirect issued by a guard must
    /// never pass through another guard.
    pub fn is_exempt(&self) -> bool {
        self.route.current_path() == self.login_path
    }

    /// Activates the guard: subscribes to store transitions and triggers
    /// the initial `load()` when no fetch has happened yet.
    ///
    /// Multiple guards mounting concurrently share a single fetch; the
    /// store coalesces duplicate `load()` calls.
    pub async fn mount(self: Arc<Self>) {
        if self.is_exempt() {
            return;
        }

        let weak = Arc::downgrade(&self);
        let id = self.store.subscribe(move |snapshot| {
            if let Some(guard) = weak.upgrade() {
                guard.apply(snapshot);
            }
        });
        self.lock().subscription = Some(id);

        if self.store.status() == SessionStatus::Unresolved {
            self.store.load().await;
        } else {
            self.apply(&self.store.current());
        }
    }

    /// Detaches the guard from the store.
    pub fn unmount(&self) {
        let subscription = self.lock().subscription.take();
        if let Some(id) = subscription {
            self.store.unsubscribe(id);
        }
    }

    /// Re-enters `Checking` and forces a new fetch. The only path out of
    /// `Denied` back into `Checking`.
    pub async fn retry(&self) {
        {
            let mut inner = self.lock();
            inner.state = GuardState::Checking;
            inner.denied_status = None;
            inner.redirected = false;
        }
        self.store.refresh().await;
    }

    /// Current state machine state.
    pub fn state(&self) -> GuardState {
        self.lock().state
    }

    /// Projects the state machine onto what the subtree should render.
    pub fn view(&self) -> GuardView {
        let inner = self.lock();
        match inner.state {
            GuardState::Checking => GuardView::Loading,
            GuardState::Allowed => GuardView::Protected,
            GuardState::Denied => match inner.denied_status {
                Some(SessionStatus::Error) => GuardView::RecoverableError {
                    detail: self
                        .store
                        .current()
                        .error
                        .unwrap_or_else(|| "Session could not be resolved".to_string()),
                },
                _ => GuardView::Blocked,
            },
        }
    }

    fn apply(&self, snapshot: &SessionSnapshot) {
        let redirect = {
            let mut inner = self.lock();
            match snapshot.status {
                SessionStatus::Unresolved => {
                    // A clear() starts a fresh denial cycle; the next
                    // unauthenticated outcome redirects again.
                    inner.redirected = false;
                    if inner.state != GuardState::Denied {
                        inner.state = GuardState::Checking;
                    }
                    false
                }
                SessionStatus::Loading => {
                    // Once denied, the guard stays denied until an
                    // explicit retry; anything else keeps checking.
                    if inner.state != GuardState::Denied {
                        inner.state = GuardState::Checking;
                    }
                    false
                }
                SessionStatus::Authenticated => {
                    inner.state = GuardState::Allowed;
                    inner.denied_status = None;
                    inner.redirected = false;
                    false
                }
                SessionStatus::Unauthenticated => {
                    inner.state = GuardState::Denied;
                    inner.denied_status = Some(SessionStatus::Unauthenticated);
                    if inner.redirected {
                        false
                    } else {
                        inner.redirected = true;
                        true
                    }
                }
                SessionStatus::Error => {
                    inner.state = GuardState::Denied;
                    inner.denied_status = Some(SessionStatus::Error);
                    false
                }
            }
        };

        if redirect {
            info!(path = %self.login_path, "redirecting unauthenticated session to login");
            self.navigator.navigate(&self.login_path);
        }
    }
}

impl Drop for AccessGuard {
    fn drop(&mut self) {
        self.unmount();
    }
}
