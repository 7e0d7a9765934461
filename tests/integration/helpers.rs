//! Shared test harness: a scripted transport standing in for the backend,
//! plus recording collaborators for the routing boundary.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::Notify;
use uuid::Uuid;

use finboard_session::{
    HttpError, HttpTransport, Navigator, RouteContext, SessionFetcher, SessionStatus, SessionStore,
};

/// Transport that replays scripted responses in order.
///
/// Optionally gated: while a gate is armed, every call waits until the
/// gate is released, so tests can observe the `Loading` state.
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<Value, HttpError>>>,
    calls: AtomicUsize,
    gate: Mutex<Option<Arc<Notify>>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
            gate: Mutex::new(None),
        })
    }

    /// Queues a successful JSON body.
    pub fn push_ok(&self, body: Value) {
        self.responses.lock().unwrap().push_back(Ok(body));
    }

    /// Queues a transport failure.
    pub fn push_err(&self, error: HttpError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    /// Arms the gate. Returns the handle used to release held calls.
    pub fn hold(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    /// Number of calls that reached the transport.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn get_json(&self, _path: &str) -> Result<Value, HttpError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(HttpError {
                    status: None,
                    message: "no scripted response left".to_string(),
                })
            })
    }
}

/// Navigator that records every redirect it is asked to perform.
#[derive(Default)]
pub struct RecordingNavigator {
    visits: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn visited(&self) -> Vec<String> {
        self.visits.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        self.visits.lock().unwrap().push(path.to_string());
    }
}

/// Route context pinned to a fixed path.
pub struct StaticRoute(pub String);

impl StaticRoute {
    pub fn at(path: &str) -> Arc<Self> {
        Arc::new(Self(path.to_string()))
    }
}

impl RouteContext for StaticRoute {
    fn current_path(&self) -> String {
        self.0.clone()
    }
}

/// Builds a store wired to the given transport against `/auth/me`.
pub fn make_store(transport: Arc<ScriptedTransport>) -> Arc<SessionStore> {
    Arc::new(SessionStore::new(SessionFetcher::new(transport, "/auth/me")))
}

/// A well-formed identity endpoint body with the given grants as
/// (module path, action name, allowed) triples.
pub fn session_body(email: &str, grants: &[(&str, &str, bool)]) -> Value {
    let now = chrono::Utc::now();
    let permissions: Vec<Value> = grants
        .iter()
        .map(|(module_path, action, allowed)| {
            json!({
                "module": {
                    "id": Uuid::new_v4(),
                    "name": module_path,
                    "path": module_path,
                    "description": null,
                },
                "action": {"id": Uuid::new_v4(), "name": action},
                "allowed": allowed,
            })
        })
        .collect();

    json!({
        "identity": {
            "id": Uuid::new_v4(),
            "email": email,
            "active": true,
            "created_at": now,
            "updated_at": now,
        },
        "roles": [
            {"id": Uuid::new_v4(), "name": "analyst", "description": null, "active": true},
        ],
        "permissions": permissions,
    })
}

/// An authentication rejection from the backend.
pub fn unauthorized() -> HttpError {
    HttpError {
        status: Some(401),
        message: "session expired".to_string(),
    }
}

/// A transport-level failure (no HTTP status received).
pub fn network_failure() -> HttpError {
    HttpError {
        status: None,
        message: "connection refused".to_string(),
    }
}

/// Spins until the store reports the given status.
pub async fn wait_for_status(store: &SessionStore, status: SessionStatus) {
    for _ in 0..1000 {
        if store.status() == status {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("store never reached {status:?}, stuck at {:?}", store.status());
}
