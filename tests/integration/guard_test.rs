//! Integration tests for the access guard state machine.

mod helpers;

use std::sync::Arc;

use finboard_session::{AccessGuard, GuardState, GuardView, SessionStatus};

fn guard_at(
    path: &str,
    store: Arc<finboard_session::SessionStore>,
    navigator: Arc<helpers::RecordingNavigator>,
) -> Arc<AccessGuard> {
    Arc::new(AccessGuard::new(
        store,
        navigator,
        helpers::StaticRoute::at(path),
        "/login",
    ))
}

#[tokio::test]
async fn test_guard_allows_subtree_after_authentication() {
    let transport = helpers::ScriptedTransport::new();
    transport.push_ok(helpers::session_body(
        "analyst@example.org",
        &[("financial", "view", true)],
    ));
    let store = helpers::make_store(transport);
    let navigator = helpers::RecordingNavigator::new();

    let guard = guard_at("/financial", store, Arc::clone(&navigator));
    Arc::clone(&guard).mount().await;

    assert_eq!(guard.state(), GuardState::Allowed);
    assert_eq!(guard.view(), GuardView::Protected);
    assert!(navigator.visited().is_empty());
}

#[tokio::test]
async fn test_guard_redirects_to_login_when_unauthenticated() {
    let transport = helpers::ScriptedTransport::new();
    transport.push_err(helpers::unauthorized());
    let store = helpers::make_store(transport);
    let navigator = helpers::RecordingNavigator::new();

    let guard = guard_at("/financial", store, Arc::clone(&navigator));
    Arc::clone(&guard).mount().await;

    assert_eq!(guard.state(), GuardState::Denied);
    assert_eq!(guard.view(), GuardView::Blocked);
    assert_eq!(navigator.visited(), vec!["/login".to_string()]);
}

#[tokio::test]
async fn test_guard_shows_recoverable_error_without_redirect() {
    let transport = helpers::ScriptedTransport::new();
    transport.push_err(helpers::network_failure());
    let store = helpers::make_store(transport);
    let navigator = helpers::RecordingNavigator::new();

    let guard = guard_at("/financial", store, Arc::clone(&navigator));
    Arc::clone(&guard).mount().await;

    assert_eq!(guard.state(), GuardState::Denied);
    match guard.view() {
        GuardView::RecoverableError { detail } => {
            assert!(detail.contains("connection refused"), "detail: {detail}");
        }
        other => panic!("expected recoverable error view, got {other:?}"),
    }
    assert!(navigator.visited().is_empty());
}

#[tokio::test]
async fn test_retry_recovers_after_transient_failure() {
    let transport = helpers::ScriptedTransport::new();
    transport.push_err(helpers::network_failure());
    transport.push_ok(helpers::session_body(
        "analyst@example.org",
        &[("financial", "view", true)],
    ));
    let store = helpers::make_store(transport);
    let navigator = helpers::RecordingNavigator::new();

    let guard = guard_at("/financial", store, Arc::clone(&navigator));
    Arc::clone(&guard).mount().await;
    assert_eq!(guard.state(), GuardState::Denied);

    guard.retry().await;

    assert_eq!(guard.state(), GuardState::Allowed);
    assert_eq!(guard.view(), GuardView::Protected);
    assert!(navigator.visited().is_empty());
}

#[tokio::test]
async fn test_guard_never_exposes_subtree_while_loading() {
    let transport = helpers::ScriptedTransport::new();
    transport.push_ok(helpers::session_body("analyst@example.org", &[]));
    let gate = transport.hold();
    let store = helpers::make_store(Arc::clone(&transport));
    let navigator = helpers::RecordingNavigator::new();

    let guard = guard_at("/financial", Arc::clone(&store), navigator);
    let mounting = {
        let guard = Arc::clone(&guard);
        tokio::spawn(async move { guard.mount().await })
    };
    helpers::wait_for_status(&store, SessionStatus::Loading).await;

    assert_eq!(guard.state(), GuardState::Checking);
    assert_eq!(guard.view(), GuardView::Loading);

    gate.notify_one();
    mounting.await.unwrap();
    assert_eq!(guard.view(), GuardView::Protected);
}

#[tokio::test]
async fn test_concurrent_guards_share_a_single_fetch() {
    let transport = helpers::ScriptedTransport::new();
    transport.push_ok(helpers::session_body("analyst@example.org", &[]));
    let gate = transport.hold();
    let store = helpers::make_store(Arc::clone(&transport));
    let navigator = helpers::RecordingNavigator::new();

    let first = guard_at("/financial", Arc::clone(&store), Arc::clone(&navigator));
    let second = guard_at("/contracts", Arc::clone(&store), navigator);

    let mounting = {
        let first = Arc::clone(&first);
        tokio::spawn(async move { first.mount().await })
    };
    helpers::wait_for_status(&store, SessionStatus::Loading).await;

    // Second guard mounts while the first one's fetch is in flight.
    Arc::clone(&second).mount().await;
    assert_eq!(second.state(), GuardState::Checking);
    assert_eq!(transport.call_count(), 1);

    gate.notify_one();
    mounting.await.unwrap();

    assert_eq!(first.state(), GuardState::Allowed);
    assert_eq!(second.state(), GuardState::Allowed);
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test]
async fn test_guard_is_inactive_on_the_login_route() {
    let transport = helpers::ScriptedTransport::new();
    let store = helpers::make_store(Arc::clone(&transport));
    let navigator = helpers::RecordingNavigator::new();

    let guard = guard_at("/login", store, Arc::clone(&navigator));
    assert!(guard.is_exempt());
    Arc::clone(&guard).mount().await;

    // No fetch, no redirect: the redirect target never guards itself.
    assert_eq!(transport.call_count(), 0);
    assert!(navigator.visited().is_empty());
}

#[tokio::test]
async fn test_denied_guard_does_not_flicker_during_collaborator_refresh() {
    let transport = helpers::ScriptedTransport::new();
    transport.push_err(helpers::unauthorized());
    transport.push_ok(helpers::session_body("analyst@example.org", &[]));
    let store = helpers::make_store(Arc::clone(&transport));
    let navigator = helpers::RecordingNavigator::new();

    let guard = guard_at("/financial", Arc::clone(&store), Arc::clone(&navigator));
    Arc::clone(&guard).mount().await;
    assert_eq!(guard.state(), GuardState::Denied);

    // A collaborator (e.g. the login page) refreshes the store after a
    // successful sign-in. The guard must not re-enter Checking.
    let gate = transport.hold();
    let refreshing = {
        let store = Arc::clone(&store);
        tokio::spawn(async move { store.refresh().await })
    };
    helpers::wait_for_status(&store, SessionStatus::Loading).await;
    assert_eq!(guard.state(), GuardState::Denied);

    gate.notify_one();
    refreshing.await.unwrap();

    assert_eq!(guard.state(), GuardState::Allowed);
    // The earlier redirect happened exactly once.
    assert_eq!(navigator.visited(), vec!["/login".to_string()]);
}

#[tokio::test]
async fn test_guard_redirects_again_on_a_fresh_denial_cycle() {
    let transport = helpers::ScriptedTransport::new();
    transport.push_err(helpers::unauthorized());
    transport.push_err(helpers::unauthorized());
    let store = helpers::make_store(transport);
    let navigator = helpers::RecordingNavigator::new();

    let guard = guard_at("/financial", Arc::clone(&store), Arc::clone(&navigator));
    Arc::clone(&guard).mount().await;
    assert_eq!(navigator.visited(), vec!["/login".to_string()]);

    // A clear() ends the first denial cycle; the next unauthenticated
    // outcome is a new denial and redirects exactly once again.
    store.clear();
    store.load().await;

    assert_eq!(guard.state(), GuardState::Denied);
    assert_eq!(
        navigator.visited(),
        vec!["/login".to_string(), "/login".to_string()]
    );
}

#[tokio::test]
async fn test_unmounted_guard_stops_tracking_the_store() {
    let transport = helpers::ScriptedTransport::new();
    transport.push_err(helpers::unauthorized());
    let store = helpers::make_store(transport);
    let navigator = helpers::RecordingNavigator::new();

    let guard = guard_at("/financial", Arc::clone(&store), Arc::clone(&navigator));
    Arc::clone(&guard).mount().await;
    guard.unmount();

    let state_at_unmount = guard.state();
    store.clear();
    store.load().await;

    assert_eq!(guard.state(), state_at_unmount);
}
