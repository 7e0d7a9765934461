//! Finboard session check utility.
//!
//! Resolves the current session against the configured backend and prints
//! the identity, roles, and permission matrix. Useful for verifying
//! credentials and backend permission configuration from the command line.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use finboard_core::config::AppConfig;
use finboard_core::error::AppError;
use finboard_session::{ReqwestTransport, SessionFetcher, SessionStatus, SessionStore};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Session check failed: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("FINBOARD_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt().json().with_env_filter(filter).with_target(true).init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Resolve the session once and report the outcome
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!(
        base_url = %config.api.base_url,
        "Checking session against backend"
    );

    let transport = ReqwestTransport::shared(&config.api)?;
    let fetcher = SessionFetcher::from_config(transport, &config.api);
    let store = Arc::new(SessionStore::new(fetcher));

    store.load().await;
    let snapshot = store.current();

    match snapshot.status {
        SessionStatus::Authenticated => {
            let identity = snapshot
                .identity
                .as_ref()
                .ok_or_else(|| AppError::internal("Authenticated snapshot without identity"))?;

            println!("Authenticated as {}", identity.email);

            let roles: Vec<&str> = snapshot.roles.iter().map(|r| r.name.as_str()).collect();
            println!("Roles: {}", roles.join(", "));

            let mut entries: Vec<_> = snapshot.permissions.entries().collect();
            entries.sort();
            println!("Permissions ({}):", entries.len());
            for (module_path, action, allowed) in entries {
                let verdict = if allowed { "allow" } else { "deny" };
                println!("  {module_path}:{action} -> {verdict}");
            }

            Ok(())
        }
        SessionStatus::Unauthenticated => {
            println!("Not signed in.");
            Ok(())
        }
        _ => Err(AppError::internal(
            snapshot
                .error
                .unwrap_or_else(|| "Session did not reach a terminal status".to_string()),
        )),
    }
}
