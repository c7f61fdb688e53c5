//! Haven DAV server
//!
//! Main entry point for the CalDAV/CardDAV endpoint.

use std::{sync::Arc, time::Duration};

use application::AuthService;
use infrastructure::{AppConfig, MemoryStore, PasswordHasher};
use presentation_dav::{AppState, routes};
use tokio::{net::TcpListener, signal};
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const MAX_REQUEST_BYTES: usize = 16 * 1024 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "haven_dav_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Haven DAV v{} starting...", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        warn!("Failed to load config, using defaults: {e}");
        AppConfig::default()
    });

    info!(
        host = %config.server.host,
        port = %config.server.port,
        mount = %config.dav.mount_path,
        "Configuration loaded"
    );

    // In-memory store; the portal wires its relational adapter in here
    let store = Arc::new(MemoryStore::new());
    bootstrap_account(&store);

    let auth = AuthService::new(store.clone(), Arc::new(PasswordHasher::new()));
    let state = AppState {
        auth,
        calendars: store.clone(),
        contacts: store,
        dav: Arc::new(config.dav.clone()),
    };

    // Build router with middleware (order matters: first added = outermost)
    let app = routes::create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(MAX_REQUEST_BYTES));

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;

    info!("DAV endpoint listening on http://{addr}{}/", config.dav.mount_path);

    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs.unwrap_or(30));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_timeout))
        .await?;

    info!("Server shutdown complete");

    Ok(())
}

/// Provision a single account from `HAVEN_BOOTSTRAP_USER` /
/// `HAVEN_BOOTSTRAP_PASSWORD`
///
/// The in-memory store starts empty; without a bootstrap account every
/// request answers 401.
fn bootstrap_account(store: &MemoryStore) {
    let (Ok(username), Ok(password)) = (
        std::env::var("HAVEN_BOOTSTRAP_USER"),
        std::env::var("HAVEN_BOOTSTRAP_PASSWORD"),
    ) else {
        warn!(
            "No bootstrap account configured; set HAVEN_BOOTSTRAP_USER and \
             HAVEN_BOOTSTRAP_PASSWORD to provision one"
        );
        return;
    };

    match PasswordHasher::new().hash(&password) {
        Ok(hash) => {
            let (user, calendar, book) = store.provision_account(&username, &hash);
            info!(
                username = %user.username,
                calendar = %calendar.id,
                address_book = %book.id,
                "Bootstrap account provisioned"
            );
        },
        Err(e) => warn!("Failed to hash bootstrap password: {e}"),
    }
}

/// Wait for shutdown signals (SIGINT, SIGTERM) and handle graceful shutdown
async fn shutdown_signal(timeout: Duration) {
    let ctrl_c = async {
        // Log error but continue waiting - this is a best-effort signal handler
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }

    info!("Waiting up to {timeout:?} for connections to close...");
    // The actual connection draining is handled by axum's graceful_shutdown
}
