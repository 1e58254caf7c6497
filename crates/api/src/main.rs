use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use missionboard_api::config::ServerConfig;
use missionboard_api::router::build_app_router;
use missionboard_api::sessions::BoardRegistry;
use missionboard_api::state::AppState;
use missionboard_store::{PostgrestConnector, StoreConnector};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    // LOG_FORMAT=json switches to one JSON object per line.
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "missionboard_api=debug,missionboard_store=debug,tower_http=debug".into()
    });
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let registry = tracing_subscriber::registry().with(filter);
    if json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        policy = config.partition_policy.name(),
        "Loaded server configuration"
    );

    // --- Hosted store ---
    let connector = PostgrestConnector::new(
        &config.store.url,
        &config.store.anon_key,
        &config.store.service_role_key,
        Duration::from_secs(config.store.timeout_secs),
    )
    .expect("Failed to build store client");
    tracing::info!(url = %config.store.url, "Store connector created");

    match connector.service().ping().await {
        Ok(()) => tracing::info!("Store health check passed"),
        Err(e) => tracing::warn!(error = %e, "Store not reachable at startup"),
    }

    // --- Board sessions ---
    let boards = Arc::new(BoardRegistry::with_idle_ttl(
        config.partition_policy,
        Duration::from_secs(config.session_idle_secs),
    ));

    // --- App state ---
    let state = AppState {
        connector: Arc::new(connector),
        config: Arc::new(config.clone()),
        boards: Arc::clone(&boards),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());
    let drain = Duration::from_secs(config.shutdown_timeout_secs);
    let mut server = std::pin::pin!(server.into_future());

    tokio::select! {
        result = &mut server => result.expect("Server error"),
        () = async {
            shutdown_signal().await;
            tokio::time::sleep(drain).await;
        } => {
            tracing::warn!(secs = drain.as_secs(), "Shutdown drain timed out, dropping open requests");
        }
    }

    // --- Post-shutdown cleanup ---
    let sessions = boards.session_count().await;
    tracing::info!(sessions, "Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
