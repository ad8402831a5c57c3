//! tofu-relay server entry point.
//!
//! Loads stats, starts the Axum server with the WebSocket relay, and
//! persists stats when a termination signal arrives.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use tofu_relay::api;
use tofu_relay::app_state::AppState;
use tofu_relay::config::RelayConfig;
use tofu_relay::persistence::StatsStore;
use tofu_relay::service::RelayService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = RelayConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "starting tofu-relay");

    // Load stats and build the coordinator
    let stats = StatsStore::load(&config.stats_path);
    tracing::info!(
        path = %stats.path().display(),
        total_users = stats.stats().total_users,
        "stats loaded"
    );
    let relay = Arc::new(RelayService::new(stats, config.outbound_queue_capacity));

    let app_state = AppState {
        relay: Arc::clone(&relay),
    };

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .into_future();

    // Live connections are not drained: persist, then stop serving.
    tokio::select! {
        result = server => result?,
        () = shutdown_signal() => {
            tracing::info!("shutdown signal received");
            relay.shutdown().await;
        }
    }

    Ok(())
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "could not listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "could not listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
