// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::application::dashboard_service::DashboardService;
use crate::application::refresh::RefreshLoop;
use crate::infrastructure::config::load_config;
use crate::infrastructure::thingspeak::ThingSpeakClient;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{get_data, get_history, health_check, set_mode};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // Missing credentials or inverted thresholds abort here, before we serve
    let config = load_config()?;

    let provider = Arc::new(ThingSpeakClient::new(&config.provider));
    let service = DashboardService::new(
        provider,
        config.thresholds.clone(),
        config.range.clone(),
        config.provider.fields.clone(),
    );

    // Background poller: keeps a current display state and logs alert and
    // connectivity transitions between requests
    let refresh = RefreshLoop::new(
        service.clone(),
        Duration::from_secs(config.refresh.interval_secs),
    )
    .spawn();

    let state = Arc::new(AppState {
        dashboard_service: service,
    });

    let router = Router::new()
        .route("/api/data", get(get_data))
        .route("/api/history", get(get_history))
        .route("/api/mode", post(set_mode))
        .route("/api/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr: SocketAddr = config.server.listen_addr.parse()?;
    tracing::info!("starting ev-battery-telemetry service on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    refresh.stop().await;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
