use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use dqs_api::{observability::init_logging, AppState, ServiceInfo};
use dqs_reasoning::{GroqClient, GroqCollaborator};
use tokio::net::TcpListener;

mod config;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let config = config::Config::load()?;
    init_logging(&config.log).map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;

    tracing::info!("Starting DQS-AI Agent");
    tracing::debug!(?config, "Configuration loaded");

    let client = GroqClient::new(config.reasoning_config())
        .context("Invalid reasoning service configuration")?;
    let service = ServiceInfo {
        model: client.config().model.clone(),
        api_key_configured: client.config().has_api_key(),
    };
    tracing::info!(model = %service.model, "Groq client initialized");

    let state = AppState::new(Arc::new(GroqCollaborator::new(client)), service)
        .with_insight_mode(config.insight_mode);
    let app = dqs_api::routes_with_logging(state, &config.log);

    let listener = TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", config.host, config.port))?;
    tracing::info!(
        addr = %listener.local_addr()?,
        insight_mode = ?config.insight_mode,
        "Listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received SIGINT (Ctrl+C), initiating graceful shutdown"),
        _ = terminate => tracing::info!("Received SIGTERM, initiating graceful shutdown"),
    }
}
