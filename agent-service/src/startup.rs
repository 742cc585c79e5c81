//! Application startup and lifecycle management.

use crate::config::AgentConfig;
use crate::handlers::{
    agent::{generate_workflow, query_agent, start_agent},
    health::{health_check, metrics},
};
use crate::services::metrics::init_metrics;
use crate::services::providers::gemini::GeminiTextProvider;
use crate::services::providers::TextProvider;
use crate::services::AgentDb;
use crate::AppState;
use axum::{
    body::Body,
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware,
    tracing::{make_request_span, request_id_middleware},
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .route("/agent/start", post(start_agent))
        .route("/agent/query", post(query_agent))
        .route("/agent/workflow", post(generate_workflow))
        .with_state(state)
        .layer(from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span::<Body>))
        .layer(from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Wire provider and store, then bind the listener. Port 0 picks a free
    /// port, which tests rely on.
    pub async fn build(config: AgentConfig) -> Result<Self, AppError> {
        init_metrics();

        let text_provider: Arc<dyn TextProvider> = Arc::new(
            GeminiTextProvider::new(&config.gemini)
                .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e.to_string())))?,
        );
        tracing::info!(
            model = %config.gemini.model,
            configured = text_provider.is_configured(),
            "Initialized Gemini text provider"
        );
        if !text_provider.is_configured() {
            tracing::warn!("GEMINI_API_KEY is not set; AI endpoints will fail until it is");
        }

        let store = AgentDb::connect_in_background(
            &config.mongodb.uri,
            Duration::from_secs(config.mongodb.monitor_interval_secs.max(1)),
        );

        let state = AppState::new(text_provider, store);

        let address = config.common.address();
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", address, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(port, "Agent service listening");

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Serve until Ctrl+C or SIGTERM.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = build_router(self.state);
        axum::serve(self.listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                tracing::error!("HTTP server error: {}", e);
                e
            })
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
