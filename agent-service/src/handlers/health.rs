use axum::{extract::State, http::header, response::IntoResponse, Json};

use crate::dtos::HealthResponse;
use crate::services::metrics::get_metrics;
use crate::AppState;

/// GET /health. Always 200; reports cached store state and key presence.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(state.relay.health())
}

/// GET /metrics
pub async fn metrics() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        get_metrics(),
    )
}
