use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::dtos::{AgentStartResponse, QueryRequest, QueryResponse, WorkflowRequest, WorkflowResponse};
use crate::error::RelayError;
use crate::AppState;

/// POST /agent/start
pub async fn start_agent(State(state): State<AppState>) -> Json<AgentStartResponse> {
    Json(state.relay.start())
}

/// POST /agent/query
pub async fn query_agent(
    State(state): State<AppState>,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<QueryResponse>, RelayError> {
    let Json(request) = payload?;
    let response = state.relay.query(request).await?;
    Ok(Json(response))
}

/// POST /agent/workflow
pub async fn generate_workflow(
    State(state): State<AppState>,
    payload: Result<Json<WorkflowRequest>, JsonRejection>,
) -> Result<Json<WorkflowResponse>, RelayError> {
    let Json(request) = payload?;
    let response = state.relay.workflow(request).await?;
    Ok(Json(response))
}
