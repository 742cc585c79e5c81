//! Shared helpers for agent-service integration tests.

#![allow(dead_code)]

use agent_service::services::providers::mock::MockTextProvider;
use agent_service::services::AgentDb;
use agent_service::startup::build_router;
use agent_service::AppState;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use tower::util::ServiceExt;

/// Router wired to a mock provider and a detached store.
pub struct TestApp {
    pub router: Router,
    pub provider: Arc<MockTextProvider>,
    pub store: AgentDb,
}

impl TestApp {
    pub fn new(provider: MockTextProvider) -> Self {
        let provider = Arc::new(provider);
        let store = AgentDb::detached();
        let state = AppState::new(provider.clone(), store.clone());

        Self {
            router: build_router(state),
            provider,
            store,
        }
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body.to_string())).await
    }

    pub async fn post_raw(&self, uri: &str, body: &str) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body.to_string())).await
    }

    async fn send(&self, method: Method, uri: &str, body: Option<String>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if body.is_some() {
            request = request.header("content-type", "application/json");
        }
        let request = request
            .body(body.map(Body::from).unwrap_or_else(Body::empty))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, body)
    }
}
