//! The AI relay: validates requests, builds prompts and forwards them to the
//! configured text provider.

use crate::dtos::{
    AgentStartResponse, HealthResponse, QueryRequest, QueryResponse, ServiceStatus,
    WorkflowRequest, WorkflowResponse,
};
use crate::error::RelayError;
use crate::services::metrics::record_provider_call;
use crate::services::providers::TextProvider;
use crate::services::AgentDb;
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

pub const PROVIDER_LABEL: &str = "Google Gemini";
const PROVIDER_TIER_LABEL: &str = "Google Gemini (Free)";
const AUTOMATION_METHOD: &str = "BMAD Method";
const CAPABILITIES: [&str; 3] = [
    "Natural Language Processing",
    "Workflow Automation",
    "HR/CRM/ERP Integration",
];

#[derive(Clone)]
pub struct AgentRelay {
    provider: Arc<dyn TextProvider>,
    store: AgentDb,
}

impl AgentRelay {
    pub fn new(provider: Arc<dyn TextProvider>, store: AgentDb) -> Self {
        Self { provider, store }
    }

    pub fn start(&self) -> AgentStartResponse {
        AgentStartResponse {
            status: "AI Agent started",
            ai_provider: PROVIDER_TIER_LABEL,
            automation: AUTOMATION_METHOD,
            capabilities: CAPABILITIES.to_vec(),
            timestamp: Utc::now(),
        }
    }

    #[tracing::instrument(skip_all)]
    pub async fn query(&self, request: QueryRequest) -> Result<QueryResponse, RelayError> {
        let query = request
            .query
            .filter(|q| !q.is_empty())
            .ok_or_else(|| RelayError::Validation("Query is required".to_string()))?;

        tracing::info!(query_len = query.len(), "Processing query");

        let response = self.generate("query", &query).await?;

        Ok(QueryResponse {
            success: true,
            query,
            response,
            ai_provider: PROVIDER_LABEL,
            timestamp: Utc::now(),
        })
    }

    #[tracing::instrument(skip_all, fields(workflow = request.workflow.as_deref()))]
    pub async fn workflow(&self, request: WorkflowRequest) -> Result<WorkflowResponse, RelayError> {
        let workflow = request
            .workflow
            .filter(|w| !w.is_empty())
            .ok_or_else(|| RelayError::Validation("Workflow type required".to_string()))?;

        tracing::info!("Generating workflow");

        let prompt = workflow_prompt(&workflow, request.parameters.as_ref());
        let steps = self.generate("workflow", &prompt).await?;

        Ok(WorkflowResponse {
            success: true,
            workflow,
            parameters: request.parameters,
            automation_steps: steps,
            generated_by: PROVIDER_LABEL,
            timestamp: Utc::now(),
        })
    }

    pub fn health(&self) -> HealthResponse {
        HealthResponse {
            status: "healthy",
            services: ServiceStatus {
                store: self.store.is_connected(),
                provider: self.provider.is_configured(),
            },
            timestamp: Utc::now(),
        }
    }

    async fn generate(&self, operation: &'static str, prompt: &str) -> Result<String, RelayError> {
        let started = Instant::now();
        match self.provider.generate(prompt).await {
            Ok(text) => {
                record_provider_call(operation, "success", started.elapsed());
                Ok(text)
            }
            Err(e) => {
                record_provider_call(operation, e.kind(), started.elapsed());
                tracing::error!(
                    provider = %self.provider.name(),
                    error = %e,
                    "Provider call failed"
                );
                Err(e.into())
            }
        }
    }
}

/// Instruction sent for workflow generation. An absent `parameters` renders
/// as `undefined`.
pub fn workflow_prompt(workflow: &str, parameters: Option<&Value>) -> String {
    let parameters = parameters
        .and_then(|p| serde_json::to_string_pretty(p).ok())
        .unwrap_or_else(|| "undefined".to_string());

    format!(
        "Generate detailed automation steps for {workflow} workflow.\n\
         Parameters: {parameters}\n\
         \n\
         Provide 5-7 numbered steps that an automation system should follow."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::mock::MockTextProvider;
    use serde_json::json;

    fn relay(provider: MockTextProvider) -> (AgentRelay, Arc<MockTextProvider>) {
        let provider = Arc::new(provider);
        (
            AgentRelay::new(provider.clone(), AgentDb::detached()),
            provider,
        )
    }

    #[test]
    fn workflow_prompt_matches_template() {
        let prompt = workflow_prompt("onboarding", Some(&json!({ "b": 2, "a": [1] })));
        assert_eq!(
            prompt,
            "Generate detailed automation steps for onboarding workflow.\n\
             Parameters: {\n  \"b\": 2,\n  \"a\": [\n    1\n  ]\n}\n\
             \n\
             Provide 5-7 numbered steps that an automation system should follow."
        );
    }

    #[test]
    fn workflow_prompt_renders_missing_parameters_as_undefined() {
        let prompt = workflow_prompt("payroll", None);
        assert!(prompt.contains("Parameters: undefined\n"));

        let prompt = workflow_prompt("payroll", Some(&Value::Null));
        assert!(prompt.contains("Parameters: null\n"));
    }

    #[tokio::test]
    async fn query_forwards_prompt_verbatim() {
        let (relay, provider) = relay(MockTextProvider::replying("T"));

        let response = relay
            .query(QueryRequest {
                query: Some("  What is BMAD?  ".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(response.response, "T");
        assert_eq!(response.query, "  What is BMAD?  ");
        assert_eq!(provider.prompts(), vec!["  What is BMAD?  ".to_string()]);
    }

    #[tokio::test]
    async fn empty_query_never_reaches_provider() {
        let (relay, provider) = relay(MockTextProvider::replying("T"));

        let err = relay
            .query(QueryRequest {
                query: Some(String::new()),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, RelayError::Validation(_)));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn missing_workflow_is_validation_error() {
        let (relay, provider) = relay(MockTextProvider::replying("T"));

        let err = relay.workflow(WorkflowRequest::default()).await.unwrap_err();

        assert_eq!(err.to_string(), "Workflow type required");
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn provider_failure_propagates() {
        let (relay, _) = relay(MockTextProvider::failing("quota exceeded"));

        let err = relay
            .query(QueryRequest {
                query: Some("X".to_string()),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, RelayError::Provider(_)));
        assert_eq!(err.to_string(), "API error: quota exceeded");
    }

    #[test]
    fn health_reflects_store_and_provider() {
        let (relay, _) = relay(MockTextProvider::replying("T").unconfigured());
        let health = relay.health();
        assert!(!health.services.store);
        assert!(!health.services.provider);

        relay.store.set_connected(true);
        assert!(relay.health().services.store);
    }

    #[test]
    fn start_describes_capabilities() {
        let (relay, provider) = relay(MockTextProvider::replying("T"));
        let start = relay.start();
        assert_eq!(start.status, "AI Agent started");
        assert_eq!(start.capabilities.len(), 3);
        assert_eq!(provider.call_count(), 0);
    }
}
