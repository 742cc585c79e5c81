use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Default, Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub query: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WorkflowRequest {
    #[serde(default)]
    pub workflow: Option<String>,

    /// `None` when the field is absent; an explicit `null` is kept as
    /// `Some(Value::Null)`.
    #[serde(default, deserialize_with = "present")]
    pub parameters: Option<Value>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentStartResponse {
    pub status: &'static str,
    pub ai_provider: &'static str,
    pub automation: &'static str,
    pub capabilities: Vec<&'static str>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    pub success: bool,
    pub query: String,
    pub response: String,
    pub ai_provider: &'static str,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowResponse {
    pub success: bool,
    pub workflow: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
    pub automation_steps: String,
    pub generated_by: &'static str,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub services: ServiceStatus,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ServiceStatus {
    pub store: bool,
    pub provider: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn workflow_parameters_distinguish_absent_from_null() {
        let absent: WorkflowRequest = serde_json::from_value(json!({ "workflow": "w" })).unwrap();
        assert!(absent.parameters.is_none());

        let null: WorkflowRequest =
            serde_json::from_value(json!({ "workflow": "w", "parameters": null })).unwrap();
        assert_eq!(null.parameters, Some(Value::Null));
    }

    #[test]
    fn query_request_tolerates_missing_and_null_query() {
        let missing: QueryRequest = serde_json::from_value(json!({})).unwrap();
        assert!(missing.query.is_none());

        let null: QueryRequest = serde_json::from_value(json!({ "query": null })).unwrap();
        assert!(null.query.is_none());
    }

    #[test]
    fn workflow_response_uses_camel_case_and_omits_absent_parameters() {
        let response = WorkflowResponse {
            success: true,
            workflow: "onboarding".to_string(),
            parameters: None,
            automation_steps: "1. Step".to_string(),
            generated_by: "Google Gemini",
            timestamp: Utc::now(),
        };

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["automationSteps"], "1. Step");
        assert_eq!(value["generatedBy"], "Google Gemini");
        assert!(value.get("parameters").is_none());
    }
}
