//! n8n REST API client
//!
//! Thin authenticated client for the external workflow runtime's public API.
//!
//! # Behaviour
//!
//! - Basic Authentication and JSON content type on every request
//! - Per-request timeout from [`RuntimeConfig`]
//! - Exponential-backoff retry for the workflow list only; status lookups and
//!   writes are sent once
//! - Non-2xx responses carry status and body ([`RuntimeError::Rejected`],
//!   [`RuntimeError::Unauthorized`])
//! - Workflow ids are percent-encoded as a single path segment

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::RuntimeConfig;
use crate::error::RuntimeError;
use crate::workflow::WorkflowDocument;

/// Workflow record as reported by the runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowSummary {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// The list endpoint is paginated (`{ data: [...] }`) on the public API but
/// some deployments answer with a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListResponse {
    Page { data: Vec<WorkflowSummary> },
    Bare(Vec<WorkflowSummary>),
}

impl ListResponse {
    fn into_workflows(self) -> Vec<WorkflowSummary> {
        match self {
            ListResponse::Page { data } => data,
            ListResponse::Bare(workflows) => workflows,
        }
    }
}

/// Client for the n8n workflow runtime.
///
/// # Example
/// ```ignore
/// let client = N8nClient::new(RuntimeConfig::from_env()?);
/// for workflow in client.list_workflows().await? {
///     println!("{} {}", workflow.id, workflow.name);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct N8nClient {
    config: RuntimeConfig,
    client: Client,
}

impl N8nClient {
    pub fn new(config: RuntimeConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// `GET /workflows`
    pub async fn list_workflows(&self) -> Result<Vec<WorkflowSummary>, RuntimeError> {
        let response: ListResponse = self.get_with_retry("/workflows").await?;
        Ok(response.into_workflows())
    }

    /// `GET /workflows/{id}`, returned as the runtime sent it (nodes and
    /// connections included).
    pub async fn get_workflow(&self, workflow_id: &str) -> Result<Value, RuntimeError> {
        let endpoint = workflow_endpoint(workflow_id, "")?;
        self.execute_single_request(Method::GET, &endpoint, None)
            .await
    }

    /// `POST /workflows`
    pub async fn create_workflow(
        &self,
        document: &WorkflowDocument,
    ) -> Result<WorkflowSummary, RuntimeError> {
        let body = json!({
            "name": document.name,
            "nodes": document.nodes,
            "connections": document.connections,
            "settings": { "executionOrder": "v1" }
        });
        let value = self
            .execute_single_request(Method::POST, "/workflows", Some(&body))
            .await?;
        decode(value)
    }

    /// `POST /workflows/{id}/activate`
    pub async fn activate_workflow(&self, workflow_id: &str) -> Result<Value, RuntimeError> {
        let endpoint = workflow_endpoint(workflow_id, "/activate")?;
        self.execute_single_request(Method::POST, &endpoint, None)
            .await
    }

    /// `POST /workflows/{id}/deactivate`
    pub async fn deactivate_workflow(&self, workflow_id: &str) -> Result<Value, RuntimeError> {
        let endpoint = workflow_endpoint(workflow_id, "/deactivate")?;
        self.execute_single_request(Method::POST, &endpoint, None)
            .await
    }

    /// Deactivate, then delete. Either failure is returned as is; a
    /// deactivated workflow is not reactivated when the delete fails.
    pub async fn delete_workflow(&self, workflow_id: &str) -> Result<Value, RuntimeError> {
        let endpoint = workflow_endpoint(workflow_id, "")?;
        self.deactivate_workflow(workflow_id).await?;
        self.execute_single_request(Method::DELETE, &endpoint, None)
            .await
    }

    /// GET with retry and exponential backoff on transient failures.
    async fn get_with_retry<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, RuntimeError> {
        let mut last_error = RuntimeError::Unknown("No attempts made".to_string());

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                let delay = backoff_delay(self.config.retry_base_delay, attempt);
                debug!(attempt, delay_ms = delay.as_millis() as u64, endpoint, "Retrying runtime request");
                tokio::time::sleep(delay).await;
            }

            match self.execute_single_request(Method::GET, endpoint, None).await {
                Ok(value) => return decode(value),
                Err(e) => {
                    if !e.is_retryable() {
                        return Err(e);
                    }
                    warn!(attempt, endpoint, error = %e, "Runtime request failed, will retry");
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }

    /// Execute a single HTTP request and return the JSON body.
    async fn execute_single_request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<Value, RuntimeError> {
        let url = format!("{}{}", self.config.api_url(), endpoint);
        debug!(method = %method, url = %url, "Sending runtime request");

        let mut request = self
            .client
            .request(method, &url)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .header(CONTENT_TYPE, "application/json")
            .timeout(self.config.timeout);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(RuntimeError::from)?;
        let status = response.status();
        let text = response.text().await.map_err(RuntimeError::from)?;

        debug!(status = status.as_u16(), "Runtime response");

        if status.is_success() {
            if text.trim().is_empty() {
                return Ok(Value::Null);
            }
            return serde_json::from_str(&text).map_err(|e| RuntimeError::Parse(e.to_string()));
        }

        match status.as_u16() {
            401 => Err(RuntimeError::Unauthorized { body: text }),
            code => Err(RuntimeError::Rejected {
                status: code,
                body: text,
            }),
        }
    }
}

/// `/workflows/{id}{suffix}` with the id as one percent-encoded segment.
///
/// Dot segments are rejected; URL normalization would otherwise resolve them
/// to a path outside `/workflows`.
fn workflow_endpoint(workflow_id: &str, suffix: &str) -> Result<String, RuntimeError> {
    if matches!(workflow_id, "" | "." | "..") {
        return Err(RuntimeError::InvalidWorkflowId(workflow_id.to_string()));
    }
    Ok(format!(
        "/workflows/{}{}",
        urlencoding::encode(workflow_id),
        suffix
    ))
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, RuntimeError> {
    serde_json::from_value(value).map_err(|e| RuntimeError::Parse(e.to_string()))
}

fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles() {
        let base = Duration::from_millis(100);
        assert_eq!(backoff_delay(base, 1), Duration::from_millis(100));
        assert_eq!(backoff_delay(base, 2), Duration::from_millis(200));
        assert_eq!(backoff_delay(base, 3), Duration::from_millis(400));
    }

    #[test]
    fn test_list_response_shapes() {
        let page: ListResponse = serde_json::from_str(
            r#"{"data": [{"id": "1", "name": "A", "active": true}], "nextCursor": null}"#,
        )
        .unwrap();
        assert_eq!(page.into_workflows().len(), 1);

        let bare: ListResponse =
            serde_json::from_str(r#"[{"id": "1"}, {"id": "2", "name": "B"}]"#).unwrap();
        let workflows = bare.into_workflows();
        assert_eq!(workflows.len(), 2);
        assert!(!workflows[0].active);
    }

    #[test]
    fn test_summary_ignores_extra_fields() {
        let summary: WorkflowSummary = serde_json::from_str(
            r#"{"id": "wf1", "name": "Agent", "active": false, "nodes": [], "createdAt": "2024-01-01T00:00:00.000Z"}"#,
        )
        .unwrap();
        assert_eq!(summary.id, "wf1");
        assert_eq!(summary.created_at.as_deref(), Some("2024-01-01T00:00:00.000Z"));
    }
}
