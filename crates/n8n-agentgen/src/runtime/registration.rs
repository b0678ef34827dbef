//! Registration strategies: how a generated workflow becomes reachable.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use super::client::N8nClient;
use crate::error::RuntimeError;
use crate::workflow::WorkflowDocument;

/// Opaque handle returned to callers after registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowHandle {
    pub workflow_id: String,
    pub webhook_url: String,
}

/// Makes a workflow document available in the runtime.
#[async_trait]
pub trait RegistrationStrategy: Send + Sync {
    async fn register(&self, document: &WorkflowDocument) -> Result<WorkflowHandle, RuntimeError>;

    fn name(&self) -> &'static str;
}

/// Never contacts the runtime. Every agent shares one webhook and gets a
/// synthesized id of the form `agent-wf-<uuid>`.
#[derive(Debug, Clone)]
pub struct StaticWebhookRegistration {
    webhook_url: String,
}

impl StaticWebhookRegistration {
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self {
            webhook_url: webhook_url.into(),
        }
    }

    pub fn webhook_url(&self) -> &str {
        &self.webhook_url
    }
}

#[async_trait]
impl RegistrationStrategy for StaticWebhookRegistration {
    async fn register(&self, document: &WorkflowDocument) -> Result<WorkflowHandle, RuntimeError> {
        let workflow_id = format!("agent-wf-{}", Uuid::new_v4().simple());
        info!(workflow = %document.name, workflow_id = %workflow_id, "Registered workflow (static webhook)");

        Ok(WorkflowHandle {
            workflow_id,
            webhook_url: self.webhook_url.clone(),
        })
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

/// Creates the workflow through the runtime API and activates it.
///
/// No rollback: if activation fails the created workflow stays in place,
/// inactive.
#[derive(Debug, Clone)]
pub struct RemoteRegistration {
    client: N8nClient,
}

impl RemoteRegistration {
    pub fn new(client: N8nClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RegistrationStrategy for RemoteRegistration {
    async fn register(&self, document: &WorkflowDocument) -> Result<WorkflowHandle, RuntimeError> {
        let webhook_id = document
            .trigger()
            .and_then(|trigger| trigger.webhook_id)
            .ok_or_else(|| RuntimeError::Unknown("workflow has no chat trigger webhook".to_string()))?;

        let created = self.client.create_workflow(document).await?;

        if let Err(e) = self.client.activate_workflow(&created.id).await {
            warn!(workflow_id = %created.id, error = %e, "Created workflow could not be activated");
            return Err(e);
        }

        info!(workflow = %document.name, workflow_id = %created.id, "Registered workflow (remote)");

        Ok(WorkflowHandle {
            webhook_url: format!("{}/webhook/{}", self.client.config().base_url, webhook_id),
            workflow_id: created.id,
        })
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentDefinition;
    use crate::config::RuntimeConfig;
    use crate::workflow::WorkflowGenerator;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn document() -> WorkflowDocument {
        let agent = AgentDefinition::new("Notes Agent", "keeps notes").with_tools(["notion"]);
        WorkflowGenerator::new().generate(&agent).unwrap()
    }

    #[test]
    fn test_static_registration() {
        let strategy = StaticWebhookRegistration::new("https://hooks.example.com/agent-chat");
        let doc = document();

        let first = tokio_test::block_on(strategy.register(&doc)).unwrap();
        let second = tokio_test::block_on(strategy.register(&doc)).unwrap();

        assert!(first.workflow_id.starts_with("agent-wf-"));
        assert_eq!(first.workflow_id.len(), "agent-wf-".len() + 32);
        assert_ne!(first.workflow_id, second.workflow_id);
        assert_eq!(first.webhook_url, "https://hooks.example.com/agent-chat");
        assert_eq!(first.webhook_url, second.webhook_url);
    }

    #[test]
    fn test_handle_serialization() {
        let handle = WorkflowHandle {
            workflow_id: "agent-wf-1".to_string(),
            webhook_url: "https://x/webhook/y".to_string(),
        };
        let json = serde_json::to_value(&handle).unwrap();
        assert_eq!(json["workflowId"], "agent-wf-1");
        assert_eq!(json["webhookUrl"], "https://x/webhook/y");
    }

    fn remote_for(server: &MockServer) -> RemoteRegistration {
        RemoteRegistration::new(N8nClient::new(
            RuntimeConfig::new(server.uri(), "admin", "secret")
                .with_timeout(Duration::from_secs(5))
                .with_max_retries(0),
        ))
    }

    #[tokio::test]
    async fn test_remote_registration_creates_and_activates() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/workflows"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "wf-42", "name": "Notes Agent Workflow", "active": false
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/api/v1/workflows/wf-42/activate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "wf-42", "active": true
            })))
            .expect(1)
            .mount(&server)
            .await;

        let doc = document();
        let webhook_id = doc.trigger().unwrap().webhook_id.unwrap();
        let handle = remote_for(&server).register(&doc).await.unwrap();

        assert_eq!(handle.workflow_id, "wf-42");
        assert_eq!(
            handle.webhook_url,
            format!("{}/webhook/{}", server.uri(), webhook_id)
        );
    }

    #[tokio::test]
    async fn test_remote_registration_surfaces_activation_failure() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/workflows"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "wf-43"
            })))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/api/v1/workflows/wf-43/activate"))
            .respond_with(ResponseTemplate::new(400).set_body_string("missing credentials"))
            .mount(&server)
            .await;

        let err = remote_for(&server).register(&document()).await.unwrap_err();
        assert_eq!(err.status(), Some(400));
    }

    #[tokio::test]
    async fn test_remote_registration_create_is_not_retried() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/workflows"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let strategy = RemoteRegistration::new(N8nClient::new(
            RuntimeConfig::new(server.uri(), "admin", "secret")
                .with_max_retries(3)
                .with_retry_base_delay(Duration::from_millis(1)),
        ));
        assert!(strategy.register(&document()).await.is_err());
    }
}
