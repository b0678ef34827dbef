//! Workflow service: the entry point tying parsing, generation and the runtime together.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use super::client::{N8nClient, WorkflowSummary};
use super::registration::{
    RegistrationStrategy, RemoteRegistration, StaticWebhookRegistration, WorkflowHandle,
};
use crate::config::RuntimeConfig;
use crate::error::{AgentGenError, ConfigError};
use crate::request::{parse_agent_request, AgentRequest, ParsedAgentRequest};
use crate::workflow::{WorkflowDocument, WorkflowGenerator};

/// Agent workflow lifecycle.
///
/// Generation is local and synchronous. Lifecycle calls (status, delete,
/// list) need a runtime client; without one they fail with a configuration
/// error before any request is attempted.
pub struct WorkflowService {
    generator: WorkflowGenerator,
    registration: Arc<dyn RegistrationStrategy>,
    client: Option<N8nClient>,
}

impl WorkflowService {
    pub fn new(registration: Arc<dyn RegistrationStrategy>) -> Self {
        Self {
            generator: WorkflowGenerator::new(),
            registration,
            client: None,
        }
    }

    /// Service backed by a configured runtime.
    ///
    /// `remote` selects [`RemoteRegistration`]; otherwise agents share the
    /// static webhook.
    pub fn from_config(config: RuntimeConfig, remote: bool) -> Result<Self, ConfigError> {
        config.validate()?;
        let client = N8nClient::new(config);

        let registration: Arc<dyn RegistrationStrategy> = if remote {
            Arc::new(RemoteRegistration::new(client.clone()))
        } else {
            Arc::new(StaticWebhookRegistration::new(
                client.config().shared_webhook_url(),
            ))
        };

        Ok(Self::new(registration).with_client(client))
    }

    pub fn with_client(mut self, client: N8nClient) -> Self {
        self.client = Some(client);
        self
    }

    pub fn with_generator(mut self, generator: WorkflowGenerator) -> Self {
        self.generator = generator;
        self
    }

    pub fn registration(&self) -> &dyn RegistrationStrategy {
        self.registration.as_ref()
    }

    pub fn parse_agent_request(&self, message: &str) -> ParsedAgentRequest {
        parse_agent_request(message)
    }

    /// Build the workflow document for a request without registering it.
    pub fn generate(&self, request: AgentRequest) -> Result<WorkflowDocument, AgentGenError> {
        let definition = request.into_definition();
        Ok(self.generator.generate(&definition)?)
    }

    /// Build the workflow and hand it to the registration strategy.
    pub async fn create_agent_workflow(
        &self,
        request: AgentRequest,
    ) -> Result<WorkflowHandle, AgentGenError> {
        let document = self.generate(request)?;
        debug!(
            workflow = %document.name,
            strategy = self.registration.name(),
            "Registering workflow"
        );

        let handle = self.registration.register(&document).await?;
        info!(workflow_id = %handle.workflow_id, "Agent workflow created");
        Ok(handle)
    }

    /// The runtime's full workflow record, nodes and connections included.
    pub async fn get_workflow_status(&self, workflow_id: &str) -> Result<Value, AgentGenError> {
        Ok(self.client()?.get_workflow(workflow_id).await?)
    }

    /// Deactivate then delete. No rollback on partial failure.
    pub async fn delete_workflow(&self, workflow_id: &str) -> Result<Value, AgentGenError> {
        let deleted = self.client()?.delete_workflow(workflow_id).await?;
        info!(workflow_id, "Workflow deleted");
        Ok(deleted)
    }

    pub async fn list_workflows(&self) -> Result<Vec<WorkflowSummary>, AgentGenError> {
        Ok(self.client()?.list_workflows().await?)
    }

    fn client(&self) -> Result<&N8nClient, ConfigError> {
        self.client
            .as_ref()
            .ok_or(ConfigError::RuntimeNotConfigured)
    }
}

impl Default for WorkflowService {
    /// Static registration against the local default runtime webhook.
    fn default() -> Self {
        Self::new(Arc::new(StaticWebhookRegistration::new(
            RuntimeConfig::new(DEFAULT_LOCAL_RUNTIME, "", "").shared_webhook_url(),
        )))
    }
}

/// Default base URL of a locally running n8n instance.
pub const DEFAULT_LOCAL_RUNTIME: &str = "http://localhost:5678";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GenerateError;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> AgentRequest {
        AgentRequest {
            name: "Ticket Agent".to_string(),
            description: "answers support tickets".to_string(),
            category: "customer-support".to_string(),
            tools: vec!["gmail".to_string(), "slack".to_string()],
            ai_model: "gpt-4o".to_string(),
            prompt: None,
        }
    }

    #[tokio::test]
    async fn test_create_with_static_registration() {
        let service = WorkflowService::default();
        let handle = service.create_agent_workflow(request()).await.unwrap();

        assert!(handle.workflow_id.starts_with("agent-wf-"));
        assert_eq!(handle.webhook_url, "http://localhost:5678/webhook/agent-chat");
    }

    #[test]
    fn test_generate_uses_default_system_prompt() {
        let doc = WorkflowService::default().generate(request()).unwrap();
        let agent = doc.agent().unwrap();

        assert_eq!(
            agent.parameters["options"]["systemMessage"],
            "You are Ticket Agent. answers support tickets"
        );
    }

    #[tokio::test]
    async fn test_create_surfaces_name_collision() {
        let mut req = request();
        req.name = "Gmail".to_string();

        let err = WorkflowService::default()
            .create_agent_workflow(req)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AgentGenError::Generate(GenerateError::DuplicateNodeName { .. })
        ));
    }

    #[tokio::test]
    async fn test_lifecycle_without_client_fails_fast() {
        let service = WorkflowService::default();
        let err = service.list_workflows().await.unwrap_err();
        assert!(matches!(
            err,
            AgentGenError::Config(ConfigError::RuntimeNotConfigured)
        ));
        assert!(err.to_string().contains("No runtime client configured"));

        let err = service.get_workflow_status("wf1").await.unwrap_err();
        assert!(matches!(
            err,
            AgentGenError::Config(ConfigError::RuntimeNotConfigured)
        ));
    }

    #[test]
    fn test_from_config_rejects_invalid() {
        let config = RuntimeConfig::new("localhost", "u", "p");
        assert!(WorkflowService::from_config(config, false).is_err());
    }

    #[test]
    fn test_from_config_selects_strategy() {
        let config = RuntimeConfig::new("http://localhost:5678", "u", "p");
        let service = WorkflowService::from_config(config.clone(), false).unwrap();
        assert_eq!(service.registration().name(), "static");

        let service = WorkflowService::from_config(config, true).unwrap();
        assert_eq!(service.registration().name(), "remote");
    }

    #[test]
    fn test_parse_then_generate() {
        let service = WorkflowService::default();
        let parsed =
            service.parse_agent_request("Create a helpdesk agent that can answer customer support emails");
        let doc = service.generate(parsed.into_request()).unwrap();

        assert_eq!(doc.name, "Helpdesk Agent Workflow");
        assert!(doc.tool_count() > 0);
    }

    #[tokio::test]
    async fn test_status_and_delete_through_client() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/workflows/wf1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "wf1", "name": "Ticket Agent Workflow", "active": true
            })))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/api/v1/workflows/wf1/deactivate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "wf1", "active": false
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("DELETE"))
            .and(path("/api/v1/workflows/wf1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let config = RuntimeConfig::new(server.uri(), "admin", "secret")
            .with_timeout(Duration::from_secs(5));
        let service = WorkflowService::from_config(config, false).unwrap();

        let status = service.get_workflow_status("wf1").await.unwrap();
        assert_eq!(status["active"], true);

        let deleted = service.delete_workflow("wf1").await.unwrap();
        assert!(deleted.is_null());
    }
}
