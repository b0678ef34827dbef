//! n8n-agentgen: n8n AI-agent workflow generation
//!
//! Turns an abstract agent definition into an importable n8n workflow graph
//! and manages its lifecycle in an external n8n runtime.
//! - `tools`: static registry of supported tool integrations
//! - `workflow`: node factory, connection builder and document assembly
//! - `request`: structured requests and heuristic chat parsing
//! - `runtime`: REST client, registration strategies and the workflow service
//!
//! # Example
//!
//! ```rust,ignore
//! use n8n_agentgen::{parse_agent_request, WorkflowService};
//!
//! let service = WorkflowService::default();
//! let parsed = service.parse_agent_request("Create a sales agent that can update hubspot");
//! let handle = service.create_agent_workflow(parsed.into_request()).await?;
//! println!("{} -> {}", handle.workflow_id, handle.webhook_url);
//! ```

pub mod agent;
pub mod config;
pub mod error;
pub mod models;
pub mod request;
pub mod runtime;
pub mod tools;
pub mod workflow;

// Re-exports for convenience
pub use agent::{AgentDefinition, DEFAULT_AI_MODEL};
pub use config::RuntimeConfig;
pub use error::{AgentGenError, ConfigError, GenerateError, RuntimeError};
pub use models::ModelFamily;
pub use request::{
    parse_agent_request, AgentCategory, AgentRequest, Extracted, ParsedAgentRequest, Provenance,
};
pub use runtime::{
    N8nClient, RegistrationStrategy, RemoteRegistration, StaticWebhookRegistration,
    WorkflowHandle, WorkflowService, WorkflowSummary,
};
pub use tools::{ToolDescriptor, ToolKind};
pub use workflow::{
    Connection, ConnectionBuilder, ConnectionClass, ConnectionMap, NodeFactory, NodeRole,
    WorkflowDocument, WorkflowGenerator, WorkflowNode,
};
