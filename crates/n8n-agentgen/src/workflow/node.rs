//! Node Types for Generated Workflows
//!
//! Defines the typed vertices of an n8n agent workflow and the roles the
//! connection builder recognises them by.
//!
//! # Node Roles
//!
//! - **Trigger**: inbound chat message trigger, exactly one per workflow
//! - **Agent**: the central LangChain agent every other node wires into
//! - **LanguageModel**: chat model node (`lmChat*`)
//! - **Memory**: buffer-window conversation memory
//! - **OutputParser**: structured output parser
//! - **Tool**: one node per recognised integration
//! - **Other**: anything else, never connected

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::tools::CredentialRef;

pub const CHAT_TRIGGER_TYPE: &str = "@n8n/n8n-nodes-langchain.chatTrigger";
pub const AGENT_TYPE: &str = "@n8n/n8n-nodes-langchain.agent";
pub const MEMORY_TYPE: &str = "@n8n/n8n-nodes-langchain.memoryBufferWindow";
pub const OUTPUT_PARSER_TYPE: &str = "@n8n/n8n-nodes-langchain.outputParserStructured";

/// Marker contained in every chat model node type.
pub const LANGUAGE_MODEL_MARKER: &str = "lmChat";

/// Stable node identifier.
pub type NodeId = Uuid;

/// Canvas position, serialized as `[x, y]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position(pub i32, pub i32);

impl Position {
    pub fn x(&self) -> i32 {
        self.0
    }

    pub fn y(&self) -> i32 {
        self.1
    }
}

/// One typed vertex of a workflow graph.
///
/// Field order and names match the n8n workflow import format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowNode {
    #[serde(default)]
    pub parameters: Map<String, Value>,

    #[serde(rename = "type")]
    pub node_type: String,

    pub type_version: f64,

    pub position: Position,

    pub id: NodeId,

    /// Display name; doubles as the connection endpoint key
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<BTreeMap<String, CredentialRef>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_id: Option<Uuid>,
}

impl WorkflowNode {
    /// Create a node with a fresh identifier and no credentials.
    pub fn new(
        name: impl Into<String>,
        node_type: impl Into<String>,
        type_version: f64,
        position: Position,
        parameters: Map<String, Value>,
    ) -> Self {
        Self {
            parameters,
            node_type: node_type.into(),
            type_version,
            position,
            id: Uuid::new_v4(),
            name: name.into(),
            credentials: None,
            webhook_id: None,
        }
    }

    pub fn with_credentials(mut self, credentials: BTreeMap<String, CredentialRef>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Assign a fresh webhook identifier.
    pub fn with_webhook(mut self) -> Self {
        self.webhook_id = Some(Uuid::new_v4());
        self
    }

    pub fn role(&self) -> NodeRole {
        NodeRole::classify(&self.node_type)
    }
}

/// Structural role of a node, derived from its type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRole {
    Trigger,
    Agent,
    LanguageModel,
    Memory,
    OutputParser,
    Tool,
    Other,
}

impl NodeRole {
    /// Classify an n8n node type.
    ///
    /// Exact matches come first; the marker checks only run for types that are
    /// none of the fixed agent-infrastructure nodes.
    pub fn classify(node_type: &str) -> Self {
        match node_type {
            AGENT_TYPE => NodeRole::Agent,
            CHAT_TRIGGER_TYPE => NodeRole::Trigger,
            MEMORY_TYPE => NodeRole::Memory,
            OUTPUT_PARSER_TYPE => NodeRole::OutputParser,
            t if t.contains(LANGUAGE_MODEL_MARKER) => NodeRole::LanguageModel,
            t if t.contains("Tool")
                || t.contains("tool")
                || t.contains("gmail")
                || t.contains("HttpRequest") =>
            {
                NodeRole::Tool
            }
            _ => NodeRole::Other,
        }
    }
}
