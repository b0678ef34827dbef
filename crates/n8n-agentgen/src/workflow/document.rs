//! Workflow document: the aggregate handed to the workflow runtime.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::connections::{ConnectionClass, ConnectionMap};
use super::node::{NodeRole, WorkflowNode};

/// Document metadata expected by the n8n importer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowMeta {
    pub template_creds_setup_completed: bool,
    pub instance_id: Uuid,
}

/// A complete, importable n8n workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowDocument {
    pub name: String,
    pub nodes: Vec<WorkflowNode>,
    pub connections: ConnectionMap,
    #[serde(default)]
    pub pin_data: Map<String, Value>,
    pub meta: WorkflowMeta,
}

impl WorkflowDocument {
    pub fn node(&self, name: &str) -> Option<&WorkflowNode> {
        self.nodes.iter().find(|n| n.name == name)
    }

    pub fn nodes_with_role(&self, role: NodeRole) -> impl Iterator<Item = &WorkflowNode> {
        self.nodes.iter().filter(move |n| n.role() == role)
    }

    /// The agent node, when there is exactly one.
    pub fn agent(&self) -> Option<&WorkflowNode> {
        let mut agents = self.nodes_with_role(NodeRole::Agent);
        match (agents.next(), agents.next()) {
            (Some(agent), None) => Some(agent),
            _ => None,
        }
    }

    pub fn trigger(&self) -> Option<&WorkflowNode> {
        self.nodes_with_role(NodeRole::Trigger).next()
    }

    pub fn tool_count(&self) -> usize {
        self.nodes_with_role(NodeRole::Tool).count()
    }

    pub fn tool_connection_count(&self) -> usize {
        self.connections.count_of(ConnectionClass::Tool)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
