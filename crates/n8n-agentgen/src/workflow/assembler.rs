//! Workflow assembly and the end-to-end generator.

use serde_json::Map;
use tracing::debug;
use uuid::Uuid;

use super::connections::{Connection, ConnectionBuilder, ConnectionMap};
use super::document::{WorkflowDocument, WorkflowMeta};
use super::factory::NodeFactory;
use super::layout::{CanvasLayout, LayoutStrategy};
use super::node::WorkflowNode;
use crate::agent::AgentDefinition;
use crate::error::GenerateError;

/// Compose nodes and edges into a workflow document.
///
/// `pinData` is always empty and credential setup is reported as complete;
/// credentials are bound inside the runtime. Each document gets a fresh
/// instance id.
pub fn assemble(
    name: impl Into<String>,
    nodes: Vec<WorkflowNode>,
    connections: &[Connection],
) -> Result<WorkflowDocument, GenerateError> {
    let connections = ConnectionMap::from_connections(&nodes, connections)?;

    Ok(WorkflowDocument {
        name: name.into(),
        nodes,
        connections,
        pin_data: Map::new(),
        meta: WorkflowMeta {
            template_creds_setup_completed: true,
            instance_id: Uuid::new_v4(),
        },
    })
}

/// Generates complete agent workflows: factory, connection builder, assembler.
#[derive(Debug, Clone, Default)]
pub struct WorkflowGenerator<L: LayoutStrategy = CanvasLayout> {
    factory: NodeFactory<L>,
}

impl WorkflowGenerator<CanvasLayout> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<L: LayoutStrategy> WorkflowGenerator<L> {
    pub fn with_layout(layout: L) -> Self {
        Self {
            factory: NodeFactory::with_layout(layout),
        }
    }

    pub fn factory(&self) -> &NodeFactory<L> {
        &self.factory
    }

    /// Build the workflow for `agent`.
    ///
    /// Only fails when a node name collides with another, e.g. an agent named
    /// after one of its tools.
    pub fn generate(&self, agent: &AgentDefinition) -> Result<WorkflowDocument, GenerateError> {
        let nodes = self.factory.build_nodes(agent);
        let connections = ConnectionBuilder::build(&nodes);

        debug!(
            agent = %agent.name,
            nodes = nodes.len(),
            connections = connections.len(),
            "Assembling workflow"
        );

        assemble(format!("{} Workflow", agent.name), nodes, &connections)
    }
}
