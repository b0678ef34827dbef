//! Connection builder for agent workflows.
//!
//! Edges are derived from node roles, not from caller intent: every node wires
//! into the single agent node, so the graph is a star centred on the agent.
//!
//! ```text
//!   trigger ──main──────────────┐
//!   model ───ai_languageModel───┤
//!   memory ──ai_memory──────────┼──▶ agent
//!   parser ──ai_outputParser────┤
//!   tool_n ──ai_tool────────────┘
//! ```
//!
//! Internally edges address nodes by id. Name-based addressing, which the n8n
//! import format requires, only appears in [`ConnectionMap`].

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::node::{NodeId, NodeRole, WorkflowNode};
use crate::error::GenerateError;

/// Typed edge category. The serialized strings are part of the n8n format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConnectionClass {
    #[serde(rename = "main")]
    Main,
    #[serde(rename = "ai_languageModel")]
    LanguageModel,
    #[serde(rename = "ai_memory")]
    Memory,
    #[serde(rename = "ai_outputParser")]
    OutputParser,
    #[serde(rename = "ai_tool")]
    Tool,
}

impl ConnectionClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionClass::Main => "main",
            ConnectionClass::LanguageModel => "ai_languageModel",
            ConnectionClass::Memory => "ai_memory",
            ConnectionClass::OutputParser => "ai_outputParser",
            ConnectionClass::Tool => "ai_tool",
        }
    }
}

/// Directed, typed edge between two nodes of the same workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Connection {
    pub source: NodeId,
    pub target: NodeId,
    pub class: ConnectionClass,
    pub source_index: usize,
    pub target_index: usize,
}

impl Connection {
    /// Single-port edge (index 0 on both ends).
    pub fn new(source: NodeId, target: NodeId, class: ConnectionClass) -> Self {
        Self {
            source,
            target,
            class,
            source_index: 0,
            target_index: 0,
        }
    }
}

/// Derives the edge set of an agent workflow from its nodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConnectionBuilder;

impl ConnectionBuilder {
    /// Emit trigger, model, memory, parser, then tool edges into the agent.
    ///
    /// Without exactly one agent node no edges are produced.
    pub fn build(nodes: &[WorkflowNode]) -> Vec<Connection> {
        let mut agents = nodes.iter().filter(|n| n.role() == NodeRole::Agent);
        let agent = match (agents.next(), agents.next()) {
            (Some(agent), None) => agent,
            (None, _) => {
                debug!("No agent node, workflow has no connections");
                return Vec::new();
            }
            (Some(_), Some(_)) => {
                debug!("Multiple agent nodes, workflow has no connections");
                return Vec::new();
            }
        };

        let first = |role: NodeRole| nodes.iter().find(|n| n.role() == role);

        let mut connections = Vec::new();
        let singles = [
            (NodeRole::Trigger, ConnectionClass::Main),
            (NodeRole::LanguageModel, ConnectionClass::LanguageModel),
            (NodeRole::Memory, ConnectionClass::Memory),
            (NodeRole::OutputParser, ConnectionClass::OutputParser),
        ];
        for (role, class) in singles {
            if let Some(node) = first(role) {
                connections.push(Connection::new(node.id, agent.id, class));
            }
        }

        connections.extend(
            nodes
                .iter()
                .filter(|n| n.role() == NodeRole::Tool)
                .map(|tool| Connection::new(tool.id, agent.id, ConnectionClass::Tool)),
        );

        connections
    }
}

/// One endpoint entry of the n8n connection map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionTarget {
    pub node: String,
    #[serde(rename = "type")]
    pub class: ConnectionClass,
    pub index: usize,
}

/// n8n connection map: source name → class → output port → targets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionMap(BTreeMap<String, BTreeMap<ConnectionClass, Vec<Vec<ConnectionTarget>>>>);

impl ConnectionMap {
    /// Materialize id-based edges into the name-addressed map.
    ///
    /// Fails on duplicate node names, which would make name addressing
    /// ambiguous, and on edges whose endpoints are not in `nodes`.
    pub fn from_connections(
        nodes: &[WorkflowNode],
        connections: &[Connection],
    ) -> Result<Self, GenerateError> {
        ensure_unique_names(nodes)?;

        let names: HashMap<NodeId, &str> = nodes.iter().map(|n| (n.id, n.name.as_str())).collect();
        let name_of = |id: &NodeId| {
            names
                .get(id)
                .copied()
                .ok_or_else(|| GenerateError::DanglingConnection(id.to_string()))
        };

        let mut map = Self::default();
        for connection in connections {
            let source = name_of(&connection.source)?;
            let target = name_of(&connection.target)?;

            let ports = map
                .0
                .entry(source.to_string())
                .or_default()
                .entry(connection.class)
                .or_default();
            if ports.len() <= connection.source_index {
                ports.resize_with(connection.source_index + 1, Vec::new);
            }
            ports[connection.source_index].push(ConnectionTarget {
                node: target.to_string(),
                class: connection.class,
                index: connection.target_index,
            });
        }

        Ok(map)
    }

    /// Targets reachable from `source` over `class`, across all output ports.
    pub fn targets(&self, source: &str, class: ConnectionClass) -> Vec<&ConnectionTarget> {
        self.0
            .get(source)
            .and_then(|classes| classes.get(&class))
            .map(|ports| ports.iter().flatten().collect())
            .unwrap_or_default()
    }

    /// Every edge as `(source name, target)`.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &ConnectionTarget)> {
        self.0.iter().flat_map(|(source, classes)| {
            classes
                .values()
                .flatten()
                .flatten()
                .map(move |target| (source.as_str(), target))
        })
    }

    /// Total number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges().count()
    }

    pub fn count_of(&self, class: ConnectionClass) -> usize {
        self.edges().filter(|(_, t)| t.class == class).count()
    }

    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Reject node lists where two nodes share a display name.
pub fn ensure_unique_names(nodes: &[WorkflowNode]) -> Result<(), GenerateError> {
    let mut seen = HashSet::with_capacity(nodes.len());
    for node in nodes {
        if !seen.insert(node.name.as_str()) {
            return Err(GenerateError::DuplicateNodeName {
                name: node.name.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentDefinition;
    use crate::workflow::factory::NodeFactory;

    fn nodes_for(tools: &[&str]) -> Vec<WorkflowNode> {
        let agent = AgentDefinition::new("Helper", "helps").with_tools(tools.iter().copied());
        NodeFactory::new().build_nodes(&agent)
    }

    #[test]
    fn test_star_topology() {
        let nodes = nodes_for(&["gmail", "slack"]);
        let agent_id = nodes[1].id;
        let connections = ConnectionBuilder::build(&nodes);

        assert_eq!(connections.len(), 6);
        assert!(connections.iter().all(|c| c.target == agent_id));
        assert!(connections
            .iter()
            .all(|c| c.source_index == 0 && c.target_index == 0));
    }

    #[test]
    fn test_fixed_emission_order() {
        let nodes = nodes_for(&["slack", "gmail"]);
        let classes: Vec<ConnectionClass> = ConnectionBuilder::build(&nodes)
            .iter()
            .map(|c| c.class)
            .collect();

        assert_eq!(
            classes,
            vec![
                ConnectionClass::Main,
                ConnectionClass::LanguageModel,
                ConnectionClass::Memory,
                ConnectionClass::OutputParser,
                ConnectionClass::Tool,
                ConnectionClass::Tool,
            ]
        );

        let tool_sources: Vec<NodeId> = ConnectionBuilder::build(&nodes)
            .iter()
            .filter(|c| c.class == ConnectionClass::Tool)
            .map(|c| c.source)
            .collect();
        assert_eq!(tool_sources, vec![nodes[5].id, nodes[6].id]);
    }

    #[test]
    fn test_no_tools_no_tool_edges() {
        let connections = ConnectionBuilder::build(&nodes_for(&[]));
        assert_eq!(connections.len(), 4);
        assert!(connections.iter().all(|c| c.class != ConnectionClass::Tool));
    }

    #[test]
    fn test_no_agent_no_edges() {
        let mut nodes = nodes_for(&["gmail"]);
        nodes.retain(|n| n.role() != NodeRole::Agent);
        assert!(ConnectionBuilder::build(&nodes).is_empty());
        assert!(ConnectionBuilder::build(&[]).is_empty());
    }

    #[test]
    fn test_two_agents_no_edges() {
        let mut nodes = nodes_for(&[]);
        let agent = AgentDefinition::new("Second", "another");
        nodes.push(NodeFactory::new().make_agent_node(&agent));
        assert!(ConnectionBuilder::build(&nodes).is_empty());
    }

    #[test]
    fn test_connection_map_shape() {
        let nodes = nodes_for(&["gmail"]);
        let connections = ConnectionBuilder::build(&nodes);
        let map = ConnectionMap::from_connections(&nodes, &connections).unwrap();

        let json = serde_json::to_value(&map).unwrap();
        assert_eq!(
            json["When chat message received"]["main"],
            serde_json::json!([[{ "node": "Helper", "type": "main", "index": 0 }]])
        );
        assert_eq!(
            json["Gmail"]["ai_tool"][0][0]["type"],
            serde_json::json!("ai_tool")
        );
        assert_eq!(map.edge_count(), 5);
        assert_eq!(map.count_of(ConnectionClass::Tool), 1);
        assert_eq!(map.targets("Language Model", ConnectionClass::LanguageModel)[0].node, "Helper");
    }

    #[test]
    fn test_duplicate_names_rejected() {
        // agent named like a tool node
        let agent = AgentDefinition::new("Gmail", "mail bot").with_tools(["gmail"]);
        let nodes = NodeFactory::new().build_nodes(&agent);
        let connections = ConnectionBuilder::build(&nodes);

        assert_eq!(
            ConnectionMap::from_connections(&nodes, &connections),
            Err(GenerateError::DuplicateNodeName {
                name: "Gmail".to_string()
            })
        );
    }

    #[test]
    fn test_dangling_connection_rejected() {
        let nodes = nodes_for(&[]);
        let stray = Connection::new(uuid::Uuid::new_v4(), nodes[1].id, ConnectionClass::Tool);

        assert!(matches!(
            ConnectionMap::from_connections(&nodes, &[stray]),
            Err(GenerateError::DanglingConnection(_))
        ));
    }

    #[test]
    fn test_connection_map_round_trip() {
        let nodes = nodes_for(&["web-search"]);
        let map =
            ConnectionMap::from_connections(&nodes, &ConnectionBuilder::build(&nodes)).unwrap();

        let json = serde_json::to_string(&map).unwrap();
        let parsed: ConnectionMap = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, map);
    }

    #[test]
    fn test_class_strings() {
        for class in [
            ConnectionClass::Main,
            ConnectionClass::LanguageModel,
            ConnectionClass::Memory,
            ConnectionClass::OutputParser,
            ConnectionClass::Tool,
        ] {
            let json = serde_json::to_string(&class).unwrap();
            assert_eq!(json, format!("\"{}\"", class.as_str()));
        }
    }
}
