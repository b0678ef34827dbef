//! Node factory: turns an agent definition into workflow nodes.
//!
//! Nothing here fails. Unknown tools are skipped and unknown models fall back
//! to the default family, so generation always yields a usable node list.

use std::collections::{BTreeMap, HashSet};

use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use super::layout::{CanvasLayout, LayoutSlot, LayoutStrategy};
use super::node::{
    WorkflowNode, AGENT_TYPE, CHAT_TRIGGER_TYPE, MEMORY_TYPE, OUTPUT_PARSER_TYPE,
};
use crate::agent::AgentDefinition;
use crate::models::ModelFamily;
use crate::tools::{self, CredentialRef, ToolKind};

pub const TRIGGER_NODE_NAME: &str = "When chat message received";
pub const LANGUAGE_MODEL_NODE_NAME: &str = "Language Model";
pub const MEMORY_NODE_NAME: &str = "Simple Memory";
pub const OUTPUT_PARSER_NODE_NAME: &str = "Structured Output Parser";

/// Builds individual workflow nodes, positioned by a [`LayoutStrategy`].
#[derive(Debug, Clone, Default)]
pub struct NodeFactory<L: LayoutStrategy = CanvasLayout> {
    layout: L,
}

impl NodeFactory<CanvasLayout> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<L: LayoutStrategy> NodeFactory<L> {
    pub fn with_layout(layout: L) -> Self {
        Self { layout }
    }

    /// Inbound chat trigger with a fresh webhook identifier.
    pub fn make_trigger_node(&self) -> WorkflowNode {
        WorkflowNode::new(
            TRIGGER_NODE_NAME,
            CHAT_TRIGGER_TYPE,
            1.1,
            self.layout.position(LayoutSlot::Trigger),
            empty_options(),
        )
        .with_webhook()
    }

    /// Chat model node for `model_id`, or the default family when unknown.
    pub fn make_language_model_node(&self, model_id: &str) -> WorkflowNode {
        let family = ModelFamily::parse(model_id).unwrap_or_else(|| {
            let fallback = ModelFamily::default();
            warn!(
                model = %model_id,
                fallback = fallback.as_str(),
                "Unknown AI model, using default family"
            );
            fallback
        });

        let mut parameters = Map::new();
        parameters.insert(
            "model".into(),
            json!({
                "__rl": true,
                "value": family.model_name(),
                "mode": "list"
            }),
        );
        parameters.insert("options".into(), Value::Object(Map::new()));

        let credentials = BTreeMap::from([(
            family.credential_class().to_string(),
            CredentialRef::new("auth-id", "Auth Account"),
        )]);

        WorkflowNode::new(
            LANGUAGE_MODEL_NODE_NAME,
            family.node_type(),
            1.2,
            self.layout.position(LayoutSlot::LanguageModel),
            parameters,
        )
        .with_credentials(credentials)
    }

    pub fn make_memory_node(&self) -> WorkflowNode {
        WorkflowNode::new(
            MEMORY_NODE_NAME,
            MEMORY_TYPE,
            1.3,
            self.layout.position(LayoutSlot::Memory),
            Map::new(),
        )
    }

    /// Structured output parser. The schema is the same for every agent.
    pub fn make_output_parser_node(&self) -> WorkflowNode {
        let mut parameters = Map::new();
        parameters.insert("schemaType".into(), json!("manual"));
        parameters.insert(
            "inputSchema".into(),
            Value::String(output_schema().to_string()),
        );

        WorkflowNode::new(
            OUTPUT_PARSER_NODE_NAME,
            OUTPUT_PARSER_TYPE,
            1.2,
            self.layout.position(LayoutSlot::OutputParser),
            parameters,
        )
    }

    /// Central agent node, named after the agent.
    pub fn make_agent_node(&self, agent: &AgentDefinition) -> WorkflowNode {
        let mut parameters = Map::new();
        parameters.insert("promptType".into(), json!("define"));
        parameters.insert("text".into(), json!("{{ $json.chatInput }}"));
        parameters.insert("hasOutputParser".into(), json!(true));
        parameters.insert(
            "options".into(),
            json!({ "systemMessage": agent.effective_system_prompt() }),
        );

        WorkflowNode::new(
            agent.name.clone(),
            AGENT_TYPE,
            2.0,
            self.layout.position(LayoutSlot::Agent),
            parameters,
        )
    }

    /// One node per recognised tool, in request order.
    ///
    /// Unknown identifiers are skipped, and so are repeats of a tool already
    /// emitted.
    pub fn make_tool_nodes<S: AsRef<str>>(&self, tool_ids: &[S]) -> Vec<WorkflowNode> {
        let mut seen: HashSet<ToolKind> = HashSet::new();
        let mut nodes = Vec::new();

        for tool_id in tool_ids {
            let tool_id = tool_id.as_ref();
            let Some(descriptor) = tools::lookup(tool_id) else {
                debug!(tool = %tool_id, "Skipping unsupported tool");
                continue;
            };
            if !seen.insert(descriptor.kind) {
                debug!(tool = %tool_id, "Skipping repeated tool");
                continue;
            }

            let mut node = WorkflowNode::new(
                capitalize(tool_id.trim()),
                descriptor.node_type,
                descriptor.type_version,
                self.layout.position(LayoutSlot::Tool(nodes.len())),
                descriptor.default_parameters.clone(),
            );
            if let Some(credential) = &descriptor.credential {
                node = node.with_credentials(credential.to_node_credentials());
            }
            if descriptor.is_http_request() {
                node = node.with_webhook();
            }
            nodes.push(node);
        }

        nodes
    }

    /// Full node list for an agent: trigger, agent, model, memory, parser, tools.
    pub fn build_nodes(&self, agent: &AgentDefinition) -> Vec<WorkflowNode> {
        let mut nodes = vec![
            self.make_trigger_node(),
            self.make_agent_node(agent),
            self.make_language_model_node(&agent.ai_model),
            self.make_memory_node(),
            self.make_output_parser_node(),
        ];
        nodes.extend(self.make_tool_nodes(&agent.tools));
        nodes
    }
}

fn empty_options() -> Map<String, Value> {
    let mut params = Map::new();
    params.insert("options".into(), Value::Object(Map::new()));
    params
}

fn output_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "response": {
                "type": "string",
                "description": "The agent's response to the user"
            },
            "actions": {
                "type": "array",
                "items": { "type": "string" },
                "description": "List of actions taken by the agent"
            }
        },
        "required": ["response"]
    })
}

/// Upper-case the first character, leaving the rest untouched.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
