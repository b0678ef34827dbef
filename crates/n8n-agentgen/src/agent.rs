//! Agent definitions consumed by the workflow generator.

use serde::{Deserialize, Serialize};

/// Default model identifier when an agent does not name one.
pub const DEFAULT_AI_MODEL: &str = "gpt-4o";

const DEFAULT_RESPONSE_TIME: &str = "standard";
const DEFAULT_USAGE_VOLUME: &str = "medium";
const DEFAULT_ERROR_HANDLING: &str = "graceful fallback";
const DEFAULT_AVAILABILITY: &str = "business hours";

/// Abstract automation definition: what the generated workflow should do.
///
/// Field names follow the marketplace record's camelCase JSON so records can be
/// deserialized directly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentDefinition {
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub category: String,

    /// Requested tool identifiers (e.g. "gmail", "web-search")
    #[serde(default)]
    pub tools: Vec<String>,

    #[serde(default = "default_ai_model")]
    pub ai_model: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_time: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_volume: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_handling: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability: Option<String>,
}

fn default_ai_model() -> String {
    DEFAULT_AI_MODEL.to_string()
}

impl AgentDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ai_model: default_ai_model(),
            ..Default::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_tools<I, S>(mut self, tools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tools = tools.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_ai_model(mut self, model: impl Into<String>) -> Self {
        self.ai_model = model.into();
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// The system message embedded in the agent node.
    ///
    /// An explicit, non-blank system prompt wins. Otherwise a prompt is
    /// synthesized from the name, description and tuning fields.
    pub fn effective_system_prompt(&self) -> String {
        if let Some(prompt) = self.system_prompt.as_deref() {
            if !prompt.trim().is_empty() {
                return prompt.to_string();
            }
        }

        format!(
            "You are {name}, {description}.\n\n\
             Response time: {response_time}\n\
             Usage volume: {usage_volume}\n\
             Error handling: {error_handling}\n\
             Availability: {availability}\n\n\
             Please provide helpful, accurate responses based on your capabilities and the tools available to you.",
            name = self.name,
            description = self.description,
            response_time = self.response_time.as_deref().unwrap_or(DEFAULT_RESPONSE_TIME),
            usage_volume = self.usage_volume.as_deref().unwrap_or(DEFAULT_USAGE_VOLUME),
            error_handling = self.error_handling.as_deref().unwrap_or(DEFAULT_ERROR_HANDLING),
            availability = self.availability.as_deref().unwrap_or(DEFAULT_AVAILABILITY),
        )
    }
}
