//! Agent-creation requests and heuristic parsing of free-form chat text.
//!
//! Parsing never fails: every field has a default. Each extracted field
//! records whether it was matched in the text or defaulted, so callers can
//! tell a confident parse from a guess.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::agent::{AgentDefinition, DEFAULT_AI_MODEL};
use crate::models::ModelFamily;

/// Structured agent-creation request accepted by the workflow service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default = "default_ai_model")]
    pub ai_model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

fn default_ai_model() -> String {
    DEFAULT_AI_MODEL.to_string()
}

impl AgentRequest {
    /// Convert into the generator's agent definition. Without an explicit
    /// prompt the system prompt is `"You are {name}. {description}"`.
    pub fn into_definition(self) -> AgentDefinition {
        let system_prompt = match self.prompt {
            Some(prompt) if !prompt.trim().is_empty() => prompt,
            _ => format!("You are {}. {}", self.name, self.description),
        };

        AgentDefinition {
            name: self.name,
            description: self.description,
            category: self.category,
            tools: self.tools,
            ai_model: self.ai_model,
            system_prompt: Some(system_prompt),
            ..Default::default()
        }
    }
}

/// Agent category inferred from chat text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AgentCategory {
    CustomerSupport,
    Analytics,
    Content,
    Productivity,
    #[default]
    General,
}

impl AgentCategory {
    /// Categories in matching priority order.
    const KEYWORDS: [(AgentCategory, &'static [&'static str]); 4] = [
        (AgentCategory::CustomerSupport, &["customer support", "support"]),
        (AgentCategory::Analytics, &["data", "analysis"]),
        (AgentCategory::Content, &["content", "writing"]),
        (AgentCategory::Productivity, &["schedule", "calendar"]),
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentCategory::CustomerSupport => "customer-support",
            AgentCategory::Analytics => "analytics",
            AgentCategory::Content => "content",
            AgentCategory::Productivity => "productivity",
            AgentCategory::General => "general",
        }
    }

    /// Human-readable label, e.g. "Customer Support".
    pub fn label(&self) -> String {
        title_case(&self.as_str().replace('-', " "))
    }

    /// Tools bundled with the category. Some are not in the registry yet and
    /// are skipped at generation time.
    pub fn default_tools(&self) -> &'static [&'static str] {
        match self {
            AgentCategory::CustomerSupport => &["slack", "email", "zendesk"],
            AgentCategory::Analytics => &["google-sheets", "database", "chart-generator"],
            AgentCategory::Content => &["document-generator", "image-generator", "social-media"],
            AgentCategory::Productivity => &["google-calendar", "email", "slack"],
            AgentCategory::General => &[],
        }
    }

    /// First category whose keywords occur in `text` (case-insensitive).
    pub fn detect(text: &str) -> Option<Self> {
        let lower = text.to_lowercase();
        Self::KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
            .map(|(category, _)| *category)
    }
}

/// Where an extracted value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    Matched,
    Defaulted,
}

/// A parsed value tagged with its provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extracted<T> {
    pub value: T,
    pub provenance: Provenance,
}

impl<T> Extracted<T> {
    pub fn matched(value: T) -> Self {
        Self {
            value,
            provenance: Provenance::Matched,
        }
    }

    pub fn defaulted(value: T) -> Self {
        Self {
            value,
            provenance: Provenance::Defaulted,
        }
    }

    pub fn is_matched(&self) -> bool {
        self.provenance == Provenance::Matched
    }
}

/// Result of parsing chat text into an agent request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedAgentRequest {
    pub category: Extracted<AgentCategory>,
    pub tools: Vec<String>,
    pub ai_model: Extracted<ModelFamily>,
    pub name: Extracted<String>,
    pub description: Extracted<String>,
    /// The original chat text, used as the agent prompt
    pub prompt: String,
}

impl ParsedAgentRequest {
    /// True when nothing was matched and every field is a default.
    pub fn is_fully_defaulted(&self) -> bool {
        !self.category.is_matched()
            && !self.ai_model.is_matched()
            && !self.name.is_matched()
            && !self.description.is_matched()
    }

    pub fn into_request(self) -> AgentRequest {
        AgentRequest {
            name: self.name.value,
            description: self.description.value,
            category: self.category.value.as_str().to_string(),
            tools: self.tools,
            ai_model: self.ai_model.value.as_str().to_string(),
            prompt: Some(self.prompt),
        }
    }
}

static NAME_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\bcreate (?:a|an) ([a-z0-9][a-z0-9 \-]*?) agent\b",
        r"(?i)\b(?:i want|i need|need|want) (?:a|an) ([a-z0-9][a-z0-9 \-]*?) agent\b",
        r"(?i)\bbuild (?:a|an) ([a-z0-9][a-z0-9 \-]*?) agent\b",
        r"(?i)\bmake (?:a|an) ([a-z0-9][a-z0-9 \-]*?) agent\b",
    ]
    .into_iter()
    .map(|p| Regex::new(p).expect("static name pattern"))
    .collect()
});

static DESCRIPTION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\bthat (?:can|will|should) ([^.!?]+)",
        r"(?i)\bto ([^.!?]+)",
        r"(?i)\bfor ([^.!?]+)",
    ]
    .into_iter()
    .map(|p| Regex::new(p).expect("static description pattern"))
    .collect()
});

/// Parse free-form chat text into an agent request.
pub fn parse_agent_request(message: &str) -> ParsedAgentRequest {
    let category = match AgentCategory::detect(message) {
        Some(category) => Extracted::matched(category),
        None => Extracted::defaulted(AgentCategory::General),
    };

    let ai_model = detect_model(message);

    let name = match extract_agent_name(message) {
        Some(name) => Extracted::matched(name),
        None => Extracted::defaulted(format!("{} Agent", category.value.label())),
    };

    let description = match extract_agent_description(message) {
        Some(description) => Extracted::matched(description),
        None => Extracted::defaulted(format!(
            "An AI agent specialized in {} tasks",
            category.value.as_str().replace('-', " ")
        )),
    };

    ParsedAgentRequest {
        tools: category
            .value
            .default_tools()
            .iter()
            .map(|t| t.to_string())
            .collect(),
        category,
        ai_model,
        name,
        description,
        prompt: message.to_string(),
    }
}

fn detect_model(message: &str) -> Extracted<ModelFamily> {
    let lower = message.to_lowercase();
    if lower.contains("claude") {
        Extracted::matched(ModelFamily::Claude3Sonnet)
    } else if lower.contains("gemini") {
        Extracted::matched(ModelFamily::GeminiPro)
    } else {
        Extracted::defaulted(ModelFamily::default())
    }
}

/// "create a customer support agent" → "Customer Support Agent".
fn extract_agent_name(message: &str) -> Option<String> {
    NAME_PATTERNS.iter().find_map(|pattern| {
        let captured = pattern.captures(message)?.get(1)?.as_str().trim();
        if captured.is_empty() {
            return None;
        }
        Some(format!("{} Agent", title_case(captured)))
    })
}

/// "... that can answer tickets" → "An AI agent that answer tickets".
fn extract_agent_description(message: &str) -> Option<String> {
    DESCRIPTION_PATTERNS.iter().find_map(|pattern| {
        let captured = pattern.captures(message)?.get(1)?.as_str().trim();
        if captured.is_empty() {
            return None;
        }
        Some(format!("An AI agent that {}", captured))
    })
}

/// Upper-case the first character after every word boundary, so hyphenated
/// words are capitalized on both sides ("lead-gen" → "Lead-Gen").
fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut in_word = false;
            word.chars()
                .flat_map(|c| {
                    let is_word = c.is_alphanumeric() || c == '_';
                    let starts_word = is_word && !in_word;
                    in_word = is_word;
                    if starts_word {
                        c.to_uppercase().collect::<Vec<_>>()
                    } else {
                        vec![c]
                    }
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_support_request() {
        let parsed =
            parse_agent_request("I want a customer support agent that can answer tickets");

        assert_eq!(parsed.category.value, AgentCategory::CustomerSupport);
        assert!(parsed.category.is_matched());
        assert!(!parsed.tools.is_empty());
        assert_eq!(parsed.name.value, "Customer Support Agent");
        assert!(parsed.name.is_matched());
        assert!(parsed.name.value.ends_with("Agent"));
        assert_eq!(parsed.description.value, "An AI agent that answer tickets");
    }

    #[test]
    fn test_category_priority_order() {
        // "support" wins over "data"
        let parsed = parse_agent_request("support agent for data questions");
        assert_eq!(parsed.category.value, AgentCategory::CustomerSupport);

        let parsed = parse_agent_request("help me with data analysis");
        assert_eq!(parsed.category.value, AgentCategory::Analytics);

        let parsed = parse_agent_request("blog writing assistant");
        assert_eq!(parsed.category.value, AgentCategory::Content);

        let parsed = parse_agent_request("manage my calendar");
        assert_eq!(parsed.category.value, AgentCategory::Productivity);
        assert!(parsed.tools.contains(&"slack".to_string()));
    }

    #[test]
    fn test_model_detection() {
        let parsed = parse_agent_request("build an email agent using Claude");
        assert_eq!(parsed.ai_model.value, ModelFamily::Claude3Sonnet);
        assert!(parsed.ai_model.is_matched());

        let parsed = parse_agent_request("make a bot on gemini");
        assert_eq!(parsed.ai_model.value, ModelFamily::GeminiPro);

        let parsed = parse_agent_request("make a bot");
        assert_eq!(parsed.ai_model.value, ModelFamily::Gpt4o);
        assert_eq!(parsed.ai_model.provenance, Provenance::Defaulted);
    }

    #[test]
    fn test_name_patterns() {
        assert_eq!(
            extract_agent_name("Please create an invoice tracking agent today"),
            Some("Invoice Tracking Agent".to_string())
        );
        assert_eq!(
            extract_agent_name("Can you build a lead-gen agent?"),
            Some("Lead-Gen Agent".to_string())
        );
        assert_eq!(extract_agent_name("hello there"), None);
    }

    #[test]
    fn test_description_first_pattern_wins() {
        assert_eq!(
            extract_agent_description("an agent that will summarize reports. Also to email"),
            Some("An AI agent that summarize reports".to_string())
        );
        assert_eq!(
            extract_agent_description("I need something to sort my inbox!"),
            Some("An AI agent that sort my inbox".to_string())
        );
    }

    #[test]
    fn test_fully_defaulted_parse() {
        let parsed = parse_agent_request("hello");

        assert!(parsed.is_fully_defaulted());
        assert_eq!(parsed.category.value, AgentCategory::General);
        assert!(parsed.tools.is_empty());
        assert_eq!(parsed.name.value, "General Agent");
        assert_eq!(
            parsed.description.value,
            "An AI agent specialized in general tasks"
        );
    }

    #[test]
    fn test_defaulted_name_from_category() {
        let parsed = parse_agent_request("customer support please");
        assert_eq!(parsed.name.provenance, Provenance::Defaulted);
        assert_eq!(parsed.name.value, "Customer Support Agent");
        assert_eq!(
            parsed.description.value,
            "An AI agent specialized in customer support tasks"
        );
    }

    #[test]
    fn test_into_request() {
        let message = "create a scheduling agent that can book meetings on my calendar with claude";
        let request = parse_agent_request(message).into_request();

        assert_eq!(request.name, "Scheduling Agent");
        assert_eq!(request.category, "productivity");
        assert_eq!(request.ai_model, "claude-3-sonnet");
        assert_eq!(request.prompt.as_deref(), Some(message));
    }

    #[test]
    fn test_request_into_definition_prompt_fallback() {
        let request = AgentRequest {
            name: "Bot".into(),
            description: "Does things.".into(),
            ..Default::default()
        };
        let definition = request.into_definition();
        assert_eq!(
            definition.system_prompt.as_deref(),
            Some("You are Bot. Does things.")
        );
    }

    #[test]
    fn test_request_deserialize_defaults_model() {
        let request: AgentRequest = serde_json::from_str(r#"{"name": "Bot"}"#).unwrap();
        assert_eq!(request.ai_model, "gpt-4o");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("customer  support"), "Customer Support");
        assert_eq!(title_case("lead-gen"), "Lead-Gen");
        assert_eq!(title_case("b2b e-mail follow_up"), "B2b E-Mail Follow_up");
        assert_eq!(title_case(""), "");
    }
}
