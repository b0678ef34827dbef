//! Language model families supported by the generated workflows.

use serde::{Deserialize, Serialize};

/// Supported chat model families. The first variant is the fallback for
/// unrecognised model identifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelFamily {
    #[default]
    #[serde(rename = "gpt-4o")]
    Gpt4o,
    #[serde(rename = "gpt-4o-mini")]
    Gpt4oMini,
    #[serde(rename = "claude-3-sonnet")]
    Claude3Sonnet,
    #[serde(rename = "gemini-pro")]
    GeminiPro,
}

impl ModelFamily {
    pub const ALL: [ModelFamily; 4] = [
        ModelFamily::Gpt4o,
        ModelFamily::Gpt4oMini,
        ModelFamily::Claude3Sonnet,
        ModelFamily::GeminiPro,
    ];

    /// Identifier used in agent definitions.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelFamily::Gpt4o => "gpt-4o",
            ModelFamily::Gpt4oMini => "gpt-4o-mini",
            ModelFamily::Claude3Sonnet => "claude-3-sonnet",
            ModelFamily::GeminiPro => "gemini-pro",
        }
    }

    /// n8n chat model node type.
    pub fn node_type(&self) -> &'static str {
        match self {
            ModelFamily::Gpt4o | ModelFamily::Gpt4oMini => "@n8n/n8n-nodes-langchain.lmChatOpenAi",
            ModelFamily::Claude3Sonnet => "@n8n/n8n-nodes-langchain.lmChatAnthropic",
            ModelFamily::GeminiPro => "@n8n/n8n-nodes-langchain.lmChatGoogleGemini",
        }
    }

    /// Concrete model string sent to the provider.
    pub fn model_name(&self) -> &'static str {
        match self {
            ModelFamily::Gpt4o => "gpt-4o",
            ModelFamily::Gpt4oMini => "gpt-4o-mini",
            ModelFamily::Claude3Sonnet => "claude-3-sonnet-20240229",
            ModelFamily::GeminiPro => "gemini-pro",
        }
    }

    /// Credential class required by the model node.
    pub fn credential_class(&self) -> &'static str {
        match self {
            ModelFamily::Gpt4o | ModelFamily::Gpt4oMini => "openAiApi",
            ModelFamily::Claude3Sonnet => "anthropicApi",
            ModelFamily::GeminiPro => "googleGeminiApi",
        }
    }

    /// Exact, case-insensitive match on either the family identifier or the
    /// concrete model string.
    pub fn parse(model_id: &str) -> Option<Self> {
        let needle = model_id.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|family| family.as_str() == needle || family.model_name() == needle)
    }

    /// Resolve a model identifier, falling back to the default family.
    pub fn resolve(model_id: &str) -> Self {
        Self::parse(model_id).unwrap_or_default()
    }
}
