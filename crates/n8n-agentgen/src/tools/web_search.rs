//! Web search tool template.
//!
//! The web-search tool is an HTTP request node posting to the Tavily API. Its
//! body references named placeholders (`{searchTerm}`, `{tavilyApiKey}`) that the
//! agent fills in at call time; the placeholder definitions travel with the node
//! verbatim.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

const TAVILY_SEARCH_URL: &str = "https://api.tavily.com/search";

/// A named placeholder the agent fills in when it invokes the tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub value_type: String,
}

impl PlaceholderDefinition {
    fn string(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            value_type: "string".to_string(),
        }
    }
}

fn placeholders() -> Vec<PlaceholderDefinition> {
    vec![
        PlaceholderDefinition::string(
            "searchTerm",
            "What the user has requested to search the internet for",
        ),
        PlaceholderDefinition::string("tavilyApiKey", "Tavily API key for web search"),
    ]
}

/// Request body template, serialized to a string as n8n expects for `jsonBody`.
fn json_body() -> String {
    json!({
        "api_key": "{tavilyApiKey}",
        "query": "{searchTerm}",
        "search_depth": "basic",
        "include_answer": true,
        "topic": "news",
        "include_raw_content": true,
        "max_results": 3
    })
    .to_string()
}

/// Default parameters of the web-search tool node.
pub fn web_search_parameters() -> Map<String, Value> {
    let mut params = Map::new();
    params.insert(
        "toolDescription".into(),
        json!("Use this tool to search the internet"),
    );
    params.insert("method".into(), json!("POST"));
    params.insert("url".into(), json!(TAVILY_SEARCH_URL));
    params.insert("sendBody".into(), json!(true));
    params.insert("specifyBody".into(), json!("json"));
    params.insert("jsonBody".into(), Value::String(json_body()));
    params.insert(
        "placeholderDefinitions".into(),
        json!({ "values": placeholders() }),
    );
    params
}
