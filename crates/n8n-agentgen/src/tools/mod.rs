//! Tool registry for agent integrations
//!
//! Maps tool identifiers requested by an agent ("gmail", "slack", "web-search", ...)
//! to the n8n node type that implements the tool, its type version, default
//! parameters and the credential it needs.
//!
//! ## Supported tools
//! - Google: gmail, calendar, sheets
//! - Collaboration: slack, notion, trello, github
//! - CRM / automation: salesforce, hubspot, zapier
//! - Research: web-search (HTTP request tool backed by Tavily)
//!
//! Lookup is case-insensitive. Unknown identifiers resolve to `None`, and callers
//! skip them instead of failing generation.

mod web_search;

use std::collections::BTreeMap;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use web_search::{web_search_parameters, PlaceholderDefinition};

/// Node type marker shared by all HTTP-request based tools.
pub const HTTP_REQUEST_TOOL_TYPE: &str = "@n8n/n8n-nodes-langchain.toolHttpRequest";

/// Reference to a credential configured in the workflow runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRef {
    pub id: String,
    pub name: String,
}

impl CredentialRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Credential requirement of a tool: the class key n8n expects plus the
/// reference placed under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCredential {
    pub class: &'static str,
    pub reference: CredentialRef,
}

impl ToolCredential {
    /// Render as the `credentials` object of a node: `{ class: { id, name } }`.
    pub fn to_node_credentials(&self) -> BTreeMap<String, CredentialRef> {
        BTreeMap::from([(self.class.to_string(), self.reference.clone())])
    }
}

/// Static description of one supported integration.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDescriptor {
    pub kind: ToolKind,
    pub node_type: &'static str,
    pub type_version: f64,
    pub default_parameters: Map<String, Value>,
    pub credential: Option<ToolCredential>,
}

impl ToolDescriptor {
    pub fn tool_id(&self) -> &'static str {
        self.kind.as_str()
    }

    /// HTTP request tools get their own webhook identifier.
    pub fn is_http_request(&self) -> bool {
        self.node_type.contains("HttpRequest")
    }
}

/// Every integration the registry knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolKind {
    Gmail,
    Slack,
    Notion,
    Github,
    Trello,
    Calendar,
    Sheets,
    Zapier,
    Salesforce,
    Hubspot,
    WebSearch,
}

impl ToolKind {
    pub const ALL: [ToolKind; 11] = [
        ToolKind::Gmail,
        ToolKind::Slack,
        ToolKind::Notion,
        ToolKind::Github,
        ToolKind::Trello,
        ToolKind::Calendar,
        ToolKind::Sheets,
        ToolKind::Zapier,
        ToolKind::Salesforce,
        ToolKind::Hubspot,
        ToolKind::WebSearch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolKind::Gmail => "gmail",
            ToolKind::Slack => "slack",
            ToolKind::Notion => "notion",
            ToolKind::Github => "github",
            ToolKind::Trello => "trello",
            ToolKind::Calendar => "calendar",
            ToolKind::Sheets => "sheets",
            ToolKind::Zapier => "zapier",
            ToolKind::Salesforce => "salesforce",
            ToolKind::Hubspot => "hubspot",
            ToolKind::WebSearch => "web-search",
        }
    }

    /// Case-insensitive parse of a tool identifier.
    pub fn parse(tool_id: &str) -> Option<Self> {
        let needle = tool_id.trim().to_lowercase();
        Self::ALL.into_iter().find(|kind| kind.as_str() == needle)
    }

    /// Registry entry for this tool.
    pub fn descriptor(self) -> &'static ToolDescriptor {
        // ALL and REGISTRY share the same order
        &REGISTRY[self as usize]
    }

    fn build_descriptor(self) -> ToolDescriptor {
        let (node_type, type_version, credential) = match self {
            ToolKind::Gmail => (
                "n8n-nodes-base.gmailTool",
                2.1,
                Some(("gmailOAuth2", "gmail-auth", "Gmail OAuth2")),
            ),
            ToolKind::Slack => (
                "@n8n/n8n-nodes-langchain.toolSlack",
                1.0,
                Some(("slackOAuth2Api", "slack-auth", "Slack OAuth2")),
            ),
            ToolKind::Notion => (
                "@n8n/n8n-nodes-langchain.toolNotion",
                1.0,
                Some(("notionApi", "notion-auth", "Notion API")),
            ),
            ToolKind::Github => (
                "@n8n/n8n-nodes-langchain.toolGitHub",
                1.0,
                Some(("githubApi", "github-auth", "GitHub API")),
            ),
            ToolKind::Trello => (
                "@n8n/n8n-nodes-langchain.toolTrello",
                1.0,
                Some(("trelloApi", "trello-auth", "Trello API")),
            ),
            ToolKind::Calendar => (
                "@n8n/n8n-nodes-langchain.toolGoogleCalendar",
                1.0,
                Some((
                    "googleCalendarOAuth2Api",
                    "calendar-auth",
                    "Google Calendar OAuth2",
                )),
            ),
            ToolKind::Sheets => (
                "@n8n/n8n-nodes-langchain.toolGoogleSheets",
                1.0,
                Some((
                    "googleSheetsOAuth2Api",
                    "sheets-auth",
                    "Google Sheets OAuth2",
                )),
            ),
            ToolKind::Zapier => (
                "@n8n/n8n-nodes-langchain.toolZapier",
                1.0,
                Some(("zapierApi", "zapier-auth", "Zapier API")),
            ),
            ToolKind::Salesforce => (
                "@n8n/n8n-nodes-langchain.toolSalesforce",
                1.0,
                Some(("salesforceOAuth2Api", "salesforce-auth", "Salesforce OAuth2")),
            ),
            ToolKind::Hubspot => (
                "@n8n/n8n-nodes-langchain.toolHubSpot",
                1.0,
                Some(("hubspotApi", "hubspot-auth", "HubSpot API")),
            ),
            ToolKind::WebSearch => (HTTP_REQUEST_TOOL_TYPE, 1.1, None),
        };

        let default_parameters = match self {
            ToolKind::WebSearch => web_search_parameters(),
            _ => empty_options(),
        };

        ToolDescriptor {
            kind: self,
            node_type,
            type_version,
            default_parameters,
            credential: credential.map(|(class, id, name)| ToolCredential {
                class,
                reference: CredentialRef::new(id, name),
            }),
        }
    }
}

static REGISTRY: LazyLock<Vec<ToolDescriptor>> = LazyLock::new(|| {
    ToolKind::ALL
        .into_iter()
        .map(ToolKind::build_descriptor)
        .collect()
});

/// Look up a tool descriptor by identifier (case-insensitive).
pub fn lookup(tool_id: &str) -> Option<&'static ToolDescriptor> {
    ToolKind::parse(tool_id).map(ToolKind::descriptor)
}

fn empty_options() -> Map<String, Value> {
    let mut params = Map::new();
    params.insert("options".to_string(), Value::Object(Map::new()));
    params
}
