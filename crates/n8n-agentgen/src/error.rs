//! Error types for workflow generation and the external workflow runtime.
//!
//! Generation itself degrades softly (unknown tools, unknown models and missing
//! tuning fields resolve to defaults), so the only generation error is an
//! ambiguous node name at the serialization boundary. Everything else here
//! concerns configuration and the runtime's REST API.

use thiserror::Error;

/// Errors raised while assembling a workflow document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerateError {
    /// Two nodes share a display name, so name-addressed connections would misresolve.
    #[error("Duplicate node name in workflow: {name}")]
    DuplicateNodeName { name: String },

    #[error("Connection references a node that is not part of the workflow: {0}")]
    DanglingConnection(String),
}

/// Configuration errors. These are fatal at process start.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {var}: {message}")]
    InvalidValue { var: &'static str, message: String },

    #[error("No runtime client configured (set N8N_BASE_URL, N8N_USERNAME and N8N_PASSWORD)")]
    RuntimeNotConfigured,
}

/// Typed errors for the external workflow runtime API.
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("Request timed out")]
    Timeout,

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unauthorized - check runtime credentials: {body}")]
    Unauthorized { body: String },

    #[error("Invalid workflow id: {0:?}")]
    InvalidWorkflowId(String),

    #[error("Runtime rejected request ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl RuntimeError {
    /// Transient failures worth retrying on idempotent calls.
    pub fn is_retryable(&self) -> bool {
        match self {
            RuntimeError::Timeout | RuntimeError::Connection(_) => true,
            RuntimeError::Rejected { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// True when the runtime could not be reached at all, as opposed to
    /// answering with a rejection.
    pub fn is_unreachable(&self) -> bool {
        matches!(
            self,
            RuntimeError::Timeout | RuntimeError::Connection(_) | RuntimeError::Network(_)
        )
    }

    /// HTTP status of a rejected request, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            RuntimeError::Unauthorized { .. } => Some(401),
            RuntimeError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for RuntimeError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            RuntimeError::Timeout
        } else if e.is_connect() {
            RuntimeError::Connection(e.to_string())
        } else if e.is_decode() {
            RuntimeError::Parse(e.to_string())
        } else {
            RuntimeError::Network(e.to_string())
        }
    }
}

/// Top-level error for the crate.
#[derive(Error, Debug)]
pub enum AgentGenError {
    #[error("Generation error: {0}")]
    Generate(#[from] GenerateError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Runtime error: {0}")]
    Runtime(#[from] RuntimeError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
