//! Runtime Configuration Module
//!
//! Connection settings for the external n8n workflow runtime, read from
//! environment variables.
//!
//! # Environment Variables
//!
//! | Variable | Purpose | Required |
//! |----------|---------|----------|
//! | `N8N_BASE_URL` | Runtime base URL, e.g. `https://acme.app.n8n.cloud` | Yes |
//! | `N8N_USERNAME` | Basic Auth user | Yes |
//! | `N8N_PASSWORD` | Basic Auth password | Yes |
//! | `N8N_WEBHOOK_URL` | Shared webhook for static registration | No |
//! | `N8N_TIMEOUT_SECS` | Per-request timeout (default 30) | No |
//! | `N8N_MAX_RETRIES` | Retries for idempotent reads (default 3) | No |
//!
//! # Example
//!
//! ```ignore
//! use n8n_agentgen::config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env()?;
//! config.validate()?;
//! let client = N8nClient::new(config);
//! ```

use std::time::Duration;

use crate::error::ConfigError;

/// Default timeout for runtime API requests
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default retry budget for idempotent requests
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default base delay for exponential backoff (milliseconds)
pub const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 1000;

/// Connection settings for the workflow runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Base URL without the `/api/v1` suffix
    pub base_url: String,

    pub username: String,

    pub password: String,

    /// Shared webhook URL returned by static registration
    pub webhook_url: Option<String>,

    pub timeout: Duration,

    /// Retry attempts for the list request (0 = no retry)
    pub max_retries: u32,

    pub retry_base_delay: Duration,
}

impl RuntimeConfig {
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            username: username.into(),
            password: password.into(),
            webhook_url: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_base_delay: Duration::from_millis(DEFAULT_RETRY_BASE_DELAY_MS),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Missing credentials are a startup error, not a per-request one.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::MissingVar(key))
        };

        let mut config = Self::new(
            required("N8N_BASE_URL")?,
            required("N8N_USERNAME")?,
            required("N8N_PASSWORD")?,
        );

        if let Some(url) = lookup("N8N_WEBHOOK_URL").filter(|v| !v.trim().is_empty()) {
            config.webhook_url = Some(url);
        }

        if let Some(secs) = lookup("N8N_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().map_err(|_| ConfigError::InvalidValue {
                var: "N8N_TIMEOUT_SECS",
                message: format!("expected whole seconds, got {:?}", secs),
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        if let Some(retries) = lookup("N8N_MAX_RETRIES") {
            config.max_retries = retries.parse().map_err(|_| ConfigError::InvalidValue {
                var: "N8N_MAX_RETRIES",
                message: format!("expected a non-negative integer, got {:?}", retries),
            })?;
        }

        Ok(config)
    }

    /// Validate before any request is made.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                var: "N8N_BASE_URL",
                message: format!("must be an http(s) URL, got {:?}", self.base_url),
            });
        }

        if self.timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                var: "N8N_TIMEOUT_SECS",
                message: "must be at least 1 second".to_string(),
            });
        }

        Ok(())
    }

    pub fn with_webhook_url(mut self, url: impl Into<String>) -> Self {
        self.webhook_url = Some(url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    /// REST API root: `{base_url}/api/v1`.
    pub fn api_url(&self) -> String {
        format!("{}/api/v1", self.base_url)
    }

    /// Webhook shared by statically registered agents.
    pub fn shared_webhook_url(&self) -> String {
        self.webhook_url
            .clone()
            .unwrap_or_else(|| format!("{}/webhook/agent-chat", self.base_url))
    }
}
