//! # Configuration Module
//!
//! CLI settings loaded from environment variables (and a `.env` file when
//! present). Runtime connection settings live in the library's
//! `RuntimeConfig`; this module only decides whether they are needed.

use anyhow::{Context, Result};
use std::env;

use n8n_agentgen::{ModelFamily, RuntimeConfig};

// =============================================================================
// CONFIGURATION STRUCT
// =============================================================================
/// Settings for the `agentgen` command-line tool.
#[derive(Debug, Clone)]
pub struct Config {
    /// Log filter passed to the tracing subscriber (e.g. "info", "n8n_agentgen=debug")
    pub log_level: String,

    /// Indent JSON output
    pub pretty: bool,

    /// Model family used when chat text names none
    pub default_model: Option<String>,
}

// =============================================================================
// DEFAULT IMPLEMENTATION
// =============================================================================
impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            pretty: false,
            default_model: None,
        }
    }
}

// =============================================================================
// CONFIGURATION LOADING
// =============================================================================
impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Purpose |
    /// |----------|---------|
    /// | `RUST_LOG` | Log filter |
    /// | `AGENTGEN_PRETTY` | `true`/`false`, indent JSON output |
    /// | `AGENTGEN_DEFAULT_MODEL` | Model for chat requests that name none |
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists (silently ignore if not found)
        let _ = dotenvy::dotenv();

        let mut config = Config::default();

        if let Ok(val) = env::var("RUST_LOG") {
            config.log_level = val;
        }

        if let Ok(val) = env::var("AGENTGEN_PRETTY") {
            config.pretty = val
                .parse()
                .context("AGENTGEN_PRETTY must be true or false")?;
        }

        if let Ok(val) = env::var("AGENTGEN_DEFAULT_MODEL") {
            if !val.trim().is_empty() {
                config.default_model = Some(val);
            }
        }

        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if let Some(model) = &self.default_model {
            if ModelFamily::parse(model).is_none() {
                anyhow::bail!(
                    "AGENTGEN_DEFAULT_MODEL must be one of gpt-4o, gpt-4o-mini, claude-3-sonnet, gemini-pro; got: {}",
                    model
                );
            }
        }

        if self.log_level.trim().is_empty() {
            anyhow::bail!("RUST_LOG cannot be empty");
        }

        Ok(())
    }

    /// Runtime connection settings, required by the lifecycle commands.
    pub fn runtime(&self) -> Result<RuntimeConfig> {
        let runtime = RuntimeConfig::from_env()
            .context("this command needs a configured n8n runtime")?;
        runtime.validate()?;
        Ok(runtime)
    }
}

// =============================================================================
// UNIT TESTS
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.log_level, "info");
        assert!(!config.pretty);
        assert!(config.default_model.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_known_default_model() {
        let config = Config {
            default_model: Some("claude-3-sonnet".to_string()),
            ..Config::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_default_model() {
        let config = Config {
            default_model: Some("gpt-2".to_string()),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_log_level() {
        let config = Config {
            log_level: " ".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
