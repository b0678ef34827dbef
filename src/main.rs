//! # agentgen
//!
//! Command-line front-end for generating n8n AI-agent workflows and managing
//! them in an n8n runtime.
//!
//! All command output is JSON on stdout; logs go to stderr.
//!
//! ## Quick Start
//! ```bash
//! agentgen generate --message "Create a support agent that can answer tickets" --pretty
//! agentgen create --message "I need a calendar agent" --remote
//! agentgen list
//! ```

// =============================================================================
// MODULE DECLARATIONS
// =============================================================================

/// Configuration management
mod config;

// =============================================================================
// IMPORTS
// =============================================================================
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use n8n_agentgen::{
    parse_agent_request, AgentRequest, ModelFamily, RuntimeConfig, StaticWebhookRegistration,
    WorkflowService,
};

use crate::config::Config;

// =============================================================================
// CLI ARGUMENTS
// =============================================================================
#[derive(Parser, Debug)]
#[command(
    name = "agentgen",
    version,
    about = "Generate n8n AI-agent workflows and manage them in an n8n runtime",
    long_about = r#"
agentgen turns an agent description into an importable n8n workflow.

Generation is local. Lifecycle commands (status, delete, list and
create --remote) talk to the n8n REST API and need:
  N8N_BASE_URL   e.g. https://acme.app.n8n.cloud
  N8N_USERNAME   Basic Auth user
  N8N_PASSWORD   Basic Auth password

EXAMPLES:
  # Workflow JSON from chat text
  agentgen generate --message "Build a content agent that can draft posts" --pretty

  # Workflow JSON from a request file
  agentgen generate --agent support-agent.json

  # Register the workflow in the runtime and activate it
  agentgen create --message "I need a calendar agent" --remote
"#
)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Indent JSON output
    #[arg(long, global = true, default_value = "false")]
    pretty: bool,

    /// Verbose output (debug logging)
    #[arg(short = 'v', long = "verbose", global = true, default_value = "false")]
    verbose: bool,
}

/// Where the agent request comes from: chat text or a JSON request file.
#[derive(ClapArgs, Debug)]
#[group(required = true, multiple = false)]
struct RequestSource {
    /// Free-form chat text describing the agent
    #[arg(short = 'm', long = "message", value_name = "TEXT")]
    message: Option<String>,

    /// JSON file holding an agent request
    #[arg(short = 'a', long = "agent", value_name = "FILE")]
    agent: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the generated workflow document
    Generate {
        #[command(flatten)]
        source: RequestSource,
    },

    /// Print the parsed request with match/default provenance
    Parse {
        #[arg(short = 'm', long = "message", value_name = "TEXT")]
        message: String,
    },

    /// Generate and register a workflow, then print its handle
    Create {
        #[command(flatten)]
        source: RequestSource,

        /// Create and activate the workflow through the runtime API
        #[arg(long, default_value = "false")]
        remote: bool,
    },

    /// Print a workflow's status
    Status {
        #[arg(value_name = "WORKFLOW_ID")]
        id: String,
    },

    /// Deactivate and delete a workflow
    Delete {
        #[arg(value_name = "WORKFLOW_ID")]
        id: String,
    },

    /// List workflows in the runtime
    List,
}

// =============================================================================
// MAIN FUNCTION
// =============================================================================
#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::from_env()?;
    init_logging(&config, args.verbose)?;
    config.validate()?;

    let pretty = args.pretty || config.pretty;

    if let Err(e) = run(args.command, &config, pretty).await {
        error!(error = %e, "Command failed");
        return Err(e);
    }

    Ok(())
}

async fn run(command: Command, config: &Config, pretty: bool) -> Result<()> {
    match command {
        Command::Generate { source } => {
            let request = load_request(&source, config)?;
            let document = WorkflowService::default().generate(request)?;
            info!(workflow = %document.name, nodes = document.nodes.len(), "Workflow generated");
            print_json(&document, pretty)
        }

        Command::Parse { message } => print_json(&parse_agent_request(&message), pretty),

        Command::Create { source, remote } => {
            let request = load_request(&source, config)?;
            let service = if remote {
                WorkflowService::from_config(config.runtime()?, true)?
            } else {
                static_service()
            };
            let handle = service.create_agent_workflow(request).await?;
            print_json(&handle, pretty)
        }

        Command::Status { id } => {
            let service = WorkflowService::from_config(config.runtime()?, false)?;
            print_json(&service.get_workflow_status(&id).await?, pretty)
        }

        Command::Delete { id } => {
            let service = WorkflowService::from_config(config.runtime()?, false)?;
            print_json(&service.delete_workflow(&id).await?, pretty)
        }

        Command::List => {
            let service = WorkflowService::from_config(config.runtime()?, false)?;
            print_json(&service.list_workflows().await?, pretty)
        }
    }
}

// =============================================================================
// REQUEST LOADING
// =============================================================================
/// Build an agent request from chat text or a request file.
fn load_request(source: &RequestSource, config: &Config) -> Result<AgentRequest> {
    match (&source.message, &source.agent) {
        (Some(message), _) => Ok(request_from_message(message, config)),
        (None, Some(path)) => read_request_file(path),
        (None, None) => anyhow::bail!("either --message or --agent is required"),
    }
}

fn request_from_message(message: &str, config: &Config) -> AgentRequest {
    let parsed = parse_agent_request(message);
    debug!(
        category = parsed.category.value.as_str(),
        name = %parsed.name.value,
        fully_defaulted = parsed.is_fully_defaulted(),
        "Parsed chat request"
    );

    let model_matched = parsed.ai_model.is_matched();
    let mut request = parsed.into_request();

    if !model_matched {
        if let Some(model) = config.default_model.as_deref().and_then(ModelFamily::parse) {
            request.ai_model = model.as_str().to_string();
        }
    }

    request
}

fn read_request_file(path: &Path) -> Result<AgentRequest> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read agent request {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("invalid agent request in {}", path.display()))
}

/// Static registration needs no runtime credentials, only the shared webhook URL.
fn static_service() -> WorkflowService {
    let webhook = RuntimeConfig::from_env()
        .map(|runtime| runtime.shared_webhook_url())
        .ok()
        .or_else(|| std::env::var("N8N_WEBHOOK_URL").ok())
        .filter(|url| !url.trim().is_empty());

    match webhook {
        Some(url) => WorkflowService::new(Arc::new(StaticWebhookRegistration::new(url))),
        None => WorkflowService::default(),
    }
}

// =============================================================================
// OUTPUT
// =============================================================================
fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", json);
    Ok(())
}

// =============================================================================
// LOGGING INITIALIZATION
// =============================================================================
/// Initialize the tracing subscriber for structured logging.
///
/// Logs are written to stderr so stdout stays valid JSON.
fn init_logging(config: &Config, verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_new(&config.log_level)
            .map_err(|e| anyhow::anyhow!("Invalid RUST_LOG filter {:?}: {}", config.log_level, e))?
    };

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set logging subscriber: {}", e))?;

    Ok(())
}
