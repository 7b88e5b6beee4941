//! Tandem CLI — entry point.
//!
//! # Commands
//!
//! - `tandem chat [-m MESSAGE]` — chat with the assistant (single-shot or REPL)
//! - `tandem onboard` — initialize configuration
//! - `tandem status` — show configuration and provider status

mod console;
mod helpers;
mod onboard;
mod repl;
mod status;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use tandem_agent::{builtin_registry, ConversationOrchestrator};
use tandem_core::config::{load_config, Config};
use tandem_providers::{create_provider, LlmRequestConfig};

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// Tandem — a human-in-the-loop tool-calling assistant
#[derive(Parser)]
#[command(name = "tandem", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the assistant (single-shot or interactive REPL)
    Chat {
        /// Single message (non-interactive). Omit for REPL mode.
        #[arg(short, long)]
        message: Option<String>,

        /// Model identifier (overrides the configured default)
        #[arg(long)]
        model: Option<String>,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Initialize configuration
    Onboard,

    /// Show configuration and provider status
    Status,
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Chat {
            message,
            model,
            logs,
        } => {
            init_logging(logs);
            run_chat(message, model).await
        }
        Commands::Onboard => onboard::run(),
        Commands::Status => status::run(),
    }
}

// ─────────────────────────────────────────────
// Chat command
// ─────────────────────────────────────────────

async fn run_chat(message: Option<String>, model_override: Option<String>) -> Result<()> {
    let config = load_config(None);
    let orchestrator = build_orchestrator(&config, model_override)?;

    match message {
        Some(msg) => {
            // Single-shot mode
            let answer = orchestrator
                .run(&msg)
                .await
                .context("conversation failed")?;
            helpers::print_response(&answer);
        }
        None => {
            // Interactive REPL mode
            repl::run(orchestrator).await?;
        }
    }

    Ok(())
}

/// Build a `ConversationOrchestrator` from the loaded configuration.
fn build_orchestrator(
    config: &Config,
    model_override: Option<String>,
) -> Result<ConversationOrchestrator> {
    let model = model_override.unwrap_or_else(|| config.agent.model.clone());

    let providers_map = config.providers.to_map();
    let provider = create_provider(&model, &providers_map)?;

    let request_config = LlmRequestConfig {
        max_tokens: config.agent.max_tokens,
        temperature: config.agent.temperature,
    };

    Ok(ConversationOrchestrator::new(
        Arc::new(provider),
        builtin_registry(),
        Arc::new(console::ConsolePrompter::new()),
        Some(model),
        Some(request_config),
        Some(config.agent.max_steps as usize),
    ))
}

/// Initialize tracing/logging.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("tandem=debug,info")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
