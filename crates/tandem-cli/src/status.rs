//! `tandem status` — show configuration and provider status.
//!
//! Shows the config path, the default model, and which providers have an
//! API key configured (file or env var).

use anyhow::Result;
use colored::Colorize;

use tandem_core::config::{get_config_path, load_config};
use tandem_providers::registry::PROVIDERS;

/// Run the status command.
pub fn run() -> Result<()> {
    let config = load_config(None);
    let config_path = get_config_path();

    println!();
    println!("{}", "🤝 Tandem — Status".cyan().bold());
    println!();

    // Config file
    if config_path.exists() {
        println!("  config:  {}", config_path.display());
    } else {
        println!(
            "  config:  {} {}",
            config_path.display(),
            "(missing — run `tandem onboard`)".yellow()
        );
    }

    // Agent settings
    println!("  model:   {}", config.agent.model);
    println!(
        "  limits:  {} tokens, temperature {}, {} steps",
        config.agent.max_tokens, config.agent.temperature, config.agent.max_steps
    );
    println!();

    // Provider keys
    println!("  {}", "Providers".bold());
    for spec in PROVIDERS {
        let configured = config
            .providers
            .get_by_name(spec.name)
            .map(|p| p.is_configured())
            .unwrap_or(false)
            || std::env::var(spec.env_key).is_ok();

        let mark = if configured {
            "✓".green()
        } else {
            "✗".dimmed()
        };
        println!(
            "    {} {:<12} ({})",
            mark,
            spec.display_name,
            spec.env_key.dimmed()
        );
    }
    println!();

    Ok(())
}
