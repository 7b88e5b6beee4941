//! `tandem onboard` — initialize configuration.
//!
//! Creates `~/.tandem/config.json` with defaults and the history directory.

use anyhow::Result;
use colored::Colorize;

use tandem_core::config::{get_config_path, load_config, save_config};
use tandem_core::utils::data_path;

/// Run the onboard command.
pub fn run() -> Result<()> {
    println!();
    println!("{}", "🤝 Tandem — Setup".cyan().bold());
    println!();

    let config_path = get_config_path();

    // 1. Create config if it doesn't exist
    if config_path.exists() {
        println!(
            "  {} config already exists at {}",
            "✓".green(),
            config_path.display()
        );
    } else {
        let config = load_config(None); // defaults
        save_config(&config, Some(&config_path))?;
        println!(
            "  {} created config at {}",
            "✓".green(),
            config_path.display()
        );
    }

    // 2. Create history directory
    let history_dir = data_path().join("history");
    std::fs::create_dir_all(&history_dir)?;
    println!("  {} history dir at {}", "✓".green(), history_dir.display());

    println!();
    println!(
        "{}",
        "  Setup complete! Add an API key to the config (or set e.g. \
         OPENAI_API_KEY), then run `tandem chat`."
            .green()
    );
    println!();

    Ok(())
}
