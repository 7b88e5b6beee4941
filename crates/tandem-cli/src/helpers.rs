//! Shared CLI helpers — banner and response printing.

use colored::Colorize;

/// Print an assistant answer to stdout.
pub fn print_response(answer: &str) {
    println!();
    println!("{}", "🤝 Tandem".cyan().bold());
    if answer.is_empty() {
        println!("{}", "(no response)".dimmed());
    } else {
        println!("{answer}");
    }
    println!();
}

/// Print the banner shown at REPL start.
pub fn print_banner() {
    let version = env!("CARGO_PKG_VERSION");
    println!();
    println!("{}  v{}", "🤝 Tandem".cyan().bold(), version.dimmed());
    println!(
        "{}",
        "Type a question, or \"quit\" to exit. Tool calls and results are \
         confirmed with you before they count."
            .dimmed()
    );
    println!();
}
