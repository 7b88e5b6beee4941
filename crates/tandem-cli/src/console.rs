//! Console prompter — the terminal implementation of the human I/O boundary.
//!
//! Blocks on stdin for every question; unrecognized yes/no input is
//! re-prompted until the answer is unambiguous. There is no default answer.

use std::io::{BufRead, Write};

use anyhow::Result;
use colored::Colorize;

use tandem_agent::Prompter;

/// Reads confirmations and override values from the terminal.
pub struct ConsolePrompter;

impl ConsolePrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsolePrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for ConsolePrompter {
    fn ask_yes_no(&self, prompt: &str) -> Result<bool> {
        let stdin = std::io::stdin();
        loop {
            print!("\n{prompt}");
            std::io::stdout().flush()?;

            let mut line = String::new();
            let read = stdin.lock().read_line(&mut line)?;
            if read == 0 {
                anyhow::bail!("input stream closed");
            }

            match parse_yes_no(&line) {
                Some(answer) => return Ok(answer),
                None => println!("{}", "Please enter 'y' or 'n'.".yellow()),
            }
        }
    }

    fn ask_free_text(&self, prompt: &str) -> Result<String> {
        print!("\n{prompt}");
        std::io::stdout().flush()?;

        let mut line = String::new();
        let read = std::io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            anyhow::bail!("input stream closed");
        }
        Ok(line.trim().to_string())
    }
}

/// Parse a yes/no answer. `None` means ambiguous — ask again.
fn parse_yes_no(input: &str) -> Option<bool> {
    match input.trim().to_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yes_variants() {
        assert_eq!(parse_yes_no("y"), Some(true));
        assert_eq!(parse_yes_no("yes"), Some(true));
        assert_eq!(parse_yes_no("YES"), Some(true));
        assert_eq!(parse_yes_no("  Y \n"), Some(true));
    }

    #[test]
    fn test_parse_no_variants() {
        assert_eq!(parse_yes_no("n"), Some(false));
        assert_eq!(parse_yes_no("no"), Some(false));
        assert_eq!(parse_yes_no("No\n"), Some(false));
    }

    #[test]
    fn test_parse_ambiguous_input() {
        assert_eq!(parse_yes_no(""), None);
        assert_eq!(parse_yes_no("maybe"), None);
        assert_eq!(parse_yes_no("yep"), None);
        assert_eq!(parse_yes_no("0"), None);
    }
}
