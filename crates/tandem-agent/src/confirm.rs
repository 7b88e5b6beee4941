//! Confirmation gate — the yes/no decision point and the retry/override rule.
//!
//! The gate is a pure decision component: it knows nothing about how a
//! question is displayed or answered. Presentation lives behind the
//! `Prompter` trait, implemented by the CLI (and by scripted prompters in
//! tests).

use std::sync::Arc;

// ─────────────────────────────────────────────
// Prompter — the human I/O boundary
// ─────────────────────────────────────────────

/// Blocking human-input boundary.
pub trait Prompter: Send + Sync {
    /// Ask a yes/no question. Implementations must keep asking until they
    /// receive an unambiguous yes or no — there is no default answer.
    fn ask_yes_no(&self, prompt: &str) -> anyhow::Result<bool>;

    /// Ask for free text. May return an empty string.
    fn ask_free_text(&self, prompt: &str) -> anyhow::Result<String>;
}

// ─────────────────────────────────────────────
// ConfirmationGate
// ─────────────────────────────────────────────

/// Asks the user to confirm an action or a result.
pub struct ConfirmationGate {
    prompter: Arc<dyn Prompter>,
}

impl ConfirmationGate {
    /// Create a gate over the given prompter.
    pub fn new(prompter: Arc<dyn Prompter>) -> Self {
        Self { prompter }
    }

    /// Ask the user the given yes/no question.
    pub fn confirm(&self, question: &str) -> anyhow::Result<bool> {
        self.prompter.ask_yes_no(question)
    }
}

// ─────────────────────────────────────────────
// Rejection rule
// ─────────────────────────────────────────────

/// What to do after a rejected tool result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectionOutcome {
    /// Re-run the tool from scratch.
    Retry,
    /// Stop retrying and ask for a manual override value.
    Override,
}

/// Pure retry/override decision: `Retry` while `attempts < max`, else
/// `Override`. Callers carry `attempts` explicitly; there is no hidden
/// state here.
pub fn decide_after_rejections(attempts: usize, max: usize) -> RejectionOutcome {
    if attempts < max {
        RejectionOutcome::Retry
    } else {
        RejectionOutcome::Override
    }
}

// ─────────────────────────────────────────────
// Test support
// ─────────────────────────────────────────────


// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
