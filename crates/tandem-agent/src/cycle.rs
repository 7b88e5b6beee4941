//! Tool execution cycle — execute → confirm result → retry or override.
//!
//! State machine for one confirmed tool call:
//!
//! ```text
//! EXECUTE → CONFIRM_RESULT → ACCEPTED
//!                          → RETRY → EXECUTE          (attempts < max)
//!                          → OVERRIDE_PROMPT → ACCEPTED(override)
//!                                            → CANCELLED (empty input)
//! ```
//!
//! The tool is executed at most `MAX_RESULT_REJECTIONS` times before the
//! override prompt; every produced value is shown to the user before any
//! retry. A tool crash is a cycle failure, not a rejection — it is never
//! retried.

use anyhow::Result;
use tracing::{debug, info};

use tandem_core::types::ToolCall;

use crate::confirm::{decide_after_rejections, ConfirmationGate, Prompter, RejectionOutcome};
use crate::tools::ToolRegistry;

/// How many rejected results are re-run before the override prompt.
pub const MAX_RESULT_REJECTIONS: usize = 2;

/// Terminal outcome of one tool execution cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A value the user accepted — either produced by the tool or manually
    /// supplied as an override.
    Accepted(String),
    /// The user declined to supply an override; the conversation stops.
    Cancelled,
}

/// Drives one tool call through execution and result confirmation.
pub struct ToolExecutionCycle<'a> {
    tools: &'a ToolRegistry,
    gate: &'a ConfirmationGate,
    prompter: &'a dyn Prompter,
}

impl<'a> ToolExecutionCycle<'a> {
    pub fn new(
        tools: &'a ToolRegistry,
        gate: &'a ConfirmationGate,
        prompter: &'a dyn Prompter,
    ) -> Self {
        Self {
            tools,
            gate,
            prompter,
        }
    }

    /// Run the cycle for one tool call.
    ///
    /// Re-invocation after a rejection runs the tool from scratch; tools are
    /// not assumed idempotent, so a different value the second time around
    /// is legitimate. Tool failures propagate immediately.
    pub async fn run(&self, call: &ToolCall) -> Result<CycleOutcome> {
        let mut attempts: usize = 0;

        loop {
            let value = self.tools.invoke(call.name(), call.arguments_map()).await?;
            debug!(tool = call.name(), attempt = attempts + 1, "tool produced a value");

            let question = format!("Result: {value}\nAccept this result? [y/n] ");
            if self.gate.confirm(&question)? {
                return Ok(CycleOutcome::Accepted(value));
            }

            attempts += 1;
            match decide_after_rejections(attempts, MAX_RESULT_REJECTIONS) {
                RejectionOutcome::Retry => {
                    info!(
                        tool = call.name(),
                        attempt = attempts + 1,
                        "result rejected, re-running tool"
                    );
                }
                RejectionOutcome::Override => {
                    let replacement = self.prompter.ask_free_text(&format!(
                        "You've rejected the result {MAX_RESULT_REJECTIONS} times. \
                         Enter a replacement value, or leave empty to cancel: "
                    ))?;
                    let replacement = replacement.trim();
                    return if replacement.is_empty() {
                        info!(tool = call.name(), "override left empty, cancelling");
                        Ok(CycleOutcome::Cancelled)
                    } else {
                        info!(tool = call.name(), "using manual override value");
                        Ok(CycleOutcome::Accepted(replacement.to_string()))
                    };
                }
            }
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
