//! Tandem agent — the human-in-the-loop orchestration core.
//!
//! This crate contains:
//! - **tools**: Tool trait, registry, and the built-in arithmetic tools
//! - **confirm**: the `Prompter` human-I/O boundary and the confirmation gate
//! - **cycle**: the execute → confirm → retry/override state machine
//! - **orchestrator**: the conversation loop driving the decision source

pub mod confirm;
pub mod cycle;
pub mod orchestrator;
pub mod tools;

pub use confirm::{decide_after_rejections, ConfirmationGate, Prompter, RejectionOutcome};
pub use cycle::{CycleOutcome, ToolExecutionCycle, MAX_RESULT_REJECTIONS};
pub use orchestrator::ConversationOrchestrator;
pub use tools::{builtin_registry, Tool, ToolRegistry};
