//! Typed agent errors.
//!
//! Tool dispatch failures are values, not strings: an unknown tool name and
//! a crashing tool are distinct from a user rejecting a result, and both
//! abort the conversation run instead of entering the retry loop.

use thiserror::Error;

/// Errors that abort a conversation run.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The decision source proposed a tool name that is not registered.
    #[error("unknown tool '{name}'")]
    UnknownTool { name: String },

    /// The tool itself failed while executing (e.g. division by zero).
    #[error("tool '{name}' failed: {source}")]
    ToolFailed {
        name: String,
        #[source]
        source: anyhow::Error,
    },
}
