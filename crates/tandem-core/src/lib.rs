//! Tandem core — shared vocabulary for the agent, provider, and CLI crates.
//!
//! This crate contains:
//! - **types**: chat messages, tool calls/definitions, and response-content
//!   text extraction (OpenAI chat completions format)
//! - **error**: the typed `AgentError`
//! - **config**: schema, loading, and env var overrides
//! - **utils**: path and string helpers

pub mod config;
pub mod error;
pub mod types;
pub mod utils;

pub use error::AgentError;
