//! Tandem providers — the decision-source boundary.
//!
//! This crate contains:
//! - **traits**: the `LlmProvider` trait and per-call `LlmRequestConfig`
//! - **registry**: static provider specs and model-name matching
//! - **http_provider**: generic client for OpenAI-compatible APIs

pub mod http_provider;
pub mod registry;
pub mod traits;

pub use http_provider::{create_provider, HttpProvider};
pub use traits::{LlmProvider, LlmRequestConfig};
