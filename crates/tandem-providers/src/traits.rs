//! LLM Provider trait — the decision-source abstraction.
//!
//! Every LLM backend implements this trait; `HttpProvider` covers all
//! OpenAI-compatible APIs. There is exactly one abstraction for both the
//! tool-enabled and tool-disabled decision queries: the `tools` parameter
//! is the capability switch. Passing `None` disables tool proposals for
//! that exchange.

use async_trait::async_trait;
use tandem_core::types::{LlmResponse, Message, ToolDefinition};

/// Configuration passed to each LLM call.
#[derive(Clone, Debug)]
pub struct LlmRequestConfig {
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature (0.0 – 2.0).
    pub temperature: f64,
}

impl Default for LlmRequestConfig {
    fn default() -> Self {
        Self {
            max_tokens: 4096,
            temperature: 0.7,
        }
    }
}

/// Trait that all LLM providers must implement.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send a chat completion request.
    ///
    /// # Arguments
    /// * `messages` — Conversation transcript in OpenAI format.
    /// * `tools`    — Tool definitions the LLM may call, or `None` to
    ///                disable tool proposals for this exchange.
    /// * `model`    — Model identifier (e.g. `"gpt-4o-mini"`).
    /// * `config`   — Temperature, max_tokens.
    ///
    /// # Errors
    /// An unreachable or erroring provider is fatal to the conversation
    /// run — failures are returned as `Err`, never folded into response
    /// content.
    async fn chat(
        &self,
        messages: &[Message],
        tools: Option<&[ToolDefinition]>,
        model: &str,
        config: &LlmRequestConfig,
    ) -> anyhow::Result<LlmResponse>;

    /// The default model for this provider instance.
    fn default_model(&self) -> &str;

    /// Display name for logging.
    fn display_name(&self) -> &str;
}
