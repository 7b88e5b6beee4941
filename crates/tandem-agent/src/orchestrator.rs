//! Conversation orchestrator — the decision ↔ confirmation ↔ execution loop.
//!
//! One `run` call owns one transcript. The loop queries the decision source,
//! gates each proposed tool call behind a user confirmation, drives the
//! execution cycle, and appends confirmed outcomes until the model produces
//! a final answer, the user declines a call, or execution is cancelled.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use tandem_core::types::{Message, ToolCall};
use tandem_core::utils::truncate_string;
use tandem_providers::{LlmProvider, LlmRequestConfig};

use crate::confirm::{ConfirmationGate, Prompter};
use crate::cycle::{CycleOutcome, ToolExecutionCycle};
use crate::tools::ToolRegistry;

/// Default maximum decision queries per conversation.
const DEFAULT_MAX_STEPS: usize = 20;

/// Returned when the user cancels execution via an empty override.
const CANCELLED_MESSAGE: &str = "Operation cancelled by user.";

/// Returned when the step budget runs out before a final answer.
const NO_ANSWER_MESSAGE: &str = "I've run out of steps before reaching an answer.";

/// Instruction appended when the user declines a tool call.
const DECLINE_INSTRUCTION: &str =
    "I don't want to use any tools. Please respond directly without using tools.";

/// Synthetic tool-result content recorded for a declined call, so the
/// proposal turn always has its matching result turn.
const DECLINED_RESULT_NOTE: &str = "Tool execution declined by user.";

// ─────────────────────────────────────────────
// ConversationOrchestrator
// ─────────────────────────────────────────────

/// The top-level conversation loop.
pub struct ConversationOrchestrator {
    /// Decision source.
    provider: Arc<dyn LlmProvider>,
    /// Registered tools, injected at startup.
    tools: ToolRegistry,
    /// Human input boundary (also used for override values).
    prompter: Arc<dyn Prompter>,
    /// Confirmation gate over the same prompter.
    gate: ConfirmationGate,
    /// Model to use (overrides provider default if set).
    model: String,
    /// LLM request config (temperature, max_tokens).
    request_config: LlmRequestConfig,
    /// Max decision queries per conversation.
    max_steps: usize,
}

impl ConversationOrchestrator {
    /// Create a new orchestrator.
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        tools: ToolRegistry,
        prompter: Arc<dyn Prompter>,
        model: Option<String>,
        request_config: Option<LlmRequestConfig>,
        max_steps: Option<usize>,
    ) -> Self {
        let model = model.unwrap_or_else(|| provider.default_model().to_string());
        let gate = ConfirmationGate::new(prompter.clone());

        info!(
            model = %model,
            tools = tools.len(),
            max_steps = max_steps.unwrap_or(DEFAULT_MAX_STEPS),
            "orchestrator initialized"
        );

        Self {
            provider,
            tools,
            prompter,
            gate,
            model,
            request_config: request_config.unwrap_or_default(),
            max_steps: max_steps.unwrap_or(DEFAULT_MAX_STEPS),
        }
    }

    /// Run one conversation from a user query to a final answer.
    ///
    /// Returns the model's answer text, or a cancellation notice when the
    /// user cancelled execution. Unknown tools, tool failures, and decision
    /// source failures are fatal to the run.
    pub async fn run(&self, query: &str) -> Result<String> {
        let mut transcript = vec![Message::system(self.system_prompt()), Message::user(query)];
        let tool_defs = self.tools.definitions();

        for step in 1..=self.max_steps {
            let response = self
                .provider
                .chat(&transcript, Some(&tool_defs), &self.model, &self.request_config)
                .await
                .context("decision query failed")?;

            if !response.has_tool_calls() {
                // Final answer — terminal, success path.
                return Ok(response.text());
            }

            if response.tool_calls.len() > 1 {
                warn!(
                    count = response.tool_calls.len(),
                    "provider proposed multiple tool calls, handling the first only"
                );
            }
            let call = response.tool_calls[0].clone();
            info!(step = step, tool = call.name(), "tool call proposed");

            let question = format!(
                "Tool call requested: {}({})\nExecute this tool? [y/n] ",
                call.name(),
                call.format_arguments()
            );
            if !self.gate.confirm(&question)? {
                return self.respond_without_tools(transcript, call).await;
            }

            let cycle = ToolExecutionCycle::new(&self.tools, &self.gate, self.prompter.as_ref());
            match cycle.run(&call).await {
                Ok(CycleOutcome::Accepted(value)) => {
                    debug!(
                        tool = call.name(),
                        value = %truncate_string(&value, 80),
                        "tool result accepted"
                    );
                    transcript.push(Message::assistant_tool_calls(vec![call.clone()]));
                    transcript.push(Message::tool_result(&call.id, value));
                }
                Ok(CycleOutcome::Cancelled) => {
                    // Terminal, cancelled path — no further decision query.
                    return Ok(CANCELLED_MESSAGE.to_string());
                }
                Err(err) => {
                    // Record the failed exchange before aborting the run.
                    transcript.push(Message::assistant_tool_calls(vec![call.clone()]));
                    transcript.push(Message::tool_result(&call.id, format!("Error: {err}")));
                    return Err(err)
                        .with_context(|| format!("tool call '{}' failed", call.name()));
                }
            }
        }

        warn!(
            max_steps = self.max_steps,
            "step budget exhausted without a final answer"
        );
        Ok(NO_ANSWER_MESSAGE.to_string())
    }

    /// Declined path: record both sides of the declined exchange, then
    /// re-query once with tool proposals disabled and return text only.
    async fn respond_without_tools(
        &self,
        mut transcript: Vec<Message>,
        call: ToolCall,
    ) -> Result<String> {
        info!(tool = call.name(), "tool call declined by user");

        transcript.push(Message::assistant_tool_calls(vec![call.clone()]));
        transcript.push(Message::tool_result(&call.id, DECLINED_RESULT_NOTE));
        transcript.push(Message::user(DECLINE_INSTRUCTION));

        let response = self
            .provider
            .chat(&transcript, None, &self.model, &self.request_config)
            .await
            .context("decision query failed")?;

        if response.has_tool_calls() {
            // The model ignored the disabled-tools constraint; extract text
            // only and never execute.
            warn!("provider proposed a tool call with tools disabled, ignoring it");
        }
        Ok(response.text())
    }

    /// System identity turn seeding every transcript.
    fn system_prompt(&self) -> String {
        let today = chrono::Utc::now().format("%Y-%m-%d");
        let os = std::env::consts::OS;
        let arch = std::env::consts::ARCH;
        format!(
            "You are **Tandem**, an AI assistant working in tandem with its user.\n\n\
             - **Date**: {today}\n\
             - **Runtime**: Rust on {os}/{arch}\n\n\
             You have access to tools. Every tool call you propose is shown to \
             the user for confirmation before it runs, and every result is \
             confirmed before you see it. Propose at most one tool call at a \
             time, and be concise."
        )
    }

    /// Get a reference to the tool registry (for testing/extension).
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Get the model name.
    pub fn model(&self) -> &str {
        &self.model
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confirm::testing::ScriptedPrompter;
    use crate::tools::{builtin_registry, Tool};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tandem_core::types::{LlmResponse, ResponseContent, ToolDefinition};
    use tandem_core::AgentError;

    /// A mock decision source that returns canned responses and records
    /// every query it receives.
    struct MockProvider {
        responses: Mutex<Vec<LlmResponse>>,
        /// One entry per chat call: (tools_enabled, transcript snapshot).
        queries: Mutex<Vec<(bool, Vec<Message>)>>,
    }

    impl MockProvider {
        fn new(responses: Vec<LlmResponse>) -> Self {
            Self {
                responses: Mutex::new(responses),
                queries: Mutex::new(Vec::new()),
            }
        }

        fn text_response(text: &str) -> LlmResponse {
            LlmResponse {
                content: Some(ResponseContent::Text(text.into())),
                ..Default::default()
            }
        }

        fn tool_response(calls: Vec<ToolCall>) -> LlmResponse {
            LlmResponse {
                tool_calls: calls,
                ..Default::default()
            }
        }

        fn query_count(&self) -> usize {
            self.queries.lock().unwrap().len()
        }

        fn query(&self, index: usize) -> (bool, Vec<Message>) {
            self.queries.lock().unwrap()[index].clone()
        }
    }

    #[async_trait]
    impl LlmProvider for MockProvider {
        async fn chat(
            &self,
            messages: &[Message],
            tools: Option<&[ToolDefinition]>,
            _model: &str,
            _config: &LlmRequestConfig,
        ) -> Result<LlmResponse> {
            self.queries
                .lock()
                .unwrap()
                .push((tools.is_some(), messages.to_vec()));
            let mut responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                Ok(MockProvider::text_response("(no more responses)"))
            } else {
                Ok(responses.remove(0))
            }
        }

        fn default_model(&self) -> &str {
            "mock-model"
        }

        fn display_name(&self) -> &str {
            "MockProvider"
        }
    }

    /// A decision source that always fails.
    struct FailingProvider;

    #[async_trait]
    impl LlmProvider for FailingProvider {
        async fn chat(
            &self,
            _messages: &[Message],
            _tools: Option<&[ToolDefinition]>,
            _model: &str,
            _config: &LlmRequestConfig,
        ) -> Result<LlmResponse> {
            anyhow::bail!("connection refused")
        }

        fn default_model(&self) -> &str {
            "mock-model"
        }

        fn display_name(&self) -> &str {
            "FailingProvider"
        }
    }

    /// Tool that counts invocations (to prove the declined path never runs it).
    struct CountingTool {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Tool for CountingTool {
        fn name(&self) -> &str {
            "counting"
        }
        fn description(&self) -> &str {
            "Counts invocations"
        }
        fn parameters(&self) -> serde_json::Value {
            serde_json::json!({"type": "object", "properties": {}, "required": []})
        }
        async fn execute(
            &self,
            _params: HashMap<String, serde_json::Value>,
        ) -> anyhow::Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok("counted".into())
        }
    }

    fn orchestrator(
        provider: Arc<MockProvider>,
        prompter: Arc<ScriptedPrompter>,
    ) -> ConversationOrchestrator {
        ConversationOrchestrator::new(
            provider,
            builtin_registry(),
            prompter,
            None,
            None,
            Some(5),
        )
    }

    #[tokio::test]
    async fn test_direct_answer_no_tools() {
        let provider = Arc::new(MockProvider::new(vec![MockProvider::text_response(
            "Hello from Tandem!",
        )]));
        let prompter = Arc::new(ScriptedPrompter::new(vec![], vec![]));
        let orch = orchestrator(provider.clone(), prompter.clone());

        let result = orch.run("Hi").await.unwrap();
        assert_eq!(result, "Hello from Tandem!");
        assert_eq!(provider.query_count(), 1);
        // No confirmation was ever needed.
        assert!(prompter.asked().is_empty());
    }

    #[tokio::test]
    async fn test_confirmed_tool_call_end_to_end() {
        // "What is 3 + 2?" → add(3, 2) → 5 → final answer.
        let provider = Arc::new(MockProvider::new(vec![
            MockProvider::tool_response(vec![ToolCall::new(
                "call_1",
                "add",
                r#"{"a": 3, "b": 2}"#,
            )]),
            MockProvider::text_response("3 + 2 = 5"),
        ]));
        // yes: execute, yes: accept result
        let prompter = Arc::new(ScriptedPrompter::new(vec![true, true], vec![]));
        let orch = orchestrator(provider.clone(), prompter.clone());

        let result = orch.run("What is 3 + 2?").await.unwrap();
        assert_eq!(result, "3 + 2 = 5");

        // Both queries had tools enabled.
        assert_eq!(provider.query_count(), 2);
        assert!(provider.query(0).0);
        assert!(provider.query(1).0);

        // The second query saw the proposal turn and the confirmed result.
        let (_, transcript) = provider.query(1);
        assert!(transcript.contains(&Message::assistant_tool_calls(vec![ToolCall::new(
            "call_1",
            "add",
            r#"{"a": 3, "b": 2}"#,
        )])));
        assert!(transcript.contains(&Message::tool_result("call_1", "5")));

        // The execute question displayed name and formatted args.
        assert!(prompter.asked()[0].contains("add(a=3, b=2)"));
    }

    #[tokio::test]
    async fn test_declined_tool_call_responds_without_tools() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut tools = builtin_registry();
        tools.register(Arc::new(CountingTool {
            calls: calls.clone(),
        }));

        let provider = Arc::new(MockProvider::new(vec![
            MockProvider::tool_response(vec![ToolCall::new("call_1", "counting", "{}")]),
            MockProvider::text_response("A direct answer, no tools."),
        ]));
        let prompter = Arc::new(ScriptedPrompter::new(vec![false], vec![]));
        let orch = ConversationOrchestrator::new(
            provider.clone(),
            tools,
            prompter.clone(),
            None,
            None,
            Some(5),
        );

        let result = orch.run("count something").await.unwrap();
        assert_eq!(result, "A direct answer, no tools.");

        // The tool was never invoked.
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        // The second query had tools disabled and saw the decline exchange.
        assert_eq!(provider.query_count(), 2);
        let (tools_enabled, transcript) = provider.query(1);
        assert!(!tools_enabled);
        assert!(transcript.contains(&Message::user(DECLINE_INSTRUCTION)));
        assert!(transcript.contains(&Message::tool_result("call_1", DECLINED_RESULT_NOTE)));
        // The proposal turn is recorded too.
        assert!(transcript
            .iter()
            .any(|m| matches!(m, Message::Assistant { tool_calls: Some(_), .. })));
    }

    #[tokio::test]
    async fn test_declined_path_ignores_stray_tool_call() {
        // The tools-disabled re-query still proposes a call; only its text
        // must be used.
        let stray = LlmResponse {
            content: Some(ResponseContent::Text("Fine, here's my answer.".into())),
            tool_calls: vec![ToolCall::new("call_2", "add", "{}")],
            ..Default::default()
        };
        let provider = Arc::new(MockProvider::new(vec![
            MockProvider::tool_response(vec![ToolCall::new("call_1", "add", "{}")]),
            stray,
        ]));
        let prompter = Arc::new(ScriptedPrompter::new(vec![false], vec![]));
        let orch = orchestrator(provider.clone(), prompter.clone());

        let result = orch.run("whatever").await.unwrap();
        assert_eq!(result, "Fine, here's my answer.");
        // Only the decline confirmation was asked; nothing was executed.
        assert_eq!(prompter.asked().len(), 1);
    }

    #[tokio::test]
    async fn test_override_value_enters_transcript() {
        let provider = Arc::new(MockProvider::new(vec![
            MockProvider::tool_response(vec![ToolCall::new(
                "call_1",
                "add",
                r#"{"a": 3, "b": 2}"#,
            )]),
            MockProvider::text_response("So the answer is 7."),
        ]));
        // yes: execute, no: reject result, no: reject result, override "7"
        let prompter = Arc::new(ScriptedPrompter::new(vec![true, false, false], vec!["7"]));
        let orch = orchestrator(provider.clone(), prompter.clone());

        let result = orch.run("What is 3 + 2?").await.unwrap();
        assert_eq!(result, "So the answer is 7.");

        // The follow-up query proceeds as if the tool had returned "7".
        let (_, transcript) = provider.query(1);
        assert!(transcript.contains(&Message::tool_result("call_1", "7")));
    }

    #[tokio::test]
    async fn test_empty_override_cancels_run() {
        let provider = Arc::new(MockProvider::new(vec![MockProvider::tool_response(vec![
            ToolCall::new("call_1", "add", r#"{"a": 3, "b": 2}"#),
        ])]));
        let prompter = Arc::new(ScriptedPrompter::new(vec![true, false, false], vec![""]));
        let orch = orchestrator(provider.clone(), prompter.clone());

        let result = orch.run("What is 3 + 2?").await.unwrap();
        assert_eq!(result, CANCELLED_MESSAGE);

        // No further decision query after the cancellation.
        assert_eq!(provider.query_count(), 1);
    }

    #[tokio::test]
    async fn test_tool_failure_is_fatal() {
        let provider = Arc::new(MockProvider::new(vec![MockProvider::tool_response(vec![
            ToolCall::new("call_1", "divide", r#"{"a": 20, "b": 0}"#),
        ])]));
        let prompter = Arc::new(ScriptedPrompter::new(vec![true], vec![]));
        let orch = orchestrator(provider.clone(), prompter.clone());

        let err = orch.run("divide by zero please").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AgentError>(),
            Some(AgentError::ToolFailed { name, .. }) if name == "divide"
        ));
        // No retry loop was entered: the single result confirmation never
        // happened, only the execute confirmation.
        assert_eq!(prompter.asked().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_tool_is_fatal() {
        let provider = Arc::new(MockProvider::new(vec![MockProvider::tool_response(vec![
            ToolCall::new("call_1", "bogus", "{}"),
        ])]));
        let prompter = Arc::new(ScriptedPrompter::new(vec![true], vec![]));
        let orch = orchestrator(provider.clone(), prompter.clone());

        let err = orch.run("use a tool I don't have").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AgentError>(),
            Some(AgentError::UnknownTool { name }) if name == "bogus"
        ));
    }

    #[tokio::test]
    async fn test_provider_failure_is_fatal() {
        let prompter = Arc::new(ScriptedPrompter::new(vec![], vec![]));
        let orch = ConversationOrchestrator::new(
            Arc::new(FailingProvider),
            builtin_registry(),
            prompter,
            None,
            None,
            Some(5),
        );

        let err = orch.run("hello?").await.unwrap_err();
        assert!(err.to_string().contains("decision query failed"));
    }

    #[tokio::test]
    async fn test_multiple_proposed_calls_truncated_to_first() {
        let provider = Arc::new(MockProvider::new(vec![
            MockProvider::tool_response(vec![
                ToolCall::new("call_1", "add", r#"{"a": 1, "b": 2}"#),
                ToolCall::new("call_2", "multiply", r#"{"a": 3, "b": 4}"#),
            ]),
            MockProvider::text_response("done"),
        ]));
        let prompter = Arc::new(ScriptedPrompter::new(vec![true, true], vec![]));
        let orch = orchestrator(provider.clone(), prompter.clone());

        let result = orch.run("two calls").await.unwrap();
        assert_eq!(result, "done");

        // Only the first call's result is in the transcript.
        let (_, transcript) = provider.query(1);
        assert!(transcript.contains(&Message::tool_result("call_1", "3")));
        assert!(!transcript.iter().any(
            |m| matches!(m, Message::Tool { tool_call_id, .. } if tool_call_id == "call_2"),
        ));
    }

    #[tokio::test]
    async fn test_chained_tool_calls() {
        // Model chains two confirmed calls before answering.
        let provider = Arc::new(MockProvider::new(vec![
            MockProvider::tool_response(vec![ToolCall::new(
                "call_1",
                "add",
                r#"{"a": 3, "b": 2}"#,
            )]),
            MockProvider::tool_response(vec![ToolCall::new(
                "call_2",
                "multiply",
                r#"{"a": 5, "b": 2}"#,
            )]),
            MockProvider::text_response("(3 + 2) * 2 = 10"),
        ]));
        let prompter = Arc::new(ScriptedPrompter::new(vec![true, true, true, true], vec![]));
        let orch = orchestrator(provider.clone(), prompter.clone());

        let result = orch.run("add then double").await.unwrap();
        assert_eq!(result, "(3 + 2) * 2 = 10");

        let (_, transcript) = provider.query(2);
        assert!(transcript.contains(&Message::tool_result("call_1", "5")));
        assert!(transcript.contains(&Message::tool_result("call_2", "10")));
    }

    #[tokio::test]
    async fn test_step_budget_exhaustion() {
        // Every response proposes a call; the step budget must end the loop.
        let responses: Vec<LlmResponse> = (0..4)
            .map(|i| {
                MockProvider::tool_response(vec![ToolCall::new(
                    format!("call_{i}"),
                    "add",
                    r#"{"a": 1, "b": 1}"#,
                )])
            })
            .collect();
        let provider = Arc::new(MockProvider::new(responses));
        let prompter = Arc::new(ScriptedPrompter::new(vec![true; 8], vec![]));
        let orch = ConversationOrchestrator::new(
            provider.clone(),
            builtin_registry(),
            prompter,
            None,
            None,
            Some(2),
        );

        let result = orch.run("loop forever").await.unwrap();
        assert_eq!(result, NO_ANSWER_MESSAGE);
        assert_eq!(provider.query_count(), 2);
    }

    #[tokio::test]
    async fn test_block_content_final_answer() {
        let response = LlmResponse {
            content: Some(
                serde_json::from_value(serde_json::json!([
                    {"type": "text", "text": "block "},
                    {"type": "image", "url": "ignored"},
                    {"type": "text", "text": "answer"}
                ]))
                .unwrap(),
            ),
            ..Default::default()
        };
        let provider = Arc::new(MockProvider::new(vec![response]));
        let prompter = Arc::new(ScriptedPrompter::new(vec![], vec![]));
        let orch = orchestrator(provider, prompter);

        let result = orch.run("hi").await.unwrap();
        assert_eq!(result, "block answer");
    }

    #[test]
    fn test_model_defaults_to_provider() {
        let provider = Arc::new(MockProvider::new(vec![]));
        let prompter = Arc::new(ScriptedPrompter::new(vec![], vec![]));
        let orch = orchestrator(provider, prompter);
        assert_eq!(orch.model(), "mock-model");
        assert_eq!(orch.tools().len(), 5);
    }
}
