//! Tool Registry — tool lookup and dispatch with typed failures.
//!
//! The orchestrator registers tools here and dispatches confirmed tool-call
//! requests by name. Unknown names and crashing tools surface as
//! `AgentError` values, distinct from a user rejecting a result.

use std::collections::HashMap;
use std::sync::Arc;

use tandem_core::types::ToolDefinition;
use tandem_core::AgentError;
use tracing::{debug, info};

use super::base::Tool;

// ─────────────────────────────────────────────
// Registry
// ─────────────────────────────────────────────

/// Stores tools keyed by name and dispatches calls.
///
/// Owns `Arc<dyn Tool>` so tools can be shared across threads.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool. Overwrites any previous tool with the same name.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        info!(tool = tool.name(), "registered tool");
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Look up a tool by name.
    pub fn resolve(&self, name: &str) -> Result<&Arc<dyn Tool>, AgentError> {
        self.tools.get(name).ok_or_else(|| AgentError::UnknownTool {
            name: name.to_string(),
        })
    }

    /// Check if a tool is registered.
    pub fn has(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Names of all registered tools, sorted for determinism.
    pub fn tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Get the LLM-facing definitions for all registered tools.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let mut defs: Vec<ToolDefinition> =
            self.tools.values().map(|t| t.to_definition()).collect();
        defs.sort_by(|a, b| a.function.name.cmp(&b.function.name));
        defs
    }

    /// Invoke a tool by name with the given parameters.
    ///
    /// Unknown names fail with `UnknownTool`; failures from the tool itself
    /// propagate as `ToolFailed` carrying the tool name and original cause.
    pub async fn invoke(
        &self,
        name: &str,
        params: HashMap<String, serde_json::Value>,
    ) -> Result<String, AgentError> {
        let tool = self.resolve(name)?;
        debug!(tool = name, "invoking tool");
        tool.execute(params)
            .await
            .map_err(|source| AgentError::ToolFailed {
                name: name.to_string(),
                source,
            })
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
