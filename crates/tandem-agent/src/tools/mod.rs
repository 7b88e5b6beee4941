//! Agent tools — trait, registry, and built-ins.

pub mod base;
pub mod math;
pub mod registry;

use std::sync::Arc;

pub use base::Tool;
pub use registry::ToolRegistry;

use math::{AddTool, CalculateTipTool, DivideTool, MultiplyTool, SubtractTool};

/// Build the registry of built-in tools.
pub fn builtin_registry() -> ToolRegistry {
    let mut tools = ToolRegistry::new();
    tools.register(Arc::new(AddTool));
    tools.register(Arc::new(SubtractTool));
    tools.register(Arc::new(MultiplyTool));
    tools.register(Arc::new(DivideTool));
    tools.register(Arc::new(CalculateTipTool));
    tools
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tools_registered() {
        let tools = builtin_registry();
        assert_eq!(
            tools.tool_names(),
            vec!["add", "calculate_tip", "divide", "multiply", "subtract"]
        );
    }
}
