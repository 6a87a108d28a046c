//! Tool Executor port
//!
//! Defines the interface for executing tools requested in participant output.

use async_trait::async_trait;
use council_domain::{ToolCall, ToolError, ToolSpec};

/// Port for tool execution
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait ToolExecutorPort: Send + Sync {
    /// Get the specification of all available tools
    fn tool_spec(&self) -> &ToolSpec;

    /// Check if a tool is available
    fn has_tool(&self, name: &str) -> bool {
        self.tool_spec().get(name).is_some()
    }

    /// Execute a tool call, returning its text output
    async fn execute(&self, call: &ToolCall) -> Result<String, ToolError>;
}

/// Executor offering no tools
#[derive(Default)]
pub struct NoTools {
    spec: ToolSpec,
}

#[async_trait]
impl ToolExecutorPort for NoTools {
    fn tool_spec(&self) -> &ToolSpec {
        &self.spec
    }

    async fn execute(&self, call: &ToolCall) -> Result<String, ToolError> {
        Err(ToolError::unknown_tool(&call.tool_name))
    }
}
