//! Local tool executor: the concrete implementation of [`ToolExecutorPort`].
//!
//! All tools are read-only and confined to one root directory (the
//! working directory by default). File I/O runs on the blocking pool.

use super::{file, search};
use async_trait::async_trait;
use council_application::ports::tool_executor::ToolExecutorPort;
use council_domain::{ToolCall, ToolError, ToolSpec};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct LocalToolExecutor {
    tool_spec: ToolSpec,
    root: Arc<PathBuf>,
}

impl LocalToolExecutor {
    /// Executor offering every tool below `root`
    pub fn new(root: impl AsRef<Path>) -> std::io::Result<Self> {
        Ok(Self {
            tool_spec: super::default_tool_spec(),
            root: Arc::new(root.as_ref().canonicalize()?),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn execute_blocking(root: &Path, call: &ToolCall) -> Result<String, ToolError> {
        match call.tool_name.as_str() {
            file::READ_FILE => file::execute_read_file(root, call),
            search::GLOB_SEARCH => search::execute_glob_search(root, call),
            other => Err(ToolError::unknown_tool(other)),
        }
    }
}

#[async_trait]
impl ToolExecutorPort for LocalToolExecutor {
    fn tool_spec(&self) -> &ToolSpec {
        &self.tool_spec
    }

    async fn execute(&self, call: &ToolCall) -> Result<String, ToolError> {
        if !self.has_tool(&call.tool_name) {
            return Err(ToolError::unknown_tool(&call.tool_name));
        }
        debug!(tool = %call.tool_name, "Running tool");

        let root = Arc::clone(&self.root);
        let call = call.clone();
        tokio::task::spawn_blocking(move || Self::execute_blocking(&root, &call))
            .await
            .map_err(|e| ToolError::execution_failed(format!("Tool task failed: {}", e)))?
    }
}
