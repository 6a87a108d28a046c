//! Tool calls embedded in participant output.
//!
//! Every ```` ```tool ```` block is parsed and executed on its own; results
//! and errors are appended to the turn's content in block order.

use crate::ports::tool_executor::ToolExecutorPort;
use council_domain::parse_tool_blocks;
use tracing::{debug, warn};

pub(super) async fn intercept_tool_calls(
    tools: &dyn ToolExecutorPort,
    session_id: &str,
    content: &str,
) -> String {
    let calls = parse_tool_blocks(content);
    if calls.is_empty() {
        return content.to_string();
    }

    let mut output = content.to_string();
    for parsed in calls {
        let call = match parsed {
            Ok(call) => call,
            Err(e) => {
                warn!(session_id, error = %e, "Malformed tool block");
                output.push_str(&format!("\n\n[Tool error: {}]", e));
                continue;
            }
        };
        debug!(session_id, tool = %call.tool_name, "Executing tool");
        match tools.execute(&call).await {
            Ok(result) => {
                output.push_str(&format!("\n\n[Tool result: {}]\n{}", call.tool_name, result));
            }
            Err(e) => {
                warn!(session_id, tool = %call.tool_name, error = %e, "Tool execution failed");
                output.push_str(&format!("\n\n[Tool error: {}] {}", call.tool_name, e));
            }
        }
    }
    output
}
