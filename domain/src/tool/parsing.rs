//! Tool-call blocks embedded in participant output.
//!
//! ````text
//! ```tool
//! {"tool": "read_file", "args": {"path": "README.md"}}
//! ```
//! ````

use super::entities::ToolCall;
use super::value_objects::ToolError;

/// Parse every ```` ```tool ```` block independently.
///
/// A malformed block yields an `INVALID_ARGUMENT` error in its slot so the
/// remaining blocks are still processed. An unterminated block at the end
/// of the output is ignored.
pub fn parse_tool_blocks(response: &str) -> Vec<Result<ToolCall, ToolError>> {
    let mut calls = Vec::new();
    let mut in_tool_block = false;
    let mut current_block = String::new();

    for line in response.lines() {
        if !in_tool_block && line.trim() == "```tool" {
            in_tool_block = true;
            current_block.clear();
        } else if in_tool_block && line.trim() == "```" {
            in_tool_block = false;
            calls.push(parse_block(&current_block));
        } else if in_tool_block {
            current_block.push_str(line);
            current_block.push('\n');
        }
    }

    calls
}

fn parse_block(block: &str) -> Result<ToolCall, ToolError> {
    let parsed: serde_json::Value = serde_json::from_str(block)
        .map_err(|e| ToolError::invalid_argument(format!("Malformed tool block: {}", e)))?;
    let tool_name = parsed
        .get("tool")
        .and_then(|v| v.as_str())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ToolError::invalid_argument("Tool block is missing \"tool\""))?;

    let mut call = ToolCall::new(tool_name);
    match parsed.get("args") {
        None | Some(serde_json::Value::Null) => {}
        Some(serde_json::Value::Object(args)) => {
            for (key, value) in args {
                call = call.with_arg(key, value.clone());
            }
        }
        Some(_) => {
            return Err(ToolError::invalid_argument(format!(
                "Arguments of {} must be an object",
                tool_name
            )));
        }
    }
    Ok(call)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_block() {
        let response = "Let me check.\n```tool\n{\"tool\": \"read_file\", \"args\": {\"path\": \"README.md\"}}\n```\nDone.";
        let calls = parse_tool_blocks(response);
        assert_eq!(calls.len(), 1);
        let call = calls[0].as_ref().unwrap();
        assert_eq!(call.tool_name, "read_file");
        assert_eq!(call.text("path"), Some("README.md"));
    }

    #[test]
    fn test_malformed_block_does_not_hide_others() {
        let response = "```tool\n{not json\n```\n```tool\n{\"tool\": \"glob_search\", \"args\": {\"pattern\": \"*.rs\"}}\n```";
        let calls = parse_tool_blocks(response);
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].as_ref().unwrap_err().code, "INVALID_ARGUMENT");
        assert_eq!(calls[1].as_ref().unwrap().tool_name, "glob_search");
    }

    #[test]
    fn test_missing_tool_name_and_bad_args() {
        let response = "```tool\n{\"args\": {}}\n```\n```tool\n{\"tool\": \"read_file\", \"args\": [1]}\n```";
        let calls = parse_tool_blocks(response);
        assert!(calls.iter().all(|c| c.is_err()));
    }

    #[test]
    fn test_no_blocks() {
        assert!(parse_tool_blocks("```rust\nfn main() {}\n```").is_empty());
        assert!(parse_tool_blocks("```tool\n{\"tool\": \"read_file\"}").is_empty());
    }
}
