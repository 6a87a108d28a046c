//! File reading tool: read_file

use super::sandbox;
use council_domain::{ArgKind, ToolCall, ToolDefinition, ToolError, ToolErrorCode};
use std::fs;
use std::path::Path;

/// Tool name constant
pub const READ_FILE: &str = "read_file";

/// Maximum file size to read (1 MB)
pub const MAX_READ_SIZE: u64 = 1024 * 1024;

/// Get the tool definition for read_file
pub fn read_file_definition() -> ToolDefinition {
    ToolDefinition::new(READ_FILE, "Read a text file below the council's working directory")
        .required("path", ArgKind::Path, "Path of the file, relative to the working directory")
        .optional("offset", ArgKind::Count, "Line number to start reading from (0-indexed)")
        .optional("limit", ArgKind::Count, "Maximum number of lines to read")
}

/// Execute the read_file tool inside `root` (canonical)
pub fn execute_read_file(root: &Path, call: &ToolCall) -> Result<String, ToolError> {
    let requested = call.required_text("path")?;
    let path = sandbox::resolve(root, requested)?;

    if !path.is_file() {
        return Err(ToolError::invalid_argument(format!(
            "'{}' is not a file",
            requested
        )));
    }

    let metadata = fs::metadata(&path)
        .map_err(|e| ToolError::execution_failed(format!("Failed to get file metadata: {}", e)))?;
    if metadata.len() > MAX_READ_SIZE {
        return Err(ToolError::invalid_argument(format!(
            "File too large ({} bytes). Maximum size is {} bytes",
            metadata.len(),
            MAX_READ_SIZE
        )));
    }

    let content = fs::read_to_string(&path).map_err(|e| match e.kind() {
        std::io::ErrorKind::PermissionDenied => ToolError::new(
            ToolErrorCode::PermissionDenied,
            format!("Permission denied: {}", requested),
        ),
        std::io::ErrorKind::InvalidData => {
            ToolError::invalid_argument(format!("'{}' is not valid UTF-8 text", requested))
        }
        _ => ToolError::execution_failed(format!("Failed to read file: {}", e)),
    })?;

    let offset = call.count("offset")?.unwrap_or(0);
    let limit = call.count("limit")?;
    if offset == 0 && limit.is_none() {
        return Ok(content);
    }

    let lines = content.lines().skip(offset);
    let selected: Vec<&str> = match limit {
        Some(limit) => lines.take(limit).collect(),
        None => lines.collect(),
    };
    Ok(selected.join("\n"))
}
