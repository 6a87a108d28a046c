//! Tool error value object
//!
//! A failed tool call never fails the turn; its [`ToolError`] is written
//! inline into the participant's message instead.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a tool call was refused or failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ToolErrorCode {
    /// Malformed block, missing or mistyped argument
    InvalidArgument,
    /// Unknown tool or missing file
    NotFound,
    /// Path escapes the working directory
    PermissionDenied,
    /// I/O failure while running the tool
    ExecutionFailed,
}

impl ToolErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolErrorCode::InvalidArgument => "INVALID_ARGUMENT",
            ToolErrorCode::NotFound => "NOT_FOUND",
            ToolErrorCode::PermissionDenied => "PERMISSION_DENIED",
            ToolErrorCode::ExecutionFailed => "EXECUTION_FAILED",
        }
    }
}

impl fmt::Display for ToolErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PartialEq<&str> for ToolErrorCode {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

/// Error raised while parsing or running a tool call.
///
/// Rendered as `[CODE] message`, which is what participants see inline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolError {
    pub code: ToolErrorCode,
    pub message: String,
}

impl ToolError {
    pub fn new(code: ToolErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ToolErrorCode::InvalidArgument, message)
    }

    pub fn missing_argument(key: &str) -> Self {
        Self::invalid_argument(format!("Missing required argument: {}", key))
    }

    pub fn unknown_tool(name: impl fmt::Display) -> Self {
        Self::new(ToolErrorCode::NotFound, format!("Unknown tool: {}", name))
    }

    pub fn not_found(path: impl fmt::Display) -> Self {
        Self::new(ToolErrorCode::NotFound, format!("No such file: {}", path))
    }

    pub fn permission_denied(path: impl fmt::Display) -> Self {
        Self::new(
            ToolErrorCode::PermissionDenied,
            format!("Outside the working directory: {}", path),
        )
    }

    pub fn execution_failed(message: impl Into<String>) -> Self {
        Self::new(ToolErrorCode::ExecutionFailed, message)
    }
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ToolError {}
