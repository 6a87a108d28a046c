//! Tool domain entities

use super::value_objects::ToolError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// What kind of value an argument takes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgKind {
    #[default]
    Text,
    /// Relative to the council's working directory
    Path,
    /// Non-negative integer
    Count,
}

impl fmt::Display for ArgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ArgKind::Text => "text",
            ArgKind::Path => "path",
            ArgKind::Count => "count",
        })
    }
}

/// One argument a tool accepts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolParameter {
    pub name: String,
    pub description: String,
    pub kind: ArgKind,
    pub required: bool,
}

/// A tool offered to participants, as described in their prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ToolParameter>,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
        }
    }

    pub fn required(self, name: &str, kind: ArgKind, description: &str) -> Self {
        self.param(name, kind, description, true)
    }

    pub fn optional(self, name: &str, kind: ArgKind, description: &str) -> Self {
        self.param(name, kind, description, false)
    }

    fn param(mut self, name: &str, kind: ArgKind, description: &str, required: bool) -> Self {
        self.parameters.push(ToolParameter {
            name: name.to_string(),
            description: description.to_string(),
            kind,
            required,
        });
        self
    }

    /// Prompt listing: the tool line followed by one indented line per argument
    pub fn usage(&self) -> String {
        let mut out = format!("- {}: {}", self.name, self.description);
        for p in &self.parameters {
            let need = if p.required { "required" } else { "optional" };
            out.push_str(&format!(
                "\n    - {} ({}, {}): {}",
                p.name, p.kind, need, p.description
            ));
        }
        out
    }
}

/// The tools offered to participants, ordered by name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolSpec {
    tools: BTreeMap<String, ToolDefinition>,
}

impl ToolSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, tool: ToolDefinition) -> Self {
        self.tools.insert(tool.name.clone(), tool);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.get(name)
    }

    pub fn all(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.tools.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(|s| s.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// A parsed ```` ```tool ```` block: `{"tool": ..., "args": {...}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    #[serde(rename = "tool")]
    pub tool_name: String,
    #[serde(default)]
    pub args: BTreeMap<String, Value>,
}

impl ToolCall {
    pub fn new(tool_name: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            args: BTreeMap::new(),
        }
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.args.insert(key.into(), value.into());
        self
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.args.get(key).and_then(Value::as_str)
    }

    pub fn required_text(&self, key: &str) -> Result<&str, ToolError> {
        self.text(key).ok_or_else(|| ToolError::missing_argument(key))
    }

    /// Absent is fine; present but not a non-negative integer is rejected.
    pub fn count(&self, key: &str) -> Result<Option<usize>, ToolError> {
        match self.args.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(v) => v.as_u64().map(|n| Some(n as usize)).ok_or_else(|| {
                ToolError::invalid_argument(format!("{} must be a non-negative integer", key))
            }),
        }
    }
}
