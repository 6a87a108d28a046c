//! Search tool: glob_search

use super::sandbox;
use council_domain::{ArgKind, ToolCall, ToolDefinition, ToolError};
use glob::glob;
use std::path::Path;

/// Tool name constant
pub const GLOB_SEARCH: &str = "glob_search";

/// Maximum number of results to return
const MAX_RESULTS: usize = 200;

/// Get the tool definition for glob_search
pub fn glob_search_definition() -> ToolDefinition {
    ToolDefinition::new(
        GLOB_SEARCH,
        "Find files matching a glob pattern (e.g., '**/*.md', 'docs/*.txt')",
    )
    .required("pattern", ArgKind::Text, "Glob pattern, relative to the working directory")
    .optional(
        "max_results",
        ArgKind::Count,
        "Maximum number of results to return (default: 200)",
    )
}

/// Execute the glob_search tool inside `root` (canonical)
pub fn execute_glob_search(root: &Path, call: &ToolCall) -> Result<String, ToolError> {
    let pattern = call.required_text("pattern")?;
    if !sandbox::is_confined_pattern(pattern) {
        return Err(ToolError::permission_denied(pattern));
    }

    let max_results = call
        .count("max_results")?
        .unwrap_or(MAX_RESULTS)
        .clamp(1, MAX_RESULTS);

    let full_pattern = root.join(pattern.trim_start_matches("./"));
    let entries = glob(&full_pattern.to_string_lossy())
        .map_err(|e| ToolError::invalid_argument(format!("Invalid glob pattern: {}", e)))?;

    let mut results = Vec::new();
    let mut truncated = false;
    for path in entries.flatten() {
        // Symlinks may point outside the root
        let Ok(canonical) = path.canonicalize() else {
            continue;
        };
        let Ok(relative) = canonical.strip_prefix(root) else {
            continue;
        };
        if results.len() == max_results {
            truncated = true;
            break;
        }
        results.push(relative.display().to_string());
    }

    if results.is_empty() {
        return Ok("No files found matching the pattern".to_string());
    }

    let mut output = results.join("\n");
    if truncated {
        output.push_str(&format!("\n... (limited to {} results)", max_results));
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workspace() -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("docs/minutes")).unwrap();
        std::fs::write(dir.path().join("docs/charter.md"), "").unwrap();
        std::fs::write(dir.path().join("docs/minutes/2024-01.md"), "").unwrap();
        std::fs::write(dir.path().join("budget.csv"), "").unwrap();
        let root = dir.path().canonicalize().unwrap();
        (dir, root)
    }

    #[test]
    fn test_glob_search_relative_results() {
        let (_dir, root) = workspace();
        let call = ToolCall::new(GLOB_SEARCH).with_arg("pattern", "**/*.md");
        let output = execute_glob_search(&root, &call).unwrap();
        let mut lines: Vec<&str> = output.lines().collect();
        lines.sort();
        assert_eq!(lines, vec!["docs/charter.md", "docs/minutes/2024-01.md"]);
    }

    #[test]
    fn test_glob_search_limit_and_empty() {
        let (_dir, root) = workspace();
        let limited = ToolCall::new(GLOB_SEARCH)
            .with_arg("pattern", "**/*.md")
            .with_arg("max_results", 1);
        let output = execute_glob_search(&root, &limited).unwrap();
        assert!(output.ends_with("... (limited to 1 results)"));

        let none = ToolCall::new(GLOB_SEARCH).with_arg("pattern", "*.rs");
        assert_eq!(
            execute_glob_search(&root, &none).unwrap(),
            "No files found matching the pattern"
        );
    }

    #[test]
    fn test_glob_search_rejects_escaping_patterns() {
        let (_dir, root) = workspace();
        let call = ToolCall::new(GLOB_SEARCH).with_arg("pattern", "../**/*");
        assert_eq!(
            execute_glob_search(&root, &call).unwrap_err().code,
            "PERMISSION_DENIED"
        );
        let invalid = ToolCall::new(GLOB_SEARCH).with_arg("pattern", "[");
        assert_eq!(
            execute_glob_search(&root, &invalid).unwrap_err().code,
            "INVALID_ARGUMENT"
        );
    }
}
