//! Tools participants may invoke from their output
//!
//! Every tool is read-only and confined to the executor's root directory:
//! - `read_file`: size-capped text read with optional line window
//! - `glob_search`: file discovery by glob pattern

pub mod file;
pub mod search;

mod executor;
mod sandbox;

pub use executor::LocalToolExecutor;

use council_domain::ToolSpec;

/// Tool specification with every available tool
pub fn default_tool_spec() -> ToolSpec {
    ToolSpec::new()
        .register(file::read_file_definition())
        .register(search::glob_search_definition())
}
