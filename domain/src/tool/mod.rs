//! Tool domain
//!
//! Participants may ask for local tools by writing a ```` ```tool ```` block
//! in their output. The block is parsed into a [`ToolCall`]; the result (or
//! [`ToolError`]) is written back inline into the same message.
//!
//! - [`ToolSpec`]: the tools offered to participants
//! - [`ToolDefinition`]: schema for a single tool
//! - [`parse_tool_blocks`]: block extraction, one result per block

pub mod entities;
pub mod parsing;
pub mod value_objects;

pub use entities::{ArgKind, ToolCall, ToolDefinition, ToolParameter, ToolSpec};
pub use parsing::parse_tool_blocks;
pub use value_objects::{ToolError, ToolErrorCode};
