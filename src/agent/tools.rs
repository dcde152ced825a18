//! Tool schemas and dispatch for the three local capabilities.
//!
//! The model decides which tool to call and when; this module only decodes
//! the arguments, runs the capability, and serializes the result. Capability
//! errors propagate unchanged.

use std::path::Path;

use serde_json::{Value, json};
use tracing::debug;

use crate::error::ToolError;
use crate::git::changes::collect_changes;
use crate::report::writer::write_report;
use crate::summary::message::{DEFAULT_MAX_LENGTH, summarize};

pub const GET_FILE_CHANGES: &str = "get_file_changes";
pub const SUMMARIZE_CHANGES: &str = "summarize_changes";
pub const WRITE_MARKDOWN_FILE: &str = "write_markdown_file";

/// Tool schemas in Messages API shape, sent with every request.
pub fn tool_definitions() -> Vec<Value> {
    vec![
        json!({
            "name": GET_FILE_CHANGES,
            "description": "List pending (uncommitted) changes in a git working tree, with per-file insertion/deletion counts and unified diff text. Build output and lock files are excluded.",
            "input_schema": {
                "type": "object",
                "properties": {
                    "directory": {
                        "type": "string",
                        "description": "Path to the repository root, or any directory inside the working tree"
                    }
                },
                "required": ["directory"]
            }
        }),
        json!({
            "name": SUMMARIZE_CHANGES,
            "description": "Produce a one-line, length-bounded commit message summarizing the pending changes in a git working tree.",
            "input_schema": {
                "type": "object",
                "properties": {
                    "directory": {
                        "type": "string",
                        "description": "Path to the repository root, or any directory inside the working tree"
                    },
                    "max_length": {
                        "type": "integer",
                        "description": "Maximum message length in characters (default 72)"
                    }
                },
                "required": ["directory"]
            }
        }),
        json!({
            "name": WRITE_MARKDOWN_FILE,
            "description": "Write text content to a markdown file with a generated title and timestamp header. Overwrites any existing file at the same path.",
            "input_schema": {
                "type": "object",
                "properties": {
                    "content": { "type": "string", "description": "Markdown body to write" },
                    "filename": { "type": "string", "description": "Target filename; '.md' is appended when missing" },
                    "directory": { "type": "string", "description": "Target directory (default: current directory); created if missing" }
                },
                "required": ["content", "filename"]
            }
        }),
    ]
}

/// Run a tool call against the local capabilities.
///
/// Returns the result serialized as the string that goes back to the model.
pub fn dispatch(name: &str, input: &Value) -> Result<String, ToolError> {
    debug!("Dispatching tool '{name}'");

    match name {
        GET_FILE_CHANGES => {
            let directory = required_str(name, input, "directory")?;
            let records = collect_changes(Path::new(directory))?;
            serde_json::to_string(&records).map_err(ToolError::Serialize)
        }
        SUMMARIZE_CHANGES => {
            let directory = required_str(name, input, "directory")?;
            let max_length = input
                .get("max_length")
                .and_then(Value::as_u64)
                .map(|n| n as usize)
                .unwrap_or(DEFAULT_MAX_LENGTH);
            let records = collect_changes(Path::new(directory))?;
            Ok(summarize(&records, max_length))
        }
        WRITE_MARKDOWN_FILE => {
            // Empty content/filename validation belongs to the writer
            let content = input.get("content").and_then(Value::as_str).unwrap_or_default();
            let filename = input.get("filename").and_then(Value::as_str).unwrap_or_default();
            let directory = input.get("directory").and_then(Value::as_str).unwrap_or(".");
            let report = write_report(content, filename, Path::new(directory))?;
            Ok(report.message)
        }
        other => Err(ToolError::UnknownTool(other.to_string())),
    }
}

/// Pull a required non-empty string field out of the tool input.
fn required_str<'a>(tool: &str, input: &'a Value, field: &str) -> Result<&'a str, ToolError> {
    input
        .get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ToolError::InvalidArguments {
            tool: tool.to_string(),
            message: format!("missing required string field '{field}'"),
        })
}
