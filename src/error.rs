//! Error types for scriba modules using thiserror.

use thiserror::Error;

/// Errors from working-tree change collection.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Not a git working tree (or inside one): {path}")]
    RepositoryNotFound {
        path: String,
        #[source]
        source: git2::Error,
    },

    #[error("Failed to collect changes: {0}")]
    DiffFailed(#[source] git2::Error),

    #[error("Failed to read diff for '{path}': {source}")]
    DiffUnavailable {
        path: String,
        #[source]
        source: git2::Error,
    },
}

/// Errors from report writing.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Report content must not be empty")]
    EmptyContent,

    #[error("Report filename must not be empty")]
    EmptyFilename,

    #[error("Failed to create directory '{path}': {source}")]
    CreateDirFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write report '{path}': {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from tool dispatch.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments for '{tool}': {message}")]
    InvalidArguments { tool: String, message: String },

    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("Failed to serialize tool result: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Errors from the model API and the agent loop.
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Request to the model API failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Model API authentication failed: {0}")]
    Authentication(String),

    #[error("Model API returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Malformed stream event: {0}")]
    Stream(String),

    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error("Output channel closed before the stream finished")]
    OutputClosed,
}
