//! scriba - A CLI agent that reviews pending git changes and writes markdown reports.
//!
//! # Overview
//!
//! scriba exposes three local capabilities (reading the working-tree diff,
//! summarizing it into a commit message, and writing markdown reports) as
//! tools to the Anthropic Messages API, and relays the streamed review text
//! to stdout as it is generated.

pub mod agent;
pub mod config;
pub mod error;
pub mod git;
pub mod report;
pub mod summary;

// Re-export commonly used types
pub use agent::{AnthropicClient, ModelClient, StopReason, ToolCall, TurnOutcome, run_agent};
pub use config::Config;
pub use error::{AgentError, GitError, ReportError, ToolError};
pub use git::ChangeRecord;
pub use report::WrittenReport;
pub use summary::{ChangeKind, summarize};
