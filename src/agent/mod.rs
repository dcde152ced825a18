//! The streaming review agent: model client, tool dispatch, and turn loop.

pub mod client;
pub mod prompt;
pub mod runner;
pub mod stream;
pub mod tools;

pub use client::{AnthropicClient, ModelClient, TurnOutcome};
pub use runner::run_agent;
pub use stream::{StopReason, StreamEvent, ToolCall};
pub use tools::{dispatch, tool_definitions};
