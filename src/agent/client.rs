//! Streaming model client for the Messages API.

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::StatusCode;
use serde_json::{Value, json};
use tokio::sync::mpsc;
use tracing::debug;

use crate::agent::stream::{EventDecoder, StopReason, StreamEvent, ToolCall};
use crate::config::Config;
use crate::error::AgentError;

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 4096;

/// One completed assistant turn, with its text and any tool requests.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub stop_reason: StopReason,
    pub text: String,
    pub tool_calls: Vec<ToolCall>,
}

/// A streaming completion backend.
///
/// Text deltas are forwarded into `text_out` as they arrive; the returned
/// outcome carries the assembled turn. Implemented by [`AnthropicClient`]
/// and by scripted clients in tests.
#[async_trait]
pub trait ModelClient {
    async fn stream_turn(
        &self,
        system: &str,
        messages: &[Value],
        tools: &[Value],
        text_out: &mpsc::Sender<String>,
    ) -> Result<TurnOutcome, AgentError>;
}

/// HTTP client for the Anthropic Messages API.
pub struct AnthropicClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl AnthropicClient {
    pub fn new(config: &Config) -> Self {
        Self::with_base_url(config, DEFAULT_BASE_URL)
    }

    /// Build a client against a non-default endpoint (used by tests).
    pub fn with_base_url(config: &Config, base_url: &str) -> Self {
        AnthropicClient {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }
}

#[async_trait]
impl ModelClient for AnthropicClient {
    async fn stream_turn(
        &self,
        system: &str,
        messages: &[Value],
        tools: &[Value],
        text_out: &mpsc::Sender<String>,
    ) -> Result<TurnOutcome, AgentError> {
        let body = json!({
            "model": self.model,
            "max_tokens": MAX_TOKENS,
            "system": system,
            "messages": messages,
            "tools": tools,
            "stream": true,
        });

        debug!("Requesting turn: {} message(s) in history", messages.len());

        let response = self
            .http
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            // Credential problems are the service's to diagnose; relay its message
            if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                return Err(AgentError::Authentication(message));
            }
            return Err(AgentError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let mut decoder = EventDecoder::default();
        let mut outcome = TurnOutcome {
            stop_reason: StopReason::EndTurn,
            text: String::new(),
            tool_calls: Vec::new(),
        };

        let mut chunks = response.bytes_stream();
        while let Some(chunk) = chunks.next().await {
            let chunk = chunk?;
            // Chunk boundaries can split a UTF-8 character; the decoder
            // reassembles it
            for event in decoder.feed_bytes(&chunk)? {
                match event {
                    StreamEvent::TextDelta(text) => {
                        outcome.text.push_str(&text);
                        text_out
                            .send(text)
                            .await
                            .map_err(|_| AgentError::OutputClosed)?;
                    }
                    StreamEvent::ToolUse(call) => outcome.tool_calls.push(call),
                    StreamEvent::StopReason(reason) => outcome.stop_reason = reason,
                    StreamEvent::MessageStop => {}
                }
            }
        }

        Ok(outcome)
    }
}
