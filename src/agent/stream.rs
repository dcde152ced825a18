//! Incremental decoding of the Messages API event stream.
//!
//! Network chunks arrive at arbitrary boundaries, so both layers here are
//! incremental: [`SseParser`] reassembles server-sent-event frames, and
//! [`EventDecoder`] turns their JSON payloads into [`StreamEvent`]s,
//! accumulating partial tool-input JSON across deltas.

use serde::Deserialize;
use serde_json::Value;

use crate::error::AgentError;

/// Why the model stopped generating a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    EndTurn,
    ToolUse,
    MaxTokens,
    Other(String),
}

impl StopReason {
    fn from_wire(reason: &str) -> Self {
        match reason {
            "end_turn" => StopReason::EndTurn,
            "tool_use" => StopReason::ToolUse,
            "max_tokens" => StopReason::MaxTokens,
            other => StopReason::Other(other.to_string()),
        }
    }
}

/// A fully assembled tool invocation request from the model.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub input: Value,
}

/// A decoded streaming event relevant to the agent loop.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    TextDelta(String),
    ToolUse(ToolCall),
    StopReason(StopReason),
    MessageStop,
}

/// Reassembles SSE frames from raw chunks and yields their data payloads.
#[derive(Debug, Default)]
pub struct SseParser {
    buf: String,
}

impl SseParser {
    /// Feed a raw chunk; returns the data payloads of every frame completed
    /// by it. Partial frames stay buffered until the closing blank line,
    /// which may use LF or CRLF line endings.
    pub fn feed(&mut self, chunk: &str) -> Vec<String> {
        self.buf.push_str(chunk);

        let mut payloads = Vec::new();
        while let Some((pos, delim_len)) = find_frame_end(&self.buf) {
            let frame: String = self.buf.drain(..pos + delim_len).collect();

            let mut data = String::new();
            for line in frame.lines() {
                let line = line.trim_end_matches('\r');
                if let Some(rest) = line.strip_prefix("data:") {
                    if !data.is_empty() {
                        data.push('\n');
                    }
                    data.push_str(rest.trim_start());
                }
            }
            if !data.is_empty() {
                payloads.push(data);
            }
        }
        payloads
    }
}

/// Find the earliest frame-terminating blank line and its delimiter length.
fn find_frame_end(buf: &str) -> Option<(usize, usize)> {
    let lf = buf.find("\n\n").map(|pos| (pos, 2));
    let crlf = buf.find("\r\n\r\n").map(|pos| (pos, 4));
    match (lf, crlf) {
        (Some(a), Some(b)) => Some(if b.0 < a.0 { b } else { a }),
        (found, None) | (None, found) => found,
    }
}

/// Wire shape of a streaming event (only the fields the loop needs).
#[derive(Debug, Deserialize)]
struct WireEvent {
    #[serde(rename = "type")]
    kind: String,
    content_block: Option<WireContentBlock>,
    delta: Option<WireDelta>,
}

#[derive(Debug, Deserialize)]
struct WireContentBlock {
    #[serde(rename = "type")]
    kind: String,
    id: Option<String>,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireDelta {
    text: Option<String>,
    partial_json: Option<String>,
    stop_reason: Option<String>,
}

/// Tool-use block being assembled from `input_json_delta` fragments.
#[derive(Debug)]
struct PendingTool {
    id: String,
    name: String,
    json: String,
}

/// Decodes SSE payloads into [`StreamEvent`]s.
#[derive(Debug, Default)]
pub struct EventDecoder {
    sse: SseParser,
    pending_tool: Option<PendingTool>,
    /// Bytes of a UTF-8 character cut off at the end of the previous chunk.
    utf8_tail: Vec<u8>,
}

impl EventDecoder {
    /// Feed a raw network chunk as bytes.
    ///
    /// Chunk boundaries can land mid-character; an incomplete UTF-8 sequence
    /// at the end of a chunk is held back and prepended to the next one, so
    /// text deltas come out intact.
    pub fn feed_bytes(&mut self, chunk: &[u8]) -> Result<Vec<StreamEvent>, AgentError> {
        let mut bytes = std::mem::take(&mut self.utf8_tail);
        bytes.extend_from_slice(chunk);

        match std::str::from_utf8(&bytes) {
            Ok(text) => {
                let text = text.to_string();
                self.feed(&text)
            }
            Err(e) if e.error_len().is_none() => {
                // Incomplete trailing character: decode the valid prefix,
                // keep the tail for the next chunk
                let valid = e.valid_up_to();
                let text = String::from_utf8_lossy(&bytes[..valid]).to_string();
                self.utf8_tail = bytes[valid..].to_vec();
                self.feed(&text)
            }
            Err(e) => Err(AgentError::Stream(format!("invalid UTF-8 in stream: {e}"))),
        }
    }

    /// Feed a raw network chunk; returns decoded events in stream order.
    pub fn feed(&mut self, chunk: &str) -> Result<Vec<StreamEvent>, AgentError> {
        let mut events = Vec::new();

        for payload in self.sse.feed(chunk) {
            let wire: WireEvent = serde_json::from_str(&payload)
                .map_err(|e| AgentError::Stream(format!("{e} in event: {payload}")))?;

            match wire.kind.as_str() {
                "content_block_start" => {
                    if let Some(block) = wire.content_block {
                        if block.kind == "tool_use" {
                            self.pending_tool = Some(PendingTool {
                                id: block.id.unwrap_or_default(),
                                name: block.name.unwrap_or_default(),
                                json: String::new(),
                            });
                        }
                    }
                }
                "content_block_delta" => {
                    if let Some(delta) = wire.delta {
                        if let Some(text) = delta.text {
                            events.push(StreamEvent::TextDelta(text));
                        } else if let Some(partial) = delta.partial_json {
                            if let Some(tool) = self.pending_tool.as_mut() {
                                tool.json.push_str(&partial);
                            }
                        }
                    }
                }
                "content_block_stop" => {
                    if let Some(tool) = self.pending_tool.take() {
                        let input = if tool.json.trim().is_empty() {
                            Value::Object(Default::default())
                        } else {
                            serde_json::from_str(&tool.json).map_err(|e| {
                                AgentError::Stream(format!(
                                    "invalid input JSON for tool '{}': {e}",
                                    tool.name
                                ))
                            })?
                        };
                        events.push(StreamEvent::ToolUse(ToolCall {
                            id: tool.id,
                            name: tool.name,
                            input,
                        }));
                    }
                }
                "message_delta" => {
                    if let Some(reason) = wire.delta.and_then(|d| d.stop_reason) {
                        events.push(StreamEvent::StopReason(StopReason::from_wire(&reason)));
                    }
                }
                "message_stop" => events.push(StreamEvent::MessageStop),
                "error" => return Err(AgentError::Stream(payload)),
                // ping, message_start, unknown event types
                _ => {}
            }
        }

        Ok(events)
    }
}
