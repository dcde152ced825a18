//! The agent conversation loop.
//!
//! The model decides which capability to call and when; this loop only
//! relays turns, dispatches the requested tools, feeds results back, and
//! enforces the tool-invocation budget. Exhausting the budget ends the
//! interaction without error, returning whatever text was produced so far.

use serde_json::{Value, json};
use tokio::sync::mpsc;
use tracing::debug;

use crate::agent::client::{ModelClient, TurnOutcome};
use crate::agent::prompt::SYSTEM_PROMPT;
use crate::agent::tools::{dispatch, tool_definitions};
use crate::config::Config;
use crate::error::AgentError;

/// Run one review interaction to completion.
///
/// Streams the model's text into `text_out` as it is generated and returns
/// the full transcript. Every tool or stream error propagates unchanged.
pub async fn run_agent<C: ModelClient>(
    client: &C,
    config: &Config,
    user_prompt: &str,
    text_out: mpsc::Sender<String>,
) -> Result<String, AgentError> {
    let tools = tool_definitions();
    let mut messages = vec![json!({"role": "user", "content": user_prompt})];
    let mut transcript = String::new();
    let mut tool_invocations = 0u32;

    loop {
        let outcome = client
            .stream_turn(SYSTEM_PROMPT, &messages, &tools, &text_out)
            .await?;
        transcript.push_str(&outcome.text);

        if outcome.tool_calls.is_empty() {
            break;
        }

        messages.push(assistant_message(&outcome));

        let mut results = Vec::with_capacity(outcome.tool_calls.len());
        let mut budget_exhausted = false;
        for call in &outcome.tool_calls {
            if tool_invocations >= config.max_turns {
                debug!(
                    "Tool budget of {} exhausted, ending interaction",
                    config.max_turns
                );
                budget_exhausted = true;
                break;
            }
            tool_invocations += 1;

            let result = dispatch(&call.name, &call.input)?;
            results.push(json!({
                "type": "tool_result",
                "tool_use_id": call.id,
                "content": result,
            }));
        }

        if budget_exhausted {
            break;
        }

        messages.push(json!({"role": "user", "content": results}));
    }

    Ok(transcript)
}

/// Rebuild the assistant message (text + tool_use blocks) for the history.
fn assistant_message(outcome: &TurnOutcome) -> Value {
    let mut content = Vec::new();
    if !outcome.text.is_empty() {
        content.push(json!({"type": "text", "text": outcome.text}));
    }
    for call in &outcome.tool_calls {
        content.push(json!({
            "type": "tool_use",
            "id": call.id,
            "name": call.name,
            "input": call.input,
        }));
    }
    json!({"role": "assistant", "content": content})
}
