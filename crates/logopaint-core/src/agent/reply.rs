//! Boundary with the external text-generation service.
//!
//! The network call itself happens elsewhere. This module turns what came
//! back (a response envelope, then free text) into a list of raw commands.

use serde_json::Value;
use thiserror::Error;

/// Longest error body echoed back to the user.
const MAX_ERROR_BODY: usize = 200;

/// Failures surfaced to the caller; the canvas is never touched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AgentError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("API {status}: {body}")]
    Status { status: u16, body: String },
    #[error("could not read reply: {0}")]
    Unparsable(String),
    #[error("reply contains no actions")]
    MissingActions,
}

impl AgentError {
    /// Build a status error, truncating long bodies.
    pub fn status(status: u16, body: &str) -> Self {
        AgentError::Status {
            status,
            body: body.chars().take(MAX_ERROR_BODY).collect(),
        }
    }
}

/// Text of the first content block in a response envelope
/// (`{"content":[{"text": ...}]}`).
///
/// An envelope carrying an `error` object becomes `AgentError::Status`.
pub fn response_text(body: &str) -> Result<String, AgentError> {
    let data: Value =
        serde_json::from_str(body).map_err(|e| AgentError::Unparsable(e.to_string()))?;

    if let Some(err) = data.get("error") {
        let message = err
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| err.to_string());
        return Err(AgentError::status(500, &message));
    }

    data.get("content")
        .and_then(|c| c.get(0))
        .and_then(|block| block.get("text"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| AgentError::Unparsable("response has no text content".into()))
}

/// Actions and optional chat message extracted from a reply.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentReply {
    pub actions: Vec<Value>,
    pub message: Option<String>,
}

impl AgentReply {
    /// Extract the action list from free-form reply text.
    ///
    /// Tries, in order: a fenced ```json block, the outermost `{...}` span
    /// that mentions `"actions"`, and a bare JSON array of commands.
    pub fn parse(text: &str) -> Result<Self, AgentError> {
        let candidates = [fenced_json(text), object_span(text), array_span(text)];
        let mut saw_json = false;

        for candidate in candidates.into_iter().flatten() {
            let Ok(value) = serde_json::from_str::<Value>(candidate) else {
                continue;
            };
            saw_json = true;
            match value {
                Value::Array(actions) => return Ok(Self { actions, message: None }),
                Value::Object(obj) => {
                    if let Some(actions) = obj.get("actions").and_then(Value::as_array) {
                        return Ok(Self {
                            actions: actions.clone(),
                            message: obj.get("message").and_then(Value::as_str).map(str::to_string),
                        });
                    }
                }
                _ => {}
            }
        }

        if saw_json {
            Err(AgentError::MissingActions)
        } else {
            Err(AgentError::Unparsable("no JSON found in reply".into()))
        }
    }

    /// Message to show once the batch is applied.
    pub fn message_or_default(&self) -> &str {
        self.message.as_deref().unwrap_or("Done!")
    }
}

fn fenced_json(text: &str) -> Option<&str> {
    let start = text.find("```json")? + "```json".len();
    let rest = &text[start..];
    let end = rest.find("```")?;
    Some(rest[..end].trim())
}

fn object_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    let span = text.get(start..=end)?;
    span.contains("\"actions\"").then_some(span)
}

fn array_span(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    text.get(start..=end)
}
