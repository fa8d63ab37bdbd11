//! Inference payload construction and reply extraction
//!
//! The payload is built per call from the caller's message, the optional
//! context snippet, and the configured generation parameters, then serialized
//! exactly once — the serialized bytes are what gets signed and transmitted.
//!
//! Each model family has its own envelope. The family is decided at
//! configuration time, never inferred here.

use crate::config::GenerationSettings;
use crate::domain::{ModelFamily, ModelReply};
use crate::error::{Error, Result};
use crate::pipeline::constants::protocol;
use serde::Serialize;
use serde_json::Value;

/// Fixed assistant-restriction text for the system prompt
pub const SYSTEM_PROMPT: &str = "You are the RMIT Course Compass AI assistant. \
Only provide information about RMIT University courses and programs.";

/// System prompt with the retrieved context snippet appended when non-empty.
pub fn build_system_prompt(context: &str) -> String {
    if context.is_empty() {
        SYSTEM_PROMPT.to_string()
    } else {
        format!("{SYSTEM_PROMPT}\n\nRelevant RMIT information:\n{context}")
    }
}

#[derive(Serialize)]
struct ClaudePayload<'a> {
    anthropic_version: &'static str,
    max_tokens: u32,
    temperature: f64,
    top_p: f64,
    system: &'a str,
    messages: Vec<ClaudeMessage<'a>>,
}

#[derive(Serialize)]
struct ClaudeMessage<'a> {
    role: &'static str,
    content: Vec<ClaudeContent<'a>>,
}

#[derive(Serialize)]
struct ClaudeContent<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NovaPayload<'a> {
    schema_version: &'static str,
    system: Vec<NovaText<'a>>,
    messages: Vec<NovaMessage<'a>>,
    inference_config: NovaInferenceConfig,
}

#[derive(Serialize)]
struct NovaText<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct NovaMessage<'a> {
    role: &'static str,
    content: Vec<NovaText<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NovaInferenceConfig {
    max_tokens: u32,
    temperature: f64,
    top_p: f64,
}

/// Serialize the invocation body for `family`.
///
/// The returned bytes are final: the signer binds them and the transport
/// sends them unmodified.
pub fn build_payload(
    family: ModelFamily,
    generation: &GenerationSettings,
    message: &str,
    context: &str,
) -> Result<Vec<u8>> {
    let system = build_system_prompt(context);
    let bytes = match family {
        ModelFamily::Claude => serde_json::to_vec(&ClaudePayload {
            anthropic_version: protocol::ANTHROPIC_VERSION,
            max_tokens: generation.max_tokens,
            temperature: generation.temperature,
            top_p: generation.top_p,
            system: &system,
            messages: vec![ClaudeMessage {
                role: "user",
                content: vec![ClaudeContent {
                    kind: "text",
                    text: message,
                }],
            }],
        }),
        ModelFamily::Nova => serde_json::to_vec(&NovaPayload {
            schema_version: protocol::NOVA_SCHEMA_VERSION,
            system: vec![NovaText { text: &system }],
            messages: vec![NovaMessage {
                role: "user",
                content: vec![NovaText { text: message }],
            }],
            inference_config: NovaInferenceConfig {
                max_tokens: generation.max_tokens,
                temperature: generation.temperature,
                top_p: generation.top_p,
            },
        }),
    };
    bytes.map_err(|e| Error::signing(format!("failed to serialize inference payload: {e}")))
}

/// Extract the single textual answer from a success response body.
///
/// Anything other than the expected shape with non-empty text fails closed
/// with `MalformedResponse` — no partial or guessed value is ever returned.
pub fn parse_reply(family: ModelFamily, body: &[u8]) -> Result<ModelReply> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| Error::malformed_response(format!("response body is not JSON: {e}")))?;

    let text = match family {
        ModelFamily::Claude => claude_text(&value)?,
        ModelFamily::Nova => nova_text(&value)?,
    };

    ModelReply::try_new(text.to_string())
        .map_err(|_| Error::malformed_response("response text field is empty"))
}

fn claude_text(value: &Value) -> Result<&str> {
    use crate::pipeline::constants::json_fields::claude;

    let block = value
        .get(claude::CONTENT)
        .and_then(Value::as_array)
        .and_then(|content| content.first())
        .ok_or_else(|| Error::malformed_response("missing or empty content array"))?;

    if block.get(claude::TYPE).and_then(Value::as_str) != Some(claude::TEXT) {
        return Err(Error::malformed_response(
            "first content block is not a text block",
        ));
    }
    block
        .get(claude::TEXT)
        .and_then(Value::as_str)
        .ok_or_else(|| Error::malformed_response("content block has no text field"))
}

fn nova_text(value: &Value) -> Result<&str> {
    use crate::pipeline::constants::json_fields::nova;

    value
        .get(nova::OUTPUT)
        .and_then(|output| output.get(nova::MESSAGE))
        .and_then(|message| message.get(nova::CONTENT))
        .and_then(Value::as_array)
        .and_then(|content| content.first())
        .and_then(|block| block.get(nova::TEXT))
        .and_then(Value::as_str)
        .ok_or_else(|| Error::malformed_response("missing output.message.content[0].text"))
}
