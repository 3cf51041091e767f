use docsum_common::{DocSumError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Message author role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One entry of the chat message list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    /// User message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Chat completion request
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// Model identifier (e.g., "llama-3.1-8b-instant")
    pub model: String,

    /// Ordered message list
    pub messages: Vec<ChatMessage>,

    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Request timeout, applied by the client rather than sent
    #[serde(skip)]
    pub timeout: Duration,
}

/// Typed chat completion response
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletion {
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: Option<AssistantMessage>,

    /// Legacy completions carry the text on the choice itself
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssistantMessage {
    #[serde(default)]
    pub content: Option<String>,

    #[serde(default)]
    pub text: Option<String>,
}

/// Raw completion result before normalization.
///
/// Providers either hand back something that decodes into the typed
/// [`ChatCompletion`] or a loose JSON mapping; callers above the adapter only
/// ever see the [`NormalizedResponse`].
#[derive(Debug, Clone)]
pub enum ResponseEnvelope {
    /// Loose mapping, read as `choices[0].message.content`
    Mapping(Value),

    /// Decoded object, read through its fields
    Typed(ChatCompletion),
}

/// Summary text extracted from an envelope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedResponse {
    pub text: String,
}

impl ResponseEnvelope {
    /// Wrap a decoded JSON body.
    ///
    /// Mapping access is tried first; the typed form is only used when the
    /// mapping paths yield no text but the body still decodes.
    pub fn from_json(value: Value) -> Self {
        if mapping_text(&value).is_some() {
            return Self::Mapping(value);
        }

        match ChatCompletion::deserialize(&value) {
            Ok(completion) => Self::Typed(completion),
            Err(_) => Self::Mapping(value),
        }
    }

    /// Extract the generated text
    pub fn normalize(self) -> Result<NormalizedResponse> {
        let text = match self {
            Self::Mapping(value) => mapping_text(&value),
            Self::Typed(completion) => completion.choices.into_iter().next().and_then(typed_text),
        };

        text.map(|text| NormalizedResponse { text })
            .ok_or_else(|| DocSumError::response_shape("no text at choices[0].message.content"))
    }
}

fn non_empty(text: &str) -> bool {
    !text.trim().is_empty()
}

fn typed_text(choice: Choice) -> Option<String> {
    let (content, text) = match choice.message {
        Some(message) => (message.content, message.text),
        None => (None, None),
    };

    content
        .filter(|s| non_empty(s))
        .or(text.filter(|s| non_empty(s)))
        .or(choice.text.filter(|s| non_empty(s)))
}

fn mapping_text(value: &Value) -> Option<String> {
    let choice = value.get("choices")?.get(0)?;

    let field = |value: &Value, key: &str| {
        value
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| non_empty(s))
            .map(str::to_string)
    };

    let from_message = choice
        .get("message")
        .and_then(|message| field(message, "content").or_else(|| field(message, "text")));

    // Legacy completions put the text directly on the choice
    from_message.or_else(|| field(choice, "text"))
}
