use serde::Deserialize;

use crate::errors::{Error, Result};

/// Decoded chat-completion response. Both endpoint variants answer with the
/// same `{choices: [{message: {content}}]}` shape; nothing beyond the first
/// choice's content is ever validated.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatResponse {
    /// Decodes a response body, failing with `ResponseParse` on shape mismatch.
    pub fn decode(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| Error::ResponseParse(e.to_string()))
    }

    /// Content of the first generated message, if present.
    pub fn primary_text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
    }
}
