use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Role of a chat message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    System,
    Assistant,
}

/// A single message in a conversation. Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    /// ISO-8601 timestamp, carried by the UL endpoint variant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl ChatMessage {
    pub fn new(role: Role, content: &str) -> Self {
        ChatMessage {
            role,
            content: content.to_string(),
            date: None,
        }
    }

    pub fn user(content: &str) -> Self {
        Self::new(Role::User, content)
    }

    pub fn system(content: &str) -> Self {
        Self::new(Role::System, content)
    }

    pub fn assistant(content: &str) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Stamps the message with the current UTC time.
    pub fn dated(mut self) -> Self {
        self.date = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        self
    }
}
