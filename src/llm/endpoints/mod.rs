use async_trait::async_trait;

use crate::errors::Result;
use crate::llm::{ChatMessage, ChatResponse};

pub mod groq;
pub mod ulchat;

pub use groq::GroqEndpoint;
pub use ulchat::UlChatEndpoint;

/// One chat-completion endpoint variant.
///
/// An adapter performs exactly one HTTP round trip per call and classifies
/// the outcome: `Transport` for connection failures, `HttpStatus` for non-2xx
/// answers, `ResponseParse` for a 2xx body that does not decode. Retry and
/// rate-limit policy live in [`crate::llm::ChatClient`], never here.
#[async_trait]
pub trait ChatEndpoint: Send + Sync {
    fn name(&self) -> &str;

    async fn post_chat(&self, messages: &[ChatMessage]) -> Result<ChatResponse>;
}
