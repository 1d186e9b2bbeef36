use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use super::ChatEndpoint;
use crate::errors::{Error, Result};
use crate::llm::{ChatMessage, ChatResponse};

/// Adapter for the UL chatbot's `history`-based payload schema.
///
/// The endpoint sits behind a browser session, so the request carries the
/// cookie/origin/referer trio the service checks in addition to the bearer
/// token.
#[derive(Debug)]
pub struct UlChatEndpoint {
    client: Client,
    base_url: String,
    auth_token: String,
    user_id: String,
    conversation_id: String,
}

impl UlChatEndpoint {
    pub fn new(base_url: &str, auth_token: &str, user_id: &str, conversation_id: &str) -> Self {
        UlChatEndpoint {
            client: Client::new(),
            base_url: base_url.to_string(),
            auth_token: auth_token.to_string(),
            user_id: user_id.to_string(),
            conversation_id: conversation_id.to_string(),
        }
    }

    fn payload(&self, messages: &[ChatMessage]) -> serde_json::Value {
        json!({
            "approach": "RetrieveThenRead",
            "userId": self.user_id,
            "conversationId": self.conversation_id,
            "history": messages,
            "isRagUsed": false
        })
    }
}

#[async_trait]
impl ChatEndpoint for UlChatEndpoint {
    fn name(&self) -> &str {
        "ulchat"
    }

    async fn post_chat(&self, messages: &[ChatMessage]) -> Result<ChatResponse> {
        let origin = self
            .base_url
            .split("/api/")
            .next()
            .unwrap_or(&self.base_url)
            .to_string();

        let res = self
            .client
            .post(&self.base_url)
            .bearer_auth(&self.auth_token)
            .header("accept", "application/json")
            .header("cookie", "tosAccepted=true")
            .header("origin", &origin)
            .header("referer", format!("{}/", origin))
            .json(&self.payload(messages))
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let value: serde_json::Value = res
            .json()
            .await
            .map_err(|e| Error::ResponseParse(e.to_string()))?;
        ChatResponse::decode(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_matches_the_history_schema() {
        let endpoint = UlChatEndpoint::new(
            "https://chat.example.com/api/chats/chat/advanced",
            "token",
            "user-1",
            "conv-1",
        );
        let payload = endpoint.payload(&[ChatMessage::user("hello")]);

        assert_eq!(payload["approach"], "RetrieveThenRead");
        assert_eq!(payload["userId"], "user-1");
        assert_eq!(payload["conversationId"], "conv-1");
        assert_eq!(payload["isRagUsed"], false);
        assert_eq!(payload["history"][0]["role"], "user");
        assert_eq!(payload["history"][0]["content"], "hello");
    }
}
