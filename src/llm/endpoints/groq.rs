use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use super::ChatEndpoint;
use crate::errors::{Error, Result};
use crate::llm::{ChatMessage, ChatResponse};

/// Adapter for the OpenAI-style `messages`-based payload schema used by
/// Groq-compatible endpoints.
#[derive(Debug)]
pub struct GroqEndpoint {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f64,
}

impl GroqEndpoint {
    pub fn new(base_url: &str, api_key: &str, model: &str, temperature: f64) -> Self {
        GroqEndpoint {
            client: Client::new(),
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            temperature,
        }
    }

    fn payload(&self, messages: &[ChatMessage]) -> serde_json::Value {
        let messages: Vec<serde_json::Value> = messages
            .iter()
            .map(|m| json!({"role": m.role, "content": m.content}))
            .collect();
        json!({
            "messages": messages,
            "model": self.model,
            "temperature": self.temperature
        })
    }
}

#[async_trait]
impl ChatEndpoint for GroqEndpoint {
    fn name(&self) -> &str {
        "groq"
    }

    async fn post_chat(&self, messages: &[ChatMessage]) -> Result<ChatResponse> {
        let res = self
            .client
            .post(&self.base_url)
            .bearer_auth(&self.api_key)
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
    use crate::llm::Role;

    #[test]
    fn payload_matches_the_messages_schema() {
        let endpoint = GroqEndpoint::new(
            "https://api.groq.com/openai/v1/chat/completions",
            "key",
            "llama3-8b-8192",
            0.3,
        );
        let payload = endpoint.payload(&[
            ChatMessage::system("be helpful"),
            ChatMessage::new(Role::User, "hello").dated(),
        ]);

        assert_eq!(payload["model"], "llama3-8b-8192");
        assert_eq!(payload["messages"][0]["role"], "system");
        assert_eq!(payload["messages"][1]["content"], "hello");
        // The messages schema never carries a date field.
        assert!(payload["messages"][1].get("date").is_none());
    }
}
