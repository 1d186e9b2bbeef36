pub mod chat;
pub mod compare;
pub mod plan;

use uuid::Uuid;

use crate::config::{Config, EndpointKind};
use crate::constants::{
    DEFAULT_GROQ_MODEL, DEFAULT_GROQ_URL, DEFAULT_UL_CHAT_URL, GROQ_KEY_ENV, UL_TOKEN_ENV,
};
use crate::errors::{Error, Result};
use crate::llm::endpoints::{GroqEndpoint, UlChatEndpoint};
use crate::llm::{ChatClient, ChatEndpoint};

/// Builds the rate-limited chat client for the configured endpoint variant.
/// Credentials are taken from the environment, never from the config file.
pub fn build_chat_client(config: &Config) -> Result<ChatClient> {
    let endpoint: Box<dyn ChatEndpoint> = match config.endpoint.kind {
        EndpointKind::Ulchat => {
            let token = std::env::var(UL_TOKEN_ENV)
                .map_err(|_| Error::Config(format!("{UL_TOKEN_ENV} environment variable not set")))?;
            let user_id = config
                .endpoint
                .user_id
                .clone()
                .ok_or_else(|| Error::Config("endpoint.user_id is required for ulchat".into()))?;
            let conversation_id = config
                .endpoint
                .conversation_id
                .clone()
                .unwrap_or_else(|| Uuid::new_v4().to_string());
            let base_url = config
                .endpoint
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_UL_CHAT_URL.to_string());
            Box::new(UlChatEndpoint::new(
                &base_url,
                &token,
                &user_id,
                &conversation_id,
            ))
        }
        EndpointKind::Groq => {
            let api_key = std::env::var(GROQ_KEY_ENV)
                .map_err(|_| Error::Config(format!("{GROQ_KEY_ENV} environment variable not set")))?;
            let base_url = config
                .endpoint
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_GROQ_URL.to_string());
            let model = config
                .endpoint
                .model
                .clone()
                .unwrap_or_else(|| DEFAULT_GROQ_MODEL.to_string());
            Box::new(GroqEndpoint::new(
                &base_url,
                &api_key,
                &model,
                config.endpoint.temperature,
            ))
        }
    };

    Ok(ChatClient::new(endpoint, config.limits.min_interval)
        .with_max_attempts(config.limits.max_attempts))
}
