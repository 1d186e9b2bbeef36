use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use super::Embedder;
use crate::errors::{Error, Result};

/// Embedder backed by an OpenAI-compatible `/embeddings` endpoint.
#[derive(Debug)]
pub struct OpenAiEmbedder {
    client: Client,
    api_key: String,
    model: String,
}

impl OpenAiEmbedder {
    /// Reads the API key from `OPENAI_API_KEY`.
    pub fn new(model: &str) -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| Error::Config("OPENAI_API_KEY environment variable not set".into()))?;
        Ok(OpenAiEmbedder {
            client: Client::new(),
            api_key,
            model: model.to_string(),
        })
    }
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        let body = json!({
            "input": text,
            "model": self.model
        });

        let res = self
            .client
            .post("https://api.openai.com/v1/embeddings")
            .bearer_auth(&self.api_key)
            .json(&body)
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
        let arr = value["data"][0]["embedding"]
            .as_array()
            .ok_or_else(|| Error::ResponseParse("missing data[0].embedding".into()))?;
        Ok(arr
            .iter()
            .filter_map(|x| x.as_f64())
            .map(|x| x as f32)
            .collect())
    }
}
