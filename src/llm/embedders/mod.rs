use async_trait::async_trait;

use crate::errors::Result;

pub mod openai_embedder;

pub use openai_embedder::OpenAiEmbedder;

/// Turns a text passage into a vector for similarity search.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>>;
}
