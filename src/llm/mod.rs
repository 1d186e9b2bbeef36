mod client;
pub mod embedders;
pub mod endpoints;
mod message;
mod response;

pub use client::{ChatClient, DEFAULT_MAX_ATTEMPTS, DEFAULT_MIN_INTERVAL};
pub use embedders::{Embedder, OpenAiEmbedder};
pub use endpoints::ChatEndpoint;
pub use message::{ChatMessage, Role};
pub use response::ChatResponse;
