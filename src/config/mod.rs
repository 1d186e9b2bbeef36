mod parser;

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Deserializer};

pub use parser::load_config;

/// Top-level configuration. File paths, endpoint identity and tuning knobs
/// live here; secrets (bearer token, API keys) come only from environment
/// variables and are never part of the file.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Input workbook with the Compare/Data/Product sheets.
    pub workbook: PathBuf,
    /// Directory the generated reports are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Product the compliance plan is written for.
    #[serde(default = "default_product")]
    pub product: String,
    pub endpoint: EndpointConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
}

/// Which chat-completion payload schema to speak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointKind {
    Ulchat,
    Groq,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EndpointConfig {
    pub kind: EndpointKind,
    /// Full chat-completion URL; defaults per endpoint kind.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Model name, used by the messages-based schema only.
    #[serde(default)]
    pub model: Option<String>,
    /// Caller identity, required by the history-based schema.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Conversation to attach to; a fresh UUID when absent.
    #[serde(default)]
    pub conversation_id: Option<String>,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Minimum spacing between outbound calls, e.g. "500ms" or "1s".
    #[serde(
        default = "default_min_interval",
        deserialize_with = "duration_from_str"
    )]
    pub min_interval: Duration,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        LimitsConfig {
            min_interval: default_min_interval(),
            max_attempts: default_max_attempts(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RetrievalConfig {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        RetrievalConfig {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            top_k: default_top_k(),
            embedding_model: default_embedding_model(),
        }
    }
}

fn duration_from_str<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    humantime::parse_duration(&raw).map_err(serde::de::Error::custom)
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("reports")
}

fn default_product() -> String {
    "the product".to_string()
}

fn default_temperature() -> f64 {
    0.3
}

fn default_min_interval() -> Duration {
    crate::llm::DEFAULT_MIN_INTERVAL
}

fn default_max_attempts() -> u32 {
    crate::llm::DEFAULT_MAX_ATTEMPTS
}

fn default_chunk_size() -> usize {
    crate::rag::DEFAULT_CHUNK_SIZE
}

fn default_chunk_overlap() -> usize {
    crate::rag::DEFAULT_CHUNK_OVERLAP
}

fn default_top_k() -> usize {
    5
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}
