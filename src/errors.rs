/// Error taxonomy for the whole pipeline.
///
/// Only the network-facing variants (`Transport`, `HttpStatus`) are ever
/// retried, and only inside the chat client. Everything else is terminal for
/// the current operation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("endpoint returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("unexpected response shape: {0}")]
    ResponseParse(String),

    #[error("request failed after {attempts} attempts: {source}")]
    RequestFailed {
        attempts: u32,
        #[source]
        source: Box<Error>,
    },

    #[error("cannot send an empty conversation")]
    EmptyConversation,

    #[error("data load error: {0}")]
    DataLoad(String),

    #[error("document I/O error: {0}")]
    DocumentIo(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Whether the chat client may retry after this failure.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Transport(_) | Error::HttpStatus { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
