use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};
use tracing::{debug, error, warn};

use crate::errors::{Error, Result};
use crate::llm::endpoints::ChatEndpoint;
use crate::llm::{ChatMessage, ChatResponse};

/// Delay inserted before retry attempt N is `(N - 1) * BACKOFF_STEP`.
const BACKOFF_STEP: Duration = Duration::from_secs(1);

/// Default spacing between two outbound calls from one client.
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_secs(1);

/// Default attempt budget per `send`, including the first attempt.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

struct LimiterState {
    last_request_time: Option<Instant>,
}

/// Chat client enforcing a minimum spacing between consecutive outbound
/// calls and retrying transient failures with linear backoff.
///
/// The limiter state is guarded by an async mutex held across the whole
/// attempt loop, so a shared client never has two requests in flight and the
/// spacing guarantee holds even with concurrent callers.
pub struct ChatClient {
    endpoint: Box<dyn ChatEndpoint>,
    min_interval: Duration,
    max_attempts: u32,
    state: Mutex<LimiterState>,
}

impl ChatClient {
    pub fn new(endpoint: Box<dyn ChatEndpoint>, min_interval: Duration) -> Self {
        ChatClient {
            endpoint,
            min_interval,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            state: Mutex::new(LimiterState {
                last_request_time: None,
            }),
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Sends a conversation and returns the decoded response.
    ///
    /// Transport failures and non-2xx statuses are retried up to the attempt
    /// budget, sleeping `attempt * 1s` between attempts. A success body whose
    /// first choice has no content fails immediately with `ResponseParse` and
    /// is never retried. `last_request_time` is updated after every attempt
    /// that reached the network, so a failed attempt's latency still counts
    /// toward spacing.
    pub async fn send(&self, messages: &[ChatMessage]) -> Result<ChatResponse> {
        if messages.is_empty() {
            return Err(Error::EmptyConversation);
        }

        let mut state = self.state.lock().await;

        for attempt in 1..=self.max_attempts {
            if let Some(last) = state.last_request_time {
                let elapsed = last.elapsed();
                if elapsed < self.min_interval {
                    sleep(self.min_interval - elapsed).await;
                }
            }

            debug!(attempt, endpoint = self.endpoint.name(), "sending chat request");
            let outcome = self.endpoint.post_chat(messages).await;
            state.last_request_time = Some(Instant::now());

            match outcome {
                Ok(response) => {
                    return match response.primary_text() {
                        Some(_) => Ok(response),
                        None => Err(Error::ResponseParse(
                            "missing choices[0].message.content".into(),
                        )),
                    };
                }
                Err(err) if err.is_retryable() && attempt < self.max_attempts => {
                    warn!(attempt, error = %err, "chat request failed, retrying");
                    sleep(BACKOFF_STEP * attempt).await;
                }
                Err(err) if err.is_retryable() => {
                    error!(
                        attempts = self.max_attempts,
                        error = %err,
                        "chat request failed, attempt budget exhausted"
                    );
                    return Err(Error::RequestFailed {
                        attempts: self.max_attempts,
                        source: Box::new(err),
                    });
                }
                Err(err) => return Err(err),
            }
        }

        unreachable!("attempt loop returns on the last attempt")
    }

    /// Sends a conversation and returns the first message's content, trimmed.
    pub async fn send_text(&self, messages: &[ChatMessage]) -> Result<String> {
        let response = self.send(messages).await?;
        let text = response
            .primary_text()
            .ok_or_else(|| Error::ResponseParse("missing choices[0].message.content".into()))?;
        Ok(text.trim().to_string())
    }
}
