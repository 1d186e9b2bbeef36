//! Grounded chat session over a generated compliance plan: the document's
//! paragraph and table text is chunked and indexed once, then every question
//! is answered strictly from the retrieved passages.

use std::path::{Path, PathBuf};

use colored::Colorize;
use dialoguer::Input;
use tracing::{info, warn};

use crate::config::Config;
use crate::constants::{CHAT_ANSWER_PREFIX, CHAT_APOLOGY, CHAT_GROUNDED_PROMPT, CHAT_SYSTEM_PROMPT};
use crate::errors::{Error, Result};
use crate::llm::{ChatClient, ChatMessage, Embedder, OpenAiEmbedder};
use crate::rag::{chunk_text, VectorIndex};
use crate::report::docx_text::extract_text;
use crate::utils::render;

/// One conversation with a persistent system message and retrieval before
/// every question.
pub struct ChatSession<E: Embedder> {
    client: ChatClient,
    index: VectorIndex<E>,
    top_k: usize,
    history: Vec<ChatMessage>,
}

impl<E: Embedder> ChatSession<E> {
    pub fn new(client: ChatClient, index: VectorIndex<E>, top_k: usize) -> Self {
        ChatSession {
            client,
            index,
            top_k,
            history: vec![ChatMessage::system(CHAT_SYSTEM_PROMPT)],
        }
    }

    /// Answers a question from the knowledge base. Questions with no
    /// retrievable context get the apology answer without a network call.
    pub async fn ask(&mut self, question: &str) -> Result<String> {
        let context = self.index.search(question, self.top_k).await?;
        if context.is_empty() {
            return Ok(CHAT_APOLOGY.to_string());
        }

        let prompt = render(
            CHAT_GROUNDED_PROMPT,
            &[("context", context.join(" ").as_str()), ("question", question)],
        );
        self.history.push(ChatMessage::user(&prompt).dated());

        let answer = match self.client.send_text(&self.history).await {
            Ok(answer) => answer,
            Err(err) => {
                // The failed question stays out of the history.
                self.history.pop();
                return Err(err);
            }
        };
        let answer = if answer.starts_with(CHAT_ANSWER_PREFIX) {
            answer
        } else {
            format!("{CHAT_ANSWER_PREFIX}, {answer}")
        };

        self.history.push(ChatMessage::assistant(&answer));
        Ok(answer)
    }

    /// Drops everything but the system message.
    pub fn clear(&mut self) {
        self.history.truncate(1);
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }
}

pub async fn run(config: &Config, document: Option<&Path>) -> Result<()> {
    let default_path: PathBuf = config.output_dir.join(super::plan::PLAN_FILE_NAME);
    let path = document.unwrap_or(&default_path);

    let segments = extract_text(path)?;
    if segments.is_empty() {
        return Err(Error::DataLoad(format!(
            "{}: document has no text content",
            path.display()
        )));
    }

    let chunks = chunk_text(
        &segments.join("\n"),
        config.retrieval.chunk_size,
        config.retrieval.chunk_overlap,
    );
    info!(segments = segments.len(), chunks = chunks.len(), "knowledge base loaded");

    let embedder = OpenAiEmbedder::new(&config.retrieval.embedding_model)?;
    let mut index = VectorIndex::new(embedder);
    index.index_chunks(&chunks).await?;

    let client = super::build_chat_client(config)?;
    let mut session = ChatSession::new(client, index, config.retrieval.top_k);

    println!(
        "{}",
        "Ask about the compliance plan ('clear' resets, 'exit' quits).".bold()
    );
    loop {
        let line: String = match Input::new().with_prompt("you").interact_text() {
            Ok(line) => line,
            Err(err) => {
                warn!(error = %err, "input closed, leaving chat");
                break;
            }
        };
        match line.trim() {
            "" => continue,
            "exit" | "quit" => break,
            "clear" => {
                session.clear();
                println!("{}", "Conversation cleared.".yellow());
            }
            question => match session.ask(question).await {
                Ok(answer) => println!("{} {answer}", "bot:".green().bold()),
                Err(err) => {
                    warn!(error = %err, "chat request failed");
                    println!("{} {CHAT_APOLOGY}", "bot:".red().bold());
                }
            },
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::endpoints::ChatEndpoint;
    use crate::llm::{ChatResponse, DEFAULT_MIN_INTERVAL};
    use async_trait::async_trait;
    use serde_json::json;

    /// Always answers with a fixed line.
    struct FixedEndpoint {
        reply: String,
    }

    #[async_trait]
    impl ChatEndpoint for FixedEndpoint {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn post_chat(&self, _messages: &[ChatMessage]) -> Result<ChatResponse> {
            ChatResponse::decode(json!({"choices": [{"message": {"content": self.reply}}]}))
        }
    }

    struct KeywordEmbedder;

    #[async_trait]
    impl Embedder for KeywordEmbedder {
        async fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
            Ok(vec![if text.contains("safety") { 1.0 } else { 0.0 }, 1.0])
        }
    }

    async fn session(reply: &str) -> ChatSession<KeywordEmbedder> {
        let client = ChatClient::new(
            Box::new(FixedEndpoint {
                reply: reply.to_string(),
            }),
            DEFAULT_MIN_INTERVAL,
        );
        let mut index = VectorIndex::new(KeywordEmbedder);
        index
            .index_chunks(&["safety certification is mandatory".to_string()])
            .await
            .unwrap();
        ChatSession::new(client, index, 3)
    }

    #[tokio::test(start_paused = true)]
    async fn answers_keep_the_knowledge_base_prefix() {
        let mut session = session("Based on the knowledge base, CE marking applies.").await;
        let answer = session.ask("what about safety?").await.unwrap();
        assert_eq!(answer, "Based on the knowledge base, CE marking applies.");
    }

    #[tokio::test(start_paused = true)]
    async fn missing_prefix_is_added() {
        let mut session = session("CE marking applies.").await;
        let answer = session.ask("what about safety?").await.unwrap();
        assert!(answer.starts_with("Based on the knowledge base,"));
    }

    #[tokio::test(start_paused = true)]
    async fn history_grows_per_exchange_and_clear_resets_it() {
        let mut session = session("Based on the knowledge base, yes.").await;
        assert_eq!(session.history_len(), 1);

        session.ask("safety question one").await.unwrap();
        session.ask("safety question two").await.unwrap();
        assert_eq!(session.history_len(), 5);

        session.clear();
        assert_eq!(session.history_len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_index_yields_the_apology_without_a_call() {
        let client = ChatClient::new(
            Box::new(FixedEndpoint {
                reply: "should never be sent".to_string(),
            }),
            DEFAULT_MIN_INTERVAL,
        );
        let index = VectorIndex::new(KeywordEmbedder);
        let mut session = ChatSession::new(client, index, 3);

        let answer = session.ask("anything").await.unwrap();
        assert_eq!(answer, CHAT_APOLOGY);
    }
}
