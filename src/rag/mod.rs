use tracing::{debug, info};

use crate::errors::Result;
use crate::llm::Embedder;

/// Default chunking parameters for building a similarity index over a
/// document: 1000-character windows with a 200-character overlap.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;

/// Splits text into fixed-size overlapping chunks, measured in characters.
///
/// Window starts step by `size - overlap`; the final window may be shorter.
/// A cut that would land mid-word backs up to the last whitespace in the
/// window, when the window has one. `overlap` must be smaller than `size`;
/// the configuration loader rejects pairs that violate this.
pub fn chunk_text(text: &str, size: usize, overlap: usize) -> Vec<String> {
    assert!(size > 0 && overlap < size, "overlap must be below chunk size");

    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return Vec::new();
    }

    let step = size - overlap;
    let mut chunks = Vec::new();
    let mut start = 0;
    while start < chars.len() {
        let hard_end = (start + size).min(chars.len());
        let end = if hard_end < chars.len()
            && !chars[hard_end].is_whitespace()
            && !chars[hard_end - 1].is_whitespace()
        {
            match chars[start..hard_end].iter().rposition(|c| c.is_whitespace()) {
                Some(ws) if ws > 0 => start + ws,
                _ => hard_end,
            }
        } else {
            hard_end
        };
        let chunk: String = chars[start..end].iter().collect();
        let chunk = chunk.trim();
        if !chunk.is_empty() {
            chunks.push(chunk.to_string());
        }
        if hard_end == chars.len() {
            break;
        }
        start += step;
    }
    chunks
}

/// A text passage with its embedding.
#[derive(Debug, Clone)]
pub struct Passage {
    pub content: String,
    embedding: Vec<f32>,
}

/// In-memory similarity search index: embeds passages once, answers queries
/// by cosine similarity. Built once per document, never persisted.
pub struct VectorIndex<E: Embedder> {
    embedder: E,
    passages: Vec<Passage>,
}

impl<E: Embedder> VectorIndex<E> {
    pub fn new(embedder: E) -> Self {
        VectorIndex {
            embedder,
            passages: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.passages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }

    pub async fn add_passage(&mut self, content: &str) -> Result<()> {
        let embedding = self.embedder.embed_text(content).await?;
        self.passages.push(Passage {
            content: content.to_string(),
            embedding,
        });
        Ok(())
    }

    /// Builds the index from pre-chunked passages.
    pub async fn index_chunks(&mut self, chunks: &[String]) -> Result<()> {
        for chunk in chunks {
            self.add_passage(chunk).await?;
        }
        info!(passages = self.passages.len(), "similarity index built");
        Ok(())
    }

    /// Returns up to `top_k` passages ranked by similarity to the query.
    pub async fn search(&self, query: &str, top_k: usize) -> Result<Vec<String>> {
        debug!(query, top_k, "searching similarity index");
        let query_embedding = self.embedder.embed_text(query).await?;

        let mut scored: Vec<(f32, &Passage)> = self
            .passages
            .iter()
            .map(|p| (cosine_similarity(&query_embedding, &p.embedding), p))
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        Ok(scored
            .into_iter()
            .take(top_k)
            .map(|(_, p)| p.content.clone())
            .collect())
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    #[test]
    fn chunks_overlap_by_the_configured_amount() {
        let text = "abcdefghij".repeat(30); // 300 chars
        let chunks = chunk_text(&text, 100, 20);

        assert_eq!(chunks.len(), 4); // starts at 0, 80, 160, 240
        assert_eq!(chunks[0].len(), 100);
        // The last 20 chars of one chunk open the next.
        assert_eq!(&chunks[0][80..], &chunks[1][..20]);
    }

    #[test]
    fn chunk_cuts_back_up_to_word_boundaries() {
        let text = "word ".repeat(50);
        let chunks = chunk_text(&text, 23, 5);

        assert!(chunks.len() > 1);
        // A cut that would split a word moves back to the last space, so
        // every chunk ends on a whole word.
        assert!(chunks.iter().all(|c| c.ends_with("word")));
    }

    #[test]
    fn short_text_is_a_single_chunk() {
        let chunks = chunk_text("short", 1000, 200);
        assert_eq!(chunks, vec!["short".to_string()]);
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        assert!(chunk_text("", 1000, 200).is_empty());
    }

    #[test]
    fn chunking_respects_char_boundaries() {
        let text = "é".repeat(1500);
        let chunks = chunk_text(&text, 1000, 200);
        assert!(chunks.iter().all(|c| c.chars().all(|ch| ch == 'é')));
    }

    /// Maps each text to a fixed axis so similarity is predictable.
    struct StubEmbedder;

    #[async_trait]
    impl Embedder for StubEmbedder {
        async fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
            let mut v = vec![0.0f32; 4];
            if text.contains("safety") {
                v[0] = 1.0;
            }
            if text.contains("marking") {
                v[1] = 1.0;
            }
            if text.contains("testing") {
                v[2] = 1.0;
            }
            v[3] = 0.1;
            Ok(v)
        }
    }

    #[tokio::test]
    async fn search_ranks_by_similarity() {
        let mut index = VectorIndex::new(StubEmbedder);
        index
            .index_chunks(&[
                "marking requirements for Finland".to_string(),
                "safety certification process".to_string(),
                "general notes".to_string(),
            ])
            .await
            .unwrap();

        let results = index.search("safety rules", 2).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0], "safety certification process");
    }

    #[tokio::test]
    async fn search_caps_results_at_top_k() {
        let mut index = VectorIndex::new(StubEmbedder);
        index
            .index_chunks(&[
                "safety a".to_string(),
                "safety b".to_string(),
                "safety c".to_string(),
            ])
            .await
            .unwrap();

        let results = index.search("safety", 2).await.unwrap();
        assert_eq!(results.len(), 2);
    }
}
