//! Vector index capability and the in-process flat backend
use async_trait::async_trait;
use std::cmp::Ordering;
use std::sync::Arc;

use crate::errors::{AssistantError, Result};
use crate::knowledge::RetrievableDocument;
use crate::rag::embedding::Embedder;

/// Build once from a document set, then answer top-k similarity queries.
/// Returned documents are copies with content and metadata intact.
#[async_trait]
pub trait Index: Send + Sync {
    async fn build(&mut self, documents: Vec<RetrievableDocument>) -> Result<()>;

    async fn query(&self, text: &str, k: usize) -> Result<Vec<RetrievableDocument>>;
}

/// Exhaustive cosine-similarity index held in memory
pub struct MemoryIndex {
    embedder: Arc<dyn Embedder>,
    entries: Vec<(RetrievableDocument, Vec<f32>)>,
}

impl MemoryIndex {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            embedder,
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl Index for MemoryIndex {
    async fn build(&mut self, documents: Vec<RetrievableDocument>) -> Result<()> {
        let texts: Vec<&str> = documents.iter().map(|d| d.content.as_str()).collect();
        let embeddings = self.embedder.embed_batch(&texts)?;

        if embeddings.len() != documents.len() {
            return Err(AssistantError::Index(format!(
                "expected {} embeddings, got {}",
                documents.len(),
                embeddings.len()
            )));
        }

        self.entries = documents.into_iter().zip(embeddings).collect();
        tracing::debug!(documents = self.entries.len(), "Memory index built");
        Ok(())
    }

    async fn query(&self, text: &str, k: usize) -> Result<Vec<RetrievableDocument>> {
        if self.entries.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        let query_embedding = self.embedder.embed(text)?;

        let mut scored: Vec<(usize, f32)> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, (_, embedding))| (i, cosine_similarity(&query_embedding, embedding)))
            .collect();

        // Stable sort: equal scores keep document order
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

        Ok(scored
            .into_iter()
            .take(k)
            .map(|(i, _)| self.entries[i].0.clone())
            .collect())
    }
}

/// Cosine similarity; zero vectors score 0
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
