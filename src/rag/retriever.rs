//! Retriever adapter: top-k semantically similar documents for a query
use std::sync::Arc;

use crate::errors::Result;
use crate::knowledge::RetrievableDocument;
use crate::rag::index::Index;

/// Number of documents retrieved per question
pub const DEFAULT_TOP_K: usize = 3;

/// Thin wrapper fixing `k` over a built index
#[derive(Clone)]
pub struct Retriever {
    index: Arc<dyn Index>,
    top_k: usize,
}

impl Retriever {
    pub fn new(index: Arc<dyn Index>) -> Self {
        Self::with_top_k(index, DEFAULT_TOP_K)
    }

    pub fn with_top_k(index: Arc<dyn Index>, top_k: usize) -> Self {
        Self { index, top_k }
    }

    pub async fn retrieve(&self, query: &str) -> Result<Vec<RetrievableDocument>> {
        let documents = self.index.query(query, self.top_k).await?;
        tracing::debug!(
            query,
            retrieved = documents.len(),
            sources = ?documents.iter().map(|d| d.source()).collect::<Vec<_>>(),
            "Retrieved context"
        );
        Ok(documents)
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::{prepare_documents, Complication, KnowledgeBase, Surgery};
    use async_trait::async_trait;

    /// Returns the first `k` documents regardless of query
    struct FixedIndex(Vec<RetrievableDocument>);

    #[async_trait]
    impl Index for FixedIndex {
        async fn build(&mut self, documents: Vec<RetrievableDocument>) -> Result<()> {
            self.0 = documents;
            Ok(())
        }

        async fn query(&self, _text: &str, k: usize) -> Result<Vec<RetrievableDocument>> {
            Ok(self.0.iter().take(k).cloned().collect())
        }
    }

    fn documents() -> Vec<RetrievableDocument> {
        let surgery = (1..=5).fold(Surgery::new("Colectomy", "Colorectal"), |s, i| {
            s.with_complication(Complication::new(format!("Complication {}", i)))
        });
        prepare_documents(&KnowledgeBase::new(vec![surgery]))
    }

    #[tokio::test]
    async fn test_default_top_k_is_three() {
        let retriever = Retriever::new(Arc::new(FixedIndex(documents())));
        assert_eq!(retriever.top_k(), DEFAULT_TOP_K);

        let retrieved = retriever.retrieve("leak").await.unwrap();
        assert_eq!(retrieved.len(), 3);
    }

    #[tokio::test]
    async fn test_custom_top_k() {
        let retriever = Retriever::with_top_k(Arc::new(FixedIndex(documents())), 1);
        assert_eq!(retriever.retrieve("leak").await.unwrap().len(), 1);
    }
}
