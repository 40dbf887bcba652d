//! Build the real resources from configuration
use std::sync::Arc;
use std::time::Duration;

use crate::app::context::Resources;
use crate::config::{Config, IndexBackend};
use crate::errors::Result;
use crate::knowledge::{load_knowledge_base, prepare_documents};
use crate::models::GeminiClient;
use crate::rag::{AnswerGenerator, Embedder, EmbeddingEngine, Index, MemoryIndex, QdrantIndex, Retriever};

/// Credential, knowledge base, index, model client, in that order.
/// The credential is checked first so a missing key fails before any
/// expensive index build.
pub async fn bootstrap(config: &Config) -> Result<Resources> {
    bootstrap_with(config, |var| std::env::var(var).ok()).await
}

/// [`bootstrap`] with an injectable environment lookup for the credential
pub async fn bootstrap_with<F>(config: &Config, lookup: F) -> Result<Resources>
where
    F: Fn(&str) -> Option<String>,
{
    let api_key = config.api_key_from(lookup)?;

    let knowledge_base = load_knowledge_base(config.knowledge_base_path())?;
    let documents = prepare_documents(&knowledge_base);
    tracing::info!(documents = documents.len(), "Prepared documents for indexing");

    let embedder: Arc<dyn Embedder> =
        Arc::new(EmbeddingEngine::with_model(&config.retrieval.embedding_model)?);

    let index: Arc<dyn Index> = match config.retrieval.backend {
        IndexBackend::Memory => {
            let mut index = MemoryIndex::new(embedder);
            index.build(documents).await?;
            Arc::new(index)
        }
        IndexBackend::Qdrant => {
            let mut index = QdrantIndex::new(
                &config.retrieval.qdrant_url,
                &config.retrieval.collection,
                embedder,
            )?;
            index.build(documents).await?;
            Arc::new(index)
        }
    };

    let completer = GeminiClient::with_config(
        &config.llm.base_url,
        &config.llm.model,
        api_key,
        config.llm.temperature,
        Duration::from_secs(config.llm.timeout_secs),
    )?;

    let retriever = Retriever::with_top_k(index, config.retrieval.top_k);
    let generator = AnswerGenerator::new(retriever, Arc::new(completer));

    Ok(Resources::new(knowledge_base, generator))
}
