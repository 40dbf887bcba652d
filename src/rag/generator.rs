//! Answer generator: retrieve context, then ask the hosted model
use async_trait::async_trait;
use std::sync::Arc;

use crate::errors::Result;
use crate::rag::prompt::{build_context, SYSTEM_PROMPT};
use crate::rag::retriever::Retriever;

/// Hosted completion capability
#[async_trait]
pub trait Completer: Send + Sync {
    async fn complete(&self, instruction: &str, context: &str, question: &str) -> Result<String>;
}

/// A completion plus the sources it was grounded on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedAnswer {
    pub text: String,
    pub sources: Vec<String>,
    /// Set when `text` reports a failed generation
    pub failed: bool,
}

impl GeneratedAnswer {
    /// Answer shown in place of a failed generation
    pub fn from_error(error: &dyn std::fmt::Display) -> Self {
        Self {
            text: format!("An error occurred during generation: {}", error),
            sources: Vec::new(),
            failed: true,
        }
    }

    pub fn is_failure(&self) -> bool {
        self.failed
    }
}

/// Retrieval-augmented answer generator
#[derive(Clone)]
pub struct AnswerGenerator {
    retriever: Retriever,
    completer: Arc<dyn Completer>,
}

impl AnswerGenerator {
    pub fn new(retriever: Retriever, completer: Arc<dyn Completer>) -> Self {
        Self {
            retriever,
            completer,
        }
    }

    /// Retrieve, assemble context, complete. Errors propagate.
    pub async fn try_generate(&self, query: &str) -> Result<GeneratedAnswer> {
        let documents = self.retriever.retrieve(query).await?;
        let context = build_context(&documents);

        let text = self
            .completer
            .complete(SYSTEM_PROMPT, &context, query)
            .await?;

        Ok(GeneratedAnswer {
            text,
            sources: documents.iter().map(|d| d.source().to_string()).collect(),
            failed: false,
        })
    }

    /// Like [`try_generate`], but any failure becomes the answer text with
    /// no sources. No retry, no partial result.
    ///
    /// [`try_generate`]: AnswerGenerator::try_generate
    pub async fn generate(&self, query: &str) -> GeneratedAnswer {
        match self.try_generate(query).await {
            Ok(answer) => answer,
            Err(e) => {
                tracing::error!("Generation failed: {}", e);
                GeneratedAnswer::from_error(&e)
            }
        }
    }

    pub fn retriever(&self) -> &Retriever {
        &self.retriever
    }
}
