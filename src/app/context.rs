//! Process-wide assistant context
//!
//! One controlled initialization point with explicit states:
//! - Uninitialized: nothing built yet
//! - Ready: resources built once and shared read-only afterwards
//! - Failed: startup error recorded; every later call reports it, no retry

use std::future::Future;
use std::sync::Arc;

use crate::browser::{self, ComplicationView, SearchHit};
use crate::errors::{AssistantError, Result};
use crate::knowledge::KnowledgeBase;
use crate::rag::{AnswerGenerator, GeneratedAnswer};

/// Everything an interaction needs, built once per process
pub struct Resources {
    knowledge_base: Arc<KnowledgeBase>,
    generator: AnswerGenerator,
}

impl Resources {
    pub fn new(knowledge_base: KnowledgeBase, generator: AnswerGenerator) -> Self {
        Self {
            knowledge_base: Arc::new(knowledge_base),
            generator,
        }
    }

    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.knowledge_base
    }

    pub fn generator(&self) -> &AnswerGenerator {
        &self.generator
    }

    /// Keyword search (browse mode)
    pub fn search(&self, query: &str) -> Option<SearchHit<'_>> {
        browser::find_by_query(query, &self.knowledge_base)
    }

    /// Exact selection (browse mode, cascading menus)
    pub fn select(&self, surgery: &str, complication: &str) -> Option<SearchHit<'_>> {
        browser::select(&self.knowledge_base, surgery, complication)
    }

    /// Detail view for a search query; placeholder view on a miss
    pub fn detail_for_query(&self, query: &str) -> ComplicationView {
        self.search(query)
            .map(|hit| ComplicationView::from_hit(&hit))
            .unwrap_or_else(ComplicationView::placeholder)
    }

    pub fn summary(&self) -> String {
        browser::summarize(&self.knowledge_base)
    }

    /// Ask mode; failures come back as answer text without sources
    pub async fn ask(&self, question: &str) -> GeneratedAnswer {
        self.generator.generate(question).await
    }
}

impl std::fmt::Debug for Resources {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resources")
            .field("surgeries", &self.knowledge_base.surgeries.len())
            .field("top_k", &self.generator.retriever().top_k())
            .finish_non_exhaustive()
    }
}

/// Initialization state
#[derive(Clone)]
pub enum ContextState {
    Uninitialized,
    Failed(String),
    Ready(Arc<Resources>),
}

impl std::fmt::Debug for ContextState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContextState::Uninitialized => write!(f, "Uninitialized"),
            ContextState::Failed(msg) => write!(f, "Failed({})", msg),
            ContextState::Ready(_) => write!(f, "Ready"),
        }
    }
}

/// Owner of the process-wide resources
pub struct AppContext {
    state: ContextState,
}

impl AppContext {
    pub fn new() -> Self {
        Self {
            state: ContextState::Uninitialized,
        }
    }

    pub fn state(&self) -> &ContextState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, ContextState::Ready(_))
    }

    /// Run `init` on the first call only. Later calls return the cached
    /// resources, or the recorded startup error without running `init`.
    pub async fn initialize<F, Fut>(&mut self, init: F) -> Result<Arc<Resources>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Resources>>,
    {
        match &self.state {
            ContextState::Ready(resources) => return Ok(Arc::clone(resources)),
            ContextState::Failed(msg) => {
                return Err(AssistantError::InitializationFailed(msg.clone()))
            }
            ContextState::Uninitialized => {}
        }

        match init().await {
            Ok(resources) => {
                let resources = Arc::new(resources);
                self.state = ContextState::Ready(Arc::clone(&resources));
                tracing::info!("Assistant initialized");
                Ok(resources)
            }
            Err(e) => {
                let msg = e.to_string();
                tracing::error!("Initialization failed: {}", msg);
                self.state = ContextState::Failed(msg.clone());
                Err(AssistantError::InitializationFailed(msg))
            }
        }
    }

    /// Resources for an interaction
    pub fn resources(&self) -> Result<Arc<Resources>> {
        match &self.state {
            ContextState::Ready(resources) => Ok(Arc::clone(resources)),
            ContextState::Failed(msg) => Err(AssistantError::InitializationFailed(msg.clone())),
            ContextState::Uninitialized => Err(AssistantError::NotInitialized),
        }
    }
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new()
    }
}
