//! Knowledge base: data model, loader and document preparer
//!
//! The knowledge base is loaded once per session and treated as immutable.

pub mod documents;
pub mod loader;
pub mod types;

pub use documents::{prepare_documents, source_label, DocumentMetadata, RetrievableDocument};
pub use loader::{load_knowledge_base, parse_knowledge_base};
pub use types::{Complication, KnowledgeBase, Surgery, DEFAULT_CATEGORY, NOT_AVAILABLE};
