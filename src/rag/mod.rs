// RAG (Retrieval-Augmented Generation) over the surgical knowledge base
//
// Components:
// - Embedding: local sentence embeddings (Embedder capability)
// - Index: build-once / query-top-k capability, in-memory or Qdrant
// - Retriever: fixes k over a built index
// - Prompt: fixed instruction and context assembly
// - Generator: retrieve -> prompt -> hosted completion

pub mod embedding;
pub mod generator;
pub mod index;
pub mod prompt;
pub mod qdrant;
pub mod retriever;

pub use embedding::{Embedder, EmbeddingEngine, DEFAULT_EMBEDDING_MODEL};
pub use generator::{AnswerGenerator, Completer, GeneratedAnswer};
pub use index::{Index, MemoryIndex};
pub use qdrant::QdrantIndex;
pub use retriever::{Retriever, DEFAULT_TOP_K};
