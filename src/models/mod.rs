//! Hosted completion model client
//!
//! - `client`: Gemini HTTP client implementing [`crate::rag::Completer`]
//! - `types`: request/response wire types

pub mod client;
pub mod types;

pub use client::{GeminiClient, DEFAULT_GEMINI_URL, DEFAULT_MODEL};
