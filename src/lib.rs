//! surgassist - Surgical Complication Assistant
//!
//! Browse a surgical-complication knowledge base by keyword or exact
//! selection, or ask free-text questions answered by a hosted completion
//! model grounded on retrieved knowledge-base entries.
//!
//! # Architecture
//!
//! - **knowledge**: data model, loader, retrievable documents
//! - **browser**: search, summary, protocol formatting, detail view
//! - **rag**: embeddings, vector index, retriever, prompt, generator
//! - **models**: hosted completion client
//! - **app**: one-time initialization and shared resources
//! - **cli / repl / doctor**: terminal front ends

pub mod errors;

pub use errors::{AssistantError, Result};

pub mod config;
pub mod logging;

pub mod browser;
pub mod knowledge;

pub mod models;
pub mod rag;

pub mod app;

pub mod cli;
pub mod doctor;
pub mod repl;
