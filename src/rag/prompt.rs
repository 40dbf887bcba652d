//! Fixed instruction and context assembly for grounded answers
use crate::knowledge::RetrievableDocument;

/// System-level directive: structure, grounding and source summary
pub const SYSTEM_PROMPT: &str = "You are an expert Surgical Complication AI Assistant. \
Your task is to provide accurate, concise, and structured clinical summaries based ONLY on \
the provided CONTEXT from the surgical knowledge base. Do not use external knowledge. \
If the context does not contain the answer, state that you cannot find the information.\n\n\
Format your answer strictly with the following clinical sections (use Markdown formatting):\n\n\
### 1. Diagnosis & Presentation (Signs/Imaging)\n\
### 2. Etiology\n\
### 3. Risk Factors\n\
### 4. Management Protocol\n\n\
At the end, include a short summary of the source document(s) used for grounding.";

/// Concatenate retrieved documents into one context block, each labelled
/// with its source
pub fn build_context(documents: &[RetrievableDocument]) -> String {
    documents
        .iter()
        .map(|doc| format!("[Source: {}]\n{}", doc.source(), doc.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// User turn sent alongside the system prompt
pub fn user_message(context: &str, question: &str) -> String {
    format!("Context: {}\n\nQuestion: {}", context, question)
}
