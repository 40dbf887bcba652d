//! Full listing of surgeries and their complications

use crate::knowledge::KnowledgeBase;

/// Markdown listing: one entry per surgery with its category and the
/// comma-joined names of its complications, in knowledge base order
pub fn summarize(knowledge_base: &KnowledgeBase) -> String {
    let mut summary = String::new();

    for surgery in &knowledge_base.surgeries {
        let names: Vec<&str> = surgery.complications.iter().map(|c| c.name.as_str()).collect();
        summary.push_str(&format!("- **{}** (`{}`)\n", surgery.name, surgery.category));
        summary.push_str(&format!("  - Complications: {}\n", names.join(", ")));
    }

    summary
}
