//! Keyword search and cascading selection over the knowledge base
//!
//! Linear first-match-wins scan; the knowledge base is small and static.

use crate::knowledge::{Complication, KnowledgeBase, Surgery};

/// A resolved (surgery, complication) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchHit<'a> {
    pub surgery_name: &'a str,
    pub complication_name: &'a str,
    pub surgery: &'a Surgery,
}

impl<'a> SearchHit<'a> {
    fn new(surgery: &'a Surgery, complication: &'a Complication) -> Self {
        Self {
            surgery_name: &surgery.name,
            complication_name: &complication.name,
            surgery,
        }
    }

    /// The complication record this hit points at
    pub fn complication(&self) -> Option<&'a Complication> {
        self.surgery.complication(self.complication_name)
    }
}

/// Case-insensitive substring search over surgery and complication names.
///
/// A surgery-name match resolves to that surgery's first complication. An
/// empty query returns `None` without scanning.
pub fn find_by_query<'a>(query: &str, knowledge_base: &'a KnowledgeBase) -> Option<SearchHit<'a>> {
    if query.is_empty() {
        return None;
    }

    let needle = query.to_lowercase();

    for surgery in &knowledge_base.surgeries {
        if surgery.name.to_lowercase().contains(&needle) {
            if let Some(first) = surgery.first_complication() {
                return Some(SearchHit::new(surgery, first));
            }
        }

        if let Some(complication) = surgery
            .complications
            .iter()
            .find(|c| c.name.to_lowercase().contains(&needle))
        {
            return Some(SearchHit::new(surgery, complication));
        }
    }

    None
}

/// Surgery names in knowledge base order (first selection menu)
pub fn surgery_names(knowledge_base: &KnowledgeBase) -> Vec<&str> {
    knowledge_base.surgeries.iter().map(|s| s.name.as_str()).collect()
}

/// Complication names of one surgery in order (second selection menu)
pub fn complication_names(surgery: &Surgery) -> Vec<&str> {
    surgery.complications.iter().map(|c| c.name.as_str()).collect()
}

/// Resolve an exact (surgery, complication) selection
pub fn select<'a>(
    knowledge_base: &'a KnowledgeBase,
    surgery_name: &str,
    complication_name: &str,
) -> Option<SearchHit<'a>> {
    let surgery = knowledge_base.surgery(surgery_name)?;
    let complication = surgery.complication(complication_name)?;
    Some(SearchHit::new(surgery, complication))
}
