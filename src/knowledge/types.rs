//! Knowledge base data model
//!
//! Mirrors the JSON layout `surgeries -> complications -> fields`.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::errors::{AssistantError, Result};
use crate::knowledge::documents::source_label;

/// Marker substituted for any missing clinical field
pub const NOT_AVAILABLE: &str = "N/A";

/// Category used when a surgery does not declare one
pub const DEFAULT_CATEGORY: &str = "General";

/// Root container: ordered surgeries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeBase {
    #[serde(default)]
    pub surgeries: Vec<Surgery>,
}

/// A surgery and its documented complications
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Surgery {
    #[serde(rename = "surgery_name")]
    pub name: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub complications: Vec<Complication>,
}

/// A clinical adverse event associated with a surgery
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Complication {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etiology: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_factors: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostic_criteria: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(default)]
    pub references: Vec<String>,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

/// Missing, null and blank fields all read as the marker
fn field_or_marker(field: &Option<String>) -> &str {
    match field.as_deref() {
        Some(value) if !value.trim().is_empty() => value,
        _ => NOT_AVAILABLE,
    }
}

impl KnowledgeBase {
    pub fn new(surgeries: Vec<Surgery>) -> Self {
        Self { surgeries }
    }

    pub fn is_empty(&self) -> bool {
        self.surgeries.is_empty()
    }

    /// Total complications across all surgeries
    pub fn complication_count(&self) -> usize {
        self.surgeries.iter().map(|s| s.complications.len()).sum()
    }

    /// Look up a surgery by exact name
    pub fn surgery(&self, name: &str) -> Option<&Surgery> {
        self.surgeries.iter().find(|s| s.name == name)
    }

    /// Check the lookup invariants: surgery names unique across the
    /// knowledge base, complication names unique within a surgery, and
    /// one distinct source label per (surgery, complication) pair.
    pub fn validate(&self) -> Result<()> {
        let mut surgery_names = HashSet::new();
        let mut sources = HashSet::new();
        for surgery in &self.surgeries {
            if !surgery_names.insert(surgery.name.as_str()) {
                return Err(AssistantError::InvalidKnowledgeBase(format!(
                    "duplicate surgery name '{}'",
                    surgery.name
                )));
            }

            let mut complication_names = HashSet::new();
            for complication in &surgery.complications {
                if !complication_names.insert(complication.name.as_str()) {
                    return Err(AssistantError::InvalidKnowledgeBase(format!(
                        "duplicate complication '{}' under surgery '{}'",
                        complication.name, surgery.name
                    )));
                }

                let source = source_label(&surgery.name, &complication.name);
                if !sources.insert(source.clone()) {
                    return Err(AssistantError::InvalidKnowledgeBase(format!(
                        "duplicate source label '{}'",
                        source
                    )));
                }
            }
        }
        Ok(())
    }
}

impl Surgery {
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            complications: Vec::new(),
        }
    }

    pub fn with_complication(mut self, complication: Complication) -> Self {
        self.complications.push(complication);
        self
    }

    pub fn first_complication(&self) -> Option<&Complication> {
        self.complications.first()
    }

    /// Look up a complication by exact name
    pub fn complication(&self, name: &str) -> Option<&Complication> {
        self.complications.iter().find(|c| c.name == name)
    }
}

impl Complication {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn etiology(&self) -> &str {
        field_or_marker(&self.etiology)
    }

    pub fn risk_factors(&self) -> &str {
        field_or_marker(&self.risk_factors)
    }

    pub fn diagnostic_criteria(&self) -> &str {
        field_or_marker(&self.diagnostic_criteria)
    }

    pub fn protocol(&self) -> &str {
        field_or_marker(&self.protocol)
    }
}
