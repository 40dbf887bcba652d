//! Structured detail view of a single complication

use crate::browser::protocol::{format_protocol, ProtocolRendering};
use crate::browser::search::SearchHit;

const PLACEHOLDER: &str = "Select a mode and find a protocol above.";
const PLACEHOLDER_PROTOCOL: &str =
    "Select a mode and find a protocol above to view the full management protocol.";
const REFERENCE_LABEL: &str = "Standard Treatment Guidelines (MoHFW)";
const NO_REFERENCES: &str = "*No references provided.*";

/// Fields shown for a selected complication, or placeholders when nothing
/// is selected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplicationView {
    /// `(surgery, complication)` when a selection was made
    pub selection: Option<(String, String)>,
    pub risk_factors: String,
    pub etiology: String,
    pub diagnostic_criteria: String,
    pub protocol: ProtocolRendering,
    pub references: Vec<String>,
}

impl ComplicationView {
    /// View shown before any protocol has been found
    pub fn placeholder() -> Self {
        Self {
            selection: None,
            risk_factors: PLACEHOLDER.to_string(),
            etiology: PLACEHOLDER.to_string(),
            diagnostic_criteria: PLACEHOLDER.to_string(),
            protocol: ProtocolRendering::Verbatim(PLACEHOLDER_PROTOCOL.to_string()),
            references: Vec::new(),
        }
    }

    /// Build the view for a search or selection hit
    pub fn from_hit(hit: &SearchHit<'_>) -> Self {
        match hit.complication() {
            Some(complication) => Self {
                selection: Some((hit.surgery_name.to_string(), hit.complication_name.to_string())),
                risk_factors: complication.risk_factors().to_string(),
                etiology: complication.etiology().to_string(),
                diagnostic_criteria: complication.diagnostic_criteria().to_string(),
                protocol: format_protocol(complication.protocol()),
                references: complication.references.clone(),
            },
            None => Self::placeholder(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.selection.is_none()
    }

    /// Reference URLs rendered as Markdown links
    pub fn reference_links(&self) -> Vec<String> {
        self.references
            .iter()
            .map(|url| format!("- [{}]({})", REFERENCE_LABEL, url))
            .collect()
    }

    /// Render as Markdown, ordered risk -> problem -> confirmation -> management
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();

        if let Some((surgery, complication)) = &self.selection {
            out.push_str(&format!("## Detailed Protocol: {}\n", complication));
            out.push_str(&format!("Applies to: **{}**\n\n", surgery));
        }

        out.push_str("### Why is this patient at risk? (Pre-existing conditions, procedural factors)\n");
        out.push_str(&self.risk_factors);
        out.push_str("\n\n### What is the problem? (Mechanism of injury, pathophysiology)\n");
        out.push_str(&self.etiology);
        out.push_str("\n\n### How do we confirm it? (Signs, symptoms, diagnostic tests)\n");
        out.push_str(&self.diagnostic_criteria);
        out.push_str("\n\n### Management Protocol Steps\n");
        out.push_str(&self.protocol.to_markdown());
        out.push_str("\n\n### References\n");

        let links = self.reference_links();
        if self.is_placeholder() || links.is_empty() {
            out.push_str(NO_REFERENCES);
        } else {
            out.push_str(&links.join("\n"));
        }
        out.push('\n');

        out
    }
}
