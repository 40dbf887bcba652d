//! Protocol formatter: `Step N: ...` segments become a renumbered list

use regex::Regex;
use std::sync::OnceLock;

/// How a protocol field should be displayed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolRendering {
    /// Items already numbered from 1, e.g. `"1. **Stop bleeding.**"`
    Numbered(Vec<String>),
    /// No step markers found; the raw text unchanged
    Verbatim(String),
}

impl ProtocolRendering {
    pub fn to_markdown(&self) -> String {
        match self {
            ProtocolRendering::Numbered(items) => items.join("\n"),
            ProtocolRendering::Verbatim(text) => text.clone(),
        }
    }
}

fn step_marker() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| Regex::new(r"Step \d+: ").expect("step marker pattern is valid"))
}

/// Trimmed text following each `Step N: ` marker, up to the next marker or
/// the end of the input
pub fn extract_steps(raw: &str) -> Vec<String> {
    let markers: Vec<_> = step_marker().find_iter(raw).collect();

    markers
        .iter()
        .enumerate()
        .map(|(i, marker)| {
            let end = markers.get(i + 1).map_or(raw.len(), |next| next.start());
            raw[marker.end()..end].trim().to_string()
        })
        .collect()
}

/// Renumber the steps of `raw` from 1; source step numbers are discarded
pub fn format_protocol(raw: &str) -> ProtocolRendering {
    let steps = extract_steps(raw);
    if steps.is_empty() {
        return ProtocolRendering::Verbatim(raw.to_string());
    }

    ProtocolRendering::Numbered(
        steps
            .iter()
            .enumerate()
            .map(|(i, step)| format!("{}. **{}**", i + 1, step))
            .collect(),
    )
}
