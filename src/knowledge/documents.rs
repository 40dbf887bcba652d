//! Document preparer: flattens each (surgery, complication) pair into one
//! retrievable text unit with structured metadata.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;

use crate::errors::{AssistantError, Result};
use crate::knowledge::types::{Complication, KnowledgeBase, Surgery};

/// Structured metadata carried alongside each document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub surgery: String,
    pub complication: String,
    pub category: String,
    pub etiology: String,
    pub risk_factors: String,
    pub diagnostic_criteria: String,
    pub protocol: String,
    /// `"<surgery> - <complication>"`, the provenance shown to the user
    pub source: String,
}

/// One indexable unit per complication
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievableDocument {
    pub content: String,
    pub metadata: DocumentMetadata,
}

impl RetrievableDocument {
    /// Synthesize the document for one complication of a surgery
    pub fn from_pair(surgery: &Surgery, complication: &Complication) -> Self {
        let metadata = DocumentMetadata {
            surgery: surgery.name.clone(),
            complication: complication.name.clone(),
            category: surgery.category.clone(),
            etiology: complication.etiology().to_string(),
            risk_factors: complication.risk_factors().to_string(),
            diagnostic_criteria: complication.diagnostic_criteria().to_string(),
            protocol: complication.protocol().to_string(),
            source: source_label(&surgery.name, &complication.name),
        };

        let content = format!(
            "Surgical Complication: {} during/after {}. \
             Clinical Context (Etiology): {}. \
             Key Risk Factors: {}. \
             Diagnostic Criteria (Signs/Labs/Imaging): {}. \
             Management Protocol: {}",
            metadata.complication,
            metadata.surgery,
            metadata.etiology,
            metadata.risk_factors,
            metadata.diagnostic_criteria,
            metadata.protocol,
        );

        Self { content, metadata }
    }

    pub fn source(&self) -> &str {
        &self.metadata.source
    }

    /// Flatten into a payload map (content stored under `document`)
    pub fn to_payload(&self) -> Result<HashMap<String, JsonValue>> {
        let mut payload = match serde_json::to_value(&self.metadata)? {
            JsonValue::Object(map) => map.into_iter().collect::<HashMap<_, _>>(),
            other => {
                return Err(AssistantError::Generic(format!(
                    "unexpected metadata encoding: {}",
                    other
                )))
            }
        };
        payload.insert("document".to_string(), JsonValue::String(self.content.clone()));
        Ok(payload)
    }

    /// Rebuild a document from a payload produced by [`to_payload`]
    ///
    /// [`to_payload`]: RetrievableDocument::to_payload
    pub fn from_payload(mut payload: HashMap<String, JsonValue>) -> Result<Self> {
        let content = match payload.remove("document") {
            Some(JsonValue::String(content)) => content,
            _ => {
                return Err(AssistantError::Index(
                    "payload is missing document content".to_string(),
                ))
            }
        };
        let object: serde_json::Map<String, JsonValue> = payload.into_iter().collect();
        let metadata: DocumentMetadata = serde_json::from_value(JsonValue::Object(object))?;
        Ok(Self { content, metadata })
    }
}

/// Composite provenance label for a surgery/complication pair
pub fn source_label(surgery: &str, complication: &str) -> String {
    format!("{} - {}", surgery, complication)
}

/// One document per complication, in (surgery, complication) traversal order
pub fn prepare_documents(knowledge_base: &KnowledgeBase) -> Vec<RetrievableDocument> {
    knowledge_base
        .surgeries
        .iter()
        .flat_map(|surgery| {
            surgery
                .complications
                .iter()
                .map(move |complication| RetrievableDocument::from_pair(surgery, complication))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::types::NOT_AVAILABLE;

    fn bile_duct_injury() -> Complication {
        Complication {
            name: "Bile Duct Injury".to_string(),
            etiology: Some("Misidentification of anatomy".to_string()),
            risk_factors: Some("Acute inflammation".to_string()),
            diagnostic_criteria: Some("Rising bilirubin".to_string()),
            protocol: Some("Step 1: Refer to HPB surgeon.".to_string()),
            references: vec!["http://example.org/guideline".to_string()],
        }
    }

    #[test]
    fn test_document_content_and_metadata() {
        let surgery = Surgery::new("Cholecystectomy", "Hepatobiliary")
            .with_complication(bile_duct_injury());
        let doc = RetrievableDocument::from_pair(&surgery, &surgery.complications[0]);

        assert_eq!(doc.source(), "Cholecystectomy - Bile Duct Injury");
        assert_eq!(doc.metadata.category, "Hepatobiliary");
        assert!(doc
            .content
            .starts_with("Surgical Complication: Bile Duct Injury during/after Cholecystectomy."));
        assert!(doc.content.contains("Clinical Context (Etiology): Misidentification of anatomy."));
        assert!(doc.content.contains("Key Risk Factors: Acute inflammation."));
        assert!(doc
            .content
            .contains("Diagnostic Criteria (Signs/Labs/Imaging): Rising bilirubin."));
        assert!(doc.content.ends_with("Management Protocol: Step 1: Refer to HPB surgeon."));
    }

    #[test]
    fn test_missing_fields_use_marker() {
        let surgery = Surgery::new("Appendectomy", "General")
            .with_complication(Complication::new("Abscess"));
        let doc = RetrievableDocument::from_pair(&surgery, &surgery.complications[0]);

        assert_eq!(doc.content.matches(NOT_AVAILABLE).count(), 4);
        assert_eq!(doc.metadata.protocol, NOT_AVAILABLE);
        assert!(!doc.content.contains(": ."));
    }

    #[test]
    fn test_traversal_order() {
        let kb = KnowledgeBase::new(vec![
            Surgery::new("Colectomy", "Colorectal")
                .with_complication(Complication::new("Anastomotic Leak"))
                .with_complication(Complication::new("Bleeding")),
            Surgery::new("Cholecystectomy", "Hepatobiliary").with_complication(bile_duct_injury()),
        ]);

        let sources: Vec<String> = prepare_documents(&kb)
            .iter()
            .map(|d| d.source().to_string())
            .collect();
        assert_eq!(
            sources,
            vec![
                "Colectomy - Anastomotic Leak",
                "Colectomy - Bleeding",
                "Cholecystectomy - Bile Duct Injury",
            ]
        );
    }

    #[test]
    fn test_surgery_without_complications_contributes_nothing() {
        let kb = KnowledgeBase::new(vec![Surgery::new("Hernia Repair", "General")]);
        assert!(prepare_documents(&kb).is_empty());
    }

    #[test]
    fn test_payload_round_trip() {
        let surgery = Surgery::new("Cholecystectomy", "Hepatobiliary")
            .with_complication(bile_duct_injury());
        let doc = RetrievableDocument::from_pair(&surgery, &surgery.complications[0]);

        let payload = doc.to_payload().unwrap();
        assert_eq!(
            payload.get("source"),
            Some(&JsonValue::String("Cholecystectomy - Bile Duct Injury".to_string()))
        );
        assert_eq!(RetrievableDocument::from_payload(payload).unwrap(), doc);
    }

    #[test]
    fn test_from_payload_without_content_fails() {
        assert!(RetrievableDocument::from_payload(HashMap::new()).is_err());
    }
}
