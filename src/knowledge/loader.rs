//! Knowledge base loader
//!
//! A missing file degrades to an empty knowledge base; malformed content is
//! fatal to the caller.

use std::path::Path;

use crate::errors::{AssistantError, Result};
use crate::knowledge::types::KnowledgeBase;

/// Load and validate the knowledge base at `path`
pub fn load_knowledge_base(path: impl AsRef<Path>) -> Result<KnowledgeBase> {
    let path = path.as_ref();

    if !path.is_file() {
        tracing::warn!("Knowledge base file not found at {}", path.display());
        return Ok(KnowledgeBase::default());
    }

    let contents = std::fs::read_to_string(path)?;
    let knowledge_base: KnowledgeBase = serde_json::from_str(&contents).map_err(|source| {
        AssistantError::MalformedKnowledgeBase {
            path: path.to_path_buf(),
            source,
        }
    })?;

    knowledge_base.validate()?;

    tracing::info!(
        surgeries = knowledge_base.surgeries.len(),
        complications = knowledge_base.complication_count(),
        "Loaded knowledge base from {}",
        path.display()
    );

    Ok(knowledge_base)
}

/// Parse and validate a knowledge base from an in-memory JSON string
pub fn parse_knowledge_base(json: &str) -> Result<KnowledgeBase> {
    let knowledge_base: KnowledgeBase = serde_json::from_str(json)?;
    knowledge_base.validate()?;
    Ok(knowledge_base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_missing_file_yields_empty() {
        let temp_dir = TempDir::new().unwrap();
        let kb = load_knowledge_base(temp_dir.path().join("absent.json")).unwrap();
        assert!(kb.is_empty());
    }

    #[test]
    fn test_directory_path_yields_empty() {
        let temp_dir = TempDir::new().unwrap();
        let kb = load_knowledge_base(temp_dir.path()).unwrap();
        assert!(kb.is_empty());
    }

    #[test]
    fn test_load_valid_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"surgeries": [{{"surgery_name": "Cholecystectomy", "complications": [{{"name": "Bile Duct Injury"}}]}}]}}"#
        )
        .unwrap();

        let kb = load_knowledge_base(file.path()).unwrap();
        assert_eq!(kb.surgeries.len(), 1);
        assert_eq!(kb.complication_count(), 1);
    }

    #[test]
    fn test_malformed_file_is_fatal() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{\"surgeries\": [").unwrap();

        let result = load_knowledge_base(file.path());
        assert!(matches!(
            result,
            Err(AssistantError::MalformedKnowledgeBase { .. })
        ));
    }

    #[test]
    fn test_schema_mismatch_is_fatal() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"surgeries": [{{"category": "General"}}]}}"#).unwrap();

        assert!(load_knowledge_base(file.path()).is_err());
    }

    #[test]
    fn test_parse_knowledge_base_validates() {
        let json = r#"{"surgeries": [{"surgery_name": "A"}, {"surgery_name": "A"}]}"#;
        assert!(matches!(
            parse_knowledge_base(json),
            Err(AssistantError::InvalidKnowledgeBase(_))
        ));
    }
}
