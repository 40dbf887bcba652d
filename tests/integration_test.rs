//! Integration tests for surgassist
//!
//! Exercises load -> browse and load -> index -> generate without network
//! access or model downloads.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use surgassist::{
    app::{AppContext, Resources},
    browser::{self, ComplicationView, ProtocolRendering},
    errors::AssistantError,
    knowledge::{load_knowledge_base, prepare_documents, KnowledgeBase},
    rag::{AnswerGenerator, Completer, Embedder, Index, MemoryIndex, Retriever},
    Result,
};

const KB_JSON: &str = r#"{
  "surgeries": [
    {
      "surgery_name": "Laparoscopic Cholecystectomy",
      "category": "Hepatobiliary",
      "complications": [
        {
          "name": "Bile Duct Injury",
          "etiology": "Misidentification of the common bile duct",
          "risk_factors": "Acute inflammation, aberrant anatomy",
          "diagnostic_criteria": "Rising bilirubin, bile leak on HIDA scan",
          "protocol": "Step 1: Stop and call for help. Step 2: Obtain cholangiography. Step 3: Refer to a hepatobiliary surgeon.",
          "references": ["http://example.org/guideline"]
        },
        {
          "name": "Port Site Hernia"
        }
      ]
    },
    {
      "surgery_name": "Colectomy",
      "complications": [
        {
          "name": "Anastomotic Leak",
          "etiology": "Breakdown of the bowel anastomosis",
          "protocol": "Resuscitate and return to theatre",
          "risk_factors": null
        }
      ]
    }
  ]
}"#;

fn write_kb(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("surgical_knowledge.json");
    std::fs::write(&path, KB_JSON).unwrap();
    path
}

struct KeywordEmbedder;

impl Embedder for KeywordEmbedder {
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let vocabulary = ["bile", "leak", "anastomo", "hernia", "port"];
        Ok(texts
            .iter()
            .map(|text| {
                let lower = text.to_lowercase();
                vocabulary
                    .iter()
                    .map(|word| lower.matches(word).count() as f32 + 0.01)
                    .collect()
            })
            .collect())
    }

    fn dimension(&self) -> usize {
        5
    }
}

/// Records the context it was given and answers with a fixed section
#[derive(Default)]
struct RecordingCompleter {
    contexts: Mutex<Vec<String>>,
}

#[async_trait]
impl Completer for RecordingCompleter {
    async fn complete(&self, instruction: &str, context: &str, _question: &str) -> Result<String> {
        assert!(instruction.contains("### 4. Management Protocol"));
        self.contexts.lock().unwrap().push(context.to_string());
        Ok("### 1. Diagnosis & Presentation\nRising bilirubin".to_string())
    }
}

struct FailingCompleter;

#[async_trait]
impl Completer for FailingCompleter {
    async fn complete(&self, _: &str, _: &str, _: &str) -> Result<String> {
        Err(AssistantError::LlmApiError("quota exceeded".to_string()))
    }
}

async fn resources_with(kb: KnowledgeBase, completer: Arc<dyn Completer>) -> Resources {
    let mut index = MemoryIndex::new(Arc::new(KeywordEmbedder));
    index.build(prepare_documents(&kb)).await.unwrap();
    let generator = AnswerGenerator::new(Retriever::with_top_k(Arc::new(index), 1), completer);
    Resources::new(kb, generator)
}

#[test]
fn test_load_and_browse_end_to_end() {
    let dir = TempDir::new().unwrap();
    let kb = load_knowledge_base(write_kb(&dir)).unwrap();

    assert_eq!(kb.surgeries.len(), 2);
    assert_eq!(kb.complication_count(), 3);
    assert_eq!(kb.surgeries[1].category, "General");

    let hit = browser::find_by_query("bile duct", &kb).unwrap();
    assert_eq!(hit.surgery_name, "Laparoscopic Cholecystectomy");
    assert_eq!(hit.complication_name, "Bile Duct Injury");

    let view = ComplicationView::from_hit(&hit);
    assert_eq!(view.etiology, "Misidentification of the common bile duct");
    assert_eq!(view.risk_factors, "Acute inflammation, aberrant anatomy");
    assert_eq!(view.diagnostic_criteria, "Rising bilirubin, bile leak on HIDA scan");
    assert_eq!(
        view.protocol,
        ProtocolRendering::Numbered(vec![
            "1. **Stop and call for help.**".to_string(),
            "2. **Obtain cholangiography.**".to_string(),
            "3. **Refer to a hepatobiliary surgeon.**".to_string(),
        ])
    );

    let markdown = view.to_markdown();
    assert!(markdown.contains("[Standard Treatment Guidelines (MoHFW)](http://example.org/guideline)"));
}

#[test]
fn test_surgery_match_resolves_first_complication() {
    let dir = TempDir::new().unwrap();
    let kb = load_knowledge_base(write_kb(&dir)).unwrap();

    let hit = browser::find_by_query("CHOLECYST", &kb).unwrap();
    assert_eq!(hit.complication_name, "Bile Duct Injury");

    let hit = browser::find_by_query("colectomy", &kb).unwrap();
    assert_eq!(hit.complication_name, "Anastomotic Leak");
}

#[test]
fn test_missing_fields_render_not_available() {
    let dir = TempDir::new().unwrap();
    let kb = load_knowledge_base(write_kb(&dir)).unwrap();

    let hit = browser::select(&kb, "Colectomy", "Anastomotic Leak").unwrap();
    let view = ComplicationView::from_hit(&hit);
    assert_eq!(view.risk_factors, "N/A");
    assert_eq!(view.diagnostic_criteria, "N/A");
    assert_eq!(
        view.protocol,
        ProtocolRendering::Verbatim("Resuscitate and return to theatre".to_string())
    );
    assert!(view.to_markdown().contains("*No references provided.*"));
}

#[test]
fn test_search_miss_and_summary() {
    let dir = TempDir::new().unwrap();
    let kb = load_knowledge_base(write_kb(&dir)).unwrap();

    assert!(browser::find_by_query("whipple", &kb).is_none());
    assert!(browser::find_by_query("", &kb).is_none());

    let summary = browser::summarize(&kb);
    assert!(summary.contains("- **Colectomy** (`General`)"));
    assert!(summary.contains("Bile Duct Injury, Port Site Hernia"));
}

#[test]
fn test_missing_file_is_empty_knowledge_base() {
    let dir = TempDir::new().unwrap();
    let kb = load_knowledge_base(dir.path().join("absent.json")).unwrap();

    assert!(kb.is_empty());
    assert!(prepare_documents(&kb).is_empty());
    assert_eq!(browser::summarize(&kb), "");
}

#[test]
fn test_malformed_file_is_fatal() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("kb.json");
    std::fs::write(&path, r#"{"surgeries": [ {"category": "x"} ]}"#).unwrap();

    let err = load_knowledge_base(&path).unwrap_err();
    assert!(matches!(err, AssistantError::MalformedKnowledgeBase { .. }));
}

#[test]
fn test_colliding_source_labels_are_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("kb.json");
    std::fs::write(
        &path,
        r#"{"surgeries": [
            {"surgery_name": "Whipple - Open", "complications": [{"name": "Leak"}]},
            {"surgery_name": "Whipple", "complications": [{"name": "Open - Leak"}]}
        ]}"#,
    )
    .unwrap();

    let err = load_knowledge_base(&path).unwrap_err();
    assert!(matches!(err, AssistantError::InvalidKnowledgeBase(ref msg) if msg.contains("duplicate source label")));
}

#[test]
fn test_documents_cover_every_complication() {
    let dir = TempDir::new().unwrap();
    let kb = load_knowledge_base(write_kb(&dir)).unwrap();
    let documents = prepare_documents(&kb);

    let sources: Vec<_> = documents.iter().map(|d| d.source()).collect();
    assert_eq!(
        sources,
        vec![
            "Laparoscopic Cholecystectomy - Bile Duct Injury",
            "Laparoscopic Cholecystectomy - Port Site Hernia",
            "Colectomy - Anastomotic Leak",
        ]
    );
    assert!(documents[1].content.contains("Clinical Context (Etiology): N/A."));
}

#[tokio::test]
async fn test_ask_is_grounded_on_retrieved_documents() {
    let dir = TempDir::new().unwrap();
    let kb = load_knowledge_base(write_kb(&dir)).unwrap();
    let completer = Arc::new(RecordingCompleter::default());
    let resources = resources_with(kb, completer.clone()).await;

    let answer = resources.ask("How is a bile duct injury confirmed?").await;
    assert!(!answer.is_failure());
    assert!(answer.text.starts_with("### 1. Diagnosis"));
    assert_eq!(answer.sources, vec!["Laparoscopic Cholecystectomy - Bile Duct Injury"]);

    let contexts = completer.contexts.lock().unwrap();
    assert_eq!(contexts.len(), 1);
    assert!(contexts[0].starts_with("[Source: Laparoscopic Cholecystectomy - Bile Duct Injury]"));
}

#[tokio::test]
async fn test_generation_failure_becomes_answer_text() {
    let dir = TempDir::new().unwrap();
    let kb = load_knowledge_base(write_kb(&dir)).unwrap();
    let resources = resources_with(kb, Arc::new(FailingCompleter)).await;

    let answer = resources.ask("anything about leaks?").await;
    assert!(answer.is_failure());
    assert!(answer.text.starts_with("An error occurred during generation:"));
    assert!(answer.text.contains("quota exceeded"));
    assert!(answer.sources.is_empty());
}

#[tokio::test]
async fn test_context_initializes_once_and_serves_both_modes() {
    let dir = TempDir::new().unwrap();
    let path = write_kb(&dir);
    let mut context = AppContext::new();

    let resources = context
        .initialize(|| async {
            let kb = load_knowledge_base(&path)?;
            Ok::<_, AssistantError>(resources_with(kb, Arc::new(RecordingCompleter::default())).await)
        })
        .await
        .unwrap();

    assert!(context.is_ready());
    assert!(resources.search("hernia").is_some());
    assert!(resources.detail_for_query("nothing matches").is_placeholder());
    assert!(!resources.ask("leak?").await.text.is_empty());
}
