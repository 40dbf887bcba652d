//! Qdrant-backed index: documents are upserted into a collection and
//! rebuilt from their payload at query time
use async_trait::async_trait;
use qdrant_client::{
    client::QdrantClient,
    qdrant::{
        vectors_config::Config, with_payload_selector::SelectorOptions, CreateCollection,
        Distance, PointStruct, SearchPoints, Value as QdrantValue, VectorParams, VectorsConfig,
        WithPayloadSelector,
    },
};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::{AssistantError, Result};
use crate::knowledge::RetrievableDocument;
use crate::rag::embedding::Embedder;
use crate::rag::index::Index;

/// Default Qdrant gRPC endpoint
pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";

/// Default collection name
pub const DEFAULT_COLLECTION: &str = "surgical_complications";

/// Index stored in a Qdrant collection
pub struct QdrantIndex {
    client: QdrantClient,
    collection: String,
    embedder: Arc<dyn Embedder>,
}

fn index_error(context: &str, err: impl std::fmt::Display) -> AssistantError {
    AssistantError::Index(format!("{}: {}", context, err))
}

impl QdrantIndex {
    pub fn new(url: &str, collection: &str, embedder: Arc<dyn Embedder>) -> Result<Self> {
        let client = QdrantClient::from_url(url)
            .build()
            .map_err(|e| index_error("Failed to create Qdrant client", e))?;

        Ok(Self {
            client,
            collection: collection.to_string(),
            embedder,
        })
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Drop any previous contents and create an empty collection
    async fn recreate_collection(&self) -> Result<()> {
        let collections = self
            .client
            .list_collections()
            .await
            .map_err(|e| index_error("Failed to list collections", e))?;

        if collections.collections.iter().any(|c| c.name == self.collection) {
            self.client
                .delete_collection(&self.collection)
                .await
                .map_err(|e| index_error("Failed to delete collection", e))?;
        }

        self.client
            .create_collection(&CreateCollection {
                collection_name: self.collection.clone(),
                vectors_config: Some(VectorsConfig {
                    config: Some(Config::Params(VectorParams {
                        size: self.embedder.dimension() as u64,
                        distance: Distance::Cosine.into(),
                        ..Default::default()
                    })),
                }),
                ..Default::default()
            })
            .await
            .map_err(|e| index_error("Failed to create collection", e))?;

        Ok(())
    }
}

#[async_trait]
impl Index for QdrantIndex {
    async fn build(&mut self, documents: Vec<RetrievableDocument>) -> Result<()> {
        self.recreate_collection().await?;

        if documents.is_empty() {
            return Ok(());
        }

        let texts: Vec<&str> = documents.iter().map(|d| d.content.as_str()).collect();
        let embeddings = self.embedder.embed_batch(&texts)?;

        let mut points = Vec::with_capacity(documents.len());
        for (position, (document, embedding)) in documents.iter().zip(embeddings).enumerate() {
            let payload: HashMap<String, QdrantValue> = document
                .to_payload()?
                .into_iter()
                .map(|(key, value)| (key, json_to_qdrant_value(value)))
                .collect();
            points.push(PointStruct::new(position as u64, embedding, payload));
        }

        self.client
            .upsert_points_blocking(&self.collection, None, points, None)
            .await
            .map_err(|e| index_error("Failed to upsert points", e))?;

        tracing::debug!(
            collection = %self.collection,
            documents = documents.len(),
            "Qdrant index built"
        );
        Ok(())
    }

    async fn query(&self, text: &str, k: usize) -> Result<Vec<RetrievableDocument>> {
        if k == 0 {
            return Ok(Vec::new());
        }

        let query_embedding = self.embedder.embed(text)?;

        let search_result = self
            .client
            .search_points(&SearchPoints {
                collection_name: self.collection.clone(),
                vector: query_embedding,
                limit: k as u64,
                with_payload: Some(WithPayloadSelector {
                    selector_options: Some(SelectorOptions::Enable(true)),
                }),
                ..Default::default()
            })
            .await
            .map_err(|e| index_error("Failed to search points", e))?;

        search_result
            .result
            .into_iter()
            .map(|point| {
                let payload = point
                    .payload
                    .iter()
                    .filter_map(|(key, value)| {
                        qdrant_to_json_value(value).map(|json| (key.clone(), json))
                    })
                    .collect();
                RetrievableDocument::from_payload(payload)
            })
            .collect()
    }
}

fn json_to_qdrant_value(json: JsonValue) -> QdrantValue {
    match json {
        JsonValue::String(s) => QdrantValue::from(s),
        JsonValue::Bool(b) => QdrantValue::from(b),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => QdrantValue::from(i),
            None => QdrantValue::from(n.as_f64().unwrap_or_default()),
        },
        other => QdrantValue::from(other.to_string()),
    }
}

fn qdrant_to_json_value(value: &QdrantValue) -> Option<JsonValue> {
    use qdrant_client::qdrant::value::Kind;

    value.kind.as_ref().and_then(|kind| match kind {
        Kind::StringValue(s) => Some(JsonValue::String(s.clone())),
        Kind::IntegerValue(i) => Some(JsonValue::Number((*i).into())),
        Kind::DoubleValue(f) => serde_json::Number::from_f64(*f).map(JsonValue::Number),
        Kind::BoolValue(b) => Some(JsonValue::Bool(*b)),
        _ => None,
    })
}
