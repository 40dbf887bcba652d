//! Embedding engine: local sentence embeddings via Candle
use anyhow::{Context, Result as AnyResult};
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config};
use hf_hub::{api::sync::Api, Repo, RepoType};
use std::sync::Arc;
use tokenizers::Tokenizer;

use crate::errors::{AssistantError, Result};

/// Default sentence-embedding model
pub const DEFAULT_EMBEDDING_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";

/// Text to dense vector
pub trait Embedder: Send + Sync {
    /// Embed several texts; output order matches input order
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;

    /// Embedding width
    fn dimension(&self) -> usize;

    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_batch(&[text])?
            .pop()
            .ok_or_else(|| AssistantError::Embedding("no embedding returned".to_string()))
    }
}

/// BERT-family sentence embedder (mean pooled)
pub struct EmbeddingEngine {
    model: Arc<BertModel>,
    tokenizer: Arc<Tokenizer>,
    device: Device,
    dimension: usize,
}

impl EmbeddingEngine {
    /// Create the default engine (downloads the model on first use)
    pub fn new() -> Result<Self> {
        Self::with_model(DEFAULT_EMBEDDING_MODEL)
    }

    /// Create an engine for a HuggingFace Hub model id
    pub fn with_model(model_id: &str) -> Result<Self> {
        Self::load(model_id).map_err(|e| AssistantError::Embedding(format!("{:#}", e)))
    }

    fn load(model_id: &str) -> AnyResult<Self> {
        let device = Device::Cpu;

        let api = Api::new().context("Failed to create HuggingFace API client")?;
        let repo = api.repo(Repo::new(model_id.to_string(), RepoType::Model));

        let config_path = repo.get("config.json").context("Failed to download model config")?;
        let tokenizer_path = repo.get("tokenizer.json").context("Failed to download tokenizer")?;
        let weights_path = repo
            .get("model.safetensors")
            .context("Failed to download model weights")?;

        let config_contents =
            std::fs::read_to_string(config_path).context("Failed to read model config")?;
        let raw_config: serde_json::Value =
            serde_json::from_str(&config_contents).context("Failed to parse model config")?;
        let dimension = raw_config
            .get("hidden_size")
            .and_then(|v| v.as_u64())
            .context("Model config has no hidden_size")? as usize;
        let config: Config =
            serde_json::from_value(raw_config).context("Unsupported model config")?;

        let tokenizer = Tokenizer::from_file(tokenizer_path)
            .map_err(|e| anyhow::anyhow!("Failed to load tokenizer: {}", e))?;

        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, &device)
                .context("Failed to load model weights")?
        };
        let model = BertModel::load(vb, &config).context("Failed to create BERT model")?;

        tracing::info!(model = model_id, dimension, "Embedding model loaded");

        Ok(Self {
            model: Arc::new(model),
            tokenizer: Arc::new(tokenizer),
            device,
            dimension,
        })
    }

    fn embed_tensors(&self, texts: &[&str]) -> AnyResult<Vec<Vec<f32>>> {
        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| anyhow::anyhow!("Tokenization failed: {}", e))?;

        let max_len = encodings.iter().map(|e| e.get_ids().len()).max().unwrap_or(0);
        let batch_size = texts.len();

        let mut flat_ids = vec![0u32; batch_size * max_len];
        let mut flat_mask = vec![0u32; batch_size * max_len];
        for (i, encoding) in encodings.iter().enumerate() {
            let ids = encoding.get_ids();
            let mask = encoding.get_attention_mask();
            flat_ids[i * max_len..i * max_len + ids.len()].copy_from_slice(ids);
            flat_mask[i * max_len..i * max_len + mask.len()].copy_from_slice(mask);
        }

        let token_ids = Tensor::from_vec(flat_ids, (batch_size, max_len), &self.device)?;
        let attention_mask = Tensor::from_vec(flat_mask, (batch_size, max_len), &self.device)?;
        let token_type_ids = token_ids.zeros_like()?;

        let embeddings = self
            .model
            .forward(&token_ids, &token_type_ids, Some(&attention_mask))?;
        let pooled = Self::mean_pool(&embeddings, &attention_mask)?;

        Ok(pooled.to_vec2::<f32>()?)
    }

    /// Mean pooling with attention mask
    fn mean_pool(embeddings: &Tensor, attention_mask: &Tensor) -> AnyResult<Tensor> {
        let mask_expanded = attention_mask
            .unsqueeze(2)?
            .expand(embeddings.shape())?
            .to_dtype(embeddings.dtype())?;

        let sum_embeddings = (embeddings * &mask_expanded)?.sum(1)?;
        let sum_mask = mask_expanded.sum(1)?.clamp(1e-9, f64::MAX)?;

        Ok(sum_embeddings.broadcast_div(&sum_mask)?)
    }
}

impl Embedder for EmbeddingEngine {
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.embed_tensors(texts)
            .map_err(|e| AssistantError::Embedding(format!("{:#}", e)))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
