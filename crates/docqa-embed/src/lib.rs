//! Embedding providers.
//!
//! `BertEmbedder` runs a BERT-family sentence encoder with candle and
//! mean-pools the last hidden state into unit vectors. `FakeEmbedder` hashes
//! tokens into buckets; it is fast, deterministic and has no model files,
//! which makes it the provider of choice for tests (`APP_USE_FAKE_EMBEDDINGS=1`).

use anyhow::{anyhow, Context, Result};
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::time::Instant;

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use tokenizers::{Tokenizer, TruncationParams};
use tracing::{debug, info};
use twox_hash::XxHash64;

use docqa_core::config::{expand_path, EmbeddingSettings};
use docqa_core::traits::Embedder;

pub mod device;
pub mod pool;
pub mod tokenize;

pub use pool::masked_mean_l2;
pub use tokenize::{tokenize_batch, EncodedBatch};

pub struct BertEmbedder {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
    dim: usize,
    max_len: usize,
    batch_size: usize,
}

impl BertEmbedder {
    pub fn new(settings: &EmbeddingSettings) -> Result<Self> {
        let device = device::select_device();
        let model_dir = resolve_model_dir(settings)?;
        info!("loading embedding model from {}", model_dir.display());

        let tokenizer_path = model_dir.join("tokenizer.json");
        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow!("Failed to load tokenizer from {}: {}", tokenizer_path.display(), e))?;
        tokenizer
            .with_truncation(Some(TruncationParams { max_length: settings.max_len, ..Default::default() }))
            .map_err(|e| anyhow!("Failed to configure truncation: {}", e))?;

        let config_path = model_dir.join("config.json");
        let config_raw = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        let config: BertConfig = serde_json::from_str(&config_raw)?;

        let weights = load_weights(&model_dir, &device)?;
        let vb = VarBuilder::from_tensors(weights, DType::F32, &device);
        let model = BertModel::load(vb, &config)?;
        let dim = config.hidden_size;
        info!(dim, "embedding model loaded");
        Ok(Self { model, tokenizer, device, dim, max_len: settings.max_len, batch_size: settings.batch_size.max(1) })
    }

    fn embed_chunk(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let batch = tokenize_batch(&self.tokenizer, texts, self.max_len, &self.device)?;
        let hidden = self.model.forward(&batch.input_ids, &batch.token_type_ids, Some(&batch.attention_mask))?;
        let mask = batch.attention_mask.to_dtype(hidden.dtype())?;
        let pooled = masked_mean_l2(&hidden, &mask)?;
        Ok(pooled.to_device(&Device::Cpu)?.to_dtype(DType::F32)?.to_vec2::<f32>()?)
    }
}

impl Embedder for BertEmbedder {
    fn dim(&self) -> usize { self.dim }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let start = Instant::now();
        let mut out = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(self.batch_size) {
            out.extend(self.embed_chunk(chunk)?);
        }
        debug!(inputs = texts.len(), elapsed_ms = start.elapsed().as_millis() as u64, "embedded batch");
        Ok(out)
    }
}

/// Prefer `model.safetensors`, fall back to `pytorch_model.bin`.
fn load_weights(model_dir: &Path, device: &Device) -> Result<HashMap<String, Tensor>> {
    let safetensors = model_dir.join("model.safetensors");
    if safetensors.exists() {
        return Ok(candle_core::safetensors::load(&safetensors, device)?);
    }
    let pickle = model_dir.join("pytorch_model.bin");
    let tensors = candle_core::pickle::read_all(&pickle)
        .with_context(|| format!("Failed to read weights from {}", pickle.display()))?;
    tensors
        .into_iter()
        .map(|(name, t)| Ok((name, t.to_device(device)?)))
        .collect()
}

/// Hashes whitespace tokens into `dim` buckets and L2-normalizes the counts.
pub struct FakeEmbedder { dim: usize }

impl FakeEmbedder {
    pub fn new(dim: usize) -> Self { Self { dim: dim.max(1) } }

    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0f32; self.dim];
        for token in text.split_whitespace() {
            let mut hasher = XxHash64::with_seed(0);
            token.to_lowercase().hash(&mut hasher);
            let h = hasher.finish();
            let idx = (h % self.dim as u64) as usize;
            v[idx] += 0.5 + ((h >> 32) as u32 as f32) / (u32::MAX as f32);
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut v { *x /= norm; }
        } else {
            v[0] = 1.0;
        }
        v
    }
}

impl Embedder for FakeEmbedder {
    fn dim(&self) -> usize { self.dim }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }
}

fn fake_requested() -> bool {
    std::env::var("APP_USE_FAKE_EMBEDDINGS")
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

pub fn get_default_embedder(settings: &EmbeddingSettings) -> Result<Box<dyn Embedder>> {
    if settings.use_fake || fake_requested() {
        info!(dim = settings.fake_dim, "using FakeEmbedder");
        return Ok(Box::new(FakeEmbedder::new(settings.fake_dim)));
    }
    Ok(Box::new(BertEmbedder::new(settings)?))
}

fn resolve_model_dir(settings: &EmbeddingSettings) -> Result<PathBuf> {
    for var in ["APP_MODEL_DIR", "MODEL_DIR"] {
        if let Ok(dir) = std::env::var(var) {
            let p = expand_path(&dir);
            if p.exists() { debug!("using {}: {}", var, p.display()); return Ok(p); }
        }
    }
    let configured = expand_path(&settings.model_dir);
    if configured.exists() { return Ok(configured); }
    let local = Path::new("models/bert-base-turkish-128k-uncased");
    if local.exists() { return Ok(local.to_path_buf()); }
    Err(anyhow!(
        "Could not locate embedding model directory (tried APP_MODEL_DIR, MODEL_DIR, {})",
        configured.display()
    ))
}
