//! Lightweight configuration loader and path helpers.
//!
//! Uses Figment to merge built-in defaults + `config.toml` +
//! `config.<env>.toml` + `APP_*` env vars (`__` separates nested keys, so
//! `APP_SCORING__TOP_K=3` overrides `scoring.top_k`). Provides helpers to
//! expand `~` and `${VAR}` and to resolve relative paths against a known base
//! directory.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Window parameters for the chunker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingParams {
    /// Tokens per window.
    pub size: usize,
    /// Tokens shared by consecutive windows. Must be smaller than `size`.
    pub overlap: usize,
    /// Chunks whose trimmed length in characters is at most this are dropped.
    pub min_chars: usize,
}

impl Default for ChunkingParams {
    fn default() -> Self {
        Self { size: 400, overlap: 50, min_chars: 50 }
    }
}

impl ChunkingParams {
    pub fn stride(&self) -> Result<usize> {
        if self.size == 0 {
            return Err(Error::InvalidConfig("chunking.size must be positive".into()));
        }
        if self.overlap >= self.size {
            return Err(Error::InvalidConfig(format!(
                "chunking.overlap ({}) must be smaller than chunking.size ({})",
                self.overlap, self.size
            )));
        }
        Ok(self.size - self.overlap)
    }
}

/// Hybrid scoring weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringParams {
    /// Weight of the keyword overlap ratio when at least one keyword matched.
    pub keyword_weight: f32,
    /// Weight of the embedding similarity when at least one keyword matched.
    pub embedding_weight: f32,
    /// Weight of the embedding similarity when no keyword matched.
    pub embedding_only_weight: f32,
    /// Number of ranked candidates kept for answer extraction.
    pub top_k: usize,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self { keyword_weight: 0.8, embedding_weight: 0.2, embedding_only_weight: 0.1, top_k: 5 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnswerParams {
    /// Top hybrid scores below this produce the low-confidence answer.
    pub acceptance_threshold: f32,
    /// Sentences shorter than this (in words) are never keyword candidates.
    pub min_sentence_words: usize,
    /// Minimum words for the first-sentence fallback.
    pub fallback_sentence_words: usize,
    /// Minimum trimmed query length in characters.
    pub min_query_chars: usize,
}

impl Default for AnswerParams {
    fn default() -> Self {
        Self {
            acceptance_threshold: 0.1,
            min_sentence_words: 3,
            fallback_sentence_words: 4,
            min_query_chars: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Use the hashed fake embedder instead of loading a model.
    pub use_fake: bool,
    pub fake_dim: usize,
    /// Directory holding `config.json`, `tokenizer.json` and the weights.
    pub model_dir: String,
    /// Maximum tokens per input; longer inputs are truncated.
    pub max_len: usize,
    /// Inputs per forward pass.
    pub batch_size: usize,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            use_fake: false,
            fake_dim: 768,
            model_dir: "~/.cache/docqa/bert-base-turkish-128k-uncased".to_string(),
            max_len: 256,
            batch_size: 16,
        }
    }
}

/// Every tunable of the pipeline, with the documented defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub chunking: ChunkingParams,
    pub scoring: ScoringParams,
    pub answer: AnswerParams,
    pub embedding: EmbeddingSettings,
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        self.chunking.stride()?;
        if self.scoring.top_k == 0 {
            return Err(Error::InvalidConfig("scoring.top_k must be positive".into()));
        }
        if self.embedding.batch_size == 0 {
            return Err(Error::InvalidConfig("embedding.batch_size must be positive".into()));
        }
        Ok(())
    }
}

pub struct Config {
    figment: Figment,
    base: PathBuf,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(Path::new("."))
    }

    /// Load `config.toml` and the environment overlay from `dir`.
    pub fn load_from(dir: &Path) -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(dir.join("config.toml")));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file(dir.join("config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(dir.join("config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(dir.join("config.test.toml"))),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment, base: dir.to_path_buf() };
        config.settings()?;
        Ok(config)
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    /// Typed view of the merged configuration, validated.
    ///
    /// A relative `embedding.model_dir` is resolved against the directory the
    /// configuration was loaded from.
    pub fn settings(&self) -> anyhow::Result<Settings> {
        let mut settings: Settings = self
            .figment
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to read settings: {}", e))?;
        settings.validate()?;
        settings.embedding.model_dir = resolve_with_base(&self.base, &settings.embedding.model_dir)
            .to_string_lossy()
            .into_owned();
        Ok(settings)
    }
}

/// `~` and `$VAR` / `${VAR}` expansion. When a variable is unset only the
/// tilde is expanded and the rest is kept as written.
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let raw = input.as_ref();
    match shellexpand::full(raw) {
        Ok(expanded) => PathBuf::from(expanded.into_owned()),
        Err(_) => PathBuf::from(shellexpand::tilde(raw).into_owned()),
    }
}

/// `expand_path`, then anchored at `base` unless the result is absolute.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let path = expand_path(p);
    if path.is_absolute() {
        return path;
    }
    base.join(path)
}
