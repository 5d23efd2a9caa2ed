/// Maps a batch of strings to unit-normalized vectors of a fixed dimension.
///
/// Output order and length must match the input, and identical input must
/// yield identical vectors.
pub trait Embedder: Send + Sync {
    fn dim(&self) -> usize;
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;
}

/// Turns a raw uploaded byte stream into plain text.
pub trait TextExtractor: Send + Sync {
    fn extract_text(&self, bytes: &[u8]) -> anyhow::Result<String>;
}

/// Optional abstractive answer backend. Failures are never fatal to a query.
pub trait Generator: Send + Sync {
    fn generate(&self, query: &str, context: &str) -> anyhow::Result<String>;
}
