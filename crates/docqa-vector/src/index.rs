use std::cmp::Ordering;

use tracing::info;

use docqa_core::error::{Error, Result};
use docqa_core::traits::Embedder;
use docqa_core::types::{Chunk, ChunkId};

/// L2 normalize a vector in-place. Zero vectors are left untouched.
pub fn l2_normalize(v: &mut [f32]) {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        v.iter_mut().for_each(|x| *x /= norm);
    }
}

/// Dot product similarity. On pre-normalized vectors, this equals cosine similarity.
pub fn dot_similarity(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Descending score, then ascending chunk index.
fn by_score_then_index(a: &(ChunkId, f32), b: &(ChunkId, f32)) -> Ordering {
    b.1.total_cmp(&a.1).then(a.0.cmp(&b.0))
}

/// Flat index of unit vectors, one per chunk, stored row-major.
///
/// Row `i` belongs to the chunk with position `i` in the slice passed to
/// `build`. A `VectorIndex` is never empty.
#[derive(Debug, Clone)]
pub struct VectorIndex {
    dim: usize,
    data: Vec<f32>,
}

impl VectorIndex {
    /// Embed every chunk in one batch call and index the vectors.
    pub fn build(embedder: &dyn Embedder, chunks: &[Chunk]) -> Result<Self> {
        if chunks.is_empty() {
            return Err(Error::EmptyInput("no chunks to index".into()));
        }
        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let vectors = embedder
            .embed_batch(&texts)
            .map_err(|e| Error::Embedding(format!("{e:#}")))?;
        if vectors.len() != chunks.len() {
            return Err(Error::Embedding(format!(
                "provider returned {} vectors for {} chunks",
                vectors.len(),
                chunks.len()
            )));
        }
        let index = Self::from_vectors(vectors)?;
        info!(chunks = index.len(), dim = index.dim, "vector index built");
        Ok(index)
    }

    /// Index precomputed vectors. The dimension is taken from the first one.
    pub fn from_vectors(vectors: Vec<Vec<f32>>) -> Result<Self> {
        let dim = match vectors.first() {
            None => return Err(Error::EmptyInput("no vectors to index".into())),
            Some(v) if v.is_empty() => return Err(Error::Embedding("zero-dimensional embedding".into())),
            Some(v) => v.len(),
        };
        let mut data = Vec::with_capacity(dim * vectors.len());
        for mut v in vectors {
            if v.len() != dim {
                return Err(Error::DimensionMismatch { expected: dim, actual: v.len() });
            }
            l2_normalize(&mut v);
            data.extend_from_slice(&v);
        }
        Ok(Self { dim, data })
    }

    pub fn dim(&self) -> usize { self.dim }

    pub fn len(&self) -> usize { self.data.len() / self.dim }

    pub fn is_empty(&self) -> bool { self.data.is_empty() }

    pub fn vector(&self, index: ChunkId) -> Option<&[f32]> {
        self.data.chunks_exact(self.dim).nth(index)
    }

    /// Embed `query` and return the `min(k, len)` most similar rows.
    pub fn search(&self, embedder: &dyn Embedder, query: &str, k: usize) -> Result<Vec<(ChunkId, f32)>> {
        let mut vectors = embedder
            .embed_batch(&[query.to_string()])
            .map_err(|e| Error::Embedding(format!("{e:#}")))?;
        let mut query_vec = vectors
            .pop()
            .ok_or_else(|| Error::Embedding("provider returned no vector for the query".into()))?;
        l2_normalize(&mut query_vec);
        self.search_vec(&query_vec, k)
    }

    /// Top `min(k, len)` rows by inner product with `query_vec`, descending,
    /// ties broken by lowest row index.
    pub fn search_vec(&self, query_vec: &[f32], k: usize) -> Result<Vec<(ChunkId, f32)>> {
        if query_vec.len() != self.dim {
            return Err(Error::DimensionMismatch { expected: self.dim, actual: query_vec.len() });
        }
        let mut scored: Vec<(ChunkId, f32)> = self
            .data
            .chunks_exact(self.dim)
            .map(|row| dot_similarity(row, query_vec))
            .enumerate()
            .collect();
        let k = k.min(scored.len());
        if k == 0 {
            return Ok(Vec::new());
        }
        if k < scored.len() {
            scored.select_nth_unstable_by(k - 1, by_score_then_index);
            scored.truncate(k);
        }
        scored.sort_by(by_score_then_index);
        Ok(scored)
    }
}
