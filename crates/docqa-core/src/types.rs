//! Domain types shared by the chunker, the index and the answer pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type ChunkId = usize;

/// A window of document text that is independently embedded and scored.
///
/// - `id`: ordinal position within the document (0-based, document order)
/// - `text`: the window's tokens joined by single spaces
/// - `word_count`: number of whitespace tokens in `text`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub id: ChunkId,
    pub text: String,
    pub word_count: usize,
}

impl Chunk {
    pub fn new(id: ChunkId, text: String) -> Self {
        let word_count = text.split_whitespace().count();
        Self { id, text, word_count }
    }
}

/// One scored candidate produced by the hybrid ranker.
///
/// `hybrid_score` is higher-is-better. `embedding_score` is the raw inner
/// product of unit vectors and therefore lies in `[-1, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub chunk_index: ChunkId,
    pub chunk_text: String,
    pub hybrid_score: f32,
    pub keyword_match_count: usize,
    pub embedding_score: f32,
}

/// Listing metadata for an ingested document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub filename: String,
    pub upload_time: DateTime<Utc>,
    pub chunk_count: usize,
    pub text_length: usize,
}

/// How an answer was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerKind {
    /// Best keyword-bearing sentence of the top chunk.
    Extracted,
    /// Output of the optional generation backend.
    Generated,
    /// First sufficiently long sentence of the top chunk.
    Fallback,
    /// There were no candidates at all.
    NoInformation,
    /// The top candidate scored below the acceptance threshold.
    LowConfidence,
    /// The top chunk had no usable sentence.
    Insufficient,
}

/// Final answer returned to the caller.
///
/// `confidence` is always the top candidate's hybrid score (0 when there was
/// no candidate); it says nothing about the selected sentence itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub text: String,
    pub confidence: f32,
    pub keyword_matches: usize,
    pub kind: AnswerKind,
}

impl Answer {
    /// True when `text` was taken from (or generated over) the document.
    pub fn is_grounded(&self) -> bool {
        matches!(
            self.kind,
            AnswerKind::Extracted | AnswerKind::Generated | AnswerKind::Fallback
        )
    }
}
