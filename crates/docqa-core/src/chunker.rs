use tracing::debug;

use crate::config::ChunkingParams;
use crate::error::Result;
use crate::types::Chunk;

/// Splits document text into overlapping word windows.
#[derive(Debug, Clone)]
pub struct Chunker {
    params: ChunkingParams,
    stride: usize,
}

impl Chunker {
    pub fn new(params: ChunkingParams) -> Result<Self> {
        let stride = params.stride()?;
        Ok(Self { params, stride })
    }

    /// Windows of `size` tokens starting every `size - overlap` tokens.
    ///
    /// A window starts at every stride multiple below the token count, so the
    /// last `overlap` tokens of one window open the next. Windows of at most
    /// `min_chars` characters are dropped and ids stay consecutive.
    pub fn chunk(&self, text: &str) -> Vec<Chunk> {
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.is_empty() {
            return Vec::new();
        }
        let mut chunks = Vec::new();
        let mut dropped = 0usize;
        for start in (0..words.len()).step_by(self.stride) {
            let end = (start + self.params.size).min(words.len());
            let window = words[start..end].join(" ");
            if window.trim().chars().count() > self.params.min_chars {
                chunks.push(Chunk::new(chunks.len(), window));
            } else {
                dropped += 1;
            }
        }
        debug!(words = words.len(), chunks = chunks.len(), dropped, "chunked text");
        chunks
    }
}

/// Chunk `text` with the given window size and overlap and the default
/// minimum length.
pub fn chunk(text: &str, size: usize, overlap: usize) -> Result<Vec<Chunk>> {
    let chunker = Chunker::new(ChunkingParams { size, overlap, ..ChunkingParams::default() })?;
    Ok(chunker.chunk(text))
}
