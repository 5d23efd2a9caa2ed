use tracing::debug;

use docqa_core::config::ScoringParams;
use docqa_core::normalize::fold;
use docqa_core::types::{Chunk, ChunkId, SearchResult};
use docqa_text::KeywordMatcher;

/// Combines keyword overlap with embedding similarity.
///
/// With at least one matching keyword a chunk scores
/// `keyword_weight * matches / keywords + embedding_weight * similarity`;
/// without any it scores `embedding_only_weight * similarity`.
#[derive(Debug, Clone, Default)]
pub struct HybridRanker {
    params: ScoringParams,
    matcher: KeywordMatcher,
}

impl HybridRanker {
    pub fn new(params: ScoringParams) -> Self {
        Self { params, matcher: KeywordMatcher::default() }
    }

    pub fn with_matcher(mut self, matcher: KeywordMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn score(&self, keyword_matches: usize, keyword_total: usize, embedding_score: f32) -> f32 {
        if keyword_matches > 0 && keyword_total > 0 {
            let ratio = keyword_matches as f32 / keyword_total as f32;
            self.params.keyword_weight * ratio + self.params.embedding_weight * embedding_score
        } else {
            self.params.embedding_only_weight * embedding_score
        }
    }

    /// Score every `(chunk_index, similarity)` pair and sort descending.
    ///
    /// Pairs pointing outside `chunks` are skipped. Equal scores keep the
    /// lower chunk index first. The caller truncates to `top_k`.
    pub fn rank(&self, query: &str, chunks: &[Chunk], embedding_scores: &[(ChunkId, f32)]) -> Vec<SearchResult> {
        let keywords = self.matcher.extract_keywords(query);
        self.rank_with_keywords(&keywords, chunks, embedding_scores)
    }

    pub fn rank_with_keywords(
        &self,
        keywords: &[String],
        chunks: &[Chunk],
        embedding_scores: &[(ChunkId, f32)],
    ) -> Vec<SearchResult> {
        let mut results: Vec<SearchResult> = embedding_scores
            .iter()
            .filter_map(|&(idx, embedding_score)| {
                let chunk = chunks.get(idx)?;
                let keyword_match_count = self.matcher.count_matches(keywords, &fold(&chunk.text));
                Some(SearchResult {
                    chunk_index: idx,
                    chunk_text: chunk.text.clone(),
                    hybrid_score: self.score(keyword_match_count, keywords.len(), embedding_score),
                    keyword_match_count,
                    embedding_score,
                })
            })
            .collect();
        results.sort_by(|a, b| {
            b.hybrid_score
                .total_cmp(&a.hybrid_score)
                .then(a.chunk_index.cmp(&b.chunk_index))
        });
        if let Some(top) = results.first() {
            debug!(
                keywords = ?keywords,
                candidates = results.len(),
                top_chunk = top.chunk_index,
                top_score = top.hybrid_score,
                top_matches = top.keyword_match_count,
                "ranked candidates"
            );
        }
        results
    }

    /// `rank` followed by truncation to `top_k`.
    pub fn rank_top(&self, query: &str, chunks: &[Chunk], embedding_scores: &[(ChunkId, f32)]) -> Vec<SearchResult> {
        let mut results = self.rank(query, chunks, embedding_scores);
        results.truncate(self.params.top_k);
        results
    }
}
