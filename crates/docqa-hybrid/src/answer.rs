use std::sync::Arc;

use tracing::{debug, warn};

use docqa_core::config::AnswerParams;
use docqa_core::normalize::fold;
use docqa_core::traits::Generator;
use docqa_core::types::{Answer, AnswerKind, SearchResult};
use docqa_text::KeywordMatcher;

pub const NO_INFORMATION: &str = "Bu konuda bilgi bulunamadı.";
pub const LOW_SIMILARITY: &str =
    "Bu soru için yeterli benzerlik bulunamadı. Lütfen dokümandaki konular hakkında soru sorun.";
pub const INSUFFICIENT_INFORMATION: &str = "Bu konuda yeterli bilgi bulunamadı.";

const TERMINATORS: [char; 4] = ['.', '!', '?', '…'];

fn terminated(sentence: &str) -> String {
    let sentence = sentence.trim();
    if sentence.ends_with(&TERMINATORS[..]) {
        sentence.to_string()
    } else {
        format!("{sentence}.")
    }
}

fn word_count(sentence: &str) -> usize { sentence.split_whitespace().count() }

/// Picks the answer sentence from the best ranked chunk.
#[derive(Clone, Default)]
pub struct AnswerExtractor {
    params: AnswerParams,
    matcher: KeywordMatcher,
    generator: Option<Arc<dyn Generator>>,
}

impl AnswerExtractor {
    pub fn new(params: AnswerParams) -> Self {
        Self { params, ..Self::default() }
    }

    pub fn with_matcher(mut self, matcher: KeywordMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    /// Try `generator` first on accepted queries; any failure falls back to extraction.
    pub fn with_generator(mut self, generator: Arc<dyn Generator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Answer `query` from `ranked`, which must be sorted best first.
    pub fn extract(&self, query: &str, ranked: &[SearchResult]) -> Answer {
        let Some(top) = ranked.first() else {
            return Answer {
                text: NO_INFORMATION.to_string(),
                confidence: 0.0,
                keyword_matches: 0,
                kind: AnswerKind::NoInformation,
            };
        };
        let answer = |text: String, kind: AnswerKind| Answer {
            text,
            confidence: top.hybrid_score,
            keyword_matches: top.keyword_match_count,
            kind,
        };

        if top.hybrid_score < self.params.acceptance_threshold {
            debug!(score = top.hybrid_score, "top candidate below acceptance threshold");
            return answer(LOW_SIMILARITY.to_string(), AnswerKind::LowConfidence);
        }

        if let Some(text) = self.generate(query, &top.chunk_text) {
            return answer(text, AnswerKind::Generated);
        }

        let sentences: Vec<&str> = top
            .chunk_text
            .split('.')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();

        if top.keyword_match_count > 0 {
            if let Some(best) = self.best_keyword_sentence(query, &sentences) {
                return answer(terminated(best), AnswerKind::Extracted);
            }
        }

        match sentences.iter().find(|s| word_count(s) >= self.params.fallback_sentence_words) {
            Some(first) => answer(terminated(first), AnswerKind::Fallback),
            None => answer(INSUFFICIENT_INFORMATION.to_string(), AnswerKind::Insufficient),
        }
    }

    /// Earliest sentence with the strictly highest positive keyword count.
    fn best_keyword_sentence<'a>(&self, query: &str, sentences: &[&'a str]) -> Option<&'a str> {
        let keywords = self.matcher.extract_keywords(query);
        let mut best: Option<(&'a str, usize)> = None;
        for &sentence in sentences {
            if word_count(sentence) < self.params.min_sentence_words {
                continue;
            }
            let count = self.matcher.count_matches(&keywords, &fold(sentence));
            if count > best.map_or(0, |(_, c)| c) {
                best = Some((sentence, count));
            }
        }
        best.map(|(s, _)| s)
    }

    fn generate(&self, query: &str, context: &str) -> Option<String> {
        let generator = self.generator.as_ref()?;
        match generator.generate(query, context) {
            Ok(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
            Ok(_) => {
                warn!("generator returned an empty answer, using extractive answer");
                None
            }
            Err(e) => {
                warn!("generator failed, using extractive answer: {:#}", e);
                None
            }
        }
    }
}
