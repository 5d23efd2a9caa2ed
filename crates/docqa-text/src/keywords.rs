use std::collections::HashSet;

use docqa_core::normalize::fold;

use crate::stopwords::turkish_stop_words;

/// Characters stripped from both ends of every query token.
const EDGE_PUNCTUATION: &[char] = &['.', ',', '!', '?', '(', ')', '[', ']', ':', ';', '"', '«', '»', '…'];

/// Tokens with this many characters or fewer are never keywords.
const MAX_SHORT_TOKEN_CHARS: usize = 2;

/// Extracts query keywords and counts their occurrences in chunk text.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    stop_words: HashSet<String>,
}

impl Default for KeywordMatcher {
    fn default() -> Self {
        Self { stop_words: turkish_stop_words().iter().map(|w| (*w).to_string()).collect() }
    }
}

impl KeywordMatcher {
    /// Matcher with a custom stop list. Entries are folded before use.
    pub fn with_stop_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self { stop_words: words.into_iter().map(|w| fold(w.as_ref())).collect() }
    }

    /// Distinct folded query tokens, in first-occurrence order.
    pub fn extract_keywords(&self, query: &str) -> Vec<String> {
        let folded = fold(query);
        let mut seen = HashSet::new();
        let mut keywords = Vec::new();
        for raw in folded.split_whitespace() {
            let word = raw.trim_matches(EDGE_PUNCTUATION);
            if word.chars().count() <= MAX_SHORT_TOKEN_CHARS || self.stop_words.contains(word) {
                continue;
            }
            if seen.insert(word) {
                keywords.push(word.to_string());
            }
        }
        keywords
    }

    /// Number of `keywords` that occur anywhere in `folded_text`.
    pub fn count_matches<S: AsRef<str>>(&self, keywords: &[S], folded_text: &str) -> usize {
        count_matches(keywords, folded_text)
    }
}

/// Keywords of `query` under the default Turkish stop list.
pub fn extract_keywords(query: &str) -> Vec<String> {
    KeywordMatcher::default().extract_keywords(query)
}

/// Substring containment count; a keyword may match inside a longer word.
pub fn count_matches<S: AsRef<str>>(keywords: &[S], folded_text: &str) -> usize {
    keywords.iter().filter(|k| folded_text.contains(k.as_ref())).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_edge_punctuation_only() {
        let kws = extract_keywords("(Ankara), [başkent]! nüfus?");
        assert_eq!(kws, vec!["ankara", "baskent", "nufus"]);
    }

    #[test]
    fn custom_stop_words_are_folded() {
        let matcher = KeywordMatcher::with_stop_words(["Şehir"]);
        assert_eq!(matcher.extract_keywords("şehir merkezi"), vec!["merkezi"]);
    }
}
