//! Turkish character folding.
//!
//! `normalize` strips the Turkish diacritics (cedilla, breve, diaeresis,
//! circumflex, dot above) from their base letters and maps dotless `ı` to
//! `i`, preserving case. Input is decomposed first, so a precomposed `ş` and
//! `s` followed by U+0327 (common in PDF text) fold the same way. `fold`
//! produces the matching form used for keyword comparison: without
//! apostrophes, normalized and lowercased.

use unicode_normalization::char::canonical_combining_class;
use unicode_normalization::UnicodeNormalization;

const APOSTROPHES: [char; 2] = ['\'', '\u{2019}'];

/// Combining marks of the Turkish alphabet and of circumflexed loanwords.
const TURKISH_MARKS: [char; 5] = ['\u{0302}', '\u{0306}', '\u{0307}', '\u{0308}', '\u{0327}'];

const DOTLESS_I: char = '\u{0131}';

fn takes_turkish_marks(base: char) -> bool {
    matches!(base.to_ascii_lowercase(), 'a' | 'c' | 'g' | 'i' | 'o' | 's' | 'u')
}

/// Replace Turkish diacritic letters with their ASCII base letters.
pub fn normalize(text: &str) -> String {
    let mut base: Option<char> = None;
    text.nfd()
        .filter_map(|c| {
            if TURKISH_MARKS.contains(&c) {
                return match base {
                    Some(b) if takes_turkish_marks(b) => None,
                    _ => Some(c),
                };
            }
            let c = if c == DOTLESS_I { 'i' } else { c };
            if canonical_combining_class(c) == 0 {
                base = Some(c);
            }
            Some(c)
        })
        .nfc()
        .collect()
}

/// Matching form of `text`.
///
/// Apostrophes are removed first so a mark never lands next to a new base
/// letter. Normalizing happens before lowercasing so that `İ` folds to a
/// plain `i` instead of `i` followed by a combining dot.
pub fn fold(text: &str) -> String {
    let stripped: String = text.chars().filter(|c| !APOSTROPHES.contains(c)).collect();
    normalize(&stripped).to_lowercase()
}
