use std::collections::HashSet;
use std::sync::OnceLock;

/// High-frequency Turkish function words, in folded form.
pub const TURKISH_STOP_WORDS: &[&str] = &[
    // conjunctions and determiners
    "bir", "bu", "su", "ve", "veya", "ile", "icin", "gibi", "kadar", "daha", "en", "cok", "az",
    // locative / ablative suffix particles written apart
    "de", "da", "den", "dan", "te", "ta",
    // question words and particles
    "nedir", "ne", "nasil", "neden", "kim", "neresidir", "nerede", "neresi", "hangi", "kac",
    "mi", "mu", "midir", "mudur",
    // others
    "hakkinda", "olan", "var", "yok",
];

pub fn turkish_stop_words() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| TURKISH_STOP_WORDS.iter().copied().collect())
}
