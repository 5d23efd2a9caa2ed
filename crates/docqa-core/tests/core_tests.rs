use std::fs;
use tempfile::TempDir;

use docqa_core::chunker::{chunk, Chunker};
use docqa_core::config::{ChunkingParams, Config, Settings};
use docqa_core::error::Error;

fn numbered_words(n: usize) -> String {
    (0..n).map(|i| format!("kelime{i}")).collect::<Vec<_>>().join(" ")
}

fn tokens(text: &str) -> Vec<&str> { text.split_whitespace().collect() }

#[test]
fn empty_and_whitespace_text_yield_no_chunks() {
    assert!(chunk("", 400, 50).expect("chunk").is_empty());
    assert!(chunk("  \n\t  ", 400, 50).expect("chunk").is_empty());
}

#[test]
fn stride_must_advance() {
    assert!(matches!(chunk("a b c", 50, 50), Err(Error::InvalidConfig(_))));
    assert!(matches!(chunk("a b c", 10, 20), Err(Error::InvalidConfig(_))));
    assert!(matches!(chunk("a b c", 0, 0), Err(Error::InvalidConfig(_))));
}

#[test]
fn short_fragments_are_discarded() {
    // 49 characters: at or below the minimum
    let short = "bir iki uc dort bes alti yedi sekiz dokuz on onbi";
    assert_eq!(short.len(), 49);
    assert!(chunk(short, 400, 50).expect("chunk").is_empty());

    let long = format!("{short} oniki onuc");
    let chunks = chunk(&long, 400, 50).expect("chunk");
    assert_eq!(chunks.len(), 1, "one window above the minimum");
    assert_eq!(chunks[0].id, 0);
    assert_eq!(chunks[0].word_count, 13);
}

#[test]
fn whitespace_is_collapsed_to_single_spaces() {
    let text = "Ankara   Türkiye'nin\n\nbaşkentidir.\tNüfusu beş milyondur ve büyük bir şehirdir.";
    let chunks = chunk(text, 400, 50).expect("chunk");
    assert_eq!(chunks.len(), 1);
    assert_eq!(
        chunks[0].text,
        "Ankara Türkiye'nin başkentidir. Nüfusu beş milyondur ve büyük bir şehirdir."
    );
}

#[test]
fn consecutive_chunks_share_the_overlap_and_cover_every_token() {
    let text = numbered_words(1000);
    let original = tokens(&text);
    let chunks = chunk(&text, 400, 50).expect("chunk");
    assert_eq!(chunks.len(), 3, "windows start at 0, 350 and 700");

    for (i, pair) in chunks.windows(2).enumerate() {
        let a = tokens(&pair[0].text);
        let b = tokens(&pair[1].text);
        let shared = 50.min(b.len());
        assert_eq!(&a[a.len() - shared..], &b[..shared], "overlap between {i} and {}", i + 1);
    }

    let mut rebuilt: Vec<&str> = tokens(&chunks[0].text);
    for c in &chunks[1..] {
        rebuilt.extend(tokens(&c.text).into_iter().skip(50));
    }
    assert_eq!(rebuilt, original);

    let ids: Vec<usize> = chunks.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![0, 1, 2]);
}

#[test]
fn trailing_window_overlap_is_bounded_by_remaining_tokens() {
    let text = numbered_words(380);
    let chunks = chunk(&text, 400, 50).expect("chunk");
    assert_eq!(chunks.len(), 2);
    let first = tokens(&chunks[0].text);
    let second = tokens(&chunks[1].text);
    assert_eq!(first.len(), 380);
    assert_eq!(second.len(), 30);
    assert_eq!(&first[350..], &second[..]);
}

#[test]
fn custom_parameters_are_respected() {
    let chunker = Chunker::new(ChunkingParams { size: 4, overlap: 1, min_chars: 0 }).expect("chunker");
    let chunks = chunker.chunk("a b c d e f g");
    let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["a b c d", "d e f g", "g"]);
}

#[test]
fn config_file_overrides_defaults() {
    let tmp = TempDir::new().expect("tmp");
    fs::write(
        tmp.path().join("config.toml"),
        "[scoring]\ntop_k = 3\n\n[chunking]\nsize = 200\n",
    )
    .expect("write config");

    let config = Config::load_from(tmp.path()).expect("load");
    let settings = config.settings().expect("settings");
    assert_eq!(settings.scoring.top_k, 3);
    assert_eq!(settings.chunking.size, 200);
    assert_eq!(settings.chunking.overlap, 50);
    assert!((settings.scoring.keyword_weight - 0.8).abs() < f32::EPSILON);
    let top_k: usize = config.get("scoring.top_k").expect("get");
    assert_eq!(top_k, 3);
}

#[test]
fn invalid_config_is_rejected_on_load() {
    let tmp = TempDir::new().expect("tmp");
    fs::write(tmp.path().join("config.toml"), "[chunking]\nsize = 50\noverlap = 50\n").expect("write");
    assert!(Config::load_from(tmp.path()).is_err());
}

#[test]
fn default_settings_are_valid() {
    let settings = Settings::default();
    settings.validate().expect("defaults validate");
    assert!((settings.answer.acceptance_threshold - 0.1).abs() < f32::EPSILON);
}
