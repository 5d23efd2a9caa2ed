//! docqa-text
//!
//! Lexical side of the pipeline: Turkish stop words, query keyword
//! extraction and substring match counting, plus the text extractors that
//! turn uploaded bytes into plain text.

pub mod ingest;
pub mod keywords;
pub mod stopwords;

pub use ingest::{AutoExtractor, PdfTextExtractor, PlainTextExtractor};
pub use keywords::{count_matches, extract_keywords, KeywordMatcher};
