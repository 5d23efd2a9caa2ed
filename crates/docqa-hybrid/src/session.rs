//! Single-document question answering session.
//!
//! The chunk list and its vector index live together in one immutable
//! `Snapshot`. Ingesting builds a new snapshot outside the lock and swaps it
//! in with a single assignment; queries clone the current `Arc` and release
//! the lock before doing any work, so a concurrent swap or clear never
//! affects a query that is already running.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};

use docqa_core::chunker::Chunker;
use docqa_core::config::Settings;
use docqa_core::error::{Error, Result};
use docqa_core::traits::{Embedder, Generator, TextExtractor};
use docqa_core::types::{Answer, Chunk, DocumentRecord, SearchResult};
use docqa_text::{AutoExtractor, KeywordMatcher};
use docqa_vector::VectorIndex;

use crate::answer::AnswerExtractor;
use crate::ranker::HybridRanker;

/// Chunks of the active document and their vectors. `index` row `i` is `chunks[i]`.
#[derive(Debug)]
pub struct Snapshot {
    chunks: Vec<Chunk>,
    index: VectorIndex,
}

impl Snapshot {
    pub fn chunks(&self) -> &[Chunk] { &self.chunks }

    pub fn index(&self) -> &VectorIndex { &self.index }
}

/// Ingested documents plus the size of the active chunk set.
#[derive(Debug, Clone, Serialize)]
pub struct Listing {
    pub documents: Vec<DocumentRecord>,
    pub total_chunks: usize,
}

#[derive(Default)]
struct State {
    snapshot: Option<Arc<Snapshot>>,
    documents: BTreeMap<String, DocumentRecord>,
}

pub struct Session {
    settings: Settings,
    chunker: Chunker,
    matcher: KeywordMatcher,
    ranker: HybridRanker,
    answerer: AnswerExtractor,
    embedder: Arc<dyn Embedder>,
    extractor: Arc<dyn TextExtractor>,
    state: RwLock<State>,
}

impl Session {
    pub fn new(settings: Settings, embedder: Arc<dyn Embedder>) -> Result<Self> {
        settings.validate()?;
        let chunker = Chunker::new(settings.chunking.clone())?;
        let ranker = HybridRanker::new(settings.scoring.clone());
        let answerer = AnswerExtractor::new(settings.answer.clone());
        Ok(Self {
            settings,
            chunker,
            matcher: KeywordMatcher::default(),
            ranker,
            answerer,
            embedder,
            extractor: Arc::new(AutoExtractor::default()),
            state: RwLock::new(State::default()),
        })
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn TextExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// Use `matcher` for query keywords, chunk scoring and sentence selection.
    pub fn with_matcher(mut self, matcher: KeywordMatcher) -> Self {
        self.ranker = self.ranker.with_matcher(matcher.clone());
        self.answerer = self.answerer.with_matcher(matcher.clone());
        self.matcher = matcher;
        self
    }

    pub fn with_generator(mut self, generator: Arc<dyn Generator>) -> Self {
        self.answerer = self.answerer.with_generator(generator);
        self
    }

    // The state is replaced by whole-value assignments only, so a poisoned
    // lock still guards a consistent value.
    fn read(&self) -> RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Extract text from `bytes` and make it the active document.
    pub fn ingest(&self, filename: &str, bytes: &[u8]) -> Result<DocumentRecord> {
        let text = self
            .extractor
            .extract_text(bytes)
            .map_err(|e| Error::Ingestion(format!("{e:#}")))?;
        self.ingest_text(filename, &text)
    }

    /// Chunk and index `text`, then replace the active document with it.
    ///
    /// On any error the previous document stays active.
    pub fn ingest_text(&self, filename: &str, text: &str) -> Result<DocumentRecord> {
        info!(filename, chars = text.chars().count(), "ingesting document");
        let chunks = self.chunker.chunk(text);
        if chunks.is_empty() {
            return Err(Error::EmptyInput(format!("{filename} produced no chunks")));
        }
        let index = VectorIndex::build(self.embedder.as_ref(), &chunks)?;
        let record = DocumentRecord {
            filename: filename.to_string(),
            upload_time: Utc::now(),
            chunk_count: chunks.len(),
            text_length: text.chars().count(),
        };
        let snapshot = Arc::new(Snapshot { chunks, index });

        let mut state = self.write();
        state.snapshot = Some(snapshot);
        state.documents.insert(record.filename.clone(), record.clone());
        drop(state);

        info!(filename, chunks = record.chunk_count, "document indexed");
        Ok(record)
    }

    /// The active snapshot, if a document has been indexed.
    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.read().snapshot.clone()
    }

    pub fn is_ready(&self) -> bool { self.read().snapshot.is_some() }

    fn validated_query<'q>(&self, query: &'q str) -> Result<&'q str> {
        let query = query.trim();
        if query.chars().count() < self.settings.answer.min_query_chars {
            return Err(Error::InvalidQuery(format!(
                "query must have at least {} characters",
                self.settings.answer.min_query_chars
            )));
        }
        Ok(query)
    }

    /// Top-K hybrid results for `query` against the active document.
    pub fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        let query = self.validated_query(query)?;
        let snapshot = self.snapshot().ok_or(Error::NotBuilt)?;
        self.search_snapshot(&snapshot, query)
    }

    /// Top-K hybrid results for `query` against a specific snapshot.
    pub fn search_snapshot(&self, snapshot: &Snapshot, query: &str) -> Result<Vec<SearchResult>> {
        let keywords = self.matcher.extract_keywords(query);
        let hits = snapshot.index.search(self.embedder.as_ref(), query, snapshot.index.len())?;
        let mut ranked = self.ranker.rank_with_keywords(&keywords, &snapshot.chunks, &hits);
        ranked.truncate(self.settings.scoring.top_k);
        debug!(query, keywords = keywords.len(), results = ranked.len(), "search complete");
        Ok(ranked)
    }

    /// Answer `query` from the active document.
    pub fn ask(&self, query: &str) -> Result<Answer> {
        let query = self.validated_query(query)?;
        let snapshot = self.snapshot().ok_or(Error::NotBuilt)?;
        self.ask_snapshot(&snapshot, query)
    }

    pub fn ask_snapshot(&self, snapshot: &Snapshot, query: &str) -> Result<Answer> {
        let ranked = self.search_snapshot(snapshot, query)?;
        let answer = self.answerer.extract(query, &ranked);
        info!(query, kind = ?answer.kind, confidence = answer.confidence, "answered");
        Ok(answer)
    }

    pub fn documents(&self) -> Listing {
        let state = self.read();
        Listing {
            documents: state.documents.values().cloned().collect(),
            total_chunks: state.snapshot.as_ref().map_or(0, |s| s.chunks.len()),
        }
    }

    /// Drop the active document and all listing records.
    pub fn clear(&self) {
        let mut state = self.write();
        *state = State::default();
        drop(state);
        info!("session cleared");
    }
}
