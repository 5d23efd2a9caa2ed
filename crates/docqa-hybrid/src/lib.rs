//! docqa-hybrid
//!
//! Hybrid lexical + embedding ranking, extractive answer selection, and the
//! single-document `Session` that ties chunking, indexing and querying
//! together.

pub mod answer;
pub mod ranker;
pub mod session;

pub use answer::AnswerExtractor;
pub use ranker::HybridRanker;
pub use session::{Listing, Session, Snapshot};
