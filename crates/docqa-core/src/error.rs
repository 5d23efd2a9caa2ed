use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("No document has been indexed yet")]
    NotBuilt,

    #[error("Text extraction failed: {0}")]
    Ingestion(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Embedding failed: {0}")]
    Embedding(String),
}

pub type Result<T> = std::result::Result<T, Error>;
