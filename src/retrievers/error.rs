use thiserror::Error;

use crate::config::ConfigError;
use crate::embedding::EmbeddingError;
use crate::scoring::ScoringError;

#[derive(Debug, Error)]
pub enum RetrieverError {
    #[error("{retriever} does not implement {operation}")]
    NotImplemented {
        retriever: &'static str,
        operation: &'static str,
    },

    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("unknown retriever '{name}' (known: {known})")]
    UnknownRetriever { name: String, known: String },

    #[error("embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("scoring error: {0}")]
    Scoring(#[from] ScoringError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl RetrieverError {
    pub fn is_not_implemented(&self) -> bool {
        matches!(self, RetrieverError::NotImplemented { .. })
    }
}

pub type RetrieverResult<T> = Result<T, RetrieverError>;
