use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("{scorer} scoring expects {expected} embeddings, got {actual}")]
    KindMismatch {
        scorer: &'static str,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("score buffer of length {len} does not fit shape ({rows}, {cols})")]
    ShapeMismatch { rows: usize, cols: usize, len: usize },

    #[error("batch size must be at least 1")]
    InvalidBatchSize,
}
