//! Cross-cutting, shared constants.

/// Max tokens fed to the encoder per text.
pub const DEFAULT_MAX_SEQ_LEN: usize = 8192;

/// Query chunk used when computing MaxSim scores.
pub const DEFAULT_SCORE_BATCH_SIZE: usize = 128;

/// Default batch sizes for the evaluation binary.
pub const DEFAULT_BATCH_QUERY: usize = 4;
pub const DEFAULT_BATCH_DOC: usize = 4;

/// Okapi BM25 parameters (reference-library defaults).
pub const DEFAULT_BM25_K1: f32 = 1.5;
pub const DEFAULT_BM25_B: f32 = 0.75;
pub const DEFAULT_BM25_EPSILON: f32 = 0.25;

/// Cut-offs reported by [`crate::evaluation`].
pub const METRIC_K_VALUES: [usize; 7] = [1, 3, 5, 10, 20, 50, 100];

/// Dimension used by the stub encoder (kept small so tests stay fast).
pub const STUB_EMBEDDING_DIM: usize = 64;
