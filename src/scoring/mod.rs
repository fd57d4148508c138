//! Score matrices and embedding similarity.
//!
//! Every retriever returns a [`ScoreMatrix`] of shape
//! `(num_queries, num_documents)`, whichever way the scores were produced.

pub mod error;
pub mod matrix;
pub mod similarity;


pub use error::ScoringError;
pub use matrix::ScoreMatrix;
pub use similarity::{dense_scores, dot_f16, late_interaction_scores, max_sim};
