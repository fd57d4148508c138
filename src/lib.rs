//! vidore library crate (used by the `vidore` binary and integration tests).
//!
//! # Public API Surface
//!
//! ## Retrievers
//! - [`Retriever`] - common contract: `forward_queries`, `forward_documents`, `get_scores`
//! - [`BgeM3ColbertRetriever`] - late-interaction (MaxSim) over BGE-M3 ColBERT vectors
//! - [`BgeM3Retriever`] - dense dot-product over the BGE-M3 CLS vector
//! - [`Bm25Retriever`] - lexical scoring via [`Bm25Retriever::get_scores_bm25`]
//! - [`load_retriever`] - construction by name
//!
//! ## Embedding & Scoring
//! - [`BgeM3Encoder`], [`BgeM3Config`] - encoder (model or stub backend)
//! - [`Embedding`], [`MultiVectorEmbedding`] - encoder outputs
//! - [`ScoreMatrix`] - `(num_queries, num_documents)` scores
//!
//! ## Evaluation
//! - [`evaluate_dataset`], [`compute_metrics`] - nDCG / MAP / recall / precision / MRR
//!
//! ## Test/Mock Support
//! Fixtures are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod bm25;
pub mod config;
pub mod constants;
pub mod embedding;
pub mod evaluation;
pub mod retrievers;
pub mod scoring;
#[cfg(any(test, feature = "mock"))]
pub mod testing;

pub use bm25::{Bm25Config, Bm25Index, tokenize};
pub use config::{Config, ConfigError};
pub use embedding::{
    BgeM3Config, BgeM3Encoder, Embedding, EmbeddingError, EncodedText, MultiVectorEmbedding,
};
pub use evaluation::{
    DatasetRow, EvaluationError, EvaluationReport, Metrics, compute_metrics, evaluate_dataset,
    load_dataset,
};
pub use retrievers::{
    BgeM3ColbertRetriever, BgeM3Retriever, Bm25Retriever, RETRIEVER_NAMES, Retriever,
    RetrieverError, RetrieverResult, load_retriever,
};
pub use scoring::{ScoreMatrix, ScoringError};
