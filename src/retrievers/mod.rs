//! Text retrievers.
//!
//! A [`Retriever`] turns queries and documents into a [`ScoreMatrix`] of shape
//! `(num_queries, num_documents)`. Embedding retrievers go through
//! `forward_queries` / `forward_documents` / `get_scores`; lexical retrievers
//! score text directly and report the embedding steps as
//! [`RetrieverError::NotImplemented`].

pub mod bge_m3;
pub mod bge_m3_colbert;
pub mod bm25;
pub mod error;
pub mod registry;


pub use bge_m3::BgeM3Retriever;
pub use bge_m3_colbert::BgeM3ColbertRetriever;
pub use bm25::Bm25Retriever;
pub use error::{RetrieverError, RetrieverResult};
pub use registry::{RETRIEVER_NAMES, load_retriever};

use crate::embedding::Embedding;
use crate::scoring::ScoreMatrix;

pub trait Retriever: Send + Sync {
    /// Registry name.
    fn name(&self) -> &'static str;

    /// Whether documents are page images rather than text.
    fn use_visual_embedding(&self) -> bool {
        false
    }

    /// One embedding per query, in input order.
    fn forward_queries(&self, queries: &[&str], batch_size: usize)
    -> RetrieverResult<Vec<Embedding>>;

    /// One embedding per document, in input order.
    fn forward_documents(
        &self,
        documents: &[&str],
        batch_size: usize,
    ) -> RetrieverResult<Vec<Embedding>>;

    /// Scores every query embedding against every document embedding.
    fn get_scores(
        &self,
        query_embeddings: &[Embedding],
        document_embeddings: &[Embedding],
    ) -> RetrieverResult<ScoreMatrix>;

    /// End-to-end scoring from text.
    fn score_texts(
        &self,
        queries: &[&str],
        documents: &[&str],
        batch_query: usize,
        batch_doc: usize,
    ) -> RetrieverResult<ScoreMatrix> {
        let query_embeddings = self.forward_queries(queries, batch_query)?;
        let document_embeddings = self.forward_documents(documents, batch_doc)?;
        self.get_scores(&query_embeddings, &document_embeddings)
    }

    /// Releases heavyweight resources (model weights). Further encoding fails.
    fn tear_down(&mut self) {}
}

pub(crate) fn check_batch_size(name: &str, batch_size: usize) -> RetrieverResult<()> {
    if batch_size == 0 {
        return Err(RetrieverError::InvalidInput {
            reason: format!("{name} must be at least 1"),
        });
    }
    Ok(())
}
