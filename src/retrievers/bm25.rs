//! Lexical BM25 retriever. Scores straight from text; has no embedding step.

use tracing::debug;

use crate::bm25::{Bm25Config, Bm25Index, tokenize_all};
use crate::config::Config;
use crate::embedding::Embedding;
use crate::scoring::ScoreMatrix;

use super::error::{RetrieverError, RetrieverResult};
use super::{Retriever, check_batch_size};

#[derive(Debug, Clone)]
pub struct Bm25Retriever {
    config: Bm25Config,
}

impl Bm25Retriever {
    pub const NAME: &'static str = "bm25";

    pub fn new() -> RetrieverResult<Self> {
        Self::from_config(&Config::from_env()?)
    }

    pub fn from_config(config: &Config) -> RetrieverResult<Self> {
        Self::with_params(config.bm25)
    }

    pub fn with_params(config: Bm25Config) -> RetrieverResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn params(&self) -> &Bm25Config {
        &self.config
    }

    /// Builds a BM25 index over `documents` and scores every query against it.
    ///
    /// `batch_query` and `batch_doc` only chunk the computation; the scores do
    /// not depend on them.
    pub fn get_scores_bm25(
        &self,
        queries: &[&str],
        documents: &[&str],
        batch_query: usize,
        batch_doc: usize,
    ) -> RetrieverResult<ScoreMatrix> {
        check_batch_size("batch_query", batch_query)?;
        check_batch_size("batch_doc", batch_doc)?;

        debug!(
            num_queries = queries.len(),
            num_documents = documents.len(),
            batch_query,
            batch_doc,
            "Scoring with BM25"
        );

        let index = Bm25Index::build(&tokenize_all(documents), self.config);
        let tokenized_queries = tokenize_all(queries);
        let num_docs = documents.len();

        let mut scores = ScoreMatrix::zeros(queries.len(), num_docs);
        for (chunk_idx, chunk) in tokenized_queries.chunks(batch_query).enumerate() {
            for (offset, query) in chunk.iter().enumerate() {
                let qi = chunk_idx * batch_query + offset;
                for start in (0..num_docs).step_by(batch_doc) {
                    let end = (start + batch_doc).min(num_docs);
                    for (di, score) in (start..end).zip(index.scores_for(query, start..end)) {
                        scores.set(qi, di, score);
                    }
                }
            }
        }

        Ok(scores)
    }

    fn unsupported(operation: &'static str) -> RetrieverError {
        RetrieverError::NotImplemented {
            retriever: "Bm25Retriever",
            operation,
        }
    }
}

impl Retriever for Bm25Retriever {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn forward_queries(
        &self,
        _queries: &[&str],
        _batch_size: usize,
    ) -> RetrieverResult<Vec<Embedding>> {
        Err(Self::unsupported("forward_queries"))
    }

    fn forward_documents(
        &self,
        _documents: &[&str],
        _batch_size: usize,
    ) -> RetrieverResult<Vec<Embedding>> {
        Err(Self::unsupported("forward_documents"))
    }

    fn get_scores(
        &self,
        _query_embeddings: &[Embedding],
        _document_embeddings: &[Embedding],
    ) -> RetrieverResult<ScoreMatrix> {
        Err(Self::unsupported("get_scores"))
    }

    fn score_texts(
        &self,
        queries: &[&str],
        documents: &[&str],
        batch_query: usize,
        batch_doc: usize,
    ) -> RetrieverResult<ScoreMatrix> {
        self.get_scores_bm25(queries, documents, batch_query, batch_doc)
    }
}
