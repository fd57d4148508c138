//! Late-interaction retriever over BGE-M3 ColBERT vectors.

use tracing::debug;

use crate::config::Config;
use crate::embedding::{BgeM3Encoder, Embedding};
use crate::scoring::{ScoreMatrix, late_interaction_scores};

use super::error::RetrieverResult;
use super::{Retriever, check_batch_size};

#[derive(Debug)]
pub struct BgeM3ColbertRetriever {
    encoder: BgeM3Encoder,
    score_batch_size: usize,
}

impl BgeM3ColbertRetriever {
    pub const NAME: &'static str = "bge-m3-colbert";

    /// Builds from `VIDORE_*` environment settings (stub encoder when no model is configured).
    pub fn new() -> RetrieverResult<Self> {
        Self::from_config(&Config::from_env()?)
    }

    pub fn from_config(config: &Config) -> RetrieverResult<Self> {
        config.validate()?;
        let encoder = BgeM3Encoder::load(config.bge_m3.clone())?;
        Ok(Self::with_encoder(encoder, config.score_batch_size))
    }

    pub fn with_encoder(encoder: BgeM3Encoder, score_batch_size: usize) -> Self {
        Self {
            encoder,
            score_batch_size: score_batch_size.max(1),
        }
    }

    pub fn stub() -> RetrieverResult<Self> {
        Self::from_config(&Config::default())
    }

    pub fn encoder(&self) -> &BgeM3Encoder {
        &self.encoder
    }

    fn forward(&self, texts: &[&str], batch_size: usize) -> RetrieverResult<Vec<Embedding>> {
        check_batch_size("batch_size", batch_size)?;

        let encoded = self.encoder.encode(texts, batch_size)?;
        Ok(encoded
            .into_iter()
            .map(|e| Embedding::MultiVector(e.colbert))
            .collect())
    }
}

impl Retriever for BgeM3ColbertRetriever {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn forward_queries(
        &self,
        queries: &[&str],
        batch_size: usize,
    ) -> RetrieverResult<Vec<Embedding>> {
        debug!(num_queries = queries.len(), batch_size, "Encoding queries");
        self.forward(queries, batch_size)
    }

    fn forward_documents(
        &self,
        documents: &[&str],
        batch_size: usize,
    ) -> RetrieverResult<Vec<Embedding>> {
        debug!(num_documents = documents.len(), batch_size, "Encoding documents");
        self.forward(documents, batch_size)
    }

    fn get_scores(
        &self,
        query_embeddings: &[Embedding],
        document_embeddings: &[Embedding],
    ) -> RetrieverResult<ScoreMatrix> {
        Ok(late_interaction_scores(
            query_embeddings,
            document_embeddings,
            self.score_batch_size,
        )?)
    }

    fn tear_down(&mut self) {
        self.encoder.release();
    }
}
