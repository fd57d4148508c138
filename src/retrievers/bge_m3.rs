//! Dense retriever over the normalized BGE-M3 CLS vector.

use tracing::debug;

use crate::config::Config;
use crate::embedding::{BgeM3Encoder, Embedding};
use crate::scoring::{ScoreMatrix, dense_scores};

use super::error::RetrieverResult;
use super::{Retriever, check_batch_size};

#[derive(Debug)]
pub struct BgeM3Retriever {
    encoder: BgeM3Encoder,
}

impl BgeM3Retriever {
    pub const NAME: &'static str = "bge-m3";

    pub fn new() -> RetrieverResult<Self> {
        Self::from_config(&Config::from_env()?)
    }

    pub fn from_config(config: &Config) -> RetrieverResult<Self> {
        config.validate()?;
        Ok(Self {
            encoder: BgeM3Encoder::load(config.bge_m3.clone())?,
        })
    }

    pub fn stub() -> RetrieverResult<Self> {
        Self::from_config(&Config::default())
    }

    pub fn encoder(&self) -> &BgeM3Encoder {
        &self.encoder
    }

    fn forward(&self, texts: &[&str], batch_size: usize) -> RetrieverResult<Vec<Embedding>> {
        check_batch_size("batch_size", batch_size)?;
        debug!(num_texts = texts.len(), batch_size, "Encoding dense vectors");

        let encoded = self.encoder.encode(texts, batch_size)?;
        Ok(encoded.into_iter().map(|e| Embedding::Dense(e.dense)).collect())
    }
}

impl Retriever for BgeM3Retriever {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn forward_queries(
        &self,
        queries: &[&str],
        batch_size: usize,
    ) -> RetrieverResult<Vec<Embedding>> {
        self.forward(queries, batch_size)
    }

    fn forward_documents(
        &self,
        documents: &[&str],
        batch_size: usize,
    ) -> RetrieverResult<Vec<Embedding>> {
        self.forward(documents, batch_size)
    }

    fn get_scores(
        &self,
        query_embeddings: &[Embedding],
        document_embeddings: &[Embedding],
    ) -> RetrieverResult<ScoreMatrix> {
        Ok(dense_scores(query_embeddings, document_embeddings)?)
    }

    fn tear_down(&mut self) {
        self.encoder.release();
    }
}
