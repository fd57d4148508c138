//! Embedding similarity kernels.

use half::f16;
use tracing::debug;

use crate::embedding::{Embedding, MultiVectorEmbedding};

use super::error::ScoringError;
use super::matrix::ScoreMatrix;

#[inline]
pub fn dot_f16(a: &[f16], b: &[f16]) -> f32 {
    a.iter()
        .zip(b.iter())
        .fold(0.0f32, |acc, (av, bv)| acc + av.to_f32() * bv.to_f32())
}

/// Late-interaction score: for each query token the best-matching document
/// token similarity, summed over query tokens.
pub fn max_sim(query: &MultiVectorEmbedding, document: &MultiVectorEmbedding) -> f32 {
    if document.num_tokens() == 0 {
        return 0.0;
    }

    query
        .rows()
        .map(|q| {
            document
                .rows()
                .map(|d| dot_f16(q, d))
                .fold(f32::NEG_INFINITY, f32::max)
        })
        .sum()
}

/// Every embedding on both sides must share the dimension of the first one.
fn check_dims(queries: &[Embedding], documents: &[Embedding]) -> Result<(), ScoringError> {
    let Some(expected) = queries.first().or(documents.first()).map(Embedding::dim) else {
        return Ok(());
    };

    for e in queries.iter().chain(documents) {
        if e.dim() != expected {
            return Err(ScoringError::DimensionMismatch {
                expected,
                actual: e.dim(),
            });
        }
    }
    Ok(())
}

fn multi_vectors<'a>(
    embeddings: &'a [Embedding],
) -> Result<Vec<&'a MultiVectorEmbedding>, ScoringError> {
    embeddings
        .iter()
        .map(|e| {
            e.as_multi_vector().ok_or(ScoringError::KindMismatch {
                scorer: "late-interaction",
                expected: "multi-vector",
                actual: e.kind(),
            })
        })
        .collect()
}

/// MaxSim score matrix, processing `batch_size` queries at a time.
pub fn late_interaction_scores(
    queries: &[Embedding],
    documents: &[Embedding],
    batch_size: usize,
) -> Result<ScoreMatrix, ScoringError> {
    if batch_size == 0 {
        return Err(ScoringError::InvalidBatchSize);
    }

    let query_vecs = multi_vectors(queries)?;
    let doc_vecs = multi_vectors(documents)?;
    check_dims(queries, documents)?;

    debug!(
        num_queries = queries.len(),
        num_documents = documents.len(),
        batch_size = batch_size,
        "Computing late-interaction scores"
    );

    let mut scores = ScoreMatrix::zeros(queries.len(), documents.len());
    for (chunk_idx, chunk) in query_vecs.chunks(batch_size).enumerate() {
        for (offset, query) in chunk.iter().enumerate() {
            let qi = chunk_idx * batch_size + offset;
            for (di, doc) in doc_vecs.iter().enumerate() {
                scores.set(qi, di, max_sim(query, doc));
            }
        }
    }

    Ok(scores)
}

/// Dot-product score matrix for dense embeddings.
pub fn dense_scores(
    queries: &[Embedding],
    documents: &[Embedding],
) -> Result<ScoreMatrix, ScoringError> {
    fn as_dense(e: &Embedding) -> Result<&[f16], ScoringError> {
        e.as_dense().ok_or(ScoringError::KindMismatch {
            scorer: "dense",
            expected: "dense",
            actual: e.kind(),
        })
    }

    let query_vecs = queries.iter().map(as_dense).collect::<Result<Vec<_>, _>>()?;
    let doc_vecs = documents.iter().map(as_dense).collect::<Result<Vec<_>, _>>()?;
    check_dims(queries, documents)?;

    debug!(
        num_queries = queries.len(),
        num_documents = documents.len(),
        "Computing dense scores"
    );

    let rows = query_vecs
        .iter()
        .map(|q| doc_vecs.iter().map(|d| dot_f16(q, d)).collect())
        .collect();

    ScoreMatrix::from_rows(documents.len(), rows)
}
