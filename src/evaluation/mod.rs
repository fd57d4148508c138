//! Benchmark evaluation: dataset rows in, ranking metrics out.
//!
//! Documents are the pages' OCR text keyed by `image_filename`; each query is
//! relevant to the page(s) it was written for. Scores come from
//! [`Retriever::score_texts`], so lexical and embedding retrievers share one
//! path.

pub mod dataset;
pub mod error;
pub mod metrics;


pub use dataset::{DatasetRow, EvaluationInputs, load_dataset};
pub use error::EvaluationError;
pub use metrics::{
    Metrics, Qrels, RunResults, compute_metrics, map_at_k, mrr_at_k, ndcg_at_k, precision_at_k,
    recall_at_k,
};

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::info;

use crate::constants::METRIC_K_VALUES;
use crate::retrievers::Retriever;
use crate::scoring::ScoreMatrix;

/// Result of [`evaluate_dataset`].
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    pub retriever: String,
    pub num_queries: usize,
    pub num_documents: usize,
    pub metrics: Metrics,
}

/// Converts a score matrix into per-query run results.
pub fn run_results(
    queries: &[String],
    document_ids: &[String],
    scores: &ScoreMatrix,
) -> Result<RunResults, EvaluationError> {
    let expected = (queries.len(), document_ids.len());
    if scores.shape() != expected {
        return Err(EvaluationError::ShapeMismatch {
            expected,
            actual: scores.shape(),
        });
    }

    Ok(queries
        .iter()
        .zip(scores.rows())
        .map(|(query, row)| {
            let per_doc: BTreeMap<String, f32> =
                document_ids.iter().cloned().zip(row.iter().copied()).collect();
            (query.clone(), per_doc)
        })
        .collect())
}

pub fn evaluate_dataset(
    retriever: &dyn Retriever,
    rows: &[DatasetRow],
    batch_query: usize,
    batch_doc: usize,
) -> Result<EvaluationReport, EvaluationError> {
    if retriever.use_visual_embedding() {
        return Err(EvaluationError::VisualRetriever {
            name: retriever.name(),
        });
    }

    let inputs = EvaluationInputs::from_rows(rows);
    if inputs.queries.is_empty() {
        return Err(EvaluationError::EmptyDataset);
    }

    info!(
        retriever = retriever.name(),
        num_queries = inputs.queries.len(),
        num_documents = inputs.documents.len(),
        "Evaluating retriever"
    );

    let scores = retriever.score_texts(
        &inputs.query_refs(),
        &inputs.document_refs(),
        batch_query,
        batch_doc,
    )?;

    let results = run_results(&inputs.queries, &inputs.document_ids, &scores)?;
    let metrics = compute_metrics(&inputs.qrels, &results, &METRIC_K_VALUES);

    info!(
        retriever = retriever.name(),
        ndcg_at_5 = metrics.get("ndcg_at_5").copied().unwrap_or_default(),
        "Evaluation complete"
    );

    Ok(EvaluationReport {
        retriever: retriever.name().to_string(),
        num_queries: inputs.queries.len(),
        num_documents: inputs.documents.len(),
        metrics,
    })
}
