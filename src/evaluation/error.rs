use std::path::PathBuf;
use thiserror::Error;

use crate::retrievers::RetrieverError;

#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("failed to read dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse dataset {path} (line {line}): {source}")]
    Parse {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("dataset contains no queries")]
    EmptyDataset,

    #[error("retriever {name} embeds page images; only text documents are available")]
    VisualRetriever { name: &'static str },

    #[error("score matrix has shape {actual:?}, expected {expected:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("retriever error: {0}")]
    Retriever(#[from] RetrieverError),
}
