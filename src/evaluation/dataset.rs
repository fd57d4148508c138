use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::EvaluationError;
use super::metrics::Qrels;

/// One row of a page-retrieval dataset: a page (with its OCR text) and
/// optionally a query answered by that page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetRow {
    #[serde(default)]
    pub query: Option<String>,
    pub image_filename: String,
    #[serde(default)]
    pub text_description: Option<String>,
}

impl DatasetRow {
    pub fn new(
        query: Option<&str>,
        image_filename: &str,
        text_description: Option<&str>,
    ) -> Self {
        Self {
            query: query.map(str::to_string),
            image_filename: image_filename.to_string(),
            text_description: text_description.map(str::to_string),
        }
    }
}

/// Loads rows from a JSON array file or a JSON Lines file.
pub fn load_dataset(path: &Path) -> Result<Vec<DatasetRow>, EvaluationError> {
    let content = std::fs::read_to_string(path).map_err(|source| EvaluationError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let rows: Vec<DatasetRow> = if content.trim_start().starts_with('[') {
        serde_json::from_str(&content).map_err(|source| EvaluationError::Parse {
            path: path.to_path_buf(),
            line: source.line(),
            source,
        })?
    } else {
        content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(idx, line)| {
                serde_json::from_str(line).map_err(|source| EvaluationError::Parse {
                    path: path.to_path_buf(),
                    line: idx + 1,
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?
    };

    debug!(path = %path.display(), rows = rows.len(), "Loaded dataset");
    Ok(rows)
}

/// Queries, documents and relevance judgements derived from dataset rows.
#[derive(Debug, Clone, Default)]
pub struct EvaluationInputs {
    /// Distinct non-empty queries, first-seen order.
    pub queries: Vec<String>,
    /// Document ids (`image_filename`), first-seen order.
    pub document_ids: Vec<String>,
    /// OCR text per document id (empty when missing).
    pub documents: Vec<String>,
    pub qrels: Qrels,
}

impl EvaluationInputs {
    pub fn from_rows(rows: &[DatasetRow]) -> Self {
        let mut inputs = Self::default();
        let mut seen_docs: HashSet<&str> = HashSet::new();

        for row in rows {
            if seen_docs.insert(row.image_filename.as_str()) {
                inputs.document_ids.push(row.image_filename.clone());
                inputs
                    .documents
                    .push(row.text_description.clone().unwrap_or_default());
            }

            let Some(query) = row.query.as_deref().filter(|q| !q.trim().is_empty()) else {
                continue;
            };

            if !inputs.qrels.contains_key(query) {
                inputs.queries.push(query.to_string());
            }
            inputs
                .qrels
                .entry(query.to_string())
                .or_insert_with(BTreeMap::new)
                .insert(row.image_filename.clone(), 1);
        }

        inputs
    }

    pub fn query_refs(&self) -> Vec<&str> {
        self.queries.iter().map(String::as_str).collect()
    }

    pub fn document_refs(&self) -> Vec<&str> {
        self.documents.iter().map(String::as_str).collect()
    }
}
