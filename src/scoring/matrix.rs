use std::cmp::Ordering;

use super::error::ScoringError;

/// Dense query-by-document score matrix.
///
/// Entry `(i, j)` is the relevance of document `j` to query `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl ScoreMatrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    pub fn from_vec(rows: usize, cols: usize, data: Vec<f32>) -> Result<Self, ScoringError> {
        if data.len() != rows * cols {
            return Err(ScoringError::ShapeMismatch {
                rows,
                cols,
                len: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Stacks equally long rows. All rows must have `cols` entries.
    pub fn from_rows(cols: usize, rows: Vec<Vec<f32>>) -> Result<Self, ScoringError> {
        let n = rows.len();
        let mut data = Vec::with_capacity(n * cols);
        for row in rows {
            if row.len() != cols {
                return Err(ScoringError::ShapeMismatch {
                    rows: n,
                    cols,
                    len: row.len(),
                });
            }
            data.extend(row);
        }
        Ok(Self {
            rows: n,
            cols,
            data,
        })
    }

    /// `(num_queries, num_documents)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn num_queries(&self) -> usize {
        self.rows
    }

    pub fn num_documents(&self) -> usize {
        self.cols
    }

    pub fn get(&self, query: usize, document: usize) -> Option<f32> {
        if query >= self.rows || document >= self.cols {
            return None;
        }
        self.data.get(query * self.cols + document).copied()
    }

    pub fn set(&mut self, query: usize, document: usize, score: f32) {
        assert!(
            query < self.rows && document < self.cols,
            "index ({query}, {document}) out of bounds for shape ({}, {})",
            self.rows,
            self.cols
        );
        self.data[query * self.cols + document] = score;
    }

    pub fn row(&self, query: usize) -> Option<&[f32]> {
        if query >= self.rows {
            return None;
        }
        Some(&self.data[query * self.cols..(query + 1) * self.cols])
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f32]> {
        (0..self.rows).map(move |i| &self.data[i * self.cols..(i + 1) * self.cols])
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Highest-scoring `k` documents for every query, best first. Ties keep document order.
    pub fn top_k(&self, k: usize) -> Vec<Vec<(usize, f32)>> {
        self.rows()
            .map(|row| {
                let mut ranked: Vec<(usize, f32)> = row.iter().copied().enumerate().collect();
                ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
                ranked.truncate(k);
                ranked
            })
            .collect()
    }
}
