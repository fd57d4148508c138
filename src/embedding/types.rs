use half::f16;

/// Token-level embedding matrix (row-major, `num_tokens x dim`).
#[derive(Debug, Clone, PartialEq)]
pub struct MultiVectorEmbedding {
    dim: usize,
    data: Vec<f16>,
}

impl MultiVectorEmbedding {
    /// Wraps a flat row-major buffer. Returns `None` if `data` is not a whole number of rows.
    pub fn new(dim: usize, data: Vec<f16>) -> Option<Self> {
        if dim == 0 || !data.len().is_multiple_of(dim) {
            return None;
        }
        Some(Self { dim, data })
    }

    /// Builds from f32 rows, L2-normalizing each row.
    pub fn from_rows_normalized(dim: usize, rows: impl IntoIterator<Item = Vec<f32>>) -> Self {
        let mut data = Vec::new();
        for row in rows {
            debug_assert_eq!(row.len(), dim);
            data.extend(normalize_to_f16(row));
        }
        Self { dim, data }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn num_tokens(&self) -> usize {
        self.data.len() / self.dim
    }

    pub fn row(&self, idx: usize) -> Option<&[f16]> {
        let start = idx.checked_mul(self.dim)?;
        self.data.get(start..start + self.dim)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f16]> {
        self.data.chunks_exact(self.dim)
    }

    pub fn as_slice(&self) -> &[f16] {
        &self.data
    }
}

/// Output of [`Retriever::forward_queries`](crate::retrievers::Retriever::forward_queries)
/// and `forward_documents`.
#[derive(Debug, Clone, PartialEq)]
pub enum Embedding {
    /// Single pooled vector.
    Dense(Vec<f16>),
    /// One vector per token (late interaction).
    MultiVector(MultiVectorEmbedding),
}

impl Embedding {
    pub fn dim(&self) -> usize {
        match self {
            Embedding::Dense(v) => v.len(),
            Embedding::MultiVector(m) => m.dim(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Embedding::Dense(_) => "dense",
            Embedding::MultiVector(_) => "multi-vector",
        }
    }

    pub fn as_dense(&self) -> Option<&[f16]> {
        match self {
            Embedding::Dense(v) => Some(v),
            Embedding::MultiVector(_) => None,
        }
    }

    pub fn as_multi_vector(&self) -> Option<&MultiVectorEmbedding> {
        match self {
            Embedding::MultiVector(m) => Some(m),
            Embedding::Dense(_) => None,
        }
    }
}

/// L2-normalizes and converts to f16. Zero vectors stay zero.
pub fn normalize_to_f16(mut values: Vec<f32>) -> Vec<f16> {
    let norm: f32 = values.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm > 0.0 {
        for x in &mut values {
            *x /= norm;
        }
    }

    values.into_iter().map(f16::from_f32).collect()
}
