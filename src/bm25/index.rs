use std::collections::HashMap;
use std::ops::Range;

use tracing::debug;

use super::config::Bm25Config;

/// Okapi BM25 statistics over a tokenized corpus.
#[derive(Debug, Clone)]
pub struct Bm25Index {
    config: Bm25Config,
    term_freqs: Vec<HashMap<String, u32>>,
    doc_lens: Vec<usize>,
    avgdl: f32,
    idf: HashMap<String, f32>,
}

impl Bm25Index {
    pub fn build(corpus: &[Vec<String>], config: Bm25Config) -> Self {
        let num_docs = corpus.len();
        let mut term_freqs = Vec::with_capacity(num_docs);
        let mut doc_lens = Vec::with_capacity(num_docs);
        let mut doc_freq: HashMap<String, u32> = HashMap::new();

        for doc in corpus {
            let mut freqs: HashMap<String, u32> = HashMap::new();
            for token in doc {
                *freqs.entry(token.clone()).or_default() += 1;
            }
            for term in freqs.keys() {
                *doc_freq.entry(term.clone()).or_default() += 1;
            }
            doc_lens.push(doc.len());
            term_freqs.push(freqs);
        }

        let total_len: usize = doc_lens.iter().sum();
        let avgdl = if num_docs > 0 {
            total_len as f32 / num_docs as f32
        } else {
            0.0
        };

        let idf = Self::compute_idf(&doc_freq, num_docs, config.epsilon);

        debug!(
            num_docs = num_docs,
            vocab_size = idf.len(),
            avgdl = avgdl,
            "Built BM25 index"
        );

        Self {
            config,
            term_freqs,
            doc_lens,
            avgdl,
            idf,
        }
    }

    /// `ln((N - df + 0.5) / (df + 0.5))`, with negative values floored to
    /// `epsilon * mean_idf`.
    fn compute_idf(
        doc_freq: &HashMap<String, u32>,
        num_docs: usize,
        epsilon: f32,
    ) -> HashMap<String, f32> {
        let n = num_docs as f32;
        let mut idf: HashMap<String, f32> = doc_freq
            .iter()
            .map(|(term, &df)| {
                let df = df as f32;
                (term.clone(), ((n - df + 0.5) / (df + 0.5)).ln())
            })
            .collect();

        if idf.is_empty() {
            return idf;
        }

        let mean_idf = idf.values().sum::<f32>() / idf.len() as f32;
        let floor = epsilon * mean_idf;
        for value in idf.values_mut() {
            if *value < 0.0 {
                *value = floor;
            }
        }

        idf
    }

    pub fn num_documents(&self) -> usize {
        self.doc_lens.len()
    }

    pub fn avgdl(&self) -> f32 {
        self.avgdl
    }

    pub fn idf(&self, term: &str) -> Option<f32> {
        self.idf.get(term).copied()
    }

    pub fn config(&self) -> &Bm25Config {
        &self.config
    }

    /// Score of one document. Repeated query terms contribute once per occurrence.
    pub fn score(&self, query: &[String], doc: usize) -> f32 {
        let (Some(freqs), Some(&doc_len)) = (self.term_freqs.get(doc), self.doc_lens.get(doc))
        else {
            return 0.0;
        };

        let Bm25Config { k1, b, .. } = self.config;
        let len_ratio = if self.avgdl > 0.0 {
            doc_len as f32 / self.avgdl
        } else {
            1.0
        };
        let norm = k1 * (1.0 - b + b * len_ratio);

        query
            .iter()
            .map(|term| {
                let tf = freqs.get(term).copied().unwrap_or(0) as f32;
                if tf == 0.0 {
                    return 0.0;
                }
                let idf = self.idf.get(term).copied().unwrap_or(0.0);
                idf * (tf * (k1 + 1.0)) / (tf + norm)
            })
            .sum()
    }

    /// Scores for a contiguous range of documents.
    pub fn scores_for(&self, query: &[String], docs: Range<usize>) -> Vec<f32> {
        docs.map(|doc| self.score(query, doc)).collect()
    }

    /// Scores against every document.
    pub fn scores(&self, query: &[String]) -> Vec<f32> {
        self.scores_for(query, 0..self.num_documents())
    }
}
