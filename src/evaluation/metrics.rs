//! Ranking metrics (trec_eval conventions).

use std::cmp::Ordering;
use std::collections::BTreeMap;

/// `query -> (document id -> relevance grade)`.
pub type Qrels = BTreeMap<String, BTreeMap<String, i32>>;

/// `query -> (document id -> score)`.
pub type RunResults = BTreeMap<String, BTreeMap<String, f32>>;

/// Metric name (`ndcg_at_5`, ...) to value averaged over judged queries.
pub type Metrics = BTreeMap<String, f64>;

/// Documents of one query ordered best first. Ties go to the larger document
/// id, matching trec_eval.
fn ranked(run: &BTreeMap<String, f32>) -> Vec<&str> {
    let mut docs: Vec<(&str, f32)> = run.iter().map(|(id, s)| (id.as_str(), *s)).collect();
    docs.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.0.cmp(a.0))
    });
    docs.into_iter().map(|(id, _)| id).collect()
}

fn gain(judged: &BTreeMap<String, i32>, doc: &str) -> i32 {
    judged.get(doc).copied().unwrap_or(0).max(0)
}

pub fn ndcg_at_k(judged: &BTreeMap<String, i32>, ranking: &[&str], k: usize) -> f64 {
    let dcg: f64 = ranking
        .iter()
        .take(k)
        .enumerate()
        .map(|(i, doc)| gain(judged, doc) as f64 / (i as f64 + 2.0).log2())
        .sum();

    let mut ideal: Vec<i32> = judged.values().copied().filter(|&r| r > 0).collect();
    ideal.sort_unstable_by(|a, b| b.cmp(a));
    let idcg: f64 = ideal
        .iter()
        .take(k)
        .enumerate()
        .map(|(i, &rel)| rel as f64 / (i as f64 + 2.0).log2())
        .sum();

    if idcg > 0.0 { dcg / idcg } else { 0.0 }
}

fn num_relevant(judged: &BTreeMap<String, i32>) -> usize {
    judged.values().filter(|&&r| r > 0).count()
}

/// Average precision over the top `k`, normalized by all relevant documents.
pub fn map_at_k(judged: &BTreeMap<String, i32>, ranking: &[&str], k: usize) -> f64 {
    let total = num_relevant(judged);
    if total == 0 {
        return 0.0;
    }

    let mut hits = 0usize;
    let mut sum_precision = 0.0;
    for (i, doc) in ranking.iter().take(k).enumerate() {
        if gain(judged, doc) > 0 {
            hits += 1;
            sum_precision += hits as f64 / (i + 1) as f64;
        }
    }
    sum_precision / total as f64
}

pub fn recall_at_k(judged: &BTreeMap<String, i32>, ranking: &[&str], k: usize) -> f64 {
    let total = num_relevant(judged);
    if total == 0 {
        return 0.0;
    }
    let hits = ranking
        .iter()
        .take(k)
        .filter(|doc| gain(judged, doc) > 0)
        .count();
    hits as f64 / total as f64
}

pub fn precision_at_k(judged: &BTreeMap<String, i32>, ranking: &[&str], k: usize) -> f64 {
    if k == 0 {
        return 0.0;
    }
    let hits = ranking
        .iter()
        .take(k)
        .filter(|doc| gain(judged, doc) > 0)
        .count();
    hits as f64 / k as f64
}

pub fn mrr_at_k(judged: &BTreeMap<String, i32>, ranking: &[&str], k: usize) -> f64 {
    ranking
        .iter()
        .take(k)
        .position(|doc| gain(judged, doc) > 0)
        .map_or(0.0, |rank| 1.0 / (rank + 1) as f64)
}

/// Computes every metric at every cut-off, averaged over queries with at least
/// one relevant document. Queries absent from `results` count as zero.
pub fn compute_metrics(qrels: &Qrels, results: &RunResults, k_values: &[usize]) -> Metrics {
    type MetricFn = fn(&BTreeMap<String, i32>, &[&str], usize) -> f64;
    const METRICS: [(&str, MetricFn); 5] = [
        ("ndcg", ndcg_at_k),
        ("map", map_at_k),
        ("recall", recall_at_k),
        ("precision", precision_at_k),
        ("mrr", mrr_at_k),
    ];

    let empty = BTreeMap::new();
    let judged: Vec<(&BTreeMap<String, i32>, Vec<&str>)> = qrels
        .iter()
        .filter(|(_, judged)| num_relevant(judged) > 0)
        .map(|(query, judged)| (judged, ranked(results.get(query).unwrap_or(&empty))))
        .collect();

    let mut metrics = Metrics::new();
    for (name, metric) in METRICS {
        for &k in k_values {
            let value = if judged.is_empty() {
                0.0
            } else {
                judged
                    .iter()
                    .map(|(j, ranking)| metric(j, ranking, k))
                    .sum::<f64>()
                    / judged.len() as f64
            };
            metrics.insert(format!("{name}_at_{k}"), value);
        }
    }

    metrics
}
