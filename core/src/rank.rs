use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::index::InvertedIndex;
use crate::stats::DocumentStats;
use crate::DocId;

/// Okapi BM25 parameters.
///
/// `k1` scales term-frequency saturation; `k1 = 0` is a binary model.
/// `b` in [0, 1] scales document-length normalization; `b = 0` disables
/// it, `b = 1` scales the term weight fully by document length.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Bm25Params {
    pub k1: f64,
    pub b: f64,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self { k1: 0.5, b: 0.5 }
    }
}

/// Score the candidate documents (from a prior Boolean resolution,
/// typically OR) against the query terms. Absent terms contribute 0:
/// `idf` is defined as 0 when `df(t) = 0`, and `tf = 0` zeroes the
/// contribution otherwise. Output is sorted by score descending, with
/// document id ascending on equal scores.
pub fn rank(
    index: &InvertedIndex,
    stats: &DocumentStats,
    params: Bm25Params,
    terms: &[String],
    candidates: &[DocId],
) -> Vec<(DocId, f64)> {
    let n = stats.num_docs() as f64;
    let avg_len = stats.avg_length();
    let avg_len = if avg_len > 0.0 { avg_len } else { 1.0 };

    let mut scored = Vec::with_capacity(candidates.len());
    for &doc_id in candidates {
        let len = stats.doc_length(doc_id).unwrap_or(0) as f64;
        let mut score = 0.0;
        for term in terms {
            let df = index.document_frequency(term) as f64;
            if df == 0.0 {
                continue;
            }
            let idf = (n / df).log10();
            let tf = index.term_frequency(term, doc_id) as f64;
            let denom = params.k1 * ((1.0 - params.b) + params.b * (len / avg_len)) + tf;
            if denom > 0.0 {
                score += idf * (params.k1 + 1.0) * tf / denom;
            }
        }
        scored.push((doc_id, score));
    }

    scored.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then(a.0.cmp(&b.0))
    });
    scored
}
