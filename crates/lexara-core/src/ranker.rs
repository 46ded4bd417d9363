//! BM25 ranker — scores a candidate set against query tokens using
//! per-document statistics and the global average document length.
//!
//! `k1` and `b` are fixed constants rather than configuration: re-tuning
//! them is a design change, not something an operator should be able to
//! twist at runtime.

use crate::index::InvertedIndex;
use crate::stats::DocStatsStore;

const K1: f64 = 1.5;
const B: f64 = 0.75;

/// Rank `candidate_ids` against `query_tokens`, descending by score, stable
/// on ties with respect to `candidate_ids`' input order.
///
/// The caller (the engine) is responsible for not invoking this when
/// `avg_len == 0` — there are no documents to rank against, so the call
/// would be meaningless rather than merely degenerate. This function still
/// degrades gracefully (treats length normalization as a no-op) rather than
/// panicking, since nothing here can distinguish "engine forgot to
/// short-circuit" from "caller has a legitimate reason".
pub fn rank(
    query_tokens: &[String],
    candidate_ids: &[String],
    stats: &DocStatsStore,
    index: &InvertedIndex,
    avg_len: f64,
) -> Vec<(String, f64)> {
    let n = index.total_documents() as f64;

    let mut scored: Vec<(String, f64)> = candidate_ids
        .iter()
        .map(|id| {
            let score = stats
                .get(id)
                .map(|doc_stats| {
                    score_document(query_tokens, doc_stats.length, &doc_stats.term_frequencies, index, n, avg_len)
                })
                .unwrap_or(0.0);
            (id.clone(), score)
        })
        .collect();

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored
}

fn score_document(
    query_tokens: &[String],
    length: usize,
    term_frequencies: &std::collections::HashMap<String, usize>,
    index: &InvertedIndex,
    n: f64,
    avg_len: f64,
) -> f64 {
    let l = length as f64;
    let length_norm = if avg_len > 0.0 { 1.0 - B + B * (l / avg_len) } else { 1.0 };

    query_tokens
        .iter()
        .map(|token| {
            let tf = term_frequencies.get(token).copied().unwrap_or(0) as f64;
            if tf == 0.0 {
                return 0.0;
            }
            let df = index.doc_frequency(token) as f64;
            let idf = ((n - df + 0.5) / (df + 0.5) + 1.0).ln();
            let tf_norm = tf * (K1 + 1.0) / (tf + K1 * length_norm);
            idf * tf_norm
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::analyze;
    use crate::stats::DocStats;

    fn build(docs: &[(&str, &str)]) -> (InvertedIndex, DocStatsStore) {
        let mut index = InvertedIndex::new();
        let mut stats = DocStatsStore::new();
        for (id, text) in docs {
            let tokens = analyze(text);
            index.add(id, &tokens);
            stats.set(DocStats::from_tokens(*id, &tokens));
        }
        (index, stats)
    }

    #[test]
    fn higher_term_frequency_ranks_first() {
        let (index, stats) = build(&[("x", "go go go"), ("y", "go other")]);
        let avg_len = stats.average_document_length();
        let candidates = vec!["x".to_string(), "y".to_string()];
        let tokens = analyze("go");

        let ranked = rank(&tokens, &candidates, &stats, &index, avg_len);

        assert_eq!(ranked[0].0, "x");
        assert!(ranked[0].1 > ranked[1].1);
    }

    #[test]
    fn absent_query_term_contributes_zero() {
        let (index, stats) = build(&[("a", "rust programming")]);
        let avg_len = stats.average_document_length();
        let candidates = vec!["a".to_string()];
        let tokens = analyze("rust nonexistentterm");

        let ranked = rank(&tokens, &candidates, &stats, &index, avg_len);
        let rust_only = rank(&analyze("rust"), &candidates, &stats, &index, avg_len);

        assert_eq!(ranked[0].1, rust_only[0].1);
    }

    #[test]
    fn monotonic_in_term_frequency() {
        let (index_low, stats_low) = build(&[("a", "go other"), ("b", "other other other")]);
        let (index_high, stats_high) = build(&[("a", "go go other"), ("b", "other other other")]);

        let candidates = vec!["a".to_string()];
        let tokens = analyze("go");

        let low = rank(&tokens, &candidates, &stats_low, &index_low, stats_low.average_document_length());
        let high = rank(&tokens, &candidates, &stats_high, &index_high, stats_high.average_document_length());

        assert!(high[0].1 >= low[0].1);
    }

    #[test]
    fn sort_is_descending_and_stable_on_ties() {
        let (index, stats) = build(&[("a", "go go"), ("b", "go go"), ("c", "go go")]);
        let avg_len = stats.average_document_length();
        let candidates = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let tokens = analyze("go");

        let ranked = rank(&tokens, &candidates, &stats, &index, avg_len);
        assert_eq!(
            ranked.iter().map(|(id, _)| id.clone()).collect::<Vec<_>>(),
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );
    }

    #[test]
    fn candidate_missing_from_stats_scores_zero() {
        let (index, stats) = build(&[("a", "go go")]);
        let avg_len = stats.average_document_length();
        let candidates = vec!["a".to_string(), "ghost".to_string()];
        let tokens = analyze("go");

        let ranked = rank(&tokens, &candidates, &stats, &index, avg_len);
        let ghost_score = ranked.iter().find(|(id, _)| id == "ghost").unwrap().1;
        assert_eq!(ghost_score, 0.0);
    }
}
