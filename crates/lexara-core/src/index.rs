//! Inverted index — token → posting list, with incremental add/remove/update
//! and AND/OR retrieval.
//!
//! The document counter is maintained by `add`/`remove` directly: `add`
//! always increments, `remove` always decrements (floored at zero).
//! Routing every re-insertion of a known id through `update` (remove then
//! add) rather than a bare `add` is the *caller's* responsibility — see
//! `Engine::upsert`, which is the only place that knows whether a `doc_id`
//! already exists.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// On-disk/wire snapshot of the index: `{index: {token: [doc_id, …]},
/// doc_count: N}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexSnapshot {
    pub index: HashMap<String, Vec<String>>,
    pub doc_count: usize,
}

/// Aggregate statistics about the index.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct IndexStats {
    pub total_documents: usize,
    pub distinct_tokens: usize,
    pub mean_posting_length: f64,
}

/// Token → posting-list mapping plus the document counter.
#[derive(Debug, Clone, Default)]
pub struct InvertedIndex {
    postings: HashMap<String, Vec<String>>,
    doc_count: usize,
}

impl InvertedIndex {
    /// An empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore an index from a persisted snapshot.
    pub fn from_snapshot(snapshot: IndexSnapshot) -> Self {
        Self {
            postings: snapshot.index,
            doc_count: snapshot.doc_count,
        }
    }

    /// Serialize the current state for persistence.
    pub fn to_snapshot(&self) -> IndexSnapshot {
        IndexSnapshot {
            index: self.postings.clone(),
            doc_count: self.doc_count,
        }
    }

    /// Add `doc_id` under each distinct token in `tokens`.
    ///
    /// Precondition (enforced by the caller, not here): `doc_id` is not
    /// already present in any posting list. Always increments the document
    /// counter by one.
    pub fn add(&mut self, doc_id: &str, tokens: &[String]) {
        let unique: HashSet<&str> = tokens.iter().map(|t| t.as_str()).collect();
        for token in unique {
            let postings = self.postings.entry(token.to_string()).or_default();
            if !postings.iter().any(|id| id == doc_id) {
                postings.push(doc_id.to_string());
            }
        }
        self.doc_count += 1;
    }

    /// Remove `doc_id` from every posting list it appears in, dropping any
    /// posting list that becomes empty. Decrements the document counter,
    /// floored at zero.
    pub fn remove(&mut self, doc_id: &str) {
        self.postings.retain(|_, postings| {
            postings.retain(|id| id != doc_id);
            !postings.is_empty()
        });
        self.doc_count = self.doc_count.saturating_sub(1);
    }

    /// Equivalent to `remove(doc_id)` followed by `add(doc_id, tokens)`.
    pub fn update(&mut self, doc_id: &str, tokens: &[String]) {
        self.remove(doc_id);
        self.add(doc_id, tokens);
    }

    /// Intersection of the posting lists for every token in `tokens`.
    ///
    /// Empty `tokens`, or any token absent from the index, yields an empty
    /// result — never "all documents".
    pub fn search_and(&self, tokens: &[String]) -> Vec<String> {
        if tokens.is_empty() {
            return Vec::new();
        }

        let mut sets = Vec::with_capacity(tokens.len());
        for token in tokens {
            match self.postings.get(token) {
                Some(postings) => sets.push(postings.iter().cloned().collect::<HashSet<_>>()),
                None => return Vec::new(),
            }
        }

        let mut iter = sets.into_iter();
        let first = iter.next().unwrap();
        let intersection = iter.fold(first, |acc, set| acc.intersection(&set).cloned().collect());
        intersection.into_iter().collect()
    }

    /// Union of the posting lists over the tokens present in the index.
    /// Absent tokens contribute nothing.
    pub fn search_or(&self, tokens: &[String]) -> Vec<String> {
        let mut union: HashSet<String> = HashSet::new();
        for token in tokens {
            if let Some(postings) = self.postings.get(token) {
                union.extend(postings.iter().cloned());
            }
        }
        union.into_iter().collect()
    }

    /// Length of the posting list for `token`, or zero if absent.
    pub fn doc_frequency(&self, token: &str) -> usize {
        self.postings.get(token).map(Vec::len).unwrap_or(0)
    }

    /// Posting list for `token`, or an empty slice if absent.
    pub fn postings_for(&self, token: &str) -> &[String] {
        self.postings.get(token).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of documents currently indexed.
    pub fn total_documents(&self) -> usize {
        self.doc_count
    }

    /// Aggregate index statistics.
    pub fn stats(&self) -> IndexStats {
        let distinct_tokens = self.postings.len();
        let mean_posting_length = if distinct_tokens == 0 {
            0.0
        } else {
            let total: usize = self.postings.values().map(Vec::len).sum();
            total as f64 / distinct_tokens as f64
        };

        IndexStats {
            total_documents: self.doc_count,
            distinct_tokens,
            mean_posting_length,
        }
    }
}
