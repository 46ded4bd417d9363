//! Document statistics store — per-document length and term frequencies,
//! plus the running average document length BM25 needs.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Per-document statistics. `id` is carried inside the value (not just used
/// as the store key) because it is part of the on-disk record itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocStats {
    pub id: String,
    pub length: usize,
    pub term_frequencies: HashMap<String, usize>,
}

impl DocStats {
    /// Build stats for `id` from an already-tokenized document.
    pub fn from_tokens(id: impl Into<String>, tokens: &[String]) -> Self {
        let mut term_frequencies: HashMap<String, usize> = HashMap::new();
        for token in tokens {
            *term_frequencies.entry(token.clone()).or_insert(0) += 1;
        }
        Self {
            id: id.into(),
            length: tokens.len(),
            term_frequencies,
        }
    }

    /// Term frequency of `token` in this document, or zero if absent.
    pub fn term_frequency(&self, token: &str) -> usize {
        self.term_frequencies.get(token).copied().unwrap_or(0)
    }
}

/// In-memory `doc_id -> DocStats` map plus the derived average document
/// length, recomputed after every mutation.
#[derive(Debug, Clone, Default)]
pub struct DocStatsStore {
    entries: HashMap<String, DocStats>,
    average_document_length: f64,
}

impl DocStatsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from a fully-loaded set of entries, as happens when
    /// an engine opens over an existing store.
    pub fn from_entries(entries: impl IntoIterator<Item = DocStats>) -> Self {
        let mut store = Self::default();
        for stats in entries {
            store.entries.insert(stats.id.clone(), stats);
        }
        store.recompute_average();
        store
    }

    /// Replace the entry for `stats.id`, then recompute the average.
    pub fn set(&mut self, stats: DocStats) {
        self.entries.insert(stats.id.clone(), stats);
        self.recompute_average();
    }

    /// Remove the entry for `doc_id` if present, then recompute the average.
    pub fn remove(&mut self, doc_id: &str) {
        self.entries.remove(doc_id);
        self.recompute_average();
    }

    pub fn get(&self, doc_id: &str) -> Option<&DocStats> {
        self.entries.get(doc_id)
    }

    pub fn contains(&self, doc_id: &str) -> bool {
        self.entries.contains_key(doc_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn average_document_length(&self) -> f64 {
        self.average_document_length
    }

    fn recompute_average(&mut self) {
        self.average_document_length = if self.entries.is_empty() {
            0.0
        } else {
            let total: usize = self.entries.values().map(|s| s.length).sum();
            total as f64 / self.entries.len() as f64
        };
    }
}
