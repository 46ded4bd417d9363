//! The engine — mediates every mutation and query, enforcing the
//! single-writer/many-reader concurrency discipline and the persistence
//! ordering the rest of this crate relies on.

use std::sync::RwLock;

use tracing::{debug, info, warn};

use crate::analyzer::analyze;
use crate::errors::{LexaraError, LexaraResult};
use crate::index::InvertedIndex;
use crate::ranker;
use crate::stats::{DocStats, DocStatsStore};
use crate::store::Store;
use crate::types::{Document, SearchMode, SearchOptions, SearchResponse};

/// The in-memory state guarded by the single readers-writer lock: the
/// index, the stats store, and the derived average document length. These
/// three are never locked separately — their mutual consistency is the
/// whole point of the lock.
struct State {
    index: InvertedIndex,
    stats: DocStatsStore,
    avg_len: f64,
}

/// `Closed -> Open -> Closed`. No other transitions.
pub struct Engine<S: Store> {
    store: S,
    state: RwLock<Option<State>>,
}

impl<S: Store> Engine<S> {
    /// Bring an engine up over an already-opened `store`, replaying the
    /// recovery sequence:
    /// 1. load the serialized index (or start empty if absent);
    /// 2. iterate every stats entry into memory;
    /// 3. recompute `avg_len` from the loaded stats.
    pub fn open(store: S) -> LexaraResult<Self> {
        let index = match store.load_index()? {
            Some(snapshot) => InvertedIndex::from_snapshot(snapshot),
            None => InvertedIndex::new(),
        };

        let entries = store.iterate_stats()?;
        let stats = DocStatsStore::from_entries(entries);
        let avg_len = stats.average_document_length();

        if stats.len() != index.total_documents() {
            warn!(
                stats_count = stats.len(),
                index_count = index.total_documents(),
                "stats store and index disagree on document count after recovery"
            );
        }

        info!(documents = index.total_documents(), "engine opened");

        Ok(Self {
            store,
            state: RwLock::new(Some(State { index, stats, avg_len })),
        })
    }

    /// Release the backing store. Any further call returns
    /// `LexaraError::Closed`.
    pub fn close(&self) -> LexaraResult<()> {
        let mut guard = self.write_guard()?;
        *guard = None;
        info!("engine closed");
        Ok(())
    }

    /// Insert or fully replace the document at `doc.id`.
    ///
    /// A prior existing id routes through `index.update` (remove-then-add)
    /// rather than `index.add`, so the document counter does not
    /// double-count on re-insertion — the engine, not the index, is
    /// responsible for telling the two cases apart.
    pub fn upsert(&self, mut doc: Document) -> LexaraResult<()> {
        if doc.id.trim().is_empty() {
            return Err(LexaraError::InvalidRequest("document id must not be empty".into()));
        }

        let mut guard = self.write_guard()?;
        let state = guard.as_mut().ok_or(LexaraError::Closed)?;

        let tokens = analyze(&doc.searchable_text());
        let existed = state.stats.contains(&doc.id);

        if existed {
            state.index.update(&doc.id, &tokens);
        } else {
            state.index.add(&doc.id, &tokens);
        }
        state.stats.set(DocStats::from_tokens(doc.id.clone(), &tokens));
        state.avg_len = state.stats.average_document_length();

        let now = now_seconds();
        let existing_created_at = existed
            .then(|| self.store.get_doc(&doc.id).ok().flatten().map(|d| d.created_at))
            .flatten();
        doc.created_at = existing_created_at.unwrap_or(now);
        doc.updated_at = now;

        self.store.put_doc(&doc)?;
        self.store
            .put_stats(state.stats.get(&doc.id).expect("just inserted"))?;
        self.store.put_index(&state.index.to_snapshot())?;

        debug!(doc_id = %doc.id, "upsert persisted");
        Ok(())
    }

    /// Idempotent: deleting an absent id succeeds without error.
    pub fn delete(&self, doc_id: &str) -> LexaraResult<()> {
        let mut guard = self.write_guard()?;
        let state = guard.as_mut().ok_or(LexaraError::Closed)?;

        state.index.remove(doc_id);
        state.stats.remove(doc_id);
        state.avg_len = state.stats.average_document_length();

        self.store.delete_doc(doc_id)?;
        self.store.delete_stats(doc_id)?;
        self.store.put_index(&state.index.to_snapshot())?;

        debug!(doc_id = %doc_id, "delete persisted");
        Ok(())
    }

    /// Read-only; no lock promotion beyond a shared read.
    pub fn get(&self, doc_id: &str) -> LexaraResult<Option<Document>> {
        let guard = self.read_guard()?;
        guard.as_ref().ok_or(LexaraError::Closed)?;
        self.store.get_doc(doc_id)
    }

    pub fn search(&self, query: &str, options: SearchOptions) -> LexaraResult<SearchResponse> {
        let guard = self.read_guard()?;
        let state = guard.as_ref().ok_or(LexaraError::Closed)?;

        let tokens = analyze(query);
        if tokens.is_empty() {
            return Ok(SearchResponse {
                documents: Vec::new(),
                total: 0,
                scores: None,
            });
        }

        let mut candidates = match options.mode {
            SearchMode::And => state.index.search_and(&tokens),
            SearchMode::Or => state.index.search_or(&tokens),
        };

        let total = candidates.len();

        let mut page_scores: Option<Vec<f64>> = None;
        if options.use_ranking && !candidates.is_empty() {
            if state.avg_len > 0.0 {
                let ranked = ranker::rank(&tokens, &candidates, &state.stats, &state.index, state.avg_len);
                candidates = ranked.iter().map(|(id, _)| id.clone()).collect();
                page_scores = Some(ranked.iter().map(|(_, score)| *score).collect());
            }
        }

        let start = options.offset.min(candidates.len());
        let end = (start + options.limit).min(candidates.len());
        let page_ids = &candidates[start..end];

        let scores = page_scores.map(|scores| scores[start..end].to_vec());

        let mut documents = Vec::with_capacity(page_ids.len());
        let mut kept_scores = Vec::with_capacity(page_ids.len());
        for (i, id) in page_ids.iter().enumerate() {
            match self.store.get_doc(id)? {
                Some(doc) => {
                    documents.push(doc);
                    if let Some(scores) = &scores {
                        kept_scores.push(scores[i]);
                    }
                }
                None => {
                    warn!(doc_id = %id, "candidate id missing from store during search, skipping");
                }
            }
        }

        Ok(SearchResponse {
            documents,
            total,
            scores: scores.map(|_| kept_scores),
        })
    }

    pub fn stats(&self) -> LexaraResult<crate::index::IndexStats> {
        let guard = self.read_guard()?;
        let state = guard.as_ref().ok_or(LexaraError::Closed)?;
        Ok(state.index.stats())
    }

    fn read_guard(&self) -> LexaraResult<std::sync::RwLockReadGuard<'_, Option<State>>> {
        self.state
            .read()
            .map_err(|_| LexaraError::Invariant("engine lock poisoned".into()))
    }

    fn write_guard(&self) -> LexaraResult<std::sync::RwLockWriteGuard<'_, Option<State>>> {
        self.state
            .write()
            .map_err(|_| LexaraError::Invariant("engine lock poisoned".into()))
    }
}

fn now_seconds() -> i64 {
    chrono::Utc::now().timestamp()
}
