//! The `heed` (LMDB)-backed implementation of `lexara_core::Store`.
//!
//! Kept in its own crate so `lexara-core` stays free of I/O dependencies
//! and the storage backend can be swapped without touching domain logic —
//! the same split this workspace's surrounding ecosystem draws between a
//! domain crate and its infrastructure crate.
//!
//! One `heed::Env` (one LMDB environment, one file under `--data-dir`)
//! holds four named databases: `documents`, `doc_stats`, `index`,
//! `metadata`. Keys and values are encoded with `heed::types::SerdeJson<T>`
//! (`heed::types::Str` for string keys) — self-describing JSON that
//! round-trips every field and is indifferent to posting-list element
//! order.

pub mod error;

use std::path::Path;

use heed::types::{Bytes, SerdeJson, Str};
use heed::{Database, Env, EnvOpenOptions};
use tracing::{debug, trace};

use lexara_core::index::IndexSnapshot;
use lexara_core::{DocStats, Document, LexaraError, LexaraResult, Store};

pub use error::{StoreError, StoreResult};

const DB_DOCUMENTS: &str = "documents";
const DB_DOC_STATS: &str = "doc_stats";
const DB_INDEX: &str = "index";
const DB_METADATA: &str = "metadata";

const MAIN_INDEX_KEY: &str = "main_index";

/// Default LMDB map size: generous headroom for a single-node deployment,
/// not a hard cap callers are expected to tune.
const DEFAULT_MAP_SIZE: usize = 1024 * 1024 * 1024;

type DocumentsDb = Database<Str, SerdeJson<Document>>;
type DocStatsDb = Database<Str, SerdeJson<DocStats>>;
type IndexDb = Database<Str, SerdeJson<IndexSnapshot>>;
type MetadataDb = Database<Str, Bytes>;

pub struct HeedStore {
    env: Env,
    documents: DocumentsDb,
    doc_stats: DocStatsDb,
    index: IndexDb,
    metadata: MetadataDb,
}

impl HeedStore {
    /// Open (creating if absent) the LMDB environment at `path` and the
    /// four namespaces inside it.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::Open {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        }
        std::fs::create_dir_all(path).map_err(|e| StoreError::Open {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(DEFAULT_MAP_SIZE)
                .max_dbs(4)
                .open(path)
        }
        .map_err(|e| StoreError::Open {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let mut wtxn = env.write_txn()?;
        let documents = env
            .database_options()
            .types::<Str, SerdeJson<Document>>()
            .name(DB_DOCUMENTS)
            .create(&mut wtxn)?;
        let doc_stats = env
            .database_options()
            .types::<Str, SerdeJson<DocStats>>()
            .name(DB_DOC_STATS)
            .create(&mut wtxn)?;
        let index = env
            .database_options()
            .types::<Str, SerdeJson<IndexSnapshot>>()
            .name(DB_INDEX)
            .create(&mut wtxn)?;
        let metadata = env
            .database_options()
            .types::<Str, Bytes>()
            .name(DB_METADATA)
            .create(&mut wtxn)?;
        wtxn.commit()?;

        debug!(path = %path.display(), "heed store opened");

        Ok(Self {
            env,
            documents,
            doc_stats,
            index,
            metadata,
        })
    }

    fn put_doc_inner(&self, doc: &Document) -> StoreResult<()> {
        let mut wtxn = self.env.write_txn()?;
        self.documents.put(&mut wtxn, &doc.id, doc)?;
        wtxn.commit()?;
        trace!(doc_id = %doc.id, "document persisted");
        Ok(())
    }

    fn get_doc_inner(&self, id: &str) -> StoreResult<Option<Document>> {
        let rtxn = self.env.read_txn()?;
        Ok(self.documents.get(&rtxn, id)?)
    }

    fn delete_doc_inner(&self, id: &str) -> StoreResult<()> {
        let mut wtxn = self.env.write_txn()?;
        self.documents.delete(&mut wtxn, id)?;
        wtxn.commit()?;
        Ok(())
    }

    fn iterate_docs_inner(&self) -> StoreResult<Vec<Document>> {
        let rtxn = self.env.read_txn()?;
        let mut out = Vec::new();
        for entry in self.documents.iter(&rtxn)? {
            let (_, doc) = entry?;
            out.push(doc);
        }
        Ok(out)
    }

    fn put_stats_inner(&self, stats: &DocStats) -> StoreResult<()> {
        let mut wtxn = self.env.write_txn()?;
        self.doc_stats.put(&mut wtxn, &stats.id, stats)?;
        wtxn.commit()?;
        Ok(())
    }

    fn get_stats_inner(&self, id: &str) -> StoreResult<Option<DocStats>> {
        let rtxn = self.env.read_txn()?;
        Ok(self.doc_stats.get(&rtxn, id)?)
    }

    fn delete_stats_inner(&self, id: &str) -> StoreResult<()> {
        let mut wtxn = self.env.write_txn()?;
        self.doc_stats.delete(&mut wtxn, id)?;
        wtxn.commit()?;
        Ok(())
    }

    fn iterate_stats_inner(&self) -> StoreResult<Vec<DocStats>> {
        let rtxn = self.env.read_txn()?;
        let mut out = Vec::new();
        for entry in self.doc_stats.iter(&rtxn)? {
            let (_, stats) = entry?;
            out.push(stats);
        }
        Ok(out)
    }

    fn put_index_inner(&self, snapshot: &IndexSnapshot) -> StoreResult<()> {
        let mut wtxn = self.env.write_txn()?;
        self.index.put(&mut wtxn, MAIN_INDEX_KEY, snapshot)?;
        wtxn.commit()?;
        trace!(doc_count = snapshot.doc_count, "index persisted");
        Ok(())
    }

    fn load_index_inner(&self) -> StoreResult<Option<IndexSnapshot>> {
        let rtxn = self.env.read_txn()?;
        Ok(self.index.get(&rtxn, MAIN_INDEX_KEY)?)
    }

    fn put_meta_inner(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        let mut wtxn = self.env.write_txn()?;
        self.metadata.put(&mut wtxn, key, value)?;
        wtxn.commit()?;
        Ok(())
    }

    fn get_meta_inner(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let rtxn = self.env.read_txn()?;
        Ok(self.metadata.get(&rtxn, key)?.map(|bytes| bytes.to_vec()))
    }
}

impl Store for HeedStore {
    fn put_doc(&self, doc: &Document) -> LexaraResult<()> {
        self.put_doc_inner(doc).map_err(LexaraError::from)
    }

    fn get_doc(&self, id: &str) -> LexaraResult<Option<Document>> {
        self.get_doc_inner(id).map_err(LexaraError::from)
    }

    fn delete_doc(&self, id: &str) -> LexaraResult<()> {
        self.delete_doc_inner(id).map_err(LexaraError::from)
    }

    fn iterate_docs(&self) -> LexaraResult<Vec<Document>> {
        self.iterate_docs_inner().map_err(LexaraError::from)
    }

    fn put_stats(&self, stats: &DocStats) -> LexaraResult<()> {
        self.put_stats_inner(stats).map_err(LexaraError::from)
    }

    fn get_stats(&self, id: &str) -> LexaraResult<Option<DocStats>> {
        self.get_stats_inner(id).map_err(LexaraError::from)
    }

    fn delete_stats(&self, id: &str) -> LexaraResult<()> {
        self.delete_stats_inner(id).map_err(LexaraError::from)
    }

    fn iterate_stats(&self) -> LexaraResult<Vec<DocStats>> {
        self.iterate_stats_inner().map_err(LexaraError::from)
    }

    fn put_index(&self, snapshot: &IndexSnapshot) -> LexaraResult<()> {
        self.put_index_inner(snapshot).map_err(LexaraError::from)
    }

    fn load_index(&self) -> LexaraResult<Option<IndexSnapshot>> {
        self.load_index_inner().map_err(LexaraError::from)
    }

    fn put_meta(&self, key: &str, value: &[u8]) -> LexaraResult<()> {
        self.put_meta_inner(key, value).map_err(LexaraError::from)
    }

    fn get_meta(&self, key: &str) -> LexaraResult<Option<Vec<u8>>> {
        self.get_meta_inner(key).map_err(LexaraError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn doc(id: &str) -> Document {
        Document {
            id: id.to_string(),
            title: "title".to_string(),
            content: "content".to_string(),
            url: Some("https://example.com".to_string()),
            metadata: Some(HashMap::from([("lang".to_string(), "en".to_string())])),
            created_at: 1,
            updated_at: 2,
        }
    }

    #[test]
    fn document_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = HeedStore::open(dir.path()).unwrap();

        let d = doc("1");
        store.put_doc(&d).unwrap();
        let fetched = store.get_doc("1").unwrap().unwrap();
        assert_eq!(fetched, d);
    }

    #[test]
    fn absent_document_is_none_not_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = HeedStore::open(dir.path()).unwrap();
        assert!(store.get_doc("missing").unwrap().is_none());
    }

    #[test]
    fn delete_doc_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = HeedStore::open(dir.path()).unwrap();
        store.delete_doc("missing").unwrap();
        store.delete_doc("missing").unwrap();
    }

    #[test]
    fn stats_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = HeedStore::open(dir.path()).unwrap();

        let stats = DocStats::from_tokens("1", &["go".to_string(), "go".to_string(), "fast".to_string()]);
        store.put_stats(&stats).unwrap();
        let fetched = store.get_stats("1").unwrap().unwrap();
        assert_eq!(fetched, stats);
    }

    #[test]
    fn index_snapshot_round_trips_regardless_of_posting_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = HeedStore::open(dir.path()).unwrap();

        let mut index = HashMap::new();
        index.insert("rust".to_string(), vec!["b".to_string(), "a".to_string()]);
        let snapshot = IndexSnapshot { index, doc_count: 2 };

        store.put_index(&snapshot).unwrap();
        let loaded = store.load_index().unwrap().unwrap();
        assert_eq!(loaded.doc_count, snapshot.doc_count);

        let mut expected: Vec<&String> = snapshot.index.get("rust").unwrap().iter().collect();
        let mut actual: Vec<&String> = loaded.index.get("rust").unwrap().iter().collect();
        expected.sort();
        actual.sort();
        assert_eq!(expected, actual);
    }

    #[test]
    fn load_index_is_none_on_fresh_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = HeedStore::open(dir.path()).unwrap();
        assert!(store.load_index().unwrap().is_none());
    }

    #[test]
    fn iterate_docs_returns_every_persisted_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = HeedStore::open(dir.path()).unwrap();
        store.put_doc(&doc("1")).unwrap();
        store.put_doc(&doc("2")).unwrap();

        let mut ids: Vec<String> = store.iterate_docs().unwrap().into_iter().map(|d| d.id).collect();
        ids.sort();
        assert_eq!(ids, vec!["1".to_string(), "2".to_string()]);
    }

    #[test]
    fn meta_round_trips_opaque_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let store = HeedStore::open(dir.path()).unwrap();
        store.put_meta("schema_version", b"1").unwrap();
        assert_eq!(store.get_meta("schema_version").unwrap(), Some(b"1".to_vec()));
        assert_eq!(store.get_meta("absent").unwrap(), None);
    }

    #[test]
    fn reopening_existing_store_preserves_data() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = HeedStore::open(dir.path()).unwrap();
            store.put_doc(&doc("1")).unwrap();
        }
        let reopened = HeedStore::open(dir.path()).unwrap();
        assert!(reopened.get_doc("1").unwrap().is_some());
    }
}
