//! The persistence adapter interface. `lexara-core` depends only on this
//! trait; `lexara-store` provides the `heed`-backed implementation, kept in
//! its own crate so domain logic never pulls in an I/O crate.

use crate::errors::LexaraResult;
use crate::index::IndexSnapshot;
use crate::stats::DocStats;
use crate::types::Document;

/// Four namespaces over an ordered keyed byte-store with atomic
/// read/write transactions. Absent keys return `Ok(None)`, never an error.
pub trait Store: Send + Sync {
    fn put_doc(&self, doc: &Document) -> LexaraResult<()>;
    fn get_doc(&self, id: &str) -> LexaraResult<Option<Document>>;
    fn delete_doc(&self, id: &str) -> LexaraResult<()>;
    fn iterate_docs(&self) -> LexaraResult<Vec<Document>>;

    fn put_stats(&self, stats: &DocStats) -> LexaraResult<()>;
    fn get_stats(&self, id: &str) -> LexaraResult<Option<DocStats>>;
    fn delete_stats(&self, id: &str) -> LexaraResult<()>;
    fn iterate_stats(&self) -> LexaraResult<Vec<DocStats>>;

    /// Stores the entire serialized index under the single key
    /// `main_index`.
    fn put_index(&self, snapshot: &IndexSnapshot) -> LexaraResult<()>;
    fn load_index(&self) -> LexaraResult<Option<IndexSnapshot>>;

    fn put_meta(&self, key: &str, value: &[u8]) -> LexaraResult<()>;
    fn get_meta(&self, key: &str) -> LexaraResult<Option<Vec<u8>>>;
}
