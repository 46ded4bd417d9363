//! Lexara's domain crate: the text analyzer, the inverted index, the
//! document statistics store, the BM25 ranker, the `Store` persistence
//! trait, and the `Engine` that composes all of them under a single
//! readers-writer lock.
//!
//! No I/O crate lives here beyond `std` — persistence is a trait
//! (`store::Store`), implemented elsewhere (`lexara-store`) so this crate
//! stays fast to compile and the backend stays swappable.

pub mod analyzer;
pub mod engine;
pub mod errors;
pub mod index;
pub mod ranker;
pub mod stats;
pub mod store;
pub mod types;

pub use engine::Engine;
pub use errors::{LexaraError, LexaraResult};
pub use index::{IndexSnapshot, IndexStats, InvertedIndex};
pub use stats::{DocStats, DocStatsStore};
pub use store::Store;
pub use types::{Document, SearchMode, SearchOptions, SearchResponse};
