//! Storage-layer errors. Translated to `lexara_core::LexaraError` at the
//! crate boundary below, the same direction and shape this workspace's
//! own infrastructure crate uses to translate its backend errors into the
//! domain error type.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to open store at {path}: {message}")]
    Open { path: String, message: String },

    #[error("i/o error on namespace {namespace}: {message}")]
    Io { namespace: String, message: String },

    #[error("failed to decode record in namespace {namespace}: {message}")]
    Decode { namespace: String, message: String },

    #[error("transaction failed: {0}")]
    Transaction(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for lexara_core::LexaraError {
    fn from(err: StoreError) -> Self {
        lexara_core::LexaraError::Store(err.to_string())
    }
}

impl From<heed::Error> for StoreError {
    fn from(err: heed::Error) -> Self {
        StoreError::Transaction(err.to_string())
    }
}
