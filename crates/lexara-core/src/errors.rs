//! Error types for lexara-core.

use thiserror::Error;

/// Domain-specific errors for Lexara operations.
#[derive(Error, Debug)]
pub enum LexaraError {
    /// A request failed basic validation (missing field, bad pagination, unknown mode).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The engine was asked to operate while closed, or closed while already closed.
    #[error("engine is closed")]
    Closed,

    /// The backing persistence adapter failed (I/O or decode error).
    ///
    /// This is a translated `lexara_store::StoreError`; see the `From` impl in
    /// `lexara-store` for the mapping.
    #[error("storage error: {0}")]
    Store(String),

    /// An internal invariant was violated. Per design, this is treated as
    /// fatal rather than silently recovered — callers should surface it and
    /// stop, not retry.
    #[error("internal invariant violated: {0}")]
    Invariant(String),
}

/// Convenience alias used throughout lexara-core.
pub type LexaraResult<T> = Result<T, LexaraError>;
