//! Error types for the caching library
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

use crate::serialize::SerializeError;

// == Cache Error Enum ==
/// Unified error type for all cache tiers.
///
/// Absence of a key is never an error: the `get` family of operations
/// reports a miss as `Ok(None)`. Errors are reserved for configuration
/// problems, unsupported value types, fatally malformed payloads and
/// backing store failures.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Invalid configuration, surfaced at cache construction
    #[error("invalid cache configuration: {0}")]
    Config(String),

    /// No serialization strategy available for the value type
    #[error("unsupported value type: {0}")]
    Unsupported(String),

    /// A stored payload that cannot legally exist for the declared type
    #[error("invalid cached value: {0}")]
    InvalidValue(String),

    /// The backing key-value store failed
    #[error("backing store failure: {0}")]
    Store(String),
}

impl From<SerializeError> for CacheError {
    fn from(err: SerializeError) -> Self {
        match err {
            SerializeError::Unsupported(msg) => CacheError::Unsupported(msg),
            SerializeError::Corrupt(msg) => CacheError::InvalidValue(msg),
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for the caching library.
pub type Result<T> = std::result::Result<T, CacheError>;
