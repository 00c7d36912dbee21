//! Storage error types.

use tally_shared::AppError;
use thiserror::Error;

/// Errors raised by storage implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique index rejected the write.
    #[error("Duplicate {collection} key: {key}")]
    UniqueViolation {
        /// Collection the write targeted.
        collection: &'static str,
        /// Offending key.
        key: String,
    },

    /// The backing store could not be reached or read.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        Self::Storage(err.to_string())
    }
}
