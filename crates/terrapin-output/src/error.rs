//! Error types for record construction.

use thiserror::Error;

/// Errors raised while building a [`crate::Record`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// The key was already present in the record.
    #[error("duplicate record key '{key}'")]
    DuplicateKey {
        /// Key that was appended twice.
        key: String,
    },
}
