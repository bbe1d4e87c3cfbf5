//! Domain-level error type.
//!
//! A missing issue or user is never an error: store mutations targeting an
//! unknown identifier are silent no-ops. Errors only describe a failing
//! storage backend, a value that could not be encoded, or an actor lacking
//! the admin role.

use thiserror::Error;

use super::ports::KeyValueStoreError;

/// Errors surfaced by [`crate::CivicStore`] and [`crate::AdminConsole`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum StoreError {
    /// The storage backend rejected a write or removal.
    #[error("storage backend failed: {source}")]
    Storage {
        /// Underlying adapter error.
        #[from]
        #[source]
        source: KeyValueStoreError,
    },

    /// A collection could not be serialised for storage.
    #[error("failed to encode entry '{key}': {message}")]
    Encode {
        /// Storage key being written.
        key: String,
        /// Serialiser error message.
        message: String,
    },

    /// The actor is not permitted to perform the operation.
    #[error("forbidden: {message}")]
    Forbidden {
        /// Human-readable reason.
        message: String,
    },
}

impl StoreError {
    /// Convenience constructor for [`StoreError::Forbidden`].
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }
}
