//! Port for the string key-value storage the civic store persists into.
//!
//! The [`KeyValueStore`] trait mirrors the browser local-storage surface the
//! demo was built around: whole values are read and written by key, with no
//! transactions, compare-and-swap or change notification. Adapters live in
//! [`crate::outbound`].

use super::define_port_error;

define_port_error! {
    /// Errors raised by key-value storage adapters.
    pub enum KeyValueStoreError {
        /// The entry exists but could not be read.
        Read {
            /// Storage key.
            key: String,
            /// Adapter-specific cause.
            message: String,
        } => "failed to read entry '{key}': {message}",
        /// The entry could not be written.
        Write {
            /// Storage key.
            key: String,
            /// Adapter-specific cause.
            message: String,
        } => "failed to write entry '{key}': {message}",
        /// The entry could not be removed.
        Remove {
            /// Storage key.
            key: String,
            /// Adapter-specific cause.
            message: String,
        } => "failed to remove entry '{key}': {message}",
        /// The key cannot be mapped onto the adapter's namespace.
        InvalidKey {
            /// Rejected key.
            key: String,
        } => "invalid storage key '{key}'",
    }
}

/// String key-value storage scoped to a single profile.
///
/// Implementations synchronise individual calls only. A caller doing
/// `get` followed by `set` can lose a concurrent writer's update, and the
/// civic store accepts that.
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStore: Send + Sync {
    /// Fetch the value stored under `key`, or `None` when absent.
    fn get(&self, key: &str) -> Result<Option<String>, KeyValueStoreError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), KeyValueStoreError>;

    /// Remove the value under `key`. Removing an absent key succeeds.
    fn remove(&self, key: &str) -> Result<(), KeyValueStoreError>;
}
