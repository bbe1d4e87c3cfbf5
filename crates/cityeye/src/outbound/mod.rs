//! Outbound adapters implementing [`crate::domain::ports::KeyValueStore`].
//!
//! - [`InMemoryKeyValueStore`] keeps entries in process memory.
//! - [`FileKeyValueStore`] keeps one JSON file per key under a data
//!   directory and replaces files atomically.

mod atomic_io;
mod file;
mod memory;

pub use file::FileKeyValueStore;
pub use memory::InMemoryKeyValueStore;
