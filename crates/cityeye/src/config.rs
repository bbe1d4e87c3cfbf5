//! Store settings loaded via OrthoConfig.

use std::path::{Path, PathBuf};

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::{DEFAULT_NAMESPACE, StorageKeys};

/// Configuration selecting where and under which keys the store persists.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CITYEYE")]
pub struct StoreSettings {
    /// Directory for file-backed storage. The CLI refuses store commands
    /// while this is unset.
    pub data_dir: Option<PathBuf>,
    /// Prefix applied to every storage key.
    #[ortho_config(default = DEFAULT_NAMESPACE.to_owned())]
    pub namespace: String,
}

impl StoreSettings {
    /// Return the configured namespace, falling back to the default.
    pub fn namespace(&self) -> &str {
        if self.namespace.trim().is_empty() {
            DEFAULT_NAMESPACE
        } else {
            self.namespace.as_str()
        }
    }

    /// Storage keys derived from [`Self::namespace`].
    pub fn storage_keys(&self) -> StorageKeys {
        StorageKeys::with_namespace(self.namespace())
    }

    /// Configured data directory, if any.
    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }
}
