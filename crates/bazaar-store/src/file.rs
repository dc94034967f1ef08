//! # File Storage Adapter
//!
//! On-device persistence: one JSON document per storage key.
//!
//! ## Layout
//! ```text
//! <data dir>/
//! ├── bazaar.cart.json
//! ├── bazaar.wishlist.json
//! ├── bazaar.addresses.json
//! └── bazaar.theme.json
//! ```
//!
//! Writes are atomic (temp file + rename), so a crash mid-save leaves
//! the previous document intact rather than a truncated one.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::error::StoreResult;
use crate::storage::StorageAdapter;

// =============================================================================
// Default Paths
// =============================================================================

/// Returns the default data directory.
///
/// - macOS: `~/Library/Application Support/bazaar`
/// - Linux: `~/.local/share/bazaar`
/// - Windows: `%APPDATA%\bazaar`
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("bazaar"))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Maps a storage key to a file name.
///
/// Keys are dot-separated identifiers; anything outside
/// `[A-Za-z0-9._-]` is replaced so a key can never escape the data
/// directory.
fn file_name_for_key(key: &str) -> String {
    let safe: String = key
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{safe}.json")
}

// =============================================================================
// File Adapter
// =============================================================================

/// Storage adapter writing one JSON document per key.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Creates an adapter rooted at the given directory.
    ///
    /// The directory is created on the first write, not here.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FileStorage { root: root.into() }
    }

    /// Creates an adapter rooted at the platform data directory.
    pub fn with_default_dir() -> Self {
        FileStorage::new(default_data_dir())
    }

    /// Returns the directory this adapter writes into.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for_key(&self, key: &str) -> PathBuf {
        self.root.join(file_name_for_key(key))
    }
}

#[async_trait]
impl StorageAdapter for FileStorage {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let path = self.path_for_key(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(payload) => {
                debug!(key = %key, path = %path.display(), "file storage read");
                Ok(Some(payload))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let path = self.path_for_key(key);
        tokio::fs::create_dir_all(&self.root).await?;

        // Write atomically (write to temp file, then rename)
        let temp_path = path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, value).await?;
        tokio::fs::rename(&temp_path, &path).await?;

        debug!(key = %key, path = %path.display(), bytes = value.len(), "file storage write");
        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        let path = self.path_for_key(key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!(key = %key, path = %path.display(), "file storage remove");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
