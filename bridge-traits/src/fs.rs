//! File System Bridge Contract
//!
//! Defines the capability surface the host platform must provide for device
//! file-system access: well-known directories, entry inspection, and the
//! create/read/write/copy/move/remove operations the smoke harness exercises.

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[cfg(test)]
use mockall::automock;

use crate::error::{BridgeError, Result};

/// Metadata for a file or directory entry.
///
/// `attributes` carries custom metadata set through
/// [`FileSystemBridge::set_attributes`]; conventional filesystem fields come
/// from the platform. Serializable so callers can render it as text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryMetadata {
    pub size: u64,
    pub created_at: Option<i64>,
    pub modified_at: Option<i64>,
    pub is_directory: bool,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub attributes: HashMap<String, serde_json::Value>,
}

/// File system bridge trait
///
/// Abstracts device file-system access to support different hosts:
/// - Desktop: direct filesystem access under a sandbox root
/// - Mobile shells: sandboxed app directories behind the native layer
///
/// Every entry is addressable two ways: a platform-native URL
/// (`file://...`) and a bridge-local URL meaningful only inside the bridge
/// sandbox.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::fs::FileSystemBridge;
///
/// async fn storage_has(fs: &dyn FileSystemBridge, name: &str) -> Result<bool> {
///     let storage = fs.storage_directory().await?;
///     fs.exists(&storage.join(name)).await
/// }
/// ```
#[cfg_attr(test, automock)]
#[async_trait]
pub trait FileSystemBridge: Send + Sync {
    /// Get the device download directory
    async fn download_directory(&self) -> Result<PathBuf>;

    /// Get the device music directory
    async fn music_directory(&self) -> Result<PathBuf>;

    /// Get the application storage directory
    ///
    /// This directory is suitable for files the application owns outright.
    async fn storage_directory(&self) -> Result<PathBuf>;

    /// Check if a file or directory exists
    async fn exists(&self, path: &Path) -> Result<bool>;

    /// Get metadata for a file or directory
    async fn metadata(&self, path: &Path) -> Result<EntryMetadata>;

    /// Merge custom metadata attributes into an entry
    ///
    /// Existing keys are overwritten; keys not named are left alone.
    async fn set_attributes(
        &self,
        path: &Path,
        attributes: HashMap<String, serde_json::Value>,
    ) -> Result<()>;

    /// Create a directory and all parent directories if they don't exist
    async fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// List all entries in a directory
    async fn list_directory(&self, path: &Path) -> Result<Vec<PathBuf>>;

    /// Delete a directory and all its contents
    async fn delete_dir_all(&self, path: &Path) -> Result<()>;

    /// Read entire file contents into memory
    async fn read_file(&self, path: &Path) -> Result<Bytes>;

    /// Write data to a file, creating it if it doesn't exist and truncating
    /// it if it does
    async fn write_file(&self, path: &Path, data: Bytes) -> Result<()>;

    /// Delete a file
    async fn delete_file(&self, path: &Path) -> Result<()>;

    /// Copy a file to a new location
    async fn copy_file(&self, from: &Path, to: &Path) -> Result<()>;

    /// Move or rename an entry, carrying its custom attributes along
    async fn rename(&self, from: &Path, to: &Path) -> Result<()>;

    /// Render the platform-native URL for a path
    fn native_url(&self, path: &Path) -> String;

    /// Render the bridge-local URL for a path
    ///
    /// Fails for paths outside the bridge sandbox.
    fn bridge_url(&self, path: &Path) -> Result<String>;

    /// Read a file's full contents as text
    async fn read_to_string(&self, path: &Path) -> Result<String> {
        let data = self.read_file(path).await?;
        String::from_utf8(data.to_vec())
            .map_err(|e| BridgeError::OperationFailed(format!("file is not valid UTF-8: {e}")))
    }
}
