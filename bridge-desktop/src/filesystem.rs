//! File System Bridge Implementation using Tokio

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    fs::{EntryMetadata, FileSystemBridge},
};
use bytes::Bytes;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::RwLock;
use tracing::debug;

const DOWNLOAD_DIR: &str = "Download";
const MUSIC_DIR: &str = "Music";
const STORAGE_DIR: &str = "AppStorage";

/// Tokio-based sandboxed file system bridge
///
/// Provides async file I/O under a sandbox root:
/// - `tokio::fs` for async operations
/// - Well-known device directories created on demand
/// - Custom entry attributes held in a bridge-side table, since conventional
///   filesystems carry no portable custom metadata
pub struct SandboxFileSystem {
    root: PathBuf,
    attributes: RwLock<HashMap<PathBuf, HashMap<String, serde_json::Value>>>,
}

impl SandboxFileSystem {
    /// Create a new bridge rooted in the default sandbox location
    pub fn new() -> Self {
        let root = dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("fsmoke-sandbox");

        Self::with_root(root)
    }

    /// Create a new bridge rooted at a custom sandbox directory
    pub fn with_root(root: PathBuf) -> Self {
        Self {
            root,
            attributes: RwLock::new(HashMap::new()),
        }
    }

    /// The sandbox root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Convert std::io::Error to BridgeError
    fn map_io_error(e: std::io::Error) -> BridgeError {
        BridgeError::Io(e)
    }

    async fn ensure_dir(&self, name: &str) -> Result<PathBuf> {
        let path = self.root.join(name);
        if !path.exists() {
            fs::create_dir_all(&path).await.map_err(Self::map_io_error)?;
            debug!(path = ?path, "Created well-known directory");
        }
        Ok(path)
    }
}

impl Default for SandboxFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FileSystemBridge for SandboxFileSystem {
    async fn download_directory(&self) -> Result<PathBuf> {
        self.ensure_dir(DOWNLOAD_DIR).await
    }

    async fn music_directory(&self) -> Result<PathBuf> {
        self.ensure_dir(MUSIC_DIR).await
    }

    async fn storage_directory(&self) -> Result<PathBuf> {
        self.ensure_dir(STORAGE_DIR).await
    }

    async fn exists(&self, path: &Path) -> Result<bool> {
        Ok(fs::try_exists(path).await.map_err(Self::map_io_error)?)
    }

    async fn metadata(&self, path: &Path) -> Result<EntryMetadata> {
        let metadata = fs::metadata(path).await.map_err(Self::map_io_error)?;

        let attributes = self
            .attributes
            .read()
            .await
            .get(path)
            .cloned()
            .unwrap_or_default();

        Ok(EntryMetadata {
            size: metadata.len(),
            created_at: metadata
                .created()
                .ok()
                .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
                .map(|d| d.as_secs() as i64),
            modified_at: metadata
                .modified()
                .ok()
                .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
                .map(|d| d.as_secs() as i64),
            is_directory: metadata.is_dir(),
            attributes,
        })
    }

    async fn set_attributes(
        &self,
        path: &Path,
        attributes: HashMap<String, serde_json::Value>,
    ) -> Result<()> {
        if !fs::try_exists(path).await.map_err(Self::map_io_error)? {
            return Err(BridgeError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let mut table = self.attributes.write().await;
        table
            .entry(path.to_path_buf())
            .or_default()
            .extend(attributes);
        debug!(path = ?path, "Set custom attributes");
        Ok(())
    }

    async fn create_dir_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).await.map_err(Self::map_io_error)?;
        debug!(path = ?path, "Created directory");
        Ok(())
    }

    async fn list_directory(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let mut entries = Vec::new();
        let mut read_dir = fs::read_dir(path).await.map_err(Self::map_io_error)?;

        while let Some(entry) = read_dir.next_entry().await.map_err(Self::map_io_error)? {
            entries.push(entry.path());
        }

        debug!(path = ?path, count = entries.len(), "Listed directory");
        Ok(entries)
    }

    async fn delete_dir_all(&self, path: &Path) -> Result<()> {
        fs::remove_dir_all(path).await.map_err(Self::map_io_error)?;

        let mut table = self.attributes.write().await;
        table.retain(|entry, _| !entry.starts_with(path));
        debug!(path = ?path, "Deleted directory");
        Ok(())
    }

    async fn read_file(&self, path: &Path) -> Result<Bytes> {
        let data = fs::read(path).await.map_err(Self::map_io_error)?;
        debug!(path = ?path, size = data.len(), "Read file");
        Ok(Bytes::from(data))
    }

    async fn write_file(&self, path: &Path, data: Bytes) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(Self::map_io_error)?;
        }

        fs::write(path, data.as_ref())
            .await
            .map_err(Self::map_io_error)?;
        debug!(path = ?path, size = data.len(), "Wrote file");
        Ok(())
    }

    async fn delete_file(&self, path: &Path) -> Result<()> {
        fs::remove_file(path).await.map_err(Self::map_io_error)?;

        let mut table = self.attributes.write().await;
        table.remove(path);
        debug!(path = ?path, "Deleted file");
        Ok(())
    }

    async fn copy_file(&self, from: &Path, to: &Path) -> Result<()> {
        // Attributes are not carried over: the copy is a new entry.
        fs::copy(from, to).await.map_err(Self::map_io_error)?;
        debug!(from = ?from, to = ?to, "Copied file");
        Ok(())
    }

    async fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        fs::rename(from, to).await.map_err(Self::map_io_error)?;

        let mut table = self.attributes.write().await;
        if let Some(attrs) = table.remove(from) {
            table.insert(to.to_path_buf(), attrs);
        }
        debug!(from = ?from, to = ?to, "Moved entry");
        Ok(())
    }

    fn native_url(&self, path: &Path) -> String {
        format!("file://{}", path.display())
    }

    fn bridge_url(&self, path: &Path) -> Result<String> {
        let relative = path
            .strip_prefix(&self.root)
            .map_err(|_| BridgeError::OutsideSandbox {
                path: path.to_path_buf(),
            })?;
        Ok(format!("fsb://localhost/{}", relative.display()))
    }
}
