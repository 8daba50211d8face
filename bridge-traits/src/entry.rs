//! Entry Handle Layer
//!
//! Typed handles over the flat [`FileSystemBridge`] trait. Resolving an
//! address yields a [`DirectoryHandle`] or [`FileHandle`] that carries the
//! bridge reference along, so callers can walk from a well-known directory to
//! the individual entry operations without re-stating paths.

use bytes::Bytes;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{BridgeError, Result};
use crate::fs::{EntryMetadata, FileSystemBridge};

fn entry_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Handle to a directory inside the bridge sandbox.
#[derive(Clone)]
pub struct DirectoryHandle {
    bridge: Arc<dyn FileSystemBridge>,
    path: PathBuf,
}

impl DirectoryHandle {
    /// Resolve a directory address to a handle.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::NotFound`] if nothing exists at the address and
    /// [`BridgeError::NotADirectory`] if the entry is a file.
    pub async fn resolve(
        bridge: Arc<dyn FileSystemBridge>,
        path: impl Into<PathBuf>,
    ) -> Result<Self> {
        let path = path.into();
        if !bridge.exists(&path).await? {
            return Err(BridgeError::NotFound { path });
        }
        let metadata = bridge.metadata(&path).await?;
        if !metadata.is_directory {
            return Err(BridgeError::NotADirectory { path });
        }
        Ok(Self { bridge, path })
    }

    /// The directory's name (final path component)
    pub fn name(&self) -> String {
        entry_name(&self.path)
    }

    /// The directory's location on the bridge filesystem
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Platform-native URL for this directory
    pub fn native_url(&self) -> String {
        self.bridge.native_url(&self.path)
    }

    /// Bridge-local URL for this directory
    pub fn bridge_url(&self) -> Result<String> {
        self.bridge.bridge_url(&self.path)
    }

    /// Enumerate the directory's entries, in platform order
    pub async fn entries(&self) -> Result<Vec<DirectoryEntry>> {
        let paths = self.bridge.list_directory(&self.path).await?;
        let mut entries = Vec::with_capacity(paths.len());
        for path in paths {
            let metadata = self.bridge.metadata(&path).await?;
            let handle_bridge = Arc::clone(&self.bridge);
            if metadata.is_directory {
                entries.push(DirectoryEntry::Directory(DirectoryHandle {
                    bridge: handle_bridge,
                    path,
                }));
            } else {
                entries.push(DirectoryEntry::File(FileHandle {
                    bridge: handle_bridge,
                    path,
                }));
            }
        }
        Ok(entries)
    }

    /// Get a child file handle, optionally creating an empty file
    ///
    /// With `create` set, a missing file is created empty; an existing file
    /// is left untouched. Without it, a missing file is
    /// [`BridgeError::NotFound`].
    pub async fn file(&self, name: &str, create: bool) -> Result<FileHandle> {
        let path = self.path.join(name);
        if self.bridge.exists(&path).await? {
            let metadata = self.bridge.metadata(&path).await?;
            if metadata.is_directory {
                return Err(BridgeError::NotAFile { path });
            }
        } else if create {
            self.bridge.write_file(&path, Bytes::new()).await?;
        } else {
            return Err(BridgeError::NotFound { path });
        }
        Ok(FileHandle {
            bridge: Arc::clone(&self.bridge),
            path,
        })
    }

    /// Get a child directory handle, optionally creating the directory
    ///
    /// Creation is idempotent: an already-existing directory is not an error.
    pub async fn directory(&self, name: &str, create: bool) -> Result<DirectoryHandle> {
        let path = self.path.join(name);
        if self.bridge.exists(&path).await? {
            let metadata = self.bridge.metadata(&path).await?;
            if !metadata.is_directory {
                return Err(BridgeError::NotADirectory { path });
            }
        } else if create {
            self.bridge.create_dir_all(&path).await?;
        } else {
            return Err(BridgeError::NotFound { path });
        }
        Ok(DirectoryHandle {
            bridge: Arc::clone(&self.bridge),
            path,
        })
    }

    /// Remove this directory and all of its contents
    pub async fn remove_recursively(self) -> Result<()> {
        self.bridge.delete_dir_all(&self.path).await
    }
}

impl fmt::Debug for DirectoryHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectoryHandle")
            .field("path", &self.path)
            .finish()
    }
}

/// Handle to a file inside the bridge sandbox.
#[derive(Clone)]
pub struct FileHandle {
    bridge: Arc<dyn FileSystemBridge>,
    path: PathBuf,
}

impl FileHandle {
    /// The file's name (final path component)
    pub fn name(&self) -> String {
        entry_name(&self.path)
    }

    /// The file's location on the bridge filesystem
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Platform-native URL for this file
    pub fn native_url(&self) -> String {
        self.bridge.native_url(&self.path)
    }

    /// Bridge-local URL for this file
    pub fn bridge_url(&self) -> Result<String> {
        self.bridge.bridge_url(&self.path)
    }

    /// Read the file's full contents as text
    pub async fn read_text(&self) -> Result<String> {
        self.bridge.read_to_string(&self.path).await
    }

    /// Replace the file's contents
    pub async fn write(&self, data: Bytes) -> Result<()> {
        self.bridge.write_file(&self.path, data).await
    }

    /// Get the file's metadata
    pub async fn metadata(&self) -> Result<EntryMetadata> {
        self.bridge.metadata(&self.path).await
    }

    /// Merge custom metadata attributes into the file
    pub async fn set_metadata(
        &self,
        attributes: HashMap<String, serde_json::Value>,
    ) -> Result<()> {
        self.bridge.set_attributes(&self.path, attributes).await
    }

    /// Resolve the file's parent directory
    pub async fn parent(&self) -> Result<DirectoryHandle> {
        let parent = self.path.parent().ok_or_else(|| {
            BridgeError::OperationFailed(format!(
                "{} has no parent directory",
                self.path.display()
            ))
        })?;
        DirectoryHandle::resolve(Arc::clone(&self.bridge), parent).await
    }

    /// Copy this file into a directory under a new name
    pub async fn copy_to(&self, parent: &DirectoryHandle, name: &str) -> Result<FileHandle> {
        let dest = parent.path().join(name);
        self.bridge.copy_file(&self.path, &dest).await?;
        Ok(FileHandle {
            bridge: Arc::clone(&self.bridge),
            path: dest,
        })
    }

    /// Move this file into a directory under a new name
    pub async fn move_to(&self, parent: &DirectoryHandle, name: &str) -> Result<FileHandle> {
        let dest = parent.path().join(name);
        self.bridge.rename(&self.path, &dest).await?;
        Ok(FileHandle {
            bridge: Arc::clone(&self.bridge),
            path: dest,
        })
    }

    /// Delete this file
    pub async fn remove(self) -> Result<()> {
        self.bridge.delete_file(&self.path).await
    }
}

impl fmt::Debug for FileHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileHandle").field("path", &self.path).finish()
    }
}

/// A directory entry: a file or a nested directory.
#[derive(Debug, Clone)]
pub enum DirectoryEntry {
    File(FileHandle),
    Directory(DirectoryHandle),
}

impl DirectoryEntry {
    pub fn name(&self) -> String {
        match self {
            DirectoryEntry::File(f) => f.name(),
            DirectoryEntry::Directory(d) => d.name(),
        }
    }

    pub fn native_url(&self) -> String {
        match self {
            DirectoryEntry::File(f) => f.native_url(),
            DirectoryEntry::Directory(d) => d.native_url(),
        }
    }

    pub fn bridge_url(&self) -> Result<String> {
        match self {
            DirectoryEntry::File(f) => f.bridge_url(),
            DirectoryEntry::Directory(d) => d.bridge_url(),
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, DirectoryEntry::File(_))
    }
}
