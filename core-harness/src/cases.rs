//! # Standard Smoke Suite
//!
//! The fixed sequence of test cases exercising the device file-system
//! bridge: listing, creating, deleting, reading, writing, copying, moving,
//! and metadata get/set.
//!
//! The cases carry a hidden data dependency through the bridge filesystem:
//! `write_file` produces the file that `read_file`, `read_metadata`,
//! `get_parent`, `copy_file`, and `move_file` consume, `remove_file` deletes
//! the copy, and `set_metadata` tags the moved file. Declaration order is
//! execution order; reordering breaks the run.

use bridge_traits::error::{BridgeError, Result};
use bridge_traits::{DirectoryEntry, DirectoryHandle, FileSystemBridge};
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::Arc;

use crate::panel::TargetKind;
use crate::suite::{TestCase, TestSuite};

/// Fixed names shared by the dependent cases.
///
/// Override the defaults to point the suite at different fixtures.
#[derive(Debug, Clone)]
pub struct SuiteFixtures {
    /// Directory created then recursively deleted under app storage
    pub test_directory: String,
    /// Text file written, read, copied, and moved under app storage
    pub test_file: String,
    /// Name the test file is copied to
    pub copied_file: String,
    /// Name the test file is moved to
    pub moved_file: String,
    /// Audio file expected in the music directory
    pub audio_file: String,
    /// Content written into the test file
    pub file_content: String,
    /// Custom metadata key set on the moved file
    pub metadata_key: String,
}

impl Default for SuiteFixtures {
    fn default() -> Self {
        Self {
            test_directory: "testDirectory".to_string(),
            test_file: "testFile.txt".to_string(),
            copied_file: "copiedFile.txt".to_string(),
            moved_file: "movedFile.txt".to_string(),
            audio_file: "Beautiful-Japanese-Piano.mp3".to_string(),
            file_content: "this is a success".to_string(),
            metadata_key: "test".to_string(),
        }
    }
}

async fn download_handle(bridge: &Arc<dyn FileSystemBridge>) -> Result<DirectoryHandle> {
    let download = bridge.download_directory().await?;
    DirectoryHandle::resolve(Arc::clone(bridge), download).await
}

async fn music_handle(bridge: &Arc<dyn FileSystemBridge>) -> Result<DirectoryHandle> {
    let music = bridge.music_directory().await?;
    DirectoryHandle::resolve(Arc::clone(bridge), music).await
}

async fn storage_handle(bridge: &Arc<dyn FileSystemBridge>) -> Result<DirectoryHandle> {
    let storage = bridge.storage_directory().await?;
    DirectoryHandle::resolve(Arc::clone(bridge), storage).await
}

async fn first_download_entry(bridge: &Arc<dyn FileSystemBridge>) -> Result<DirectoryEntry> {
    let dir = download_handle(bridge).await?;
    let mut entries = dir.entries().await?;
    if entries.is_empty() {
        return Err(BridgeError::OperationFailed(
            "download directory is empty".to_string(),
        ));
    }
    Ok(entries.remove(0))
}

async fn list_directories(bridge: Arc<dyn FileSystemBridge>) -> Result<String> {
    let entries = download_handle(&bridge).await?.entries().await?;
    if entries.is_empty() {
        return Err(BridgeError::OperationFailed(
            "download directory is empty".to_string(),
        ));
    }
    Ok("Success".to_string())
}

async fn create_directory(
    bridge: Arc<dyn FileSystemBridge>,
    fixtures: Arc<SuiteFixtures>,
) -> Result<String> {
    let storage = storage_handle(&bridge).await?;
    storage.directory(&fixtures.test_directory, true).await?;
    Ok("Success".to_string())
}

async fn recursive_delete(
    bridge: Arc<dyn FileSystemBridge>,
    fixtures: Arc<SuiteFixtures>,
) -> Result<String> {
    let storage = storage_handle(&bridge).await?;
    let dir = storage.directory(&fixtures.test_directory, false).await?;
    dir.remove_recursively().await?;
    Ok("Success".to_string())
}

async fn native_url_link(bridge: Arc<dyn FileSystemBridge>) -> Result<String> {
    let entry = first_download_entry(&bridge).await?;
    Ok(entry.native_url())
}

async fn read_audio(
    bridge: Arc<dyn FileSystemBridge>,
    fixtures: Arc<SuiteFixtures>,
) -> Result<String> {
    let music = music_handle(&bridge).await?;
    let file = music.file(&fixtures.audio_file, false).await?;
    Ok(file.native_url())
}

async fn bridge_url_link(bridge: Arc<dyn FileSystemBridge>) -> Result<String> {
    let entry = first_download_entry(&bridge).await?;
    entry.bridge_url()
}

async fn write_file(
    bridge: Arc<dyn FileSystemBridge>,
    fixtures: Arc<SuiteFixtures>,
) -> Result<String> {
    let storage = storage_handle(&bridge).await?;
    let file = storage.file(&fixtures.test_file, true).await?;
    file.write(Bytes::from(fixtures.file_content.clone())).await?;
    Ok("Success".to_string())
}

async fn read_file(
    bridge: Arc<dyn FileSystemBridge>,
    fixtures: Arc<SuiteFixtures>,
) -> Result<String> {
    let storage = storage_handle(&bridge).await?;
    let file = storage.file(&fixtures.test_file, false).await?;
    file.read_text().await
}

async fn read_metadata(
    bridge: Arc<dyn FileSystemBridge>,
    fixtures: Arc<SuiteFixtures>,
) -> Result<String> {
    let storage = storage_handle(&bridge).await?;
    let file = storage.file(&fixtures.test_file, false).await?;
    let metadata = file.metadata().await?;
    serde_json::to_string(&metadata)
        .map_err(|e| BridgeError::OperationFailed(format!("metadata serialization failed: {e}")))
}

async fn get_parent(
    bridge: Arc<dyn FileSystemBridge>,
    fixtures: Arc<SuiteFixtures>,
) -> Result<String> {
    let storage = storage_handle(&bridge).await?;
    let file = storage.file(&fixtures.test_file, false).await?;
    file.parent().await?;
    Ok("success".to_string())
}

async fn copy_file(
    bridge: Arc<dyn FileSystemBridge>,
    fixtures: Arc<SuiteFixtures>,
) -> Result<String> {
    let storage = storage_handle(&bridge).await?;
    let file = storage.file(&fixtures.test_file, false).await?;
    let parent = file.parent().await?;
    file.copy_to(&parent, &fixtures.copied_file).await?;
    Ok("success".to_string())
}

async fn move_file(
    bridge: Arc<dyn FileSystemBridge>,
    fixtures: Arc<SuiteFixtures>,
) -> Result<String> {
    let storage = storage_handle(&bridge).await?;
    let file = storage.file(&fixtures.test_file, false).await?;
    let parent = file.parent().await?;
    file.move_to(&parent, &fixtures.moved_file).await?;
    Ok("success".to_string())
}

async fn remove_file(
    bridge: Arc<dyn FileSystemBridge>,
    fixtures: Arc<SuiteFixtures>,
) -> Result<String> {
    let storage = storage_handle(&bridge).await?;
    let file = storage.file(&fixtures.copied_file, false).await?;
    file.remove().await?;
    Ok("success".to_string())
}

async fn set_metadata(
    bridge: Arc<dyn FileSystemBridge>,
    fixtures: Arc<SuiteFixtures>,
) -> Result<String> {
    let storage = storage_handle(&bridge).await?;
    let file = storage.file(&fixtures.moved_file, false).await?;

    let mut attributes = HashMap::new();
    attributes.insert(
        fixtures.metadata_key.clone(),
        serde_json::Value::Bool(true),
    );
    file.set_metadata(attributes).await?;
    Ok("success".to_string())
}

/// Build the standard suite against a bridge.
///
/// Case order is load-bearing; see the module docs.
pub fn standard_suite(
    bridge: Arc<dyn FileSystemBridge>,
    fixtures: SuiteFixtures,
) -> core_runtime::Result<TestSuite> {
    let fixtures = Arc::new(fixtures);

    // Each closure owns its clones so the stored operations stay 'static.
    macro_rules! bridge_case {
        ($name:literal, $kind:expr, $op:ident) => {{
            let bridge = Arc::clone(&bridge);
            TestCase::new($name, $kind, move || $op(Arc::clone(&bridge)))
        }};
        ($name:literal, $kind:expr, $op:ident, fixtures) => {{
            let bridge = Arc::clone(&bridge);
            let fixtures = Arc::clone(&fixtures);
            TestCase::new($name, $kind, move || {
                $op(Arc::clone(&bridge), Arc::clone(&fixtures))
            })
        }};
    }

    TestSuite::new(vec![
        bridge_case!("list_directories", TargetKind::Text, list_directories),
        bridge_case!("create_directory", TargetKind::Text, create_directory, fixtures),
        bridge_case!("recursive_delete", TargetKind::Text, recursive_delete, fixtures),
        bridge_case!("native_url_link", TargetKind::Media, native_url_link),
        bridge_case!("read_audio", TargetKind::Media, read_audio, fixtures),
        bridge_case!("bridge_url_link", TargetKind::Media, bridge_url_link),
        bridge_case!("write_file", TargetKind::Text, write_file, fixtures),
        bridge_case!("read_file", TargetKind::Text, read_file, fixtures),
        bridge_case!("read_metadata", TargetKind::Text, read_metadata, fixtures),
        bridge_case!("get_parent", TargetKind::Text, get_parent, fixtures),
        bridge_case!("copy_file", TargetKind::Text, copy_file, fixtures),
        bridge_case!("move_file", TargetKind::Text, move_file, fixtures),
        bridge_case!("remove_file", TargetKind::Text, remove_file, fixtures),
        bridge_case!("set_metadata", TargetKind::Text, set_metadata, fixtures),
    ])
}

/// Delete the fixture files and directory so a run starts from a known state.
///
/// Safe to call on a fresh sandbox; missing fixtures are skipped.
pub async fn reset_fixtures(
    bridge: &Arc<dyn FileSystemBridge>,
    fixtures: &SuiteFixtures,
) -> Result<()> {
    let storage = bridge.storage_directory().await?;

    for name in [
        &fixtures.test_file,
        &fixtures.copied_file,
        &fixtures.moved_file,
    ] {
        let path = storage.join(name);
        if bridge.exists(&path).await? {
            bridge.delete_file(&path).await?;
        }
    }

    let dir = storage.join(&fixtures.test_directory);
    if bridge.exists(&dir).await? {
        bridge.delete_dir_all(&dir).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::fs::EntryMetadata;
    use std::path::{Path, PathBuf};

    // Never executed; the tests below only inspect the suite table.
    struct NullBridge;

    #[async_trait]
    impl FileSystemBridge for NullBridge {
        async fn download_directory(&self) -> Result<PathBuf> {
            Err(BridgeError::OperationFailed("not wired".to_string()))
        }

        async fn music_directory(&self) -> Result<PathBuf> {
            Err(BridgeError::OperationFailed("not wired".to_string()))
        }

        async fn storage_directory(&self) -> Result<PathBuf> {
            Err(BridgeError::OperationFailed("not wired".to_string()))
        }

        async fn exists(&self, _path: &Path) -> Result<bool> {
            Err(BridgeError::OperationFailed("not wired".to_string()))
        }

        async fn metadata(&self, _path: &Path) -> Result<EntryMetadata> {
            Err(BridgeError::OperationFailed("not wired".to_string()))
        }

        async fn set_attributes(
            &self,
            _path: &Path,
            _attributes: HashMap<String, serde_json::Value>,
        ) -> Result<()> {
            Err(BridgeError::OperationFailed("not wired".to_string()))
        }

        async fn create_dir_all(&self, _path: &Path) -> Result<()> {
            Err(BridgeError::OperationFailed("not wired".to_string()))
        }

        async fn list_directory(&self, _path: &Path) -> Result<Vec<PathBuf>> {
            Err(BridgeError::OperationFailed("not wired".to_string()))
        }

        async fn delete_dir_all(&self, _path: &Path) -> Result<()> {
            Err(BridgeError::OperationFailed("not wired".to_string()))
        }

        async fn read_file(&self, _path: &Path) -> Result<Bytes> {
            Err(BridgeError::OperationFailed("not wired".to_string()))
        }

        async fn write_file(&self, _path: &Path, _data: Bytes) -> Result<()> {
            Err(BridgeError::OperationFailed("not wired".to_string()))
        }

        async fn delete_file(&self, _path: &Path) -> Result<()> {
            Err(BridgeError::OperationFailed("not wired".to_string()))
        }

        async fn copy_file(&self, _from: &Path, _to: &Path) -> Result<()> {
            Err(BridgeError::OperationFailed("not wired".to_string()))
        }

        async fn rename(&self, _from: &Path, _to: &Path) -> Result<()> {
            Err(BridgeError::OperationFailed("not wired".to_string()))
        }

        fn native_url(&self, path: &Path) -> String {
            format!("file://{}", path.display())
        }

        fn bridge_url(&self, _path: &Path) -> Result<String> {
            Err(BridgeError::OperationFailed("not wired".to_string()))
        }
    }

    #[test]
    fn test_fixture_defaults() {
        let fixtures = SuiteFixtures::default();
        assert_eq!(fixtures.test_directory, "testDirectory");
        assert_eq!(fixtures.test_file, "testFile.txt");
        assert_eq!(fixtures.copied_file, "copiedFile.txt");
        assert_eq!(fixtures.moved_file, "movedFile.txt");
        assert_eq!(fixtures.file_content, "this is a success");
        assert_eq!(fixtures.metadata_key, "test");
    }

    #[test]
    fn test_standard_suite_order() {
        let bridge: Arc<dyn FileSystemBridge> = Arc::new(NullBridge);
        let suite = standard_suite(bridge, SuiteFixtures::default()).unwrap();

        assert_eq!(
            suite.names(),
            vec![
                "list_directories",
                "create_directory",
                "recursive_delete",
                "native_url_link",
                "read_audio",
                "bridge_url_link",
                "write_file",
                "read_file",
                "read_metadata",
                "get_parent",
                "copy_file",
                "move_file",
                "remove_file",
                "set_metadata",
            ]
        );
    }

    #[test]
    fn test_standard_suite_target_kinds() {
        let bridge: Arc<dyn FileSystemBridge> = Arc::new(NullBridge);
        let suite = standard_suite(bridge, SuiteFixtures::default()).unwrap();

        for case in suite.cases() {
            let expected = match case.name() {
                "native_url_link" | "read_audio" | "bridge_url_link" => TargetKind::Media,
                _ => TargetKind::Text,
            };
            assert_eq!(case.target(), expected, "kind mismatch for {}", case.name());
        }
    }
}
