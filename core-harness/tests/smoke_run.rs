//! End-to-end smoke run against the desktop bridge in a throwaway sandbox.

use bridge_desktop::SandboxFileSystem;
use bridge_traits::FileSystemBridge;
use bytes::Bytes;
use core_harness::{reset_fixtures, standard_suite, Panel, SuiteFixtures, TargetKind, TestRunner};
use core_runtime::events::{EventBus, HarnessEvent};
use core_runtime::Error;
use std::env;
use std::sync::Arc;
use uuid::Uuid;

fn sandbox_bridge() -> Arc<dyn FileSystemBridge> {
    let root = env::temp_dir().join(format!("fsmoke-harness-test-{}", Uuid::new_v4()));
    Arc::new(SandboxFileSystem::with_root(root))
}

/// Seed the sandbox so every case can pass: one download entry and the
/// fixture audio file.
async fn seed(bridge: &Arc<dyn FileSystemBridge>, fixtures: &SuiteFixtures) {
    let download = bridge.download_directory().await.unwrap();
    bridge
        .write_file(&download.join("sample.bin"), Bytes::from_static(b"sample"))
        .await
        .unwrap();

    let music = bridge.music_directory().await.unwrap();
    bridge
        .write_file(&music.join(&fixtures.audio_file), Bytes::from_static(b"ID3"))
        .await
        .unwrap();

    // The storage root must exist before the suite resolves it
    bridge.storage_directory().await.unwrap();
}

#[tokio::test]
async fn full_run_passes_with_seeded_sandbox() {
    let bridge = sandbox_bridge();
    let fixtures = SuiteFixtures::default();
    seed(&bridge, &fixtures).await;
    reset_fixtures(&bridge, &fixtures).await.unwrap();

    let suite = standard_suite(Arc::clone(&bridge), fixtures.clone()).unwrap();
    let panel = Panel::for_suite(&suite);
    let runner = TestRunner::new(suite, panel, EventBus::new(64)).unwrap();

    let summary = runner.run().await.unwrap();

    assert_eq!(summary.total, 14);
    assert_eq!(summary.failed, 0, "outcomes: {:?}", summary.outcomes);
    assert!(summary.all_passed());

    // The success markers keep their per-case casing
    assert_eq!(
        summary.outcome("write_file").unwrap().display_value(),
        "Success"
    );
    assert_eq!(
        summary.outcome("copy_file").unwrap().display_value(),
        "success"
    );

    // read_file sees exactly what write_file wrote
    assert_eq!(
        summary.outcome("read_file").unwrap().display_value(),
        "this is a success"
    );

    // read_metadata renders JSON carrying the written size
    let metadata_json = summary.outcome("read_metadata").unwrap().display_value();
    let metadata: serde_json::Value = serde_json::from_str(metadata_json).unwrap();
    assert_eq!(metadata["size"], 17);
    assert_eq!(metadata["is_directory"], false);

    // Media targets hold address strings
    assert!(summary
        .outcome("native_url_link")
        .unwrap()
        .display_value()
        .starts_with("file://"));
    assert!(summary
        .outcome("bridge_url_link")
        .unwrap()
        .display_value()
        .starts_with("fsb://localhost/"));
    assert!(summary
        .outcome("read_audio")
        .unwrap()
        .display_value()
        .ends_with(&fixtures.audio_file));

    // Filesystem state after the run: the test file was moved, the copy removed
    let storage = bridge.storage_directory().await.unwrap();
    assert!(!bridge.exists(&storage.join(&fixtures.test_file)).await.unwrap());
    assert!(!bridge
        .exists(&storage.join(&fixtures.copied_file))
        .await
        .unwrap());
    assert!(bridge.exists(&storage.join(&fixtures.moved_file)).await.unwrap());

    // set_metadata landed on the moved file
    let moved_metadata = bridge
        .metadata(&storage.join(&fixtures.moved_file))
        .await
        .unwrap();
    assert_eq!(
        moved_metadata.attributes.get("test"),
        Some(&serde_json::Value::Bool(true))
    );

    // The rendered panel reports every case
    let report = runner.report().unwrap();
    assert!(report.contains("list_directories"));
    assert!(report.contains("set_metadata"));
    assert!(!report.contains("(pending)"));
}

#[tokio::test]
async fn missing_audio_fixture_fails_only_that_case() {
    let bridge = sandbox_bridge();
    let fixtures = SuiteFixtures::default();

    // Seed the download entry but not the audio file
    let download = bridge.download_directory().await.unwrap();
    bridge
        .write_file(&download.join("sample.bin"), Bytes::from_static(b"sample"))
        .await
        .unwrap();
    bridge.music_directory().await.unwrap();
    bridge.storage_directory().await.unwrap();

    let suite = standard_suite(Arc::clone(&bridge), fixtures).unwrap();
    let panel = Panel::for_suite(&suite);
    let runner = TestRunner::new(suite, panel, EventBus::new(64)).unwrap();

    let summary = runner.run().await.unwrap();

    assert_eq!(summary.failed, 1);
    assert!(!summary.outcome("read_audio").unwrap().is_passed());
    // The sequence continued past the failure
    assert!(summary.outcome("bridge_url_link").unwrap().is_passed());
    assert!(summary.outcome("set_metadata").unwrap().is_passed());

    // The failure's display representation reached the panel
    let report = runner.report().unwrap();
    assert!(report.contains("No entry at"));
}

#[tokio::test]
async fn empty_download_directory_fails_listing_instead_of_hanging() {
    let bridge = sandbox_bridge();
    let fixtures = SuiteFixtures::default();
    bridge.download_directory().await.unwrap();
    bridge.music_directory().await.unwrap();
    bridge.storage_directory().await.unwrap();

    let suite = standard_suite(Arc::clone(&bridge), fixtures).unwrap();
    let panel = Panel::for_suite(&suite);
    let runner = TestRunner::new(suite, panel, EventBus::new(64)).unwrap();

    let summary = runner.run().await.unwrap();

    for name in ["list_directories", "native_url_link", "bridge_url_link"] {
        let outcome = summary.outcome(name).unwrap();
        assert!(!outcome.is_passed());
        assert!(outcome.display_value().contains("empty"));
    }
}

#[tokio::test]
async fn absent_target_halts_construction_naming_the_test() {
    let bridge = sandbox_bridge();
    let suite = standard_suite(Arc::clone(&bridge), SuiteFixtures::default()).unwrap();

    // A hand-built panel that forgot one target
    let mut panel = Panel::new();
    for case in suite.cases() {
        if case.name() != "read_metadata" {
            panel = panel.with_target(case.name(), case.target());
        }
    }

    let err = TestRunner::new(suite, panel, EventBus::new(64)).unwrap_err();
    assert!(matches!(err, Error::MissingTarget { ref test } if test == "read_metadata"));
}

#[tokio::test]
async fn readiness_signal_triggers_exactly_one_run() {
    let bridge = sandbox_bridge();
    let fixtures = SuiteFixtures::default();
    seed(&bridge, &fixtures).await;

    let suite = standard_suite(Arc::clone(&bridge), fixtures).unwrap();
    let panel = Panel::for_suite(&suite);
    let events = EventBus::new(64);
    let signals = events.subscribe();

    // The host fires readiness twice
    events.emit(HarnessEvent::DeviceReady).ok();
    events.emit(HarnessEvent::DeviceReady).ok();

    let runner = TestRunner::new(suite, panel, events.clone()).unwrap();
    let first = runner.run_on_ready(signals).await.unwrap();
    assert!(!first.skipped);

    // A later signal hits the latch
    let second = runner.run().await.unwrap();
    assert!(second.skipped);
}

#[tokio::test]
async fn reset_clears_leftover_fixtures() {
    let bridge = sandbox_bridge();
    let fixtures = SuiteFixtures::default();
    let storage = bridge.storage_directory().await.unwrap();

    bridge
        .write_file(&storage.join(&fixtures.moved_file), Bytes::from_static(b"old"))
        .await
        .unwrap();
    bridge
        .create_dir_all(&storage.join(&fixtures.test_directory))
        .await
        .unwrap();

    reset_fixtures(&bridge, &fixtures).await.unwrap();

    assert!(!bridge
        .exists(&storage.join(&fixtures.moved_file))
        .await
        .unwrap());
    assert!(!bridge
        .exists(&storage.join(&fixtures.test_directory))
        .await
        .unwrap());
}

#[tokio::test]
async fn panel_kinds_follow_suite_declarations() {
    let bridge = sandbox_bridge();
    let suite = standard_suite(Arc::clone(&bridge), SuiteFixtures::default()).unwrap();
    let panel = Panel::for_suite(&suite);

    assert_eq!(panel.len(), 14);
    assert_eq!(
        panel.target("read_audio").unwrap().kind(),
        TargetKind::Media
    );
    assert_eq!(panel.target("read_file").unwrap().kind(), TargetKind::Text);
}
