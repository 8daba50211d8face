//! Runs the standard smoke suite against a desktop sandbox and prints the
//! rendered panel.
//!
//! ```sh
//! cargo run -p core-harness --example device_smoke
//! ```

use bridge_desktop::SandboxFileSystem;
use bridge_traits::FileSystemBridge;
use bytes::Bytes;
use core_harness::{reset_fixtures, standard_suite, Panel, SuiteFixtures, TestRunner};
use core_runtime::events::{EventBus, HarnessEvent};
use core_runtime::logging::{init_logging, LoggingConfig};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default())?;

    let bridge: Arc<dyn FileSystemBridge> = Arc::new(SandboxFileSystem::new());
    let fixtures = SuiteFixtures::default();

    // Seed the sandbox so the listing and audio cases have something to find
    let download = bridge.download_directory().await?;
    bridge
        .write_file(&download.join("sample.bin"), Bytes::from_static(b"sample"))
        .await?;
    let music = bridge.music_directory().await?;
    bridge
        .write_file(&music.join(&fixtures.audio_file), Bytes::from_static(b"ID3"))
        .await?;
    bridge.storage_directory().await?;

    reset_fixtures(&bridge, &fixtures).await?;

    let suite = standard_suite(Arc::clone(&bridge), fixtures)?;
    let panel = Panel::for_suite(&suite);
    let events = EventBus::default();
    let signals = events.subscribe();
    let runner = TestRunner::new(suite, panel, events.clone())?;

    // Stand-in for the host shell's readiness signal
    events.emit(HarnessEvent::DeviceReady).ok();

    let summary = runner.run_on_ready(signals).await?;

    println!("{}", runner.report()?);
    println!(
        "passed {}/{} in {} ms",
        summary.passed, summary.total, summary.duration_ms
    );

    Ok(())
}
