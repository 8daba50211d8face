//! # Smoke Harness Core
//!
//! Manual smoke-test harness for device file-system access behind a host
//! bridge.
//!
//! ## Overview
//!
//! The harness owns a fixed, ordered sequence of named asynchronous test
//! cases ([`TestSuite`]), runs them strictly in sequence once the host
//! signals readiness, and renders each outcome into an output target keyed
//! by the case's name ([`Panel`]). A case failure is logged and displayed
//! but never aborts the run; a missing output target halts it, since that
//! means the harness itself is misconfigured.
//!
//! ## Usage
//!
//! ```ignore
//! use core_harness::{standard_suite, Panel, SuiteFixtures, TestRunner};
//! use core_runtime::events::{EventBus, HarnessEvent};
//! use std::sync::Arc;
//!
//! # async fn run(bridge: Arc<dyn bridge_traits::FileSystemBridge>) -> core_runtime::Result<()> {
//! let suite = standard_suite(bridge, SuiteFixtures::default())?;
//! let panel = Panel::for_suite(&suite);
//! let events = EventBus::default();
//!
//! let signals = events.subscribe();
//! let runner = TestRunner::new(suite, panel, events.clone())?;
//! events.emit(HarnessEvent::DeviceReady).ok();
//!
//! let summary = runner.run_on_ready(signals).await?;
//! println!("{}", runner.report()?);
//! println!("passed {}/{}", summary.passed, summary.total);
//! # Ok(())
//! # }
//! ```

pub mod cases;
pub mod outcome;
pub mod panel;
pub mod runner;
pub mod suite;

pub use cases::{reset_fixtures, standard_suite, SuiteFixtures};
pub use outcome::{Outcome, RunSummary};
pub use panel::{Panel, Target, TargetKind};
pub use runner::TestRunner;
pub use suite::{TestCase, TestSuite};
