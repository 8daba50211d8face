//! # Test Runner
//!
//! Drives the fixed sequence of test cases to completion and surfaces each
//! outcome on the panel.
//!
//! ## Overview
//!
//! The runner is triggered by the host environment's readiness signal
//! ([`HarnessEvent::DeviceReady`] on the event bus) and executes exactly
//! once: a run-once latch swallows duplicate signals. Cases run strictly in
//! declaration order and each one fully settles before the next begins —
//! later cases consume files earlier cases created, so this sequential
//! barrier is deliberate, not an optimization target.
//!
//! A failing bridge operation is caught per case: the failure is logged with
//! the case's identity, rendered into its target, and the run continues.
//! The one fatal error is a missing output target, which means the harness
//! itself is misconfigured; it halts the run.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use bridge_traits::time::{Clock, SystemClock};
use core_runtime::events::{EventBus, HarnessEvent, Receiver, RecvError};
use core_runtime::{Error, Result};
use tracing::{debug, error, info, warn};

use crate::outcome::{Outcome, RunSummary};
use crate::panel::Panel;
use crate::suite::TestSuite;

/// Sequential smoke-test runner.
pub struct TestRunner {
    suite: TestSuite,
    panel: Mutex<Panel>,
    events: EventBus,
    clock: Arc<dyn Clock>,
    started: AtomicBool,
}

impl std::fmt::Debug for TestRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestRunner")
            .field("started", &self.started)
            .finish_non_exhaustive()
    }
}

impl TestRunner {
    /// Create a runner, validating the panel against the suite eagerly.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingTarget`] if any suite case has no panel
    /// target — the misconfiguration is caught before any bridge call runs.
    pub fn new(suite: TestSuite, panel: Panel, events: EventBus) -> Result<Self> {
        panel.validate(&suite)?;
        Ok(Self {
            suite,
            panel: Mutex::new(panel),
            events,
            clock: Arc::new(SystemClock),
            started: AtomicBool::new(false),
        })
    }

    /// Replace the time source (useful for deterministic tests)
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Suspend until the host signals device readiness, then run once.
    ///
    /// Non-readiness events on the bus are ignored. If the channel closes
    /// before readiness arrives the harness can never be triggered, which is
    /// reported as an internal error.
    pub async fn run_on_ready(&self, mut signals: Receiver<HarnessEvent>) -> Result<RunSummary> {
        loop {
            match signals.recv().await {
                Ok(HarnessEvent::DeviceReady) => return self.run().await,
                Ok(_) => continue,
                Err(RecvError::Lagged(missed)) => {
                    warn!(missed, "readiness subscriber lagged; continuing");
                    continue;
                }
                Err(RecvError::Closed) => {
                    return Err(Error::Internal(
                        "readiness channel closed before the device became ready".to_string(),
                    ))
                }
            }
        }
    }

    /// Run the suite once, in declaration order.
    ///
    /// A second invocation (duplicate readiness signal, re-entry) is ignored
    /// and returns [`RunSummary::skipped`].
    pub async fn run(&self) -> Result<RunSummary> {
        if self.started.swap(true, Ordering::SeqCst) {
            warn!("run already started; ignoring duplicate readiness signal");
            self.events
                .emit(HarnessEvent::DuplicateReadyIgnored)
                .ok();
            return Ok(RunSummary::skipped());
        }

        let started_at = self.clock.now();
        let mut outcomes = Vec::with_capacity(self.suite.len());
        let mut passed = 0usize;
        let mut failed = 0usize;

        for case in self.suite.cases() {
            let name = case.name();
            self.events
                .emit(HarnessEvent::CaseStarted {
                    name: name.to_string(),
                })
                .ok();
            debug!(test = name, "Running test case");

            let outcome = match case.execute().await {
                Ok(value) => {
                    debug!(test = name, value = %value, "Test case passed");
                    Outcome::passed(value)
                }
                Err(e) => {
                    error!(test = name, error = %e, "Test case failed");
                    Outcome::failed(e)
                }
            };

            {
                let mut panel = self
                    .panel
                    .lock()
                    .map_err(|_| Error::Internal("panel lock poisoned".to_string()))?;
                panel.render(name, &outcome)?;
            }

            if outcome.is_passed() {
                passed += 1;
            } else {
                failed += 1;
            }
            self.events
                .emit(HarnessEvent::CaseSettled {
                    name: name.to_string(),
                    passed: outcome.is_passed(),
                })
                .ok();
            outcomes.push((name.to_string(), outcome));
        }

        let duration_ms = (self.clock.now() - started_at).num_milliseconds();
        info!(
            total = self.suite.len(),
            passed, failed, duration_ms, "Smoke run completed"
        );
        self.events
            .emit(HarnessEvent::RunCompleted {
                passed: passed as u32,
                failed: failed as u32,
            })
            .ok();

        Ok(RunSummary {
            total: self.suite.len(),
            passed,
            failed,
            skipped: false,
            duration_ms,
            outcomes,
        })
    }

    /// The panel's current rendering, for inspection.
    pub fn report(&self) -> Result<String> {
        let panel = self
            .panel
            .lock()
            .map_err(|_| Error::Internal("panel lock poisoned".to_string()))?;
        Ok(panel.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::TargetKind;
    use crate::suite::TestCase;
    use bridge_traits::error::BridgeError;
    use chrono::{DateTime, TimeZone, Utc};

    fn bus() -> EventBus {
        EventBus::new(64)
    }

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn recording_case(
        name: &'static str,
        log: Arc<Mutex<Vec<&'static str>>>,
    ) -> TestCase {
        TestCase::new(name, TargetKind::Text, move || {
            let log = Arc::clone(&log);
            async move {
                log.lock().unwrap().push(name);
                Ok("Success".to_string())
            }
        })
    }

    #[tokio::test]
    async fn test_execution_order_matches_declaration() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let suite = TestSuite::new(vec![
            recording_case("first", Arc::clone(&log)),
            recording_case("second", Arc::clone(&log)),
            recording_case("third", Arc::clone(&log)),
        ])
        .unwrap();
        let panel = Panel::for_suite(&suite);
        let runner = TestRunner::new(suite, panel, bus()).unwrap();

        let summary = runner.run().await.unwrap();

        assert_eq!(summary.total, 3);
        assert_eq!(summary.passed, 3);
        assert_eq!(*log.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_failure_does_not_abort_the_run() {
        let suite = TestSuite::new(vec![
            TestCase::new("ok_before", TargetKind::Text, || async {
                Ok("Success".to_string())
            }),
            TestCase::new("broken", TargetKind::Text, || async {
                Err(BridgeError::OperationFailed("bridge exploded".to_string()))
            }),
            TestCase::new("ok_after", TargetKind::Text, || async {
                Ok("Success".to_string())
            }),
        ])
        .unwrap();
        let panel = Panel::for_suite(&suite);
        let runner = TestRunner::new(suite, panel, bus()).unwrap();

        let summary = runner.run().await.unwrap();

        assert_eq!(summary.passed, 2);
        assert_eq!(summary.failed, 1);
        assert!(!summary.outcome("broken").unwrap().is_passed());
        assert!(summary.outcome("ok_after").unwrap().is_passed());

        let report = runner.report().unwrap();
        assert!(report.contains("bridge exploded"));
    }

    #[tokio::test]
    async fn test_missing_target_is_caught_eagerly() {
        let suite = TestSuite::new(vec![
            TestCase::new("present", TargetKind::Text, || async {
                Ok("Success".to_string())
            }),
            TestCase::new("orphaned", TargetKind::Text, || async {
                Ok("Success".to_string())
            }),
        ])
        .unwrap();
        let panel = Panel::new().with_target("present", TargetKind::Text);

        let err = TestRunner::new(suite, panel, bus()).unwrap_err();
        assert!(matches!(err, Error::MissingTarget { ref test } if test == "orphaned"));
    }

    #[tokio::test]
    async fn test_run_once_latch_skips_second_run() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let suite = TestSuite::new(vec![recording_case("only", Arc::clone(&log))]).unwrap();
        let panel = Panel::for_suite(&suite);
        let runner = TestRunner::new(suite, panel, bus()).unwrap();

        let first = runner.run().await.unwrap();
        let second = runner.run().await.unwrap();

        assert!(!first.skipped);
        assert!(second.skipped);
        assert_eq!(second.total, 0);
        // The suite executed exactly once
        assert_eq!(log.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_run_on_ready_waits_for_readiness() {
        let suite = TestSuite::new(vec![TestCase::new("only", TargetKind::Text, || async {
            Ok("Success".to_string())
        })])
        .unwrap();
        let panel = Panel::for_suite(&suite);

        let signal_bus = bus();
        let signals = signal_bus.subscribe();
        // Buffered before the runner starts listening: a non-readiness event
        // followed by the readiness signal.
        signal_bus
            .emit(HarnessEvent::CaseStarted {
                name: "unrelated".to_string(),
            })
            .ok();
        signal_bus.emit(HarnessEvent::DeviceReady).ok();

        let runner = TestRunner::new(suite, panel, bus()).unwrap();
        let summary = runner.run_on_ready(signals).await.unwrap();

        assert_eq!(summary.total, 1);
        assert!(!summary.skipped);
    }

    #[tokio::test]
    async fn test_run_on_ready_fails_on_closed_channel() {
        let suite = TestSuite::new(vec![TestCase::new("only", TargetKind::Text, || async {
            Ok("Success".to_string())
        })])
        .unwrap();
        let panel = Panel::for_suite(&suite);
        let runner = TestRunner::new(suite, panel, bus()).unwrap();

        let signal_bus = bus();
        let signals = signal_bus.subscribe();
        drop(signal_bus);

        let err = runner.run_on_ready(signals).await.unwrap_err();
        assert!(matches!(err, Error::Internal(_)));
    }

    #[tokio::test]
    async fn test_events_trace_the_run() {
        let suite = TestSuite::new(vec![
            TestCase::new("passes", TargetKind::Text, || async {
                Ok("Success".to_string())
            }),
            TestCase::new("fails", TargetKind::Text, || async {
                Err(BridgeError::OperationFailed("nope".to_string()))
            }),
        ])
        .unwrap();
        let panel = Panel::for_suite(&suite);
        let events = bus();
        let mut observer = events.subscribe();
        let runner = TestRunner::new(suite, panel, events).unwrap();

        runner.run().await.unwrap();

        let mut received = Vec::new();
        while let Ok(event) = observer.try_recv() {
            received.push(event);
        }

        assert_eq!(
            received.first(),
            Some(&HarnessEvent::CaseStarted {
                name: "passes".to_string()
            })
        );
        assert_eq!(
            received.last(),
            Some(&HarnessEvent::RunCompleted {
                passed: 1,
                failed: 1
            })
        );
        assert!(received.contains(&HarnessEvent::CaseSettled {
            name: "fails".to_string(),
            passed: false
        }));
    }

    #[tokio::test]
    async fn test_injected_clock_drives_duration() {
        let suite = TestSuite::new(vec![TestCase::new("only", TargetKind::Text, || async {
            Ok("Success".to_string())
        })])
        .unwrap();
        let panel = Panel::for_suite(&suite);
        let fixed = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let runner = TestRunner::new(suite, panel, bus())
            .unwrap()
            .with_clock(Arc::new(FixedClock(fixed)));

        let summary = runner.run().await.unwrap();
        assert_eq!(summary.duration_ms, 0);
    }
}
