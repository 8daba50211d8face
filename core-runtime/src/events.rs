//! # Harness Event Bus
//!
//! Event-driven wiring for the smoke harness using `tokio::sync::broadcast`.
//! The host environment publishes [`HarnessEvent::DeviceReady`] when native
//! capabilities become available; the runner publishes progress events while
//! it drives the suite.
//!
//! ## Usage
//!
//! ### Creating an Event Bus
//!
//! ```rust
//! use core_runtime::events::EventBus;
//!
//! let event_bus = EventBus::new(64);
//! ```
//!
//! ### Publishing Events
//!
//! ```rust
//! use core_runtime::events::{EventBus, HarnessEvent};
//!
//! # let event_bus = EventBus::new(64);
//! event_bus.emit(HarnessEvent::DeviceReady).ok();
//! ```
//!
//! ### Subscribing to Events
//!
//! ```rust
//! use core_runtime::events::EventBus;
//! use tokio::sync::broadcast::error::RecvError;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let event_bus = EventBus::new(64);
//! let mut stream = event_bus.subscribe();
//!
//! tokio::spawn(async move {
//!     loop {
//!         match stream.recv().await {
//!             Ok(event) => println!("Received: {:?}", event),
//!             Err(RecvError::Lagged(n)) => {
//!                 eprintln!("Missed {} events", n);
//!             }
//!             Err(RecvError::Closed) => break,
//!         }
//!     }
//! });
//! # }
//! ```
//!
//! ## Error Handling
//!
//! `tokio::sync::broadcast` can produce two receive errors:
//!
//! - **`RecvError::Lagged(n)`**: the subscriber was too slow and missed `n`
//!   events. Non-fatal; the subscriber keeps receiving new events.
//! - **`RecvError::Closed`**: all senders have been dropped. Shutdown signal.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;

// Re-export commonly used types
pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
///
/// Plenty for a 14-case run; subscribers that fall behind by more than this
/// receive `RecvError::Lagged`.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 64;

/// Events flowing between the host environment, the runner, and observers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum HarnessEvent {
    /// The host environment's native capabilities are available.
    DeviceReady,
    /// A test case began executing.
    CaseStarted {
        /// Name of the test case.
        name: String,
    },
    /// A test case settled, one way or the other.
    CaseSettled {
        /// Name of the test case.
        name: String,
        /// Whether the case resolved successfully.
        passed: bool,
    },
    /// The full run finished.
    RunCompleted {
        /// Number of cases that passed.
        passed: u32,
        /// Number of cases that failed.
        failed: u32,
    },
    /// A readiness signal arrived while a run was already started.
    DuplicateReadyIgnored,
}

impl HarnessEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            HarnessEvent::DeviceReady => "Device ready",
            HarnessEvent::CaseStarted { .. } => "Test case started",
            HarnessEvent::CaseSettled { passed: true, .. } => "Test case passed",
            HarnessEvent::CaseSettled { passed: false, .. } => "Test case failed",
            HarnessEvent::RunCompleted { .. } => "Run completed",
            HarnessEvent::DuplicateReadyIgnored => "Duplicate readiness signal ignored",
        }
    }

    /// Returns the severity level of the event.
    pub fn severity(&self) -> EventSeverity {
        match self {
            HarnessEvent::CaseSettled { passed: false, .. } => EventSeverity::Warning,
            HarnessEvent::DuplicateReadyIgnored => EventSeverity::Warning,
            HarnessEvent::DeviceReady | HarnessEvent::RunCompleted { .. } => EventSeverity::Info,
            _ => EventSeverity::Debug,
        }
    }
}

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    /// Debug-level events (verbose)
    Debug,
    /// Informational events
    Info,
    /// Warning events
    Warning,
}

/// Central event bus for publishing and subscribing to harness events.
///
/// Uses `tokio::sync::broadcast` internally, which provides:
/// - Multiple producers (clone the `EventBus`)
/// - Multiple consumers (each `subscribe()` creates a new receiver)
/// - Non-blocking sends (events are cloned for each subscriber)
/// - Lagging detection (slow subscribers get `RecvError::Lagged`)
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<HarnessEvent>,
}

impl EventBus {
    /// Creates a new event bus with the specified buffer size.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Creates a new event bus with the default buffer size.
    #[allow(clippy::should_implement_trait)]
    pub fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event.
    /// Returns an error if there are no active subscribers.
    pub fn emit(&self, event: HarnessEvent) -> Result<usize, SendError<HarnessEvent>> {
        self.sender.send(event)
    }

    /// Creates a new subscriber to receive events.
    ///
    /// Each call creates an independent receiver that will receive all future
    /// events. Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<HarnessEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}
