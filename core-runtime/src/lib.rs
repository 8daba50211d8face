//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the smoke harness:
//! - Logging and tracing infrastructure
//! - Harness event bus (readiness signal + run progress)
//! - Shared error type
//!
//! ## Overview
//!
//! This crate contains the runtime utilities the harness crates depend on.
//! It establishes the logging conventions and the event broadcasting
//! mechanism through which the host environment signals device readiness.

pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};
