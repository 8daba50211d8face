//! Test outcome and run summary types.

use serde::Serialize;
use std::fmt;

/// The settled result of one test case.
///
/// Every case produces exactly one outcome per run; the panel consumes its
/// display representation and the summary keeps the typed value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum Outcome {
    /// The case resolved with an opaque success value (a marker string, an
    /// address, serialized metadata, ...).
    Passed { value: String },
    /// The case's bridge operation failed.
    Failed { error: String },
}

impl Outcome {
    pub fn passed(value: impl Into<String>) -> Self {
        Outcome::Passed {
            value: value.into(),
        }
    }

    pub fn failed(error: impl fmt::Display) -> Self {
        Outcome::Failed {
            error: error.to_string(),
        }
    }

    pub fn is_passed(&self) -> bool {
        matches!(self, Outcome::Passed { .. })
    }

    /// The text the output target displays for this outcome
    pub fn display_value(&self) -> &str {
        match self {
            Outcome::Passed { value } => value,
            Outcome::Failed { error } => error,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_value())
    }
}

/// Aggregated result of a full smoke run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Number of cases in the suite
    pub total: usize,
    /// Cases that resolved successfully
    pub passed: usize,
    /// Cases whose bridge operation failed
    pub failed: usize,
    /// Whether the run was skipped by the run-once latch
    pub skipped: bool,
    /// Wall-clock duration of the run in milliseconds
    pub duration_ms: i64,
    /// Per-case outcomes in execution order
    pub outcomes: Vec<(String, Outcome)>,
}

impl RunSummary {
    /// Summary for a run that never started because one already had.
    pub fn skipped() -> Self {
        Self {
            total: 0,
            passed: 0,
            failed: 0,
            skipped: true,
            duration_ms: 0,
            outcomes: Vec::new(),
        }
    }

    pub fn all_passed(&self) -> bool {
        !self.skipped && self.failed == 0
    }

    /// Look up a case's outcome by name
    pub fn outcome(&self, name: &str) -> Option<&Outcome> {
        self.outcomes
            .iter()
            .find(|(case, _)| case == name)
            .map(|(_, outcome)| outcome)
    }
}
