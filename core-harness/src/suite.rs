//! # Test Suite
//!
//! The table of named, no-argument asynchronous test cases. Each case
//! declares its output target kind alongside its operation, so the panel and
//! the suite can be cross-checked before a run begins.

use bridge_traits::error::Result as BridgeResult;
use futures::future::BoxFuture;
use std::collections::HashSet;
use std::fmt;
use std::future::Future;

use core_runtime::{Error, Result};

use crate::panel::TargetKind;

/// Boxed case operation: produces a fresh future per invocation.
pub type CaseOperation = Box<dyn Fn() -> BoxFuture<'static, BridgeResult<String>> + Send + Sync>;

/// A named test case with its declared output target.
pub struct TestCase {
    name: &'static str,
    target: TargetKind,
    operation: CaseOperation,
}

impl TestCase {
    pub fn new<F, Fut>(name: &'static str, target: TargetKind, operation: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = BridgeResult<String>> + Send + 'static,
    {
        Self {
            name,
            target,
            operation: Box::new(move || {
                let fut: BoxFuture<'static, BridgeResult<String>> = Box::pin(operation());
                fut
            }),
        }
    }

    /// The case's unique name, used to locate its output target
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The kind of output target this case renders into
    pub fn target(&self) -> TargetKind {
        self.target
    }

    /// Start one execution of the case's operation
    pub(crate) fn execute(&self) -> BoxFuture<'static, BridgeResult<String>> {
        (self.operation)()
    }
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase")
            .field("name", &self.name)
            .field("target", &self.target)
            .finish()
    }
}

/// Fixed, ordered sequence of test cases.
///
/// Order is execution order: several cases consume files earlier cases
/// produce, so the runner never reorders or overlaps them.
#[derive(Debug)]
pub struct TestSuite {
    cases: Vec<TestCase>,
}

impl TestSuite {
    /// Build a suite from cases in declaration order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if two cases share a name; names key the
    /// output targets and must be unique.
    pub fn new(cases: Vec<TestCase>) -> Result<Self> {
        let mut seen = HashSet::new();
        for case in &cases {
            if !seen.insert(case.name()) {
                return Err(Error::Config(format!(
                    "duplicate test case name '{}'",
                    case.name()
                )));
            }
        }
        Ok(Self { cases })
    }

    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Case names in declaration order
    pub fn names(&self) -> Vec<&'static str> {
        self.cases.iter().map(|case| case.name()).collect()
    }
}
