//! # Output Panel
//!
//! The inspection surface the harness writes into. One target per test case,
//! addressed by the case's name; the target's kind decides how its content is
//! meant to be consumed (literal text vs. a playable/displayable source
//! reference).
//!
//! The panel is validated eagerly against the suite so a page/test-list
//! mismatch is caught before any bridge call runs, and a lookup miss at
//! render time is the one fatal error the harness has.

use core_runtime::{Error, Result};
use std::fmt;

use crate::outcome::Outcome;
use crate::suite::TestSuite;

/// How a target interprets the content written into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    /// Displays the outcome as literal text
    Text,
    /// Treats the outcome as a source reference (URL) to display or play
    Media,
}

/// One output target on the panel.
#[derive(Debug, Clone)]
pub struct Target {
    kind: TargetKind,
    content: Option<String>,
}

impl Target {
    pub fn kind(&self) -> TargetKind {
        self.kind
    }

    /// The rendered content, if an outcome has been written
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }
}

/// Ordered collection of named output targets.
#[derive(Debug, Clone, Default)]
pub struct Panel {
    targets: Vec<(String, Target)>,
}

impl Panel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a target (builder style); later duplicates shadow nothing, the
    /// first entry with a name wins at lookup.
    pub fn with_target(mut self, name: impl Into<String>, kind: TargetKind) -> Self {
        self.targets.push((
            name.into(),
            Target {
                kind,
                content: None,
            },
        ));
        self
    }

    /// Build a panel with one target per suite case, using each case's
    /// declared target kind.
    pub fn for_suite(suite: &TestSuite) -> Self {
        let mut panel = Self::new();
        for case in suite.cases() {
            panel = panel.with_target(case.name(), case.target());
        }
        panel
    }

    /// Check that every suite case has a target, failing fast on the first
    /// missing one.
    pub fn validate(&self, suite: &TestSuite) -> Result<()> {
        for case in suite.cases() {
            if self.target(case.name()).is_none() {
                return Err(Error::MissingTarget {
                    test: case.name().to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn target(&self, name: &str) -> Option<&Target> {
        self.targets
            .iter()
            .find(|(target_name, _)| target_name == name)
            .map(|(_, target)| target)
    }

    /// Write an outcome's display representation into the named target.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingTarget`] if no target exists under `name` —
    /// the harness is misconfigured and the run must halt.
    pub fn render(&mut self, name: &str, outcome: &Outcome) -> Result<()> {
        let target = self
            .targets
            .iter_mut()
            .find(|(target_name, _)| target_name == name)
            .map(|(_, target)| target)
            .ok_or_else(|| Error::MissingTarget {
                test: name.to_string(),
            })?;

        target.content = Some(outcome.display_value().to_string());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== device file-system smoke results ==")?;
        for (name, target) in &self.targets {
            let kind = match target.kind {
                TargetKind::Text => "text",
                TargetKind::Media => "media",
            };
            let content = target.content.as_deref().unwrap_or("(pending)");
            writeln!(f, "{:<20} [{:<5}] {}", name, kind, content)?;
        }
        Ok(())
    }
}
