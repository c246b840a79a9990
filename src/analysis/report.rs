//! Broken-promise findings and their renderings.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::position::SourcePosition;

/// One queue object with more than one distinct dependent queue object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokenPromiseFinding {
    /// Allocation site of the queue object the continuations fork from
    pub forked_from: SourcePosition,
    /// Allocation sites of the dependent queue objects, sorted
    pub dependents: Vec<SourcePosition>,
    /// Positions of the user-defined callbacks registered on the queue
    /// object, sorted and deduplicated. Native callbacks are not listed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub callbacks: Vec<SourcePosition>,
}

impl BrokenPromiseFinding {
    /// Ordering key for the report: forked-from position first, then the
    /// dependent positions.
    fn sort_key(&self) -> (SourcePosition, &[SourcePosition]) {
        (self.forked_from, &self.dependents)
    }
}

impl std::fmt::Display for BrokenPromiseFinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Possible Broken Promise between positions: ")?;
        if let Some((last, init)) = self.dependents.split_last() {
            let joined = init
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            if joined.is_empty() {
                write!(f, "{last}")?;
            } else {
                write!(f, "{joined} and {last}")?;
            }
        }
        writeln!(f, "!")?;
        writeln!(f, "Forked from position: {}.", self.forked_from)
    }
}

/// A group left out of the report under [`FailurePolicy::SkipGroup`].
///
/// [`FailurePolicy::SkipGroup`]: super::FailurePolicy::SkipGroup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedGroup {
    /// Description of the queue object
    pub queue_object: String,
    /// Why the group could not be reported
    pub reason: String,
}

/// Result of one broken-promise analysis run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokenPromiseReport {
    /// Findings in report order
    pub findings: Vec<BrokenPromiseFinding>,
    /// Groups that could not be rendered
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedGroup>,
}

impl BrokenPromiseReport {
    /// Build a report, putting findings into their canonical order.
    #[must_use]
    pub fn new(mut findings: Vec<BrokenPromiseFinding>, skipped: Vec<SkippedGroup>) -> Self {
        findings.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        Self { findings, skipped }
    }

    /// True when there is nothing to report.
    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    /// Render the textual report: one paragraph per finding, separated by a
    /// blank line. Empty when there are no findings.
    pub fn to_text(&self) -> String {
        self.findings
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Render the report as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
