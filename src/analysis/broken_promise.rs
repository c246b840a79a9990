//! Broken promise detection over a callback graph.
//!
//! A queue object (an abstract Promise-like value) that has callbacks
//! producing two or more *distinct* dependent queue objects is reported as a
//! possible broken promise: several independent continuations were derived
//! from what the analysis believes is one async value.
//!
//! # Algorithm
//!
//! 1. Drop registrations on host objects; they carry no user source to point at.
//! 2. Group the rest by queue object, collecting the *set* of dependent
//!    queue objects. Revisits of the same registration during the fixpoint
//!    collapse here instead of inflating the report.
//! 3. Keep groups with more than one dependent.
//! 4. Resolve every position, sort, and render.
//!
//! # Example
//!
//! ```ignore
//! use broken_promise::analysis::BrokenPromiseAnalysis;
//!
//! let mut out = Vec::new();
//! let text = BrokenPromiseAnalysis::new(&graph).find_broken_promise(&mut out)?;
//! assert_eq!(text.as_bytes(), &out[..]);
//! ```

use std::io::Write;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::report::{BrokenPromiseFinding, BrokenPromiseReport, SkippedGroup};
use super::resolve::{resolve_position, resolve_sorted};
use crate::callgraph::CallbackGraph;
use crate::error::Result;
use crate::position::SourcePosition;
use crate::value::{AbstractValue, AnalysisFunction};

// =============================================================================
// Configuration
// =============================================================================

/// What to do with a group whose positions cannot be resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Fail the whole report. Nothing is written to the sink.
    #[default]
    Abort,
    /// Leave the group out, log it, and keep going.
    SkipGroup,
}

/// Configuration for broken promise detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrokenPromiseConfig {
    /// Handling of groups with ambiguous or missing allocation sites.
    pub failure_policy: FailurePolicy,
    /// Tool name reported in SARIF output.
    pub tool_name: String,
}

impl Default for BrokenPromiseConfig {
    fn default() -> Self {
        Self {
            failure_policy: FailurePolicy::Abort,
            tool_name: "broken-promise".to_string(),
        }
    }
}

impl BrokenPromiseConfig {
    /// Create a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the failure policy.
    #[must_use]
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Skip unresolvable groups instead of failing.
    #[must_use]
    pub fn skip_unresolvable(self) -> Self {
        self.with_failure_policy(FailurePolicy::SkipGroup)
    }

    /// Set the tool name used in SARIF output.
    #[must_use]
    pub fn with_tool_name(mut self, name: impl Into<String>) -> Self {
        self.tool_name = name.into();
        self
    }
}

// =============================================================================
// Grouping
// =============================================================================

/// All registrations sharing one queue object.
#[derive(Debug)]
pub struct QueueGroup<'g, F, V> {
    /// The shared queue object
    pub queue_object: &'g V,
    /// Distinct dependent queue objects, in first-seen order
    pub dependents: Vec<&'g V>,
    /// Every callback registered on the queue object, duplicates included
    pub callbacks: Vec<&'g F>,
}

struct GroupBuilder<'g, F, V> {
    first_seen: usize,
    seen: FxHashSet<&'g V>,
    dependents: Vec<&'g V>,
    callbacks: Vec<&'g F>,
}

/// Partition the graph by queue object and keep the groups with more than
/// one distinct dependent queue object.
///
/// Groups come back in the order their queue object was first recorded.
/// Report order is decided later, from resolved positions.
pub fn group_by_queue_object<F, V>(graph: &CallbackGraph<F, V>) -> Vec<QueueGroup<'_, F, V>>
where
    F: AnalysisFunction,
    V: AbstractValue,
{
    let mut groups: FxHashMap<&V, GroupBuilder<'_, F, V>> = FxHashMap::default();
    let mut host_nodes = 0usize;

    for (index, node) in graph.iter().enumerate() {
        let queue = node.context().queue_object();
        if queue.is_host_object() {
            host_nodes += 1;
            continue;
        }

        let group = groups.entry(queue).or_insert_with(|| GroupBuilder {
            first_seen: index,
            seen: FxHashSet::default(),
            dependents: Vec::new(),
            callbacks: Vec::new(),
        });
        let dependent = node.context().dependent_queue_object();
        if group.seen.insert(dependent) {
            group.dependents.push(dependent);
        }
        group.callbacks.push(node.function());
    }

    let total_groups = groups.len();
    let mut retained: Vec<_> = groups
        .into_iter()
        .filter(|(_, group)| group.dependents.len() > 1)
        .collect();
    retained.sort_unstable_by_key(|(_, group)| group.first_seen);

    debug!(
        nodes = graph.len(),
        host_nodes,
        queue_objects = total_groups,
        retained = retained.len(),
        "grouped callback graph by queue object"
    );

    retained
        .into_iter()
        .map(|(queue_object, group)| QueueGroup {
            queue_object,
            dependents: group.dependents,
            callbacks: group.callbacks,
        })
        .collect()
}

// =============================================================================
// Analysis
// =============================================================================

/// Broken promise analysis over a quiesced callback graph.
pub struct BrokenPromiseAnalysis<'g, F, V> {
    graph: &'g CallbackGraph<F, V>,
    config: BrokenPromiseConfig,
}

impl<'g, F, V> BrokenPromiseAnalysis<'g, F, V>
where
    F: AnalysisFunction,
    V: AbstractValue,
{
    /// Create an analysis with the default configuration.
    pub fn new(graph: &'g CallbackGraph<F, V>) -> Self {
        Self::with_config(graph, BrokenPromiseConfig::default())
    }

    pub fn with_config(graph: &'g CallbackGraph<F, V>, config: BrokenPromiseConfig) -> Self {
        Self { graph, config }
    }

    pub fn config(&self) -> &BrokenPromiseConfig {
        &self.config
    }

    /// Group, resolve and order all findings.
    ///
    /// # Errors
    ///
    /// Under [`FailurePolicy::Abort`], the first position resolution failure.
    /// Under [`FailurePolicy::SkipGroup`] this never fails; offending groups
    /// are listed in [`BrokenPromiseReport::skipped`].
    pub fn analyze(&self) -> Result<BrokenPromiseReport> {
        let mut findings = Vec::new();
        let mut skipped = Vec::new();

        for group in group_by_queue_object(self.graph) {
            match build_finding(&group) {
                Ok(finding) => findings.push(finding),
                Err(err)
                    if err.is_resolution_failure()
                        && self.config.failure_policy == FailurePolicy::SkipGroup =>
                {
                    warn!(
                        queue_object = ?group.queue_object,
                        error = %err,
                        "skipping broken promise group"
                    );
                    skipped.push(SkippedGroup {
                        queue_object: format!("{:?}", group.queue_object),
                        reason: err.to_string(),
                    });
                }
                Err(err) => return Err(err),
            }
        }

        debug!(
            findings = findings.len(),
            skipped = skipped.len(),
            "broken promise analysis finished"
        );

        Ok(BrokenPromiseReport::new(findings, skipped))
    }

    /// Render the textual report, write it to `sink`, and return it.
    ///
    /// An empty graph or one without conflicting groups yields an empty
    /// string. On failure nothing is written.
    pub fn find_broken_promise<W: Write + ?Sized>(&self, sink: &mut W) -> Result<String> {
        let text = self.analyze()?.to_text();
        sink.write_all(text.as_bytes())?;
        sink.flush()?;
        Ok(text)
    }
}

/// Resolve one group into a finding. Nothing partial escapes on failure.
fn build_finding<F, V>(group: &QueueGroup<'_, F, V>) -> Result<BrokenPromiseFinding>
where
    F: AnalysisFunction,
    V: AbstractValue,
{
    let dependents = resolve_sorted(group.dependents.iter().copied())?;
    let forked_from = resolve_position(group.queue_object)?;

    let mut callbacks: Vec<SourcePosition> = group
        .callbacks
        .iter()
        .filter(|function| !function.is_native())
        .filter_map(|function| function.source_position())
        .collect();
    callbacks.sort_unstable();
    callbacks.dedup();

    Ok(BrokenPromiseFinding {
        forked_from,
        dependents,
        callbacks,
    })
}
