//! Analyses over the callback graph.
//!
//! # Modules
//!
//! - [`broken_promise`]: Grouping by queue object and the broken promise report
//! - [`resolve`]: Abstract value to source position resolution
//! - [`report`]: Findings and their text/JSON renderings
//! - [`sarif`]: SARIF output for findings

pub mod broken_promise;
pub mod report;
pub mod resolve;
pub mod sarif;

pub use broken_promise::{
    group_by_queue_object, BrokenPromiseAnalysis, BrokenPromiseConfig, FailurePolicy, QueueGroup,
};
pub use report::{BrokenPromiseFinding, BrokenPromiseReport, SkippedGroup};
pub use resolve::{resolve_position, resolve_sorted};
pub use sarif::SarifLog;
