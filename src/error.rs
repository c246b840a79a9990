//! Central error types for broken-promise.
//!
//! Uses `thiserror` for ergonomic error definitions with automatic
//! `Display` and `From` implementations.

use thiserror::Error;

use crate::position::SourcePosition;

/// Main error type for the library.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// A value required for reporting denotes objects from more than one
    /// allocation site, so no single position can stand for it.
    #[error("Ambiguous allocation site: {value} may originate from {} sites", .sites.len())]
    AmbiguousAllocationSite {
        /// Description of the offending abstract value
        value: String,
        /// Every site the value may originate from, in position order
        sites: Vec<SourcePosition>,
    },

    /// A value claims a single allocation site but none is retrievable.
    /// Indicates a defect in the value lattice.
    #[error("Missing allocation site: {value} claims a single allocation site but reports none")]
    MissingAllocationSite {
        /// Description of the offending abstract value
        value: String,
    },

    /// Writing the report to the output sink failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Convenience type alias for Results using AnalysisError.
pub type Result<T> = std::result::Result<T, AnalysisError>;

impl AnalysisError {
    /// Whether this error comes from position resolution rather than I/O or
    /// serialization. Only these are eligible for per-group skipping.
    #[must_use]
    pub fn is_resolution_failure(&self) -> bool {
        matches!(
            self,
            Self::AmbiguousAllocationSite { .. } | Self::MissingAllocationSite { .. }
        )
    }
}
