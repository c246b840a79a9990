//! Source positions used to locate abstract values in program text.

use serde::{Deserialize, Serialize};

/// A `(line, column)` pair in the analyzed program.
///
/// Lines are 1-indexed, columns 0-indexed. Ordering is by line, then column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SourcePosition {
    /// Line number (1-indexed)
    pub line: u32,
    /// Column number (0-indexed)
    pub column: u32,
}

impl SourcePosition {
    /// Create a new position.
    #[inline]
    #[must_use]
    pub const fn new(line: u32, column: u32) -> Self {
        debug_assert!(line >= 1, "source lines are 1-indexed");
        Self { line, column }
    }
}

impl From<(u32, u32)> for SourcePosition {
    fn from((line, column): (u32, u32)) -> Self {
        Self::new(line, column)
    }
}

impl std::fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
