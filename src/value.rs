//! Boundary traits for the value lattice and the function model.
//!
//! The analysis never looks inside abstract values or functions. Any lattice
//! that can answer these questions can plug in, which also lets tests drive
//! the analysis with a minimal fake domain.

use std::collections::BTreeSet;
use std::fmt::Debug;
use std::hash::Hash;

use crate::position::SourcePosition;

/// An abstract value: zero or more concrete runtime objects.
///
/// `Eq` and `Hash` must follow the lattice's notion of abstract identity.
/// Two values that compare equal are treated as the same queue object, even
/// if they stand for several concrete objects. `Debug` is used to describe a
/// value in error messages and logs.
pub trait AbstractValue: Eq + Hash + Debug {
    /// True if the value denotes only host-provided objects.
    fn is_host_object(&self) -> bool;

    /// Every program location that could have created an object this value
    /// denotes. Empty only if genuinely unknown.
    fn allocation_sites(&self) -> BTreeSet<SourcePosition>;

    /// True iff exactly one allocation site would be returned by
    /// [`allocation_sites`](Self::allocation_sites).
    fn is_single_allocation_site(&self) -> bool {
        self.allocation_sites().len() == 1
    }
}

/// A function reference from the flow graph.
pub trait AnalysisFunction: Debug {
    /// Native functions have no source position.
    fn is_native(&self) -> bool;

    /// Position of a user-defined function, `None` for native ones.
    fn source_position(&self) -> Option<SourcePosition>;
}
