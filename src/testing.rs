//! Minimal fake lattice for unit tests.

use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

use crate::callgraph::{CallbackContext, CallbackGraph, CallbackGraphNode};
use crate::position::SourcePosition;
use crate::value::{AbstractValue, AnalysisFunction};

/// Fake abstract value. Identity is the `id` alone, so two values with the
/// same id but different site sets still compare equal, like a lattice that
/// conflates objects.
#[derive(Debug, Clone)]
pub(crate) struct FakeValue {
    pub id: &'static str,
    pub sites: BTreeSet<SourcePosition>,
    pub host: bool,
    /// Overrides `is_single_allocation_site` to model a broken lattice.
    pub claims_single: Option<bool>,
}

impl FakeValue {
    pub fn at(id: &'static str, line: u32, column: u32) -> Self {
        Self::with_sites(id, &[(line, column)])
    }

    pub fn with_sites(id: &'static str, sites: &[(u32, u32)]) -> Self {
        Self {
            id,
            sites: sites.iter().copied().map(SourcePosition::from).collect(),
            host: false,
            claims_single: None,
        }
    }

    pub fn host(id: &'static str) -> Self {
        Self {
            id,
            sites: BTreeSet::new(),
            host: true,
            claims_single: None,
        }
    }

    /// A value that claims one site but reports none.
    pub fn siteless(id: &'static str) -> Self {
        Self {
            id,
            sites: BTreeSet::new(),
            host: false,
            claims_single: Some(true),
        }
    }
}

impl PartialEq for FakeValue {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for FakeValue {}

impl Hash for FakeValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl AbstractValue for FakeValue {
    fn is_host_object(&self) -> bool {
        self.host
    }

    fn allocation_sites(&self) -> BTreeSet<SourcePosition> {
        self.sites.clone()
    }

    fn is_single_allocation_site(&self) -> bool {
        self.claims_single.unwrap_or(self.sites.len() == 1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FakeFunction {
    Native,
    User(SourcePosition),
}

impl FakeFunction {
    pub fn user(line: u32, column: u32) -> Self {
        Self::User(SourcePosition::new(line, column))
    }
}

impl AnalysisFunction for FakeFunction {
    fn is_native(&self) -> bool {
        matches!(self, Self::Native)
    }

    fn source_position(&self) -> Option<SourcePosition> {
        match self {
            Self::Native => None,
            Self::User(pos) => Some(*pos),
        }
    }
}

pub(crate) type FakeGraph = CallbackGraph<FakeFunction, FakeValue>;

/// Node registered by a native callback.
pub(crate) fn node(
    queue: &FakeValue,
    dependent: &FakeValue,
) -> CallbackGraphNode<FakeFunction, FakeValue> {
    CallbackGraphNode::new(
        FakeFunction::Native,
        CallbackContext::new(queue.clone(), dependent.clone()),
    )
}
