//! A small value lattice for driving the analysis from the outside.
//!
//! Values are interned in a `Heap`; two handles with the same index are the
//! same abstract value. This mirrors how an interpreter hands out cheap,
//! comparable value handles.

use std::collections::BTreeSet;

use broken_promise::{
    AbstractValue, AnalysisFunction, CallbackContext, CallbackGraph, SourcePosition,
};

#[derive(Debug, Clone)]
struct ValueData {
    label: String,
    sites: BTreeSet<SourcePosition>,
    host: bool,
}

#[derive(Debug, Default)]
pub struct Heap {
    values: Vec<ValueData>,
}

/// Handle to an interned abstract value. Identity is the heap index.
#[derive(Clone, Copy)]
pub struct Value<'h> {
    index: usize,
    heap: &'h Heap,
}

impl PartialEq for Value<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl Eq for Value<'_> {}

impl std::hash::Hash for Value<'_> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl std::fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Value({})", self.heap.values[self.index].label)
    }
}

impl Heap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a value created at `line:column`.
    pub fn alloc(&mut self, label: &str, line: u32, column: u32) -> usize {
        self.alloc_sites(label, &[(line, column)])
    }

    /// Allocate a value that merges several allocation sites.
    pub fn alloc_sites(&mut self, label: &str, sites: &[(u32, u32)]) -> usize {
        self.values.push(ValueData {
            label: label.to_string(),
            sites: sites.iter().copied().map(SourcePosition::from).collect(),
            host: false,
        });
        self.values.len() - 1
    }

    /// Allocate a host-provided object with no user source.
    pub fn alloc_host(&mut self, label: &str) -> usize {
        self.values.push(ValueData {
            label: label.to_string(),
            sites: BTreeSet::new(),
            host: true,
        });
        self.values.len() - 1
    }

    pub fn get(&self, index: usize) -> Value<'_> {
        Value { index, heap: self }
    }
}

impl AbstractValue for Value<'_> {
    fn is_host_object(&self) -> bool {
        self.heap.values[self.index].host
    }

    fn allocation_sites(&self) -> BTreeSet<SourcePosition> {
        self.heap.values[self.index].sites.clone()
    }
}

/// Callback function reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Callback {
    Native(&'static str),
    User { line: u32, column: u32 },
}

impl AnalysisFunction for Callback {
    fn is_native(&self) -> bool {
        matches!(self, Self::Native(_))
    }

    fn source_position(&self) -> Option<SourcePosition> {
        match *self {
            Self::Native(_) => None,
            Self::User { line, column } => Some(SourcePosition::new(line, column)),
        }
    }
}

pub type Graph<'h> = CallbackGraph<Callback, Value<'h>>;

/// Record `promise.then(callback)` producing `derived`.
pub fn then<'h>(
    graph: &mut Graph<'h>,
    heap: &'h Heap,
    promise: usize,
    derived: usize,
    callback: Callback,
) {
    graph.record_callback(
        callback,
        CallbackContext::new(heap.get(promise), heap.get(derived)),
    );
}
