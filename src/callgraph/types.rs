//! Callback graph type definitions.

use crate::value::{AbstractValue, AnalysisFunction};

/// Registration metadata for one callback observation.
///
/// Both fields are required at construction, so a context whose queue or
/// dependent object is still unknown cannot be recorded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallbackContext<V> {
    queue_object: V,
    dependent_queue_object: V,
}

impl<V: AbstractValue> CallbackContext<V> {
    /// Create a context from the value the callback was attached to and the
    /// value produced by invoking it.
    #[must_use]
    pub fn new(queue_object: V, dependent_queue_object: V) -> Self {
        Self {
            queue_object,
            dependent_queue_object,
        }
    }

    /// The async value the callback was registered on.
    #[inline]
    pub fn queue_object(&self) -> &V {
        &self.queue_object
    }

    /// The async value produced by invoking the callback.
    #[inline]
    pub fn dependent_queue_object(&self) -> &V {
        &self.dependent_queue_object
    }
}

/// One observed registration event: a callback paired with its context.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallbackGraphNode<F, V> {
    function: F,
    context: CallbackContext<V>,
}

impl<F: AnalysisFunction, V: AbstractValue> CallbackGraphNode<F, V> {
    #[must_use]
    pub fn new(function: F, context: CallbackContext<V>) -> Self {
        Self { function, context }
    }

    /// The registered callback.
    #[inline]
    pub fn function(&self) -> &F {
        &self.function
    }

    #[inline]
    pub fn context(&self) -> &CallbackContext<V> {
        &self.context
    }
}

/// Append-only collection of callback registrations.
///
/// Insertion order is preserved, but the graph is logically a multiset: the
/// interpreter may record the same registration again every time the fixpoint
/// revisits a program point. Nothing here deduplicates.
#[derive(Debug, Clone)]
pub struct CallbackGraph<F, V> {
    nodes: Vec<CallbackGraphNode<F, V>>,
}

impl<F, V> Default for CallbackGraph<F, V> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

impl<F: AnalysisFunction, V: AbstractValue> CallbackGraph<F, V> {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a registration.
    #[inline]
    pub fn record(&mut self, node: CallbackGraphNode<F, V>) {
        self.nodes.push(node);
    }

    /// Append a registration built from its parts.
    pub fn record_callback(&mut self, function: F, context: CallbackContext<V>) {
        self.record(CallbackGraphNode::new(function, context));
    }

    /// All recorded nodes in insertion order.
    #[inline]
    pub fn all_nodes(&self) -> &[CallbackGraphNode<F, V>] {
        &self.nodes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CallbackGraphNode<F, V>> {
        self.nodes.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Append every node of `other` after the nodes already recorded.
    ///
    /// Lets a parallel interpreter keep one graph per worker and combine them
    /// once all workers are done.
    pub fn merge(&mut self, other: CallbackGraph<F, V>) {
        self.nodes.extend(other.nodes);
    }
}

impl<F: AnalysisFunction, V: AbstractValue> Extend<CallbackGraphNode<F, V>>
    for CallbackGraph<F, V>
{
    fn extend<I: IntoIterator<Item = CallbackGraphNode<F, V>>>(&mut self, iter: I) {
        self.nodes.extend(iter);
    }
}

impl<F: AnalysisFunction, V: AbstractValue> FromIterator<CallbackGraphNode<F, V>>
    for CallbackGraph<F, V>
{
    fn from_iter<I: IntoIterator<Item = CallbackGraphNode<F, V>>>(iter: I) -> Self {
        Self {
            nodes: iter.into_iter().collect(),
        }
    }
}

impl<'a, F, V> IntoIterator for &'a CallbackGraph<F, V> {
    type Item = &'a CallbackGraphNode<F, V>;
    type IntoIter = std::slice::Iter<'a, CallbackGraphNode<F, V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}
