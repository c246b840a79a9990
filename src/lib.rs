//! Broken promise detection for an abstract interpreter of JavaScript.
//!
//! While the interpreter explores a program it records every callback
//! registration it observes into a [`CallbackGraph`]. Once the graph has
//! quiesced, [`BrokenPromiseAnalysis`] looks for queue objects (abstract
//! Promise-like values) from which more than one distinct dependent value was
//! derived, and reports them with their allocation sites.
//!
//! The value lattice and the function model are plugged in through the
//! [`AbstractValue`] and [`AnalysisFunction`] traits.
//!
//! # Example
//!
//! ```ignore
//! use broken_promise::{BrokenPromiseAnalysis, CallbackContext, CallbackGraph};
//!
//! let mut graph = CallbackGraph::new();
//! graph.record_callback(on_fulfilled, CallbackContext::new(promise, chained));
//! graph.record_callback(on_rejected, CallbackContext::new(promise, other));
//!
//! let report = BrokenPromiseAnalysis::new(&graph).find_broken_promise(&mut std::io::stdout())?;
//! ```

pub mod analysis;
pub mod callgraph;
pub mod error;
pub mod position;
pub mod value;

#[cfg(test)]
mod testing;

pub use analysis::{
    BrokenPromiseAnalysis, BrokenPromiseConfig, BrokenPromiseFinding, BrokenPromiseReport,
    FailurePolicy,
};
pub use callgraph::{CallbackContext, CallbackGraph, CallbackGraphNode};
pub use error::{AnalysisError, Result};
pub use position::SourcePosition;
pub use value::{AbstractValue, AnalysisFunction};
