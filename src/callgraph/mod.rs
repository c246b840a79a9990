//! Callback graph recorded by the abstract interpreter.
//!
//! Each node pairs a callback function with the asynchronous context it was
//! registered under. The interpreter owns the graph and appends to it while
//! exploring the program; analyses borrow it read-only once it has quiesced.
//!
//! # Example
//!
//! ```ignore
//! use broken_promise::callgraph::{CallbackContext, CallbackGraph};
//!
//! let mut graph = CallbackGraph::new();
//! graph.record_callback(then_callback, CallbackContext::new(promise, derived));
//! assert_eq!(graph.len(), 1);
//! ```

pub mod types;

pub use types::{CallbackContext, CallbackGraph, CallbackGraphNode};
