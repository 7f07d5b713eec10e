// src/dag/mod.rs

//! Graph model.
//!
//! - [`graph`] owns the topology and its cycle-safe mutation.
//! - [`node`] and [`edge`] are the shared graph elements.
//! - [`op`] defines the operation a node executes.
//! - [`subgraph`], [`sort`] and [`copy`] add derivation, ordering and deep
//!   copy on top of [`Graph`].

pub mod copy;
pub mod edge;
pub mod graph;
pub mod node;
pub mod op;
pub mod sort;
pub mod style;
pub mod subgraph;

pub use edge::{Edge, EdgeBuilder};
pub use graph::{Graph, GraphBuilder};
pub use node::{Node, NodeBuilder};
pub use op::{NoOp, Op, OpFuture};
pub use style::{Rgb, Style};
