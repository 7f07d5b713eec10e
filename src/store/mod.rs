// src/store/mod.rs

//! Graph persistence.
//!
//! The store only consumes the read-only graph surface (nodes, edges, uids,
//! labels, weights, attributes) and rebuilds an equivalent graph on load.
//! Identity across a save/load round trip is the `uid`, never the numeric id.
//!
//! - [`Syncer`] writes a graph out.
//! - [`Loader`] reads one back by graph uid.
//! - [`json::JsonStore`] implements both on top of one JSON document per
//!   graph.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::dag::Graph;
use crate::errors::Result;
use crate::types::Attrs;

pub mod json;

pub use json::JsonStore;

/// Boxed future returned by store operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Persists a graph.
pub trait Syncer: Send + Sync {
    fn sync<'a>(&'a self, graph: &'a Graph) -> StoreFuture<'a, ()>;
}

/// Loads a previously persisted graph by uid.
pub trait Loader: Send + Sync {
    fn load<'a>(&'a self, uid: &'a str) -> StoreFuture<'a, Graph>;
}

/// Stored graph metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphRow {
    pub uid: String,
    pub label: String,
    #[serde(default)]
    pub attrs: Attrs,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRow {
    pub uid: String,
    pub label: String,
    #[serde(default)]
    pub attrs: Attrs,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRow {
    pub uid: String,
    /// Source node uid.
    pub source: String,
    /// Target node uid.
    pub target: String,
    pub label: String,
    pub weight: f64,
    #[serde(default)]
    pub attrs: Attrs,
}

/// Everything stored for a single graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    pub graph: GraphRow,
    #[serde(default)]
    pub nodes: Vec<NodeRow>,
    #[serde(default)]
    pub edges: Vec<EdgeRow>,
    /// Uids of the designated input nodes.
    #[serde(default)]
    pub inputs: Vec<String>,
    /// Uids of the designated output nodes.
    #[serde(default)]
    pub outputs: Vec<String>,
}
