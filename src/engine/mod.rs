// src/engine/mod.rs

//! Graph execution engine.
//!
//! A run seeds the designated input nodes, derives the execution sub-graph
//! between the graph inputs and outputs, and drives node execution with one
//! of two interchangeable strategies:
//!
//! - [`level`]: level-by-level, all nodes of a level concurrently, with a
//!   barrier between levels.
//! - [`all_at_once`]: every node spawned at once, each waiting on the
//!   completion signals of its direct predecessors.
//!
//! Both strategies feed a node the outputs of its predecessors *within the
//! execution sub-graph*, ordered by predecessor id, after its preset inputs.
//! The first failure cancels the shared token; no node starts after it.

use std::collections::HashMap;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::dag::Graph;
use crate::errors::{HypherError, Result};
use crate::types::Value;

pub use crate::types::RunMode;

pub mod all_at_once;
pub mod group;
pub mod level;
pub mod task;

pub use group::TaskGroup;

/// Options recognised by [`Graph::run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub mode: RunMode,
}

impl RunOptions {
    pub fn with_mode(mode: RunMode) -> Self {
        Self { mode }
    }
}

pub(crate) async fn run(
    graph: &Graph,
    ctx: &CancellationToken,
    inputs: HashMap<String, Value>,
    options: RunOptions,
) -> Result<()> {
    let graph_inputs = graph.inputs();
    let graph_outputs = graph.outputs();

    for node in graph_inputs.iter() {
        if let Some(value) = inputs.get(&node.uid()) {
            node.set_inputs(vec![value.clone()]);
        }
    }

    let sub = graph.sub_graph(&graph_inputs, &graph_outputs)?;

    info!(
        graph = %graph.uid(),
        mode = ?options.mode,
        nodes = sub.node_count(),
        "graph run started"
    );

    let result = match options.mode {
        RunMode::Level => level::run_levels(&sub, ctx).await,
        RunMode::AllAtOnce => all_at_once::run_all(&sub, ctx).await,
    };

    match result {
        Ok(()) => {
            info!(graph = %graph.uid(), "graph run finished");
            Ok(())
        }
        Err(err) if ctx.is_cancelled() => {
            warn!(graph = %graph.uid(), error = %err, "graph run cancelled by caller");
            Err(HypherError::Cancelled)
        }
        Err(err) => {
            warn!(graph = %graph.uid(), error = %err, "graph run failed");
            Err(HypherError::RunFailed(Box::new(err)))
        }
    }
}
