// src/dag/subgraph.rs

//! Execution sub-graph derivation.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use petgraph::Direction;
use tracing::debug;

use crate::dag::graph::{Graph, GraphState, ensure_members};
use crate::dag::node::Node;
use crate::errors::Result;
use crate::types::NodeId;

impl Graph {
    /// Minimal sub-graph holding every output node plus every node on a
    /// directed path from one of `inputs` to one of `outputs`, with all parent
    /// edges between those nodes.
    ///
    /// The result is a structural view: it shares node and edge objects with
    /// this graph and keeps their ids, but does not re-bind node ownership.
    /// Its designated inputs are the `inputs` that made it into the view, its
    /// outputs are `outputs`.
    pub fn sub_graph(&self, inputs: &[Arc<Node>], outputs: &[Arc<Node>]) -> Result<Graph> {
        let state = self.shared.state.read();
        ensure_members(&state, inputs)?;
        ensure_members(&state, outputs)?;

        let sub = Graph::new();
        {
            let mut view = sub.shared.state.write();
            let targets: HashSet<NodeId> = outputs.iter().map(|n| n.id()).collect();

            for out in outputs {
                view.insert_view(out);
            }

            let mut memo: HashMap<NodeId, bool> = HashMap::new();
            for input in inputs {
                on_path_to_output(&state, &mut view, input.id(), &targets, &mut memo);
            }

            for (from, to, edge) in state.topology.all_edges() {
                if view.nodes.contains_key(&from) && view.nodes.contains_key(&to) {
                    view.topology.add_edge(from, to, Arc::clone(edge));
                }
            }

            view.inputs = inputs
                .iter()
                .filter(|n| view.is_member(n))
                .cloned()
                .collect();
            view.outputs = outputs.to_vec();

            debug!(
                graph = %state.uid,
                nodes = view.nodes.len(),
                edges = view.topology.edge_count(),
                "derived execution sub-graph"
            );
        }

        Ok(sub)
    }
}

/// Depth-first walk from `start`, marking every node that is an output or
/// reaches one and adding it to `view`.
///
/// Post-order with an explicit stack: a frame is finished once all of its
/// successors are, so chain depth is bounded by the heap, not the call stack.
fn on_path_to_output(
    parent: &GraphState,
    view: &mut GraphState,
    start: NodeId,
    targets: &HashSet<NodeId>,
    memo: &mut HashMap<NodeId, bool>,
) {
    if memo.contains_key(&start) {
        return;
    }

    let mut stack = vec![Frame::enter(parent, start, targets)];

    while let Some(frame) = stack.last_mut() {
        // Every successor is visited so that converging paths are memoized once.
        if let Some(&succ) = frame.successors.get(frame.next) {
            frame.next += 1;
            match memo.get(&succ) {
                Some(&known) => frame.on_path |= known,
                None => stack.push(Frame::enter(parent, succ, targets)),
            }
            continue;
        }

        let Some(done) = stack.pop() else {
            break;
        };
        if done.on_path {
            if let Some(node) = parent.nodes.get(&done.id) {
                if !view.is_member(node) {
                    view.insert_view(node);
                }
            }
        }
        memo.insert(done.id, done.on_path);
        if let Some(caller) = stack.last_mut() {
            caller.on_path |= done.on_path;
        }
    }
}

struct Frame {
    id: NodeId,
    successors: Vec<NodeId>,
    next: usize,
    on_path: bool,
}

impl Frame {
    fn enter(parent: &GraphState, id: NodeId, targets: &HashSet<NodeId>) -> Self {
        Self {
            id,
            successors: parent
                .topology
                .neighbors_directed(id, Direction::Outgoing)
                .collect(),
            next: 0,
            on_path: targets.contains(&id),
        }
    }
}
