// src/dag/sort.rs

//! Topological ordering and dependency levels.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::sync::Arc;

use petgraph::Direction;

use crate::dag::graph::{Graph, GraphState};
use crate::dag::node::Node;
use crate::errors::{HypherError, Result};
use crate::types::NodeId;

impl Graph {
    /// Nodes in dependency order. Nodes at the same dependency depth come out
    /// in ascending id order.
    ///
    /// Fails with [`HypherError::Cycle`] if the graph is not acyclic.
    pub fn topo_sort(&self) -> Result<Vec<Arc<Node>>> {
        Ok(self.topo_sort_with_levels()?.into_iter().flatten().collect())
    }

    /// Nodes grouped by level: a node's level is one more than the highest
    /// level among its direct predecessors, zero for roots.
    pub fn topo_sort_with_levels(&self) -> Result<Vec<Vec<Arc<Node>>>> {
        let state = self.shared.state.read();
        let levels = level_ids(&state)?;
        Ok(levels
            .into_iter()
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| state.nodes.get(id).cloned())
                    .collect()
            })
            .collect())
    }
}

/// Kahn's algorithm over node ids, smallest ready id first.
pub(crate) fn sorted_ids(state: &GraphState) -> Result<Vec<NodeId>> {
    let mut in_degree: HashMap<NodeId, usize> = state
        .topology
        .nodes()
        .map(|id| {
            let deg = state
                .topology
                .neighbors_directed(id, Direction::Incoming)
                .count();
            (id, deg)
        })
        .collect();

    let mut ready: BinaryHeap<Reverse<NodeId>> = in_degree
        .iter()
        .filter(|(_, deg)| **deg == 0)
        .map(|(id, _)| Reverse(*id))
        .collect();

    let mut order = Vec::with_capacity(in_degree.len());
    while let Some(Reverse(id)) = ready.pop() {
        order.push(id);
        for succ in state.topology.neighbors_directed(id, Direction::Outgoing) {
            if let Some(deg) = in_degree.get_mut(&succ) {
                *deg -= 1;
                if *deg == 0 {
                    ready.push(Reverse(succ));
                }
            }
        }
    }

    if order.len() != in_degree.len() {
        let stuck = in_degree
            .iter()
            .filter(|(_, deg)| **deg > 0)
            .map(|(id, _)| *id)
            .min()
            .unwrap_or_default();
        return Err(HypherError::Cycle(format!(
            "graph {} has a cycle involving node {}",
            state.uid, stuck
        )));
    }

    Ok(order)
}

pub(crate) fn level_ids(state: &GraphState) -> Result<Vec<Vec<NodeId>>> {
    let order = sorted_ids(state)?;

    let mut level_of: HashMap<NodeId, usize> = HashMap::with_capacity(order.len());
    let mut levels: Vec<Vec<NodeId>> = Vec::new();

    for id in order {
        let level = state
            .topology
            .neighbors_directed(id, Direction::Incoming)
            .filter_map(|pred| level_of.get(&pred))
            .map(|lvl| lvl + 1)
            .max()
            .unwrap_or(0);
        level_of.insert(id, level);

        if levels.len() <= level {
            levels.resize_with(level + 1, Vec::new);
        }
        levels[level].push(id);
    }

    for ids in levels.iter_mut() {
        ids.sort_unstable();
    }

    Ok(levels)
}
