// src/dag/copy.rs

use std::sync::Arc;

use crate::dag::graph::Graph;

impl Graph {
    /// Fully independent copy of the graph.
    ///
    /// Every node and edge is value-copied (ids, uids, labels, weights and
    /// attributes preserved; ops shared; no I/O history), and the input and
    /// output designations point at the copied nodes.
    pub fn deep_copy(&self) -> Graph {
        let state = self.shared.state.read();
        let copy = Graph::builder()
            .uid(state.uid.clone())
            .label(state.label.clone())
            .attrs(&state.attrs)
            .build();

        {
            let weak = Arc::downgrade(&copy.shared);
            let mut cs = copy.shared.state.write();

            let mut ids: Vec<_> = state.nodes.keys().copied().collect();
            ids.sort_unstable();
            for id in ids {
                if let Some(node) = state.nodes.get(&id) {
                    cs.register(weak.clone(), &node.deep_copy());
                }
            }

            for (from, to, edge) in state.topology.all_edges() {
                let (Some(f), Some(t)) = (cs.nodes.get(&from).cloned(), cs.nodes.get(&to).cloned())
                else {
                    continue;
                };
                cs.topology.add_edge(from, to, edge.copy_between(&f, &t));
            }

            cs.inputs = state
                .inputs
                .iter()
                .filter_map(|n| cs.nodes.get(&n.id()).cloned())
                .collect();
            cs.outputs = state
                .outputs
                .iter()
                .filter_map(|n| cs.nodes.get(&n.id()).cloned())
                .collect();
        }

        copy
    }
}
