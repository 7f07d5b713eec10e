// src/dag/graph.rs

//! Graph topology and cycle-safe mutation.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use petgraph::Direction;
use petgraph::algo::has_path_connecting;
use petgraph::graphmap::DiGraphMap;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::dag::edge::{Edge, EdgeBuilder};
use crate::dag::node::{Node, NodeBuilder};
use crate::engine::{self, RunOptions};
use crate::errors::{HypherError, Result};
use crate::types::{Attrs, NONE_ID, NodeId, Value};

/// Default graph label.
pub const DEFAULT_GRAPH_LABEL: &str = "HypherGraph";

/// Weighted directed acyclic graph of executable nodes.
///
/// `Graph` is a cheap handle: clones refer to the same underlying graph.
/// Topology and metadata are guarded by one graph-wide reader/writer lock.
/// Nodes hold only a weak reference back to the graph.
#[derive(Clone)]
pub struct Graph {
    pub(crate) shared: Arc<GraphShared>,
}

pub(crate) struct GraphShared {
    pub(crate) state: RwLock<GraphState>,
}

pub(crate) struct GraphState {
    pub(crate) uid: String,
    pub(crate) label: String,
    pub(crate) attrs: Attrs,
    /// Node ids with edges weighted by the edge objects themselves.
    pub(crate) topology: DiGraphMap<NodeId, Arc<Edge>>,
    pub(crate) nodes: HashMap<NodeId, Arc<Node>>,
    /// Node uid -> node id.
    pub(crate) index: HashMap<String, NodeId>,
    /// Highest id currently stored, `NONE_ID` when empty.
    pub(crate) max_id: NodeId,
    pub(crate) inputs: Vec<Arc<Node>>,
    pub(crate) outputs: Vec<Arc<Node>>,
}

/// Builder for [`Graph`].
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    uid: Option<String>,
    label: String,
    attrs: Attrs,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self {
            uid: None,
            label: DEFAULT_GRAPH_LABEL.to_string(),
            attrs: Attrs::new(),
        }
    }
}

impl GraphBuilder {
    pub fn uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = Some(uid.into());
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn attrs(mut self, attrs: &Attrs) -> Self {
        self.attrs = attrs.clone();
        self
    }

    pub fn build(self) -> Graph {
        Graph {
            shared: Arc::new(GraphShared {
                state: RwLock::new(GraphState {
                    uid: self.uid.unwrap_or_else(|| Uuid::new_v4().to_string()),
                    label: self.label,
                    attrs: self.attrs,
                    topology: DiGraphMap::new(),
                    nodes: HashMap::new(),
                    index: HashMap::new(),
                    max_id: NONE_ID,
                    inputs: Vec::new(),
                    outputs: Vec::new(),
                }),
            }),
        }
    }
}

/// State displaced by an undoable registration.
struct Rollback {
    prev_id: NodeId,
    prev_graph: Weak<GraphShared>,
    /// Index entry previously held by the node's uid.
    displaced: Option<NodeId>,
}

impl GraphState {
    /// A node is a member iff this graph stores that exact node under its id.
    pub(crate) fn is_member(&self, node: &Arc<Node>) -> bool {
        self.nodes
            .get(&node.id())
            .is_some_and(|member| Arc::ptr_eq(member, node))
    }

    fn next_id(&self) -> NodeId {
        self.max_id + 1
    }

    fn store(&mut self, id: NodeId, node: &Arc<Node>) -> Option<NodeId> {
        self.topology.add_node(id);
        self.nodes.insert(id, Arc::clone(node));
        self.max_id = self.max_id.max(id);
        self.index.insert(node.uid(), id)
    }

    /// Place `node` into this graph, keeping its id when it is free.
    pub(crate) fn register(&mut self, graph: Weak<GraphShared>, node: &Arc<Node>) -> NodeId {
        self.register_undoable(graph, node);
        node.id()
    }

    /// Like [`GraphState::register`], but records what has to be restored
    /// should the registration be undone.
    fn register_undoable(&mut self, graph: Weak<GraphShared>, node: &Arc<Node>) -> Rollback {
        let (prev_id, prev_graph) = node.placement();
        let wanted = node.id();
        let id = if wanted <= NONE_ID || self.nodes.contains_key(&wanted) {
            self.next_id()
        } else {
            wanted
        };

        node.place(id, graph);
        let displaced = self.store(id, node);
        Rollback {
            prev_id,
            prev_graph,
            displaced,
        }
    }

    /// Insert a node without re-binding its owner. Used for structural views.
    pub(crate) fn insert_view(&mut self, node: &Arc<Node>) {
        self.store(node.id(), node);
    }

    /// Undo [`GraphState::register_undoable`]: the node's placement and the
    /// uid index entry it displaced are both restored.
    fn unregister(&mut self, node: &Arc<Node>, undo: Rollback) {
        let id = node.id();
        self.topology.remove_node(id);
        self.nodes.remove(&id);
        if id == self.max_id {
            self.max_id = self.nodes.keys().max().copied().unwrap_or(NONE_ID);
        }

        let uid = node.uid();
        match undo.displaced {
            Some(previous) => {
                self.index.insert(uid, previous);
            }
            None => {
                self.index.remove(&uid);
            }
        }
        node.place(undo.prev_id, undo.prev_graph);
    }

    pub(crate) fn neighbours(&self, id: NodeId, dir: Direction) -> Vec<Arc<Node>> {
        let mut ids: Vec<NodeId> = self.topology.neighbors_directed(id, dir).collect();
        ids.sort_unstable();
        ids.iter()
            .filter_map(|id| self.nodes.get(id).cloned())
            .collect()
    }
}

impl Default for Graph {
    fn default() -> Self {
        GraphBuilder::default().build()
    }
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> GraphBuilder {
        GraphBuilder::default()
    }

    pub(crate) fn from_shared(shared: Arc<GraphShared>) -> Self {
        Self { shared }
    }

    /// Whether both handles refer to the same graph.
    pub fn same_as(&self, other: &Graph) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }

    pub fn uid(&self) -> String {
        self.shared.state.read().uid.clone()
    }

    pub fn set_uid(&self, uid: impl Into<String>) {
        self.shared.state.write().uid = uid.into();
    }

    pub fn label(&self) -> String {
        self.shared.state.read().label.clone()
    }

    pub fn set_label(&self, label: impl Into<String>) {
        self.shared.state.write().label = label.into();
    }

    pub fn attrs(&self) -> Attrs {
        self.shared.state.read().attrs.clone()
    }

    pub fn set_attrs(&self, attrs: &Attrs) {
        self.shared.state.write().attrs = attrs.clone();
    }

    /// Add `node` to the graph.
    ///
    /// Idempotent for nodes that are already members. Otherwise the node keeps
    /// its id if that id is free here, or gets a freshly minted one, and is
    /// re-bound to this graph.
    pub fn add_node(&self, node: &Arc<Node>) {
        let mut state = self.shared.state.write();

        if state.is_member(node) {
            state.index.insert(node.uid(), node.id());
            return;
        }

        let id = state.register(Arc::downgrade(&self.shared), node);
        debug!(graph = %state.uid, node = %node.uid(), id, "node added");
    }

    /// Build a node from `builder` and register it here.
    pub fn new_node(&self, builder: NodeBuilder) -> Arc<Node> {
        builder.graph(self).build()
    }

    /// Build an edge from `builder` and set it here.
    pub fn new_edge(&self, builder: EdgeBuilder) -> Result<Arc<Edge>> {
        builder.graph(self).build()
    }

    /// Set `edge` in the graph, registering its endpoints if needed.
    ///
    /// Re-setting an existing structural edge is a no-op (the stored edge is
    /// kept as is). If the edge would close a cycle, the edge and any endpoint
    /// registered by this call are removed again and [`HypherError::Cycle`]
    /// is returned: the graph is left exactly as it was.
    pub fn set_edge(&self, edge: &Arc<Edge>) -> Result<()> {
        let mut state = self.shared.state.write();
        let (from, to) = (edge.from(), edge.to());

        if state.is_member(from)
            && state.is_member(to)
            && state.topology.contains_edge(from.id(), to.id())
        {
            return Ok(());
        }

        let from_undo = if state.is_member(from) {
            None
        } else {
            Some(state.register_undoable(Arc::downgrade(&self.shared), from))
        };
        let to_undo = if state.is_member(to) {
            None
        } else {
            Some(state.register_undoable(Arc::downgrade(&self.shared), to))
        };

        let (from_id, to_id) = (from.id(), to.id());
        state.topology.add_edge(from_id, to_id, Arc::clone(edge));

        // A target without successors cannot lead back to the source.
        let closes_cycle = from_id == to_id
            || (state
                .topology
                .neighbors_directed(to_id, Direction::Outgoing)
                .next()
                .is_some()
                && has_path_connecting(&state.topology, to_id, from_id, None));

        if closes_cycle {
            state.topology.remove_edge(from_id, to_id);
            if let Some(undo) = to_undo {
                state.unregister(to, undo);
            }
            if let Some(undo) = from_undo {
                state.unregister(from, undo);
            }

            warn!(
                graph = %state.uid,
                from = %from.uid(),
                to = %to.uid(),
                "rejecting edge: it would introduce a cycle"
            );
            return Err(HypherError::Cycle(format!(
                "adding edge {} ({}) -> {} ({})",
                from.uid(),
                from_id,
                to.uid(),
                to_id
            )));
        }

        debug!(graph = %state.uid, from = from_id, to = to_id, "edge set");
        Ok(())
    }

    pub fn node(&self, id: NodeId) -> Option<Arc<Node>> {
        self.shared.state.read().nodes.get(&id).cloned()
    }

    pub fn node_by_uid(&self, uid: &str) -> Option<Arc<Node>> {
        let state = self.shared.state.read();
        state.index.get(uid).and_then(|id| state.nodes.get(id).cloned())
    }

    pub fn contains(&self, node: &Arc<Node>) -> bool {
        self.shared.state.read().is_member(node)
    }

    /// All nodes, ordered by id.
    pub fn nodes(&self) -> Vec<Arc<Node>> {
        let state = self.shared.state.read();
        let mut nodes: Vec<_> = state.nodes.values().cloned().collect();
        nodes.sort_by_key(|n| n.id());
        nodes
    }

    /// All edges, ordered by (from id, to id).
    pub fn edges(&self) -> Vec<Arc<Edge>> {
        let state = self.shared.state.read();
        let mut edges: Vec<_> = state
            .topology
            .all_edges()
            .map(|(from, to, e)| ((from, to), Arc::clone(e)))
            .collect();
        edges.sort_by_key(|(key, _)| *key);
        edges.into_iter().map(|(_, e)| e).collect()
    }

    pub fn edge(&self, from: NodeId, to: NodeId) -> Option<Arc<Edge>> {
        self.shared
            .state
            .read()
            .topology
            .edge_weight(from, to)
            .cloned()
    }

    pub fn has_edge_from_to(&self, from: NodeId, to: NodeId) -> bool {
        self.shared.state.read().topology.contains_edge(from, to)
    }

    /// Direct predecessors of node `id`, ordered by id.
    pub fn predecessors(&self, id: NodeId) -> Vec<Arc<Node>> {
        self.shared.state.read().neighbours(id, Direction::Incoming)
    }

    /// Direct successors of node `id`, ordered by id.
    pub fn successors(&self, id: NodeId) -> Vec<Arc<Node>> {
        self.shared.state.read().neighbours(id, Direction::Outgoing)
    }

    pub fn node_count(&self) -> usize {
        self.shared.state.read().nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.shared.state.read().topology.edge_count()
    }

    /// Designate the graph input nodes. All must already be members.
    pub fn set_inputs(&self, nodes: Vec<Arc<Node>>) -> Result<()> {
        let mut state = self.shared.state.write();
        ensure_members(&state, &nodes)?;
        state.inputs = nodes;
        Ok(())
    }

    pub fn inputs(&self) -> Vec<Arc<Node>> {
        self.shared.state.read().inputs.clone()
    }

    /// Designate the graph output nodes. All must already be members.
    pub fn set_outputs(&self, nodes: Vec<Arc<Node>>) -> Result<()> {
        let mut state = self.shared.state.write();
        ensure_members(&state, &nodes)?;
        state.outputs = nodes;
        Ok(())
    }

    pub fn outputs(&self) -> Vec<Arc<Node>> {
        self.shared.state.read().outputs.clone()
    }

    /// Run the graph.
    ///
    /// `inputs` seeds the preset inputs of the designated input nodes, keyed
    /// by node uid. See [`crate::engine`] for the scheduling semantics.
    pub async fn run(
        &self,
        ctx: &CancellationToken,
        inputs: HashMap<String, Value>,
        options: RunOptions,
    ) -> Result<()> {
        engine::run(self, ctx, inputs, options).await
    }
}

pub(crate) fn ensure_members(state: &GraphState, nodes: &[Arc<Node>]) -> Result<()> {
    match nodes.iter().find(|n| !state.is_member(n)) {
        Some(stranger) => Err(HypherError::InvalidNode(format!(
            "node {} is not a member of graph {}",
            stranger.uid(),
            state.uid
        ))),
        None => Ok(()),
    }
}

impl fmt::Debug for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state.read();
        f.debug_struct("Graph")
            .field("uid", &state.uid)
            .field("label", &state.label)
            .field("nodes", &state.nodes.len())
            .field("edges", &state.topology.edge_count())
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state.read();
        writeln!(f, "Graph: {}", state.label)?;
        writeln!(f, "  UID: {}", state.uid)?;
        writeln!(f, "  Nodes: {}", state.nodes.len())?;
        writeln!(f, "  Edges: {}", state.topology.edge_count())?;
        if !state.inputs.is_empty() {
            writeln!(f, "  Input Nodes: {}", state.inputs.len())?;
        }
        if !state.outputs.is_empty() {
            writeln!(f, "  Output Nodes: {}", state.outputs.len())?;
        }
        if !state.attrs.is_empty() {
            writeln!(f, "  Attributes:")?;
            for (k, v) in state.attrs.iter() {
                writeln!(f, "    {k}: {v}")?;
            }
        }
        Ok(())
    }
}
