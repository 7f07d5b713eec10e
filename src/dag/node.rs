// src/dag/node.rs

//! Graph node: identity, attributes, preset inputs and output history.

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use uuid::Uuid;

use crate::dag::graph::{Graph, GraphShared};
use crate::dag::op::{NoOp, Op};
use crate::dag::style::Style;
use crate::errors::{HypherError, Result};
use crate::types::{Attrs, NONE_ID, NodeId, Value};

/// Default node label.
pub const DEFAULT_NODE_LABEL: &str = "HypherNode";

/// A graph node.
///
/// Nodes are shared as `Arc<Node>`; all mutable state lives behind a per-node
/// reader/writer lock so that many successors can read `outputs()` while the
/// node's own `exec` appends to it.
pub struct Node {
    state: RwLock<NodeState>,
}

struct NodeState {
    id: NodeId,
    uid: String,
    label: String,
    attrs: Attrs,
    style: Style,
    /// Owning graph. Never keeps the graph alive.
    graph: Weak<GraphShared>,
    op: Arc<dyn Op>,
    inputs: Vec<Value>,
    outputs: Vec<Value>,
}

/// Builder for [`Node`]. Later calls override earlier ones.
pub struct NodeBuilder {
    id: NodeId,
    uid: Option<String>,
    label: String,
    attrs: Attrs,
    style: Style,
    op: Arc<dyn Op>,
    graph: Option<Graph>,
}

impl Default for NodeBuilder {
    fn default() -> Self {
        Self {
            id: NONE_ID,
            uid: None,
            label: DEFAULT_NODE_LABEL.to_string(),
            attrs: Attrs::new(),
            style: Style::node_default(),
            op: Arc::new(NoOp),
            graph: None,
        }
    }
}

impl NodeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preferred numeric id. The graph keeps it only if it is free.
    pub fn id(mut self, id: NodeId) -> Self {
        self.id = id;
        self
    }

    pub fn uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = Some(uid.into());
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Attributes are copied; later mutation of `attrs` does not leak in.
    pub fn attrs(mut self, attrs: &Attrs) -> Self {
        self.attrs = attrs.clone();
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn op(self, op: impl Op + 'static) -> Self {
        self.shared_op(Arc::new(op))
    }

    pub fn shared_op(mut self, op: Arc<dyn Op>) -> Self {
        self.op = op;
        self
    }

    /// Register the node into `graph` as soon as it is built.
    pub fn graph(mut self, graph: &Graph) -> Self {
        self.graph = Some(graph.clone());
        self
    }

    pub fn build(self) -> Arc<Node> {
        let node = Arc::new(Node {
            state: RwLock::new(NodeState {
                id: self.id,
                uid: self.uid.unwrap_or_else(|| Uuid::new_v4().to_string()),
                label: self.label,
                attrs: self.attrs,
                style: self.style,
                graph: Weak::new(),
                op: self.op,
                inputs: Vec::new(),
                outputs: Vec::new(),
            }),
        });

        if let Some(graph) = self.graph {
            graph.add_node(&node);
        }

        node
    }
}

impl Node {
    pub fn builder() -> NodeBuilder {
        NodeBuilder::new()
    }

    /// Standalone node with default settings.
    pub fn new() -> Arc<Node> {
        NodeBuilder::new().build()
    }

    pub fn id(&self) -> NodeId {
        self.state.read().id
    }

    pub fn uid(&self) -> String {
        self.state.read().uid.clone()
    }

    pub fn set_uid(&self, uid: impl Into<String>) {
        self.state.write().uid = uid.into();
    }

    pub fn label(&self) -> String {
        self.state.read().label.clone()
    }

    pub fn set_label(&self, label: impl Into<String>) {
        self.state.write().label = label.into();
    }

    pub fn attrs(&self) -> Attrs {
        self.state.read().attrs.clone()
    }

    pub fn style(&self) -> Style {
        self.state.read().style.clone()
    }

    pub fn op(&self) -> Arc<dyn Op> {
        Arc::clone(&self.state.read().op)
    }

    /// The graph that currently owns this node, if it is still alive.
    pub fn graph(&self) -> Option<Graph> {
        self.state.read().graph.upgrade().map(Graph::from_shared)
    }

    /// Preset inputs merged in front of predecessor outputs at `exec` time.
    pub fn inputs(&self) -> Vec<Value> {
        self.state.read().inputs.clone()
    }

    /// Replace the preset input buffer.
    pub fn set_inputs(&self, inputs: Vec<Value>) {
        self.state.write().inputs = inputs;
    }

    /// Output history, one entry per completed `exec`.
    pub fn outputs(&self) -> Vec<Value> {
        self.state.read().outputs.clone()
    }

    /// Clear preset inputs and output history.
    pub fn reset(&self) {
        let mut state = self.state.write();
        state.inputs.clear();
        state.outputs.clear();
    }

    /// Run the node's op over its preset inputs followed by `extra`.
    ///
    /// The lock is not held while the op runs; the result is appended to the
    /// output history once the op returns.
    pub async fn exec(&self, ctx: &CancellationToken, extra: Vec<Value>) -> Result<Value> {
        let (op, uid, mut inputs) = {
            let state = self.state.read();
            (Arc::clone(&state.op), state.uid.clone(), state.inputs.clone())
        };
        inputs.extend(extra);

        debug!(node = %uid, op = op.kind(), inputs = inputs.len(), "executing node");

        let output = op
            .apply(ctx, inputs)
            .await
            .map_err(|source| HypherError::NodeExec {
                uid,
                desc: op.desc().to_string(),
                source,
            })?;

        self.state.write().outputs.push(output.clone());
        Ok(output)
    }

    /// New standalone node with a fresh uid, the same label, style and a copy
    /// of the attributes. No graph, no op, no I/O history.
    pub fn clone_detached(&self) -> Arc<Node> {
        let state = self.state.read();
        NodeBuilder::new()
            .label(state.label.clone())
            .attrs(&state.attrs)
            .style(state.style.clone())
            .build()
    }

    /// Like [`Node::clone_detached`], then registers the clone into `graph`.
    pub fn clone_to(&self, graph: &Graph) -> Arc<Node> {
        let node = self.clone_detached();
        graph.add_node(&node);
        node
    }

    /// Value copy keeping id, uid and op, detached from any graph and
    /// without I/O history.
    pub(crate) fn deep_copy(&self) -> Arc<Node> {
        let state = self.state.read();
        Arc::new(Node {
            state: RwLock::new(NodeState {
                id: state.id,
                uid: state.uid.clone(),
                label: state.label.clone(),
                attrs: state.attrs.clone(),
                style: state.style.clone(),
                graph: Weak::new(),
                op: Arc::clone(&state.op),
                inputs: Vec::new(),
                outputs: Vec::new(),
            }),
        })
    }

    /// Current id and owning graph, used to undo a failed registration.
    pub(crate) fn placement(&self) -> (NodeId, Weak<GraphShared>) {
        let state = self.state.read();
        (state.id, state.graph.clone())
    }

    pub(crate) fn place(&self, id: NodeId, graph: Weak<GraphShared>) {
        let mut state = self.state.write();
        state.id = id;
        state.graph = graph;
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("Node")
            .field("id", &state.id)
            .field("uid", &state.uid)
            .field("label", &state.label)
            .field("op", &state.op.kind())
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Resolve the graph uid before taking the node lock: graph mutation
        // locks the graph first and the node second.
        let graph_uid = self.graph().map(|g| g.uid());
        let state = self.state.read();
        writeln!(f, "Node: {}", state.label)?;
        writeln!(f, "  ID: {}", state.id)?;
        writeln!(f, "  UID: {}", state.uid)?;
        match graph_uid {
            Some(uid) => writeln!(f, "  Graph: {uid}")?,
            None => writeln!(f, "  Graph: <not associated>")?,
        }
        if !state.inputs.is_empty() {
            writeln!(f, "  Inputs: {}", state.inputs.len())?;
        }
        if !state.outputs.is_empty() {
            writeln!(f, "  Outputs: {}", state.outputs.len())?;
        }
        writeln!(f, "  Op: {}, Desc: {}", state.op.kind(), state.op.desc())?;
        if !state.attrs.is_empty() {
            writeln!(f, "  Attributes:")?;
            for (k, v) in state.attrs.iter() {
                writeln!(f, "    {k}: {v}")?;
            }
        }
        Ok(())
    }
}
