// src/dag/edge.rs

//! Directed, weighted link between two nodes.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use uuid::Uuid;

use crate::dag::graph::Graph;
use crate::dag::node::Node;
use crate::dag::style::Style;
use crate::errors::Result;
use crate::types::Attrs;

pub const DEFAULT_EDGE_LABEL: &str = "HypherEdge";
pub const DEFAULT_EDGE_WEIGHT: f64 = 1.0;

/// Weighted edge. The edge references its endpoints but does not own them.
pub struct Edge {
    from: Arc<Node>,
    to: Arc<Node>,
    state: RwLock<EdgeState>,
}

#[derive(Clone)]
struct EdgeState {
    uid: String,
    label: String,
    weight: f64,
    attrs: Attrs,
    style: Style,
}

/// Builder for [`Edge`]. Later calls override earlier ones.
pub struct EdgeBuilder {
    from: Arc<Node>,
    to: Arc<Node>,
    uid: Option<String>,
    label: String,
    weight: f64,
    attrs: Attrs,
    style: Style,
    graph: Option<Graph>,
}

impl EdgeBuilder {
    pub fn new(from: &Arc<Node>, to: &Arc<Node>) -> Self {
        Self {
            from: Arc::clone(from),
            to: Arc::clone(to),
            uid: None,
            label: DEFAULT_EDGE_LABEL.to_string(),
            weight: DEFAULT_EDGE_WEIGHT,
            attrs: Attrs::new(),
            style: Style::edge_default(),
            graph: None,
        }
    }

    pub fn uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = Some(uid.into());
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn attrs(mut self, attrs: &Attrs) -> Self {
        self.attrs = attrs.clone();
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Set the edge into `graph` on build; building then fails if the edge
    /// would introduce a cycle.
    pub fn graph(mut self, graph: &Graph) -> Self {
        self.graph = Some(graph.clone());
        self
    }

    pub fn build(self) -> Result<Arc<Edge>> {
        let edge = Arc::new(Edge {
            from: self.from,
            to: self.to,
            state: RwLock::new(EdgeState {
                uid: self.uid.unwrap_or_else(|| Uuid::new_v4().to_string()),
                label: self.label,
                weight: self.weight,
                attrs: self.attrs,
                style: self.style,
            }),
        });

        if let Some(graph) = self.graph {
            graph.set_edge(&edge)?;
        }

        Ok(edge)
    }
}

impl Edge {
    pub fn builder(from: &Arc<Node>, to: &Arc<Node>) -> EdgeBuilder {
        EdgeBuilder::new(from, to)
    }

    /// Standalone edge with default settings.
    pub fn new(from: &Arc<Node>, to: &Arc<Node>) -> Arc<Edge> {
        Arc::new(Edge {
            from: Arc::clone(from),
            to: Arc::clone(to),
            state: RwLock::new(EdgeState {
                uid: Uuid::new_v4().to_string(),
                label: DEFAULT_EDGE_LABEL.to_string(),
                weight: DEFAULT_EDGE_WEIGHT,
                attrs: Attrs::new(),
                style: Style::edge_default(),
            }),
        })
    }

    pub fn from(&self) -> &Arc<Node> {
        &self.from
    }

    pub fn to(&self) -> &Arc<Node> {
        &self.to
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

    pub fn weight(&self) -> f64 {
        self.state.read().weight
    }

    pub fn set_weight(&self, weight: f64) {
        self.state.write().weight = weight;
    }

    pub fn attrs(&self) -> Attrs {
        self.state.read().attrs.clone()
    }

    pub fn style(&self) -> Style {
        self.state.read().style.clone()
    }

    /// Same logical edge viewed in the opposite direction: endpoints swapped,
    /// uid, label, weight and attributes preserved.
    pub fn reversed(&self) -> Arc<Edge> {
        Arc::new(Edge {
            from: Arc::clone(&self.to),
            to: Arc::clone(&self.from),
            state: RwLock::new(self.state.read().clone()),
        })
    }

    /// Value copy of this edge attached to other endpoints.
    pub(crate) fn copy_between(&self, from: &Arc<Node>, to: &Arc<Node>) -> Arc<Edge> {
        Arc::new(Edge {
            from: Arc::clone(from),
            to: Arc::clone(to),
            state: RwLock::new(self.state.read().clone()),
        })
    }
}

impl fmt::Debug for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Edge")
            .field("uid", &self.uid())
            .field("from", &self.from.id())
            .field("to", &self.to.id())
            .field("weight", &self.weight())
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (from_id, from_uid) = (self.from.id(), self.from.uid());
        let (to_id, to_uid) = (self.to.id(), self.to.uid());
        let state = self.state.read();
        writeln!(f, "Edge: {}", state.label)?;
        writeln!(f, "  UID: {}", state.uid)?;
        writeln!(f, "  From: Node({from_id}/{from_uid})")?;
        writeln!(f, "  To: Node({to_id}/{to_uid})")?;
        writeln!(f, "  Weight: {:.2}", state.weight)?;
        if !state.attrs.is_empty() {
            writeln!(f, "  Attributes:")?;
            for (k, v) in state.attrs.iter() {
                writeln!(f, "    {k}: {v}")?;
            }
        }
        Ok(())
    }
}
