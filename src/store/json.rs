// src/store/json.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::dag::{Edge, Graph, Node};
use crate::errors::{HypherError, Result};
use crate::store::{
    EdgeRow, GraphDocument, GraphRow, Loader, NodeRow, StoreFuture, Syncer,
};

/// File-backed store keeping `<dir>/<graph uid>.json` per graph.
#[derive(Debug, Clone)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Location of the document for graph `uid`.
    pub fn path_for(&self, uid: &str) -> PathBuf {
        self.dir.join(format!("{uid}.json"))
    }
}

impl Syncer for JsonStore {
    fn sync<'a>(&'a self, graph: &'a Graph) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            let doc = snapshot(graph);
            let path = self.path_for(&doc.graph.uid);
            let bytes = serde_json::to_vec_pretty(&doc)?;

            tokio::fs::create_dir_all(&self.dir).await?;
            tokio::fs::write(&path, bytes).await?;

            info!(
                graph = %doc.graph.uid,
                nodes = doc.nodes.len(),
                edges = doc.edges.len(),
                path = %path.display(),
                "graph synced"
            );
            Ok(())
        })
    }
}

impl Loader for JsonStore {
    fn load<'a>(&'a self, uid: &'a str) -> StoreFuture<'a, Graph> {
        Box::pin(async move {
            let path = self.path_for(uid);
            let bytes = tokio::fs::read(&path).await?;
            let doc: GraphDocument = serde_json::from_slice(&bytes)?;
            debug!(graph = %uid, path = %path.display(), "graph document read");
            restore(&doc)
        })
    }
}

/// Capture the persistent view of `graph`.
pub fn snapshot(graph: &Graph) -> GraphDocument {
    GraphDocument {
        graph: GraphRow {
            uid: graph.uid(),
            label: graph.label(),
            attrs: graph.attrs(),
        },
        nodes: graph
            .nodes()
            .iter()
            .map(|n| NodeRow {
                uid: n.uid(),
                label: n.label(),
                attrs: n.attrs(),
            })
            .collect(),
        edges: graph
            .edges()
            .iter()
            .map(|e| EdgeRow {
                uid: e.uid(),
                source: e.from().uid(),
                target: e.to().uid(),
                label: e.label(),
                weight: e.weight(),
                attrs: e.attrs(),
            })
            .collect(),
        inputs: graph.inputs().iter().map(|n| n.uid()).collect(),
        outputs: graph.outputs().iter().map(|n| n.uid()).collect(),
    }
}

/// Rebuild a graph from a stored document. Nodes get the default op.
pub fn restore(doc: &GraphDocument) -> Result<Graph> {
    let graph = Graph::builder()
        .uid(doc.graph.uid.clone())
        .label(doc.graph.label.clone())
        .attrs(&doc.graph.attrs)
        .build();

    for row in doc.nodes.iter() {
        graph.new_node(
            Node::builder()
                .uid(row.uid.clone())
                .label(row.label.clone())
                .attrs(&row.attrs),
        );
    }

    for row in doc.edges.iter() {
        let from = lookup(&graph, &row.source)?;
        let to = lookup(&graph, &row.target)?;
        graph.new_edge(
            Edge::builder(&from, &to)
                .uid(row.uid.clone())
                .label(row.label.clone())
                .weight(row.weight)
                .attrs(&row.attrs),
        )?;
    }

    let inputs = doc
        .inputs
        .iter()
        .map(|uid| lookup(&graph, uid))
        .collect::<Result<Vec<_>>>()?;
    graph.set_inputs(inputs)?;

    let outputs = doc
        .outputs
        .iter()
        .map(|uid| lookup(&graph, uid))
        .collect::<Result<Vec<_>>>()?;
    graph.set_outputs(outputs)?;

    Ok(graph)
}

fn lookup(graph: &Graph, uid: &str) -> Result<Arc<Node>> {
    graph.node_by_uid(uid).ok_or_else(|| {
        HypherError::InvalidNode(format!(
            "stored graph {} references unknown node {uid}",
            graph.uid()
        ))
    })
}
