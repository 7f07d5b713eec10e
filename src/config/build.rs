// src/config/build.rs

use std::sync::Arc;

use tracing::debug;

use crate::config::model::GraphFile;
use crate::dag::{Edge, Graph, Node};
use crate::errors::{HypherError, Result};
use crate::ops;

/// Build a runnable graph from a validated definition.
///
/// Node uids are the `[node.<name>]` names; nodes are created in name order
/// so ids are stable for a given file. Without declared inputs the root nodes
/// are used; without declared outputs the leaf nodes are used.
pub fn build_graph(cfg: &GraphFile) -> Result<Graph> {
    let mut builder = Graph::builder()
        .label(cfg.graph.label.clone())
        .attrs(&cfg.graph.attrs);
    if let Some(uid) = &cfg.graph.uid {
        builder = builder.uid(uid.clone());
    }
    let graph = builder.build();

    for (name, nc) in cfg.node.iter() {
        let op = ops::from_name(&nc.op).ok_or_else(|| {
            HypherError::ConfigError(format!("node '{}' uses unknown op '{}'", name, nc.op))
        })?;
        let node = graph.new_node(
            Node::builder()
                .uid(name.clone())
                .label(nc.label.clone().unwrap_or_else(|| name.clone()))
                .attrs(&nc.attrs)
                .shared_op(op),
        );
        if let Some(input) = &nc.input {
            node.set_inputs(vec![input.clone()]);
        }
    }

    for (name, nc) in cfg.node.iter() {
        let to = node_named(&graph, name)?;
        for dep in nc.after.iter() {
            let from = node_named(&graph, dep)?;
            graph.new_edge(Edge::builder(&from, &to))?;
        }
    }

    let inputs = if cfg.graph.inputs.is_empty() {
        graph
            .nodes()
            .into_iter()
            .filter(|n| graph.predecessors(n.id()).is_empty())
            .collect()
    } else {
        nodes_named(&graph, &cfg.graph.inputs)?
    };
    graph.set_inputs(inputs)?;

    let outputs = if cfg.graph.outputs.is_empty() {
        graph
            .nodes()
            .into_iter()
            .filter(|n| graph.successors(n.id()).is_empty())
            .collect()
    } else {
        nodes_named(&graph, &cfg.graph.outputs)?
    };
    graph.set_outputs(outputs)?;

    debug!(
        graph = %graph.uid(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "graph built from definition"
    );
    Ok(graph)
}

fn nodes_named(graph: &Graph, names: &[String]) -> Result<Vec<Arc<Node>>> {
    names.iter().map(|name| node_named(graph, name)).collect()
}

fn node_named(graph: &Graph, name: &str) -> Result<Arc<Node>> {
    graph
        .node_by_uid(name)
        .ok_or_else(|| HypherError::ConfigError(format!("unknown node '{}'", name)))
}
