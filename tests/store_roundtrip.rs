// tests/store_roundtrip.rs

mod common;
use crate::common::TestResult;
use crate::common::builders::graph_with_edges;

use std::sync::Arc;

use serde_json::json;
use tempfile::TempDir;

use hypher::dag::{Edge, Graph, NoOp, Node};
use hypher::errors::HypherError;
use hypher::store::json::{restore, snapshot};
use hypher::store::{EdgeRow, JsonStore, Loader, Syncer};
use hypher::types::Attrs;

fn sample_graph() -> Result<Graph, HypherError> {
    let mut attrs = Attrs::new();
    attrs.insert("owner".to_string(), json!("ops"));

    let graph = Graph::builder().uid("g-1").label("sample").attrs(&attrs).build();
    let a = graph.new_node(Node::builder().uid("a").label("A").attrs(&attrs));
    let b = graph.new_node(Node::builder().uid("b").label("B"));
    let c = graph.new_node(Node::builder().uid("c").label("C"));
    graph.new_edge(Edge::builder(&a, &b).uid("ab").weight(0.5).attrs(&attrs))?;
    graph.new_edge(Edge::builder(&b, &c).uid("bc").label("tail"))?;
    graph.set_inputs(vec![a])?;
    graph.set_outputs(vec![c])?;
    Ok(graph)
}

#[tokio::test]
async fn sync_then_load_preserves_uids_and_metadata() -> TestResult {
    let dir = TempDir::new()?;
    let store = JsonStore::new(dir.path());
    let graph = sample_graph()?;

    store.sync(&graph).await?;
    assert_eq!(store.path_for("g-1"), store.dir().join("g-1.json"));
    assert!(store.path_for("g-1").exists());

    let loaded = store.load("g-1").await?;

    assert_eq!(loaded.uid(), "g-1");
    assert_eq!(loaded.label(), "sample");
    assert_eq!(loaded.attrs(), graph.attrs());
    assert_eq!(loaded.node_count(), 3);
    assert_eq!(loaded.edge_count(), 2);

    let a = loaded.node_by_uid("a").ok_or("node a missing")?;
    assert_eq!(a.label(), "A");
    assert_eq!(a.attrs().get("owner"), Some(&json!("ops")));

    let b = loaded.node_by_uid("b").ok_or("node b missing")?;
    let ab = loaded.edge(a.id(), b.id()).ok_or("edge ab missing")?;
    assert_eq!(ab.uid(), "ab");
    assert_eq!(ab.weight(), 0.5);

    assert_eq!(loaded.inputs()[0].uid(), "a");
    assert_eq!(loaded.outputs()[0].uid(), "c");
    assert_eq!(snapshot(&loaded), snapshot(&graph));
    Ok(())
}

#[tokio::test]
async fn loading_unknown_graph_is_an_io_error() -> TestResult {
    let dir = TempDir::new()?;
    let store = JsonStore::new(dir.path());

    match store.load("nope").await {
        Err(HypherError::IoError(_)) => Ok(()),
        other => panic!("expected IoError, got {other:?}"),
    }
}

#[test]
fn restore_rejects_edges_to_unknown_nodes() -> TestResult {
    let mut doc = snapshot(&sample_graph()?);
    doc.edges.push(EdgeRow {
        uid: "dangling".to_string(),
        source: "a".to_string(),
        target: "ghost".to_string(),
        label: "x".to_string(),
        weight: 1.0,
        attrs: Attrs::new(),
    });

    match restore(&doc) {
        Err(HypherError::InvalidNode(msg)) => assert!(msg.contains("ghost")),
        other => panic!("expected InvalidNode, got {other:?}"),
    }
    Ok(())
}

#[test]
fn restore_rejects_cyclic_documents() -> TestResult {
    let (graph, _) = graph_with_edges(2, &[(0, 1)], Arc::new(NoOp));
    let mut doc = snapshot(&graph);
    doc.edges.push(EdgeRow {
        uid: "back".to_string(),
        source: "n1".to_string(),
        target: "n0".to_string(),
        label: "x".to_string(),
        weight: 1.0,
        attrs: Attrs::new(),
    });

    assert!(restore(&doc).is_err_and(|e| e.is_cycle()));
    Ok(())
}
