// tests/node_edge.rs

mod common;
use crate::common::TestResult;
use crate::common::builders::{graph_with_edges, value};

use std::sync::Arc;

use serde_json::json;
use tokio_util::sync::CancellationToken;

use hypher::dag::{Edge, Graph, NoOp, Node, Rgb, Style};
use hypher::ops::{self, COLLECT_KEY};
use hypher::types::{Attrs, NONE_ID};

#[test]
fn node_builder_options_apply_in_order() {
    let graph = Graph::new();
    let mut attrs = Attrs::new();
    attrs.insert("team".to_string(), json!("x"));

    let node = Node::builder()
        .label("first")
        .label("second")
        .uid("n")
        .attrs(&attrs)
        .graph(&graph)
        .build();

    attrs.insert("late".to_string(), json!(1));

    assert_eq!(node.label(), "second");
    assert_eq!(node.uid(), "n");
    assert_eq!(node.attrs().len(), 1, "attributes are copied on set");
    assert_eq!(node.id(), 0);
    assert!(graph.contains(&node));
}

#[test]
fn standalone_node_defaults() {
    let node = Node::new();
    assert_eq!(node.id(), NONE_ID);
    assert!(!node.uid().is_empty());
    assert!(node.graph().is_none());
    assert_eq!(node.op().kind(), "NoOp");
    assert_eq!(node.style(), Style::node_default());
}

#[test]
fn clone_detached_copies_metadata_only() {
    let graph = Graph::new();
    let original = graph.new_node(
        Node::builder()
            .uid("orig")
            .label("L")
            .op(ops::Collect),
    );
    original.set_inputs(vec![value("a", json!(1))]);

    let clone = original.clone_detached();

    assert_ne!(clone.uid(), original.uid());
    assert_eq!(clone.label(), "L");
    assert!(clone.graph().is_none());
    assert!(clone.inputs().is_empty());
    assert_eq!(clone.op().kind(), "NoOp");

    let other = Graph::new();
    let placed = original.clone_to(&other);
    assert!(other.contains(&placed));
    assert_eq!(other.node_count(), 1);
}

#[tokio::test]
async fn exec_appends_preset_then_extra_inputs() -> TestResult {
    let node = Node::builder().op(ops::Collect).build();
    node.set_inputs(vec![value("preset", json!(0))]);

    let ctx = CancellationToken::new();
    let out = node.exec(&ctx, vec![value("extra", json!(1))]).await?;

    assert_eq!(
        out.get(COLLECT_KEY),
        Some(&json!([{"preset": 0}, {"extra": 1}]))
    );
    assert_eq!(node.outputs(), vec![out]);
    Ok(())
}

#[tokio::test]
async fn exec_error_leaves_outputs_untouched() {
    let node = Node::builder().uid("f").op(ops::Fail).build();
    let ctx = CancellationToken::new();

    let err = node.exec(&ctx, Vec::new()).await;

    assert!(err.is_err());
    assert!(node.outputs().is_empty());
}

#[test]
fn edge_reversed_keeps_identity_and_attrs() -> TestResult {
    let a = Node::new();
    let b = Node::new();
    let mut attrs = Attrs::new();
    attrs.insert("k".to_string(), json!("v"));

    let edge = Edge::builder(&a, &b)
        .uid("e1")
        .label("link")
        .weight(2.5)
        .attrs(&attrs)
        .build()?;
    let rev = edge.reversed();

    assert!(Arc::ptr_eq(rev.from(), &b));
    assert!(Arc::ptr_eq(rev.to(), &a));
    assert_eq!(rev.uid(), "e1");
    assert_eq!(rev.label(), "link");
    assert_eq!(rev.weight(), 2.5);
    assert_eq!(rev.attrs(), attrs);
    Ok(())
}

#[test]
fn edge_setters_update_state() {
    let edge = Edge::new(&Node::new(), &Node::new());
    assert_eq!(edge.weight(), 1.0);

    edge.set_weight(4.0);
    edge.set_label("heavy");
    edge.set_uid("e");

    assert_eq!(edge.weight(), 4.0);
    assert_eq!(edge.label(), "heavy");
    assert_eq!(edge.uid(), "e");
}

#[test]
fn deep_copy_is_independent() -> TestResult {
    let (graph, nodes) = graph_with_edges(3, &[(0, 1), (1, 2)], Arc::new(NoOp));
    graph.set_inputs(vec![Arc::clone(&nodes[0])])?;
    graph.set_outputs(vec![Arc::clone(&nodes[2])])?;

    let copy = graph.deep_copy();

    assert_eq!(copy.uid(), graph.uid());
    assert_eq!(copy.node_count(), 3);
    assert_eq!(copy.edge_count(), 2);
    for node in nodes.iter() {
        let twin = copy.node(node.id()).ok_or("missing copied node")?;
        assert!(!Arc::ptr_eq(&twin, node));
        assert_eq!(twin.uid(), node.uid());
        assert!(twin.graph().is_some_and(|g| g.same_as(&copy)));
    }
    assert_eq!(copy.inputs()[0].uid(), "n0");
    assert!(!Arc::ptr_eq(&copy.inputs()[0], &nodes[0]));

    copy.node(0).ok_or("missing node 0")?.set_label("changed");
    assert_eq!(nodes[0].label(), "node 0");

    let extra = copy.new_node(Node::builder());
    assert_eq!(extra.id(), 3);
    assert_eq!(graph.node_count(), 3);
    Ok(())
}

#[test]
fn display_impls_describe_elements() -> TestResult {
    let graph = Graph::builder().label("demo").build();
    let a = graph.new_node(Node::builder().uid("a").label("A"));
    let b = graph.new_node(Node::builder().uid("b"));
    let edge = graph.new_edge(Edge::builder(&a, &b))?;

    let node_text = a.to_string();
    assert!(node_text.contains("Node: A"));
    assert!(node_text.contains(&format!("Graph: {}", graph.uid())));

    let edge_text = edge.to_string();
    assert!(edge_text.contains("From: Node(0/a)"));
    assert!(edge_text.contains("Weight: 1.00"));

    assert!(graph.to_string().starts_with("Graph: demo"));
    Ok(())
}

#[test]
fn rgb_formats_as_hex() {
    assert_eq!(Rgb::new(255, 0, 16).to_string(), "#ff0010");
}
