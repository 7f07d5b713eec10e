// tests/graph_mutation.rs

mod common;
use crate::common::TestResult;
use crate::common::builders::graph_with_edges;
use crate::common::init_tracing;

use std::sync::Arc;

use hypher::dag::{Edge, Graph, NoOp, Node};
use hypher::errors::HypherError;
use hypher::types::NONE_ID;

fn ids(graph: &Graph) -> Vec<(i64, String)> {
    graph.nodes().iter().map(|n| (n.id(), n.uid())).collect()
}

#[test]
fn add_node_mints_sequential_ids() {
    init_tracing();
    let graph = Graph::new();
    let a = Node::new();
    let b = Node::new();
    assert_eq!(a.id(), NONE_ID);

    graph.add_node(&a);
    graph.add_node(&b);

    assert_eq!(a.id(), 0);
    assert_eq!(b.id(), 1);
    assert_eq!(graph.node_count(), 2);
    assert!(a.graph().is_some_and(|g| g.same_as(&graph)));
}

#[test]
fn add_node_is_idempotent_for_members() {
    let graph = Graph::new();
    let a = graph.new_node(Node::builder().uid("a"));

    graph.add_node(&a);
    graph.add_node(&a);

    assert_eq!(graph.node_count(), 1);
    assert_eq!(a.id(), 0);
    assert!(graph.node_by_uid("a").is_some_and(|n| Arc::ptr_eq(&n, &a)));
}

#[test]
fn add_node_keeps_free_preferred_id_and_remints_taken_one() {
    let graph = Graph::new();
    let a = graph.new_node(Node::builder().id(7));
    let b = graph.new_node(Node::builder().id(7));

    assert_eq!(a.id(), 7);
    assert_eq!(b.id(), 8);
}

#[test]
fn set_edge_registers_missing_endpoints() -> TestResult {
    let graph = Graph::new();
    let a = Node::builder().uid("a").build();
    let b = Node::builder().uid("b").build();

    graph.set_edge(&Edge::new(&a, &b))?;

    assert_eq!(graph.node_count(), 2);
    assert_eq!(graph.edge_count(), 1);
    assert!(graph.has_edge_from_to(a.id(), b.id()));
    assert_eq!(graph.successors(a.id()).len(), 1);
    assert_eq!(graph.predecessors(b.id())[0].uid(), "a");
    Ok(())
}

#[test]
fn resetting_existing_edge_is_a_noop() -> TestResult {
    let (graph, nodes) = graph_with_edges(2, &[(0, 1)], Arc::new(NoOp));
    let original = graph.edge(0, 1).ok_or("missing edge")?;

    graph.set_edge(&Edge::builder(&nodes[0], &nodes[1]).uid("other").build()?)?;

    assert_eq!(graph.edge_count(), 1);
    assert_eq!(graph.edge(0, 1).ok_or("missing edge")?.uid(), original.uid());
    Ok(())
}

#[test]
fn cycle_edge_is_rejected_and_rolled_back() -> TestResult {
    init_tracing();
    let graph = Graph::new();
    let n0 = Node::builder().uid("0").build();
    let n1 = Node::builder().uid("1").build();
    let n2 = Node::builder().uid("2").build();

    graph.set_edge(&Edge::new(&n0, &n1))?;
    let before = ids(&graph);

    // 1 -> 2 would be fine on its own; 2 -> 0 closes the loop. Try the
    // closing edge with a node that is not yet a member.
    let result = graph.set_edge(&Edge::new(&n1, &n2));
    assert!(result.is_ok());
    let result = graph.set_edge(&Edge::new(&n2, &n0));
    match result {
        Err(HypherError::Cycle(msg)) => assert!(msg.contains("2")),
        other => panic!("expected cycle error, got {other:?}"),
    }
    assert_eq!(graph.edge_count(), 2);
    assert_eq!(graph.node_count(), 3);

    // Rejected insertion of a brand new endpoint leaves no trace.
    let fresh = Node::builder().uid("fresh").build();
    let loop_edge = Edge::new(&fresh, &fresh);
    assert!(graph.set_edge(&loop_edge).is_err_and(|e| e.is_cycle()));
    assert!(graph.node_by_uid("fresh").is_none());
    assert_eq!(fresh.id(), NONE_ID);
    assert!(fresh.graph().is_none());

    assert_eq!(&ids(&graph)[..2], &before[..]);
    Ok(())
}

#[test]
fn closing_edge_through_adopted_node_keeps_topology() -> TestResult {
    let graph = Graph::new();
    let n0 = graph.new_node(Node::builder().uid("0"));
    let n1 = graph.new_node(Node::builder().uid("1"));
    graph.new_edge(Edge::builder(&n0, &n1))?;

    // Node 2 starts out in another graph and is adopted by the 1 -> 2 edge.
    let scratch = Graph::new();
    let n2 = scratch.new_node(Node::builder().uid("2"));
    graph.new_edge(Edge::builder(&n1, &n2))?;
    assert_eq!(n2.id(), 2);
    assert!(n2.graph().is_some_and(|g| g.same_as(&graph)));

    let before = ids(&graph);
    let result = graph.new_edge(Edge::builder(&n2, &n0));

    assert!(result.is_err_and(|e| e.is_cycle()));
    assert_eq!(ids(&graph), before);
    assert_eq!(graph.edge_count(), 2);
    assert!(!graph.has_edge_from_to(2, 0));
    Ok(())
}

#[test]
fn rejected_edge_with_fresh_endpoints_leaves_graph_untouched() -> TestResult {
    let graph = Graph::new();
    let n0 = graph.new_node(Node::builder().uid("0"));
    let n1 = graph.new_node(Node::builder().uid("1"));
    let n2 = Node::builder().uid("2").build();
    graph.new_edge(Edge::builder(&n0, &n1))?;
    let snapshot = ids(&graph);

    assert!(graph.new_edge(Edge::builder(&n1, &n0)).is_err());
    assert!(graph.new_edge(Edge::builder(&n2, &n2)).is_err());

    assert_eq!(ids(&graph), snapshot);
    assert_eq!(graph.edge_count(), 1);
    assert!(graph.node_by_uid("2").is_none());
    assert_eq!(n2.id(), NONE_ID);
    Ok(())
}

#[test]
fn set_inputs_rejects_strangers() {
    let graph = Graph::new();
    let member = graph.new_node(Node::builder());
    let stranger = Node::new();

    assert!(graph.set_inputs(vec![Arc::clone(&member)]).is_ok());
    match graph.set_outputs(vec![stranger]) {
        Err(HypherError::InvalidNode(_)) => {}
        other => panic!("expected InvalidNode, got {other:?}"),
    }
    assert!(graph.outputs().is_empty());
}

#[test]
fn graph_display_summarises_counts() -> TestResult {
    let (graph, _) = graph_with_edges(3, &[(0, 1), (1, 2)], Arc::new(NoOp));
    let text = graph.to_string();
    assert!(text.contains("Nodes: 3"));
    assert!(text.contains("Edges: 2"));
    Ok(())
}

#[test]
fn rejected_self_loop_with_duplicate_uid_keeps_index() -> TestResult {
    init_tracing();
    let graph = Graph::new();
    let a = graph.new_node(Node::builder().uid("x"));
    let twin = Node::builder().uid("x").build();

    let result = graph.set_edge(&Edge::new(&twin, &twin));

    assert!(result.is_err_and(|e| e.is_cycle()));
    let indexed = graph.node_by_uid("x").ok_or("uid x dropped from the index")?;
    assert!(Arc::ptr_eq(&indexed, &a));
    assert_eq!(graph.node_count(), 1);
    assert_eq!(twin.id(), NONE_ID);
    assert!(twin.graph().is_none());

    // The rolled back id is handed out again.
    let next = graph.new_node(Node::builder().uid("y"));
    assert_eq!(next.id(), 1);
    Ok(())
}

#[test]
fn rejected_edge_restores_placement_in_previous_graph() -> TestResult {
    let home = Graph::new();
    let wanderer = home.new_node(Node::builder().uid("w"));

    let other = Graph::new();
    other.new_node(Node::builder().uid("w"));
    assert!(other.set_edge(&Edge::new(&wanderer, &wanderer)).is_err());

    assert_eq!(wanderer.id(), 0);
    assert!(wanderer.graph().is_some_and(|g| g.same_as(&home)));
    assert!(other.node_by_uid("w").is_some_and(|n| !Arc::ptr_eq(&n, &wanderer)));
    assert!(home.contains(&wanderer));
    Ok(())
}
