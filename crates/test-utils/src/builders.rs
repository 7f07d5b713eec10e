#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;

use hypher::config::{GraphFile, GraphSection, NodeConfig, RawGraphFile};
use hypher::dag::{Edge, Graph, Node, Op};
use hypher::types::{RunMode, Value};

/// Builder for `GraphFile` to simplify test setup.
pub struct GraphFileBuilder {
    config: RawGraphFile,
}

impl GraphFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawGraphFile {
                graph: GraphSection::default(),
                node: BTreeMap::new(),
            },
        }
    }

    pub fn with_node(mut self, name: &str, node: NodeConfig) -> Self {
        self.config.node.insert(name.to_string(), node);
        self
    }

    pub fn with_input(mut self, name: &str) -> Self {
        self.config.graph.inputs.push(name.to_string());
        self
    }

    pub fn with_output(mut self, name: &str) -> Self {
        self.config.graph.outputs.push(name.to_string());
        self
    }

    pub fn with_mode(mut self, mode: RunMode) -> Self {
        self.config.graph.mode = mode;
        self
    }

    /// The raw, unvalidated file.
    pub fn raw(self) -> RawGraphFile {
        self.config
    }

    pub fn build(self) -> GraphFile {
        GraphFile::try_from(self.config).expect("Failed to build valid graph file from builder")
    }
}

impl Default for GraphFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `NodeConfig`.
pub struct NodeConfigBuilder {
    node: NodeConfig,
}

impl NodeConfigBuilder {
    pub fn new(op: &str) -> Self {
        Self {
            node: NodeConfig::new(op),
        }
    }

    pub fn after(mut self, dep: &str) -> Self {
        self.node.after.push(dep.to_string());
        self
    }

    pub fn label(mut self, label: &str) -> Self {
        self.node.label = Some(label.to_string());
        self
    }

    pub fn input(mut self, input: Value) -> Self {
        self.node.input = Some(input);
        self
    }

    pub fn attr(mut self, key: &str, value: serde_json::Value) -> Self {
        self.node.attrs.insert(key.to_string(), value);
        self
    }

    pub fn build(self) -> NodeConfig {
        self.node
    }
}

/// Single-entry value `{key: value}`.
pub fn value(key: &str, v: serde_json::Value) -> Value {
    Value::from([(key.to_string(), v)])
}

/// Graph with `count` nodes (uids `n0..`) all running `op`, and the given
/// edges by index. Panics if an edge is rejected.
pub fn graph_with_edges(count: usize, edges: &[(usize, usize)], op: Arc<dyn Op>) -> (Graph, Vec<Arc<Node>>) {
    let graph = Graph::new();
    let nodes: Vec<Arc<Node>> = (0..count)
        .map(|i| {
            graph.new_node(
                Node::builder()
                    .uid(format!("n{i}"))
                    .label(format!("node {i}"))
                    .shared_op(Arc::clone(&op)),
            )
        })
        .collect();

    for &(from, to) in edges {
        graph
            .new_edge(Edge::builder(&nodes[from], &nodes[to]))
            .expect("edge rejected while building test graph");
    }

    (graph, nodes)
}
