// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::types::{Attrs, RunMode, Value};

/// Graph definition as read from a TOML file, before validation.
///
/// ```toml
/// [graph]
/// label = "demo"
/// inputs = ["a"]
/// outputs = ["c"]
/// mode = "level"
///
/// [node.a]
/// op = "collect"
/// input = { seed = 1 }
///
/// [node.c]
/// op = "merge"
/// after = ["a"]
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawGraphFile {
    /// Graph metadata and designations from `[graph]`.
    #[serde(default)]
    pub graph: GraphSection,

    /// All nodes from `[node.<name>]`, keyed by name. The name becomes the
    /// node uid.
    #[serde(default)]
    pub node: BTreeMap<String, NodeConfig>,
}

/// `[graph]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphSection {
    /// Graph uid; a random one is generated when absent.
    #[serde(default)]
    pub uid: Option<String>,

    #[serde(default = "default_graph_label")]
    pub label: String,

    #[serde(default)]
    pub attrs: Attrs,

    /// Names of the designated input nodes.
    #[serde(default)]
    pub inputs: Vec<String>,

    /// Names of the designated output nodes.
    #[serde(default)]
    pub outputs: Vec<String>,

    /// `"level"` (default) or `"all"`.
    #[serde(default)]
    pub mode: RunMode,
}

fn default_graph_label() -> String {
    crate::dag::graph::DEFAULT_GRAPH_LABEL.to_string()
}

impl Default for GraphSection {
    fn default() -> Self {
        Self {
            uid: None,
            label: default_graph_label(),
            attrs: Attrs::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            mode: RunMode::default(),
        }
    }
}

/// `[node.<name>]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeConfig {
    /// Built-in op name (see [`crate::ops::BUILTIN_OPS`]).
    #[serde(default = "default_op")]
    pub op: String,

    /// Display label; defaults to the node name.
    #[serde(default)]
    pub label: Option<String>,

    /// Nodes this one depends on. Each entry becomes an edge `dep -> node`.
    #[serde(default)]
    pub after: Vec<String>,

    /// Preset input value.
    #[serde(default)]
    pub input: Option<Value>,

    #[serde(default)]
    pub attrs: Attrs,
}

fn default_op() -> String {
    "noop".to_string()
}

impl NodeConfig {
    pub fn new(op: impl Into<String>) -> Self {
        Self {
            op: op.into(),
            label: None,
            after: Vec::new(),
            input: None,
            attrs: Attrs::new(),
        }
    }
}

/// Validated graph definition. Construct it with `GraphFile::try_from`.
#[derive(Debug, Clone)]
pub struct GraphFile {
    pub graph: GraphSection,
    pub node: BTreeMap<String, NodeConfig>,
}

impl GraphFile {
    pub(crate) fn new_unchecked(graph: GraphSection, node: BTreeMap<String, NodeConfig>) -> Self {
        Self { graph, node }
    }
}
