use std::collections::HashMap;
use std::str::FromStr;

use serde::Deserialize;

/// Unit of data passed between nodes and returned from an execution.
pub type Value = HashMap<String, serde_json::Value>;

/// Free-form attributes attached to graphs, nodes and edges.
pub type Attrs = HashMap<String, serde_json::Value>;

/// Numeric node identifier, meaningful only relative to the owning graph.
pub type NodeId = i64;

/// Sentinel id of a node that has not been placed in any graph.
pub const NONE_ID: NodeId = -1;

/// Scheduling strategy for a graph run.
///
/// - `Level`: run all nodes of one dependency level concurrently, with a
///   barrier between levels (default).
/// - `AllAtOnce`: spawn every node immediately; each waits for its direct
///   predecessors to signal completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    #[default]
    Level,
    #[serde(rename = "all")]
    AllAtOnce,
}

impl FromStr for RunMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "level" => Ok(RunMode::Level),
            "all" | "all-at-once" => Ok(RunMode::AllAtOnce),
            other => Err(format!(
                "invalid run mode: {other} (expected \"level\" or \"all\")"
            )),
        }
    }
}
