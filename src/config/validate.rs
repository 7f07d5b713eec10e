// src/config/validate.rs

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::config::model::{GraphFile, RawGraphFile};
use crate::errors::{HypherError, Result};
use crate::ops;

impl TryFrom<RawGraphFile> for GraphFile {
    type Error = HypherError;

    fn try_from(raw: RawGraphFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(GraphFile::new_unchecked(raw.graph, raw.node))
    }
}

fn validate_raw_config(cfg: &RawGraphFile) -> Result<()> {
    ensure_has_nodes(cfg)?;
    validate_ops(cfg)?;
    validate_node_dependencies(cfg)?;
    validate_designations(cfg)?;
    validate_dag(cfg)?;
    Ok(())
}

fn ensure_has_nodes(cfg: &RawGraphFile) -> Result<()> {
    if cfg.node.is_empty() {
        return Err(HypherError::ConfigError(
            "graph definition must contain at least one [node.<name>] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_ops(cfg: &RawGraphFile) -> Result<()> {
    for (name, node) in cfg.node.iter() {
        if ops::from_name(&node.op).is_none() {
            return Err(HypherError::ConfigError(format!(
                "node '{}' uses unknown op '{}' (expected one of {:?})",
                name,
                node.op,
                ops::BUILTIN_OPS
            )));
        }
    }
    Ok(())
}

fn validate_node_dependencies(cfg: &RawGraphFile) -> Result<()> {
    for (name, node) in cfg.node.iter() {
        for dep in node.after.iter() {
            if !cfg.node.contains_key(dep) {
                return Err(HypherError::ConfigError(format!(
                    "node '{}' has unknown dependency '{}' in `after`",
                    name, dep
                )));
            }
            if dep == name {
                return Err(HypherError::ConfigError(format!(
                    "node '{}' cannot depend on itself in `after`",
                    name
                )));
            }
        }
    }
    Ok(())
}

fn validate_designations(cfg: &RawGraphFile) -> Result<()> {
    let declared = cfg
        .graph
        .inputs
        .iter()
        .map(|n| ("inputs", n))
        .chain(cfg.graph.outputs.iter().map(|n| ("outputs", n)));

    for (field, name) in declared {
        if !cfg.node.contains_key(name) {
            return Err(HypherError::ConfigError(format!(
                "[graph].{} references unknown node '{}'",
                field, name
            )));
        }
    }
    Ok(())
}

fn validate_dag(cfg: &RawGraphFile) -> Result<()> {
    // Edge direction: dep -> node.
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for name in cfg.node.keys() {
        graph.add_node(name.as_str());
    }

    for (name, node) in cfg.node.iter() {
        for dep in node.after.iter() {
            graph.add_edge(dep.as_str(), name.as_str(), ());
        }
    }

    match toposort(&graph, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => Err(HypherError::Cycle(format!(
            "graph definition has a dependency cycle involving node '{}'",
            cycle.node_id()
        ))),
    }
}
