// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod logging;
pub mod ops;
pub mod store;
pub mod types;

use std::collections::{BTreeMap, HashMap};

use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{GraphFile, build_graph, load_and_validate, load_run_inputs};
use crate::dag::Graph;
use crate::engine::RunOptions;
use crate::store::{JsonStore, Syncer};
use crate::types::{RunMode, Value};

pub use crate::dag::{Edge, Node, Op};
pub use crate::errors::HypherError;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - graph definition loading and validation
/// - run inputs from `--input`
/// - Ctrl-C handling through the run's cancellation token
/// - printing the output nodes' results
/// - the optional JSON snapshot
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_and_validate(&args.config)?;
    let graph = build_graph(&cfg)?;
    let mode: RunMode = args.mode.map(Into::into).unwrap_or(cfg.graph.mode);

    if args.dry_run {
        print_dry_run(&cfg, &graph, mode)?;
        return Ok(());
    }

    let inputs: HashMap<String, Value> = match &args.input {
        Some(path) => load_run_inputs(path)?,
        None => HashMap::new(),
    };

    // Ctrl-C → cancel the run.
    let token = CancellationToken::new();
    {
        let token = token.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            info!("Ctrl+C received, cancelling run");
            token.cancel();
        });
    }

    graph
        .run(&token, inputs, RunOptions::with_mode(mode))
        .await?;

    println!("{}", serde_json::to_string_pretty(&collect_results(&graph))?);

    if let Some(dir) = &args.snapshot {
        JsonStore::new(dir).sync(&graph).await?;
    }

    Ok(())
}

/// Last output of every designated output node, keyed by node uid.
/// Nodes that produced nothing map to `null`.
pub fn collect_results(graph: &Graph) -> BTreeMap<String, Option<Value>> {
    graph
        .outputs()
        .iter()
        .map(|node| (node.uid(), node.outputs().pop()))
        .collect()
}

/// Dry-run output: print nodes, dependencies and the execution levels.
fn print_dry_run(cfg: &GraphFile, graph: &Graph, mode: RunMode) -> Result<()> {
    println!("hypher dry-run");
    println!("  graph.label = {}", graph.label());
    println!("  graph.mode = {:?}", mode);
    println!();

    println!("nodes ({}):", cfg.node.len());
    for (name, node) in cfg.node.iter() {
        println!("  - {name}");
        println!("      op: {}", node.op);
        if !node.after.is_empty() {
            println!("      after: {:?}", node.after);
        }
        if node.input.is_some() {
            println!("      input: preset");
        }
    }
    println!();

    let inputs: Vec<String> = graph.inputs().iter().map(|n| n.uid()).collect();
    let outputs: Vec<String> = graph.outputs().iter().map(|n| n.uid()).collect();
    println!("inputs: {:?}", inputs);
    println!("outputs: {:?}", outputs);

    let sub = graph.sub_graph(&graph.inputs(), &graph.outputs())?;
    println!("levels:");
    for (i, level) in sub.topo_sort_with_levels()?.iter().enumerate() {
        let names: Vec<String> = level.iter().map(|n| n.uid()).collect();
        println!("  {i}: {:?}", names);
    }

    debug!("dry-run complete (no execution)");
    Ok(())
}
