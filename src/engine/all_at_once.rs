// src/engine/all_at_once.rs

//! Per-node completion signal strategy.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::dag::{Graph, Node};
use crate::engine::group::TaskGroup;
use crate::engine::task::exec_node;
use crate::errors::{HypherError, Result};
use crate::types::NodeId;

/// Spawn every node of `sub` immediately. Each task waits for all of its
/// direct predecessors to signal completion, collecting their outputs, then
/// executes and signals its own completion.
pub async fn run_all(sub: &Graph, ctx: &CancellationToken) -> Result<()> {
    let nodes = sub.topo_sort()?;

    let mut senders: HashMap<NodeId, watch::Sender<bool>> = HashMap::with_capacity(nodes.len());
    let mut receivers: HashMap<NodeId, watch::Receiver<bool>> = HashMap::with_capacity(nodes.len());
    for node in nodes.iter() {
        let (tx, rx) = watch::channel(false);
        senders.insert(node.id(), tx);
        receivers.insert(node.id(), rx);
    }

    let mut group = TaskGroup::new(ctx);
    for node in nodes {
        let preds: Vec<_> = sub
            .predecessors(node.id())
            .into_iter()
            .filter_map(|pred| receivers.get(&pred.id()).map(|rx| (pred, rx.clone())))
            .collect();
        let Some(done) = senders.remove(&node.id()) else {
            continue;
        };
        let token = group.token();
        group.spawn(exec_when_ready(node, preds, done, token));
    }

    debug!(tasks = group.len(), "all node tasks spawned");
    group.wait().await
}

async fn exec_when_ready(
    node: Arc<Node>,
    preds: Vec<(Arc<Node>, watch::Receiver<bool>)>,
    done: watch::Sender<bool>,
    ctx: CancellationToken,
) -> Result<()> {
    let mut inputs = Vec::new();

    for (pred, mut signal) in preds {
        let finished = tokio::select! {
            biased;
            _ = ctx.cancelled() => return Err(HypherError::Cancelled),
            fired = async { signal.wait_for(|finished| *finished).await.is_ok() } => fired,
        };
        // A dropped sender means the predecessor gave up without finishing.
        if !finished {
            return Err(HypherError::Cancelled);
        }
        inputs.extend(pred.outputs());
    }

    exec_node(node, inputs, ctx).await?;
    done.send_replace(true);
    Ok(())
}
