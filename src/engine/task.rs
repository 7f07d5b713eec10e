// src/engine/task.rs

//! Single node execution inside a run.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::dag::Node;
use crate::errors::{HypherError, Result};
use crate::types::Value;

/// Accumulated outputs of `preds`, in the given order.
pub fn gather_inputs(preds: &[Arc<Node>]) -> Vec<Value> {
    preds.iter().flat_map(|pred| pred.outputs()).collect()
}

/// Execute `node` with `inputs` unless the run is already cancelled.
pub async fn exec_node(node: Arc<Node>, inputs: Vec<Value>, ctx: CancellationToken) -> Result<()> {
    if ctx.is_cancelled() {
        debug!(node = %node.uid(), "run cancelled; not starting node");
        return Err(HypherError::Cancelled);
    }

    node.exec(&ctx, inputs).await?;
    Ok(())
}
