// src/engine/level.rs

//! Level-barrier strategy.

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::dag::Graph;
use crate::engine::group::TaskGroup;
use crate::engine::task::{exec_node, gather_inputs};
use crate::errors::{HypherError, Result};

/// Run `sub` level by level. All nodes of a level run concurrently; the next
/// level starts only once the whole level has finished successfully.
pub async fn run_levels(sub: &Graph, ctx: &CancellationToken) -> Result<()> {
    let levels = sub.topo_sort_with_levels()?;

    for (depth, nodes) in levels.into_iter().enumerate() {
        if ctx.is_cancelled() {
            return Err(HypherError::Cancelled);
        }

        debug!(level = depth, nodes = nodes.len(), "dispatching level");

        let mut group = TaskGroup::new(ctx);
        for node in nodes {
            let inputs = gather_inputs(&sub.predecessors(node.id()));
            let token = group.token();
            group.spawn(exec_node(node, inputs, token));
        }
        group.wait().await?;
    }

    Ok(())
}
