// src/engine/group.rs

//! Barrier group for node tasks.

use std::future::Future;

use anyhow::anyhow;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::errors::{HypherError, Result};

/// A set of concurrently running tasks sharing one cancellation token.
///
/// The first task error cancels the token. [`TaskGroup::wait`] always waits
/// for every launched task to return before reporting the first error that
/// is not a mere cancellation, if any.
pub struct TaskGroup {
    tasks: JoinSet<Result<()>>,
    token: CancellationToken,
}

impl TaskGroup {
    /// New group whose token is a child of `parent`: cancelling the parent
    /// cancels the group, not the other way round.
    pub fn new(parent: &CancellationToken) -> Self {
        Self {
            tasks: JoinSet::new(),
            token: parent.child_token(),
        }
    }

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = Result<()>> + Send + 'static,
    {
        self.tasks.spawn(task);
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub async fn wait(mut self) -> Result<()> {
        let mut first: Option<HypherError> = None;

        while let Some(joined) = self.tasks.join_next().await {
            let outcome = joined.unwrap_or_else(|join_err| {
                Err(HypherError::Other(anyhow!("node task did not complete: {join_err}")))
            });

            if let Err(err) = outcome {
                self.token.cancel();
                match first {
                    // A real failure outranks the cancellations it caused.
                    Some(HypherError::Cancelled) if !matches!(err, HypherError::Cancelled) => {
                        first = Some(err);
                    }
                    Some(_) => {
                        debug!(error = %err, "task failed after the group was already failing");
                    }
                    None => first = Some(err),
                }
            }
        }

        match first {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
