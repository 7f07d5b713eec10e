// src/dag/op.rs

//! Operation executed by a node.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use tokio_util::sync::CancellationToken;

use crate::types::Value;

/// Boxed future returned by [`Op::apply`].
pub type OpFuture<'a> = Pin<Box<dyn Future<Output = anyhow::Result<Value>> + Send + 'a>>;

/// Capability executed once per node execution.
///
/// Implementations are stateless with respect to the graph topology. They may
/// have external side effects, but must treat cancellation of `ctx` as the
/// signal to stop promptly.
pub trait Op: Send + Sync + fmt::Debug {
    /// Short type name of the op (e.g. `"NoOp"`).
    fn kind(&self) -> &str;

    /// Human-readable description, used in diagnostics.
    fn desc(&self) -> &str;

    /// Run the op over the given inputs.
    fn apply<'a>(&'a self, ctx: &'a CancellationToken, inputs: Vec<Value>) -> OpFuture<'a>;
}

/// Op that does nothing and returns an empty value.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOp;

impl Op for NoOp {
    fn kind(&self) -> &str {
        "NoOp"
    }

    fn desc(&self) -> &str {
        "NoOp does nothing"
    }

    fn apply<'a>(&'a self, _ctx: &'a CancellationToken, _inputs: Vec<Value>) -> OpFuture<'a> {
        Box::pin(async { Ok::<_, anyhow::Error>(Value::new()) })
    }
}
