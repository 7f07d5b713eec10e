// src/ops.rs

//! Built-in ops available to graph definition files.
//!
//! - `noop`: returns an empty value.
//! - `collect`: returns `{"inputs": [...]}` holding every received value.
//! - `merge`: folds every received value into one; later keys win.
//! - `fail`: always fails. Useful to exercise fail-fast behaviour.

use std::sync::Arc;

use anyhow::anyhow;
use tokio_util::sync::CancellationToken;

use crate::dag::{NoOp, Op, OpFuture};
use crate::types::Value;

/// Key under which [`Collect`] stores its received inputs.
pub const COLLECT_KEY: &str = "inputs";

/// Names accepted by [`from_name`].
pub const BUILTIN_OPS: &[&str] = &["noop", "collect", "merge", "fail"];

/// Resolve a built-in op by name.
pub fn from_name(name: &str) -> Option<Arc<dyn Op>> {
    match name.trim().to_lowercase().as_str() {
        "noop" => Some(Arc::new(NoOp)),
        "collect" => Some(Arc::new(Collect)),
        "merge" => Some(Arc::new(Merge)),
        "fail" => Some(Arc::new(Fail)),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Collect;

impl Op for Collect {
    fn kind(&self) -> &str {
        "Collect"
    }

    fn desc(&self) -> &str {
        "Collect records its inputs"
    }

    fn apply<'a>(&'a self, _ctx: &'a CancellationToken, inputs: Vec<Value>) -> OpFuture<'a> {
        Box::pin(async move {
            let recorded = serde_json::to_value(inputs)?;
            Ok::<_, anyhow::Error>(Value::from([(COLLECT_KEY.to_string(), recorded)]))
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Merge;

impl Op for Merge {
    fn kind(&self) -> &str {
        "Merge"
    }

    fn desc(&self) -> &str {
        "Merge folds its inputs into a single value"
    }

    fn apply<'a>(&'a self, _ctx: &'a CancellationToken, inputs: Vec<Value>) -> OpFuture<'a> {
        Box::pin(async move {
            let mut merged = Value::new();
            for input in inputs {
                merged.extend(input);
            }
            Ok::<_, anyhow::Error>(merged)
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Fail;

impl Op for Fail {
    fn kind(&self) -> &str {
        "Fail"
    }

    fn desc(&self) -> &str {
        "Fail always returns an error"
    }

    fn apply<'a>(&'a self, _ctx: &'a CancellationToken, inputs: Vec<Value>) -> OpFuture<'a> {
        Box::pin(async move {
            Err::<Value, _>(anyhow!("refusing to process {} input(s)", inputs.len()))
        })
    }
}
