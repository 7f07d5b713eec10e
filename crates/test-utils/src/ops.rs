#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::anyhow;
use tokio_util::sync::CancellationToken;

use hypher::dag::{Op, OpFuture};
use hypher::types::Value;

/// One recorded invocation.
#[derive(Debug, Clone)]
pub struct Call {
    pub name: String,
    pub inputs: Vec<Value>,
}

/// Shared call log.
pub type CallLog = Arc<Mutex<Vec<Call>>>;

pub fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// Names in the order they were called.
pub fn call_order(log: &CallLog) -> Vec<String> {
    log.lock().unwrap().iter().map(|c| c.name.clone()).collect()
}

/// Inputs received by the first call of `name`.
pub fn inputs_of(log: &CallLog, name: &str) -> Option<Vec<Value>> {
    log.lock()
        .unwrap()
        .iter()
        .find(|c| c.name == name)
        .map(|c| c.inputs.clone())
}

/// An op that:
/// - records every invocation with its inputs
/// - returns `{name: <number of inputs>}`.
#[derive(Debug, Clone)]
pub struct RecordingOp {
    name: String,
    log: CallLog,
}

impl RecordingOp {
    pub fn new(name: impl Into<String>, log: CallLog) -> Self {
        Self {
            name: name.into(),
            log,
        }
    }
}

impl Op for RecordingOp {
    fn kind(&self) -> &str {
        "Recording"
    }

    fn desc(&self) -> &str {
        "records its calls"
    }

    fn apply<'a>(&'a self, _ctx: &'a CancellationToken, inputs: Vec<Value>) -> OpFuture<'a> {
        Box::pin(async move {
            let count = inputs.len();
            self.log.lock().unwrap().push(Call {
                name: self.name.clone(),
                inputs,
            });
            Ok::<_, anyhow::Error>(Value::from([(self.name.clone(), serde_json::json!(count))]))
        })
    }
}

/// An op that always fails with `message`, optionally after a delay.
#[derive(Debug, Clone)]
pub struct FailingOp {
    message: String,
    delay: Duration,
}

impl FailingOp {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            delay: Duration::ZERO,
        }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl Op for FailingOp {
    fn kind(&self) -> &str {
        "Failing"
    }

    fn desc(&self) -> &str {
        "always fails"
    }

    fn apply<'a>(&'a self, _ctx: &'a CancellationToken, _inputs: Vec<Value>) -> OpFuture<'a> {
        Box::pin(async move {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            Err::<Value, _>(anyhow!("{}", self.message))
        })
    }
}

/// An op that sleeps for `delay` unless the run is cancelled first, and
/// tracks how many instances run at the same time.
#[derive(Debug, Clone)]
pub struct SlowOp {
    delay: Duration,
    active: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
    finished: Arc<AtomicUsize>,
}

impl SlowOp {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            active: Arc::new(AtomicUsize::new(0)),
            peak: Arc::new(AtomicUsize::new(0)),
            finished: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Highest number of concurrent `apply` calls observed.
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    /// Number of calls that slept to completion.
    pub fn finished(&self) -> usize {
        self.finished.load(Ordering::SeqCst)
    }
}

impl Op for SlowOp {
    fn kind(&self) -> &str {
        "Slow"
    }

    fn desc(&self) -> &str {
        "sleeps unless cancelled"
    }

    fn apply<'a>(&'a self, ctx: &'a CancellationToken, _inputs: Vec<Value>) -> OpFuture<'a> {
        Box::pin(async move {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);

            let outcome = tokio::select! {
                _ = ctx.cancelled() => Err(anyhow!("cancelled while sleeping")),
                _ = tokio::time::sleep(self.delay) => {
                    self.finished.fetch_add(1, Ordering::SeqCst);
                    Ok(Value::new())
                }
            };

            self.active.fetch_sub(1, Ordering::SeqCst);
            outcome
        })
    }
}
