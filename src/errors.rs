// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HypherError {
    #[error("cycle detected: {0}")]
    Cycle(String),

    #[error("node {uid} op: {desc} error: {source}")]
    NodeExec {
        uid: String,
        desc: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("invalid node: {0}")]
    InvalidNode(String),

    #[error("run cancelled")]
    Cancelled,

    #[error("graph run failed: {0}")]
    RunFailed(#[source] Box<HypherError>),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HypherError {
    /// Returns `true` for cycle errors raised by topology mutation or sorting.
    pub fn is_cycle(&self) -> bool {
        matches!(self, HypherError::Cycle(_))
    }

    /// Unwrap `RunFailed` layers and return the underlying error.
    pub fn root_cause(&self) -> &HypherError {
        match self {
            HypherError::RunFailed(inner) => inner.root_cause(),
            other => other,
        }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, HypherError>;
