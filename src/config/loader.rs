// src/config/loader.rs

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::config::model::{GraphFile, RawGraphFile};
use crate::errors::Result;
use crate::types::Value;

/// Load a graph definition and return the raw `RawGraphFile`.
///
/// This only performs TOML deserialization; use [`load_and_validate`] for the
/// semantic checks.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawGraphFile> {
    let contents = fs::read_to_string(path.as_ref())?;
    let raw: RawGraphFile = toml::from_str(&contents)?;
    Ok(raw)
}

/// Load a graph definition and validate it:
///
/// - at least one node,
/// - known op names,
/// - `after` references exist and are not self references,
/// - declared inputs/outputs exist,
/// - no dependency cycles.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<GraphFile> {
    let raw = load_from_path(&path)?;
    GraphFile::try_from(raw)
}

/// Read run inputs from a JSON object keyed by node uid.
pub fn load_run_inputs(path: impl AsRef<Path>) -> Result<HashMap<String, Value>> {
    let contents = fs::read_to_string(path.as_ref())?;
    let inputs: HashMap<String, Value> = serde_json::from_str(&contents)?;
    Ok(inputs)
}
