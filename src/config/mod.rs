// src/config/mod.rs

//! Graph definition files.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a definition from disk (`loader.rs`).
//! - Validate references, ops and acyclicity (`validate.rs`).
//! - Turn a validated definition into a runnable [`crate::dag::Graph`]
//!   (`build.rs`).

pub mod build;
pub mod loader;
pub mod model;
pub mod validate;

pub use build::build_graph;
pub use loader::{load_and_validate, load_from_path, load_run_inputs};
pub use model::{GraphFile, GraphSection, NodeConfig, RawGraphFile};
