// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

use crate::types::RunMode;

/// Command-line arguments for `hypher`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "hypher",
    version,
    about = "Run a DAG of operations defined in a TOML file.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the graph definition (TOML).
    ///
    /// Default: `Hypher.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Hypher.toml")]
    pub config: String,

    /// Scheduling mode. Overrides `[graph].mode` from the definition.
    #[arg(long, value_enum, value_name = "MODE")]
    pub mode: Option<ModeArg>,

    /// JSON file holding an object keyed by input node name.
    #[arg(long, value_name = "FILE")]
    pub input: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `HYPHER_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse and validate, print the levels, but don't execute any node.
    #[arg(long)]
    pub dry_run: bool,

    /// Write a JSON snapshot of the graph into this directory after the run.
    #[arg(long, value_name = "DIR")]
    pub snapshot: Option<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Scheduling mode as exposed on the CLI.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Level,
    All,
}

impl From<ModeArg> for RunMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Level => RunMode::Level,
            ModeArg::All => RunMode::AllAtOnce,
        }
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
