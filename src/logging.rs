// src/logging.rs

//! Logging setup using `tracing` + `tracing-subscriber`.
//!
//! Filter priority:
//! 1. `--log-level` CLI flag (if provided), applied to every target
//! 2. `HYPHER_LOG` environment variable, in `EnvFilter` directive syntax
//!    (e.g. `debug` or `hypher::engine=trace,info`)
//! 3. default to `info`
//!
//! Logs go to STDERR; stdout carries the JSON result of a run.

use anyhow::Result;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::LogLevel;

/// Environment variable consulted when no `--log-level` is given.
pub const LOG_ENV_VAR: &str = "HYPHER_LOG";

/// Initialise the global logging subscriber. Call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let filter = resolve_filter(cli_level, std::env::var(LOG_ENV_VAR).ok().as_deref());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))?;

    Ok(())
}

/// Build the active filter. A directive string that fails to parse is
/// ignored in favour of the `info` default.
pub fn resolve_filter(cli_level: Option<LogLevel>, env_value: Option<&str>) -> EnvFilter {
    if let Some(lvl) = cli_level {
        return level_filter(level_from_log_level(lvl));
    }

    env_value
        .map(str::trim)
        .filter(|directives| !directives.is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| level_filter(LevelFilter::INFO))
}

fn level_filter(level: LevelFilter) -> EnvFilter {
    EnvFilter::default().add_directive(level.into())
}

fn level_from_log_level(lvl: LogLevel) -> LevelFilter {
    match lvl {
        LogLevel::Error => LevelFilter::ERROR,
        LogLevel::Warn => LevelFilter::WARN,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Trace => LevelFilter::TRACE,
    }
}
