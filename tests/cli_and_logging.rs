// tests/cli_and_logging.rs

mod common;
use crate::common::TestResult;

use std::io::Write;

use clap::Parser;
use tempfile::{NamedTempFile, TempDir};
use tracing_subscriber::filter::LevelFilter;

use hypher::cli::{CliArgs, LogLevel, ModeArg};
use hypher::logging::resolve_filter;
use hypher::types::RunMode;

#[test]
fn cli_defaults() -> TestResult {
    let args = CliArgs::try_parse_from(["hypher"])?;
    assert_eq!(args.config, "Hypher.toml");
    assert!(args.mode.is_none());
    assert!(args.input.is_none());
    assert!(!args.dry_run);
    assert!(args.snapshot.is_none());
    Ok(())
}

#[test]
fn cli_parses_every_flag() -> TestResult {
    let args = CliArgs::try_parse_from([
        "hypher",
        "--config",
        "graphs/demo.toml",
        "--mode",
        "all",
        "--input",
        "in.json",
        "--log-level",
        "debug",
        "--dry-run",
        "--snapshot",
        "out",
    ])?;

    assert_eq!(args.config, "graphs/demo.toml");
    assert_eq!(args.mode, Some(ModeArg::All));
    assert_eq!(args.mode.map(RunMode::from), Some(RunMode::AllAtOnce));
    assert_eq!(args.input.as_deref(), Some("in.json"));
    assert!(matches!(args.log_level, Some(LogLevel::Debug)));
    assert!(args.dry_run);
    assert_eq!(args.snapshot.as_deref(), Some("out"));
    Ok(())
}

#[test]
fn cli_rejects_unknown_mode() {
    assert!(CliArgs::try_parse_from(["hypher", "--mode", "sideways"]).is_err());
}

#[test]
fn log_filter_priority() {
    let hint = |cli, env| resolve_filter(cli, env).max_level_hint();

    assert_eq!(hint(Some(LogLevel::Trace), Some("error")), Some(LevelFilter::TRACE));
    assert_eq!(hint(Some(LogLevel::Warn), None), Some(LevelFilter::WARN));
    assert_eq!(hint(None, Some("hypher::engine=debug,warn")), Some(LevelFilter::DEBUG));
    assert_eq!(hint(None, Some("  ")), Some(LevelFilter::INFO));
    assert_eq!(hint(None, None), Some(LevelFilter::INFO));
}

#[test]
fn run_mode_from_str() {
    assert_eq!("level".parse::<RunMode>(), Ok(RunMode::Level));
    assert_eq!("All-At-Once".parse::<RunMode>(), Ok(RunMode::AllAtOnce));
    assert!("other".parse::<RunMode>().is_err());
}

#[tokio::test]
async fn run_writes_snapshot() -> TestResult {
    let mut config = NamedTempFile::new()?;
    write!(
        config,
        r#"
[graph]
uid = "cli-graph"

[node.a]
op = "collect"

[node.b]
op = "merge"
after = ["a"]
"#
    )?;
    let mut input = NamedTempFile::new()?;
    write!(input, r#"{{ "a": {{ "seed": 1 }} }}"#)?;
    let dir = TempDir::new()?;
    let config_path = config.path().to_string_lossy().into_owned();
    let input_path = input.path().to_string_lossy().into_owned();
    let dir_path = dir.path().to_string_lossy().into_owned();

    let args = CliArgs::try_parse_from([
        "hypher",
        "--config",
        config_path.as_str(),
        "--input",
        input_path.as_str(),
        "--snapshot",
        dir_path.as_str(),
    ])?;

    hypher::run(args).await?;

    assert!(dir.path().join("cli-graph.json").exists());
    Ok(())
}

#[tokio::test]
async fn dry_run_executes_nothing() -> TestResult {
    let mut config = NamedTempFile::new()?;
    write!(config, "[node.a]\nop = \"fail\"\n")?;

    let config_path = config.path().to_string_lossy().into_owned();

    let args = CliArgs::try_parse_from(["hypher", "--config", config_path.as_str(), "--dry-run"])?;

    // A "fail" node would abort a real run.
    hypher::run(args).await?;
    Ok(())
}
