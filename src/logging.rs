// src/logging.rs

//! Logging setup for drake using `tracing` + `tracing-subscriber`.
//!
//! Priority for determining the log level:
//! 1. `--log-level` CLI flag (if provided)
//! 2. `--debug` (debug) or `--quiet` (warn)
//! 3. `DRAKE_LOG` environment variable (e.g. "info", "debug")
//! 4. default to `info`
//!
//! Logs are sent to STDERR so that command stdout can be used purely for
//! task output.

use tracing_subscriber::fmt;

use crate::cli::{CliArgs, LogLevel};
use crate::errors::{DrakeError, Result};

/// Initialise global logging subscriber.
///
/// Fails if a global subscriber is already installed.
pub fn init_logging(args: &CliArgs) -> Result<()> {
    let level = resolve_level(args, std::env::var("DRAKE_LOG").ok().as_deref());

    fmt()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| DrakeError::Other(anyhow::anyhow!("failed to initialise logging: {e}")))?;

    Ok(())
}

fn resolve_level(args: &CliArgs, env_level: Option<&str>) -> tracing::Level {
    if let Some(lvl) = args.log_level {
        return level_from_log_level(lvl);
    }
    if args.debug {
        return tracing::Level::DEBUG;
    }
    if args.quiet {
        return tracing::Level::WARN;
    }
    env_level
        .and_then(parse_level_str)
        .unwrap_or(tracing::Level::INFO)
}

fn level_from_log_level(lvl: LogLevel) -> tracing::Level {
    match lvl {
        LogLevel::Error => tracing::Level::ERROR,
        LogLevel::Warn => tracing::Level::WARN,
        LogLevel::Info => tracing::Level::INFO,
        LogLevel::Debug => tracing::Level::DEBUG,
        LogLevel::Trace => tracing::Level::TRACE,
    }
}

fn parse_level_str(s: &str) -> Option<tracing::Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(tracing::Level::ERROR),
        "warn" | "warning" => Some(tracing::Level::WARN),
        "info" => Some(tracing::Level::INFO),
        "debug" => Some(tracing::Level::DEBUG),
        "trace" => Some(tracing::Level::TRACE),
        _ => None,
    }
}
