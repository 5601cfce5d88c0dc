// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! A Drakefile is an ordinary Rust program; its `main` hands control to
//! [`crate::Drake::main`], which parses these arguments.

use std::ffi::OsString;

use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{Parser, ValueEnum};

use crate::errors::{DrakeError, Result};

/// Command-line arguments of a Drakefile.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "drake",
    version,
    about = "drake - a make-like task runner.",
    long_about = None
)]
pub struct CliArgs {
    /// Tasks to run and `NAME=VALUE` variables.
    ///
    /// With no task names the default task runs, if one is set.
    #[arg(value_name = "TASK|NAME=VALUE")]
    pub args: Vec<String>,

    /// Unconditionally execute file task actions.
    #[arg(short = 'a', long)]
    pub always_make: bool,

    /// Show what would run without executing any action.
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Do not report task progress.
    #[arg(short, long)]
    pub quiet: bool,

    /// Report debug details and log at debug level.
    #[arg(short = 'D', long)]
    pub debug: bool,

    /// List tasks that have a description.
    #[arg(short = 'l', long)]
    pub list_tasks: bool,

    /// List all tasks with their prerequisites.
    #[arg(short = 'L', long)]
    pub list_all: bool,

    /// Change to DIR before running.
    #[arg(short = 'd', long, value_name = "DIR")]
    pub directory: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `--debug`/`--quiet`, then `DRAKE_LOG`, then `info`.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Parse the process arguments. See [`parse_from`].
pub fn parse() -> Result<CliArgs> {
    parse_from(std::env::args_os())
}

/// Parse `argv` (program name first).
///
/// Help and version requests are printed and the process exits with status
/// 0. Any other rejection becomes a [`DrakeError::Config`]; an unknown flag
/// reads `illegal option: --foobar`.
pub fn parse_from<I, T>(argv: I) -> Result<CliArgs>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    CliArgs::try_parse_from(argv).map_err(|e| {
        if !e.use_stderr() {
            e.exit()
        }
        usage_error(&e)
    })
}

fn usage_error(e: &clap::Error) -> DrakeError {
    if e.kind() == ErrorKind::UnknownArgument {
        if let Some(ContextValue::String(arg)) = e.get(ContextKind::InvalidArg) {
            return DrakeError::Config(format!("illegal option: {arg}"));
        }
    }
    let rendered = e.to_string();
    let first = rendered.lines().next().unwrap_or_default();
    DrakeError::Config(first.trim_start_matches("error: ").to_string())
}
