// src/config/model.rs

use std::collections::BTreeMap;
use std::path::PathBuf;

/// Flags that change how [`crate::Scheduler::run`] behaves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Run file task actions even when the target is up to date.
    pub always_make: bool,
    /// Resolve and evaluate staleness, report what would run, run nothing.
    pub dry_run: bool,
    /// Suppress progress lines.
    pub quiet: bool,
    /// Report resolution steps as well as task events.
    pub debug: bool,
}

/// Validated command line.
///
/// Built from [`crate::cli::CliArgs`] with `Options::try_from`, which is
/// where variable names and `--directory` are checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    pub run: RunOptions,
    pub list_tasks: bool,
    pub list_all: bool,
    pub directory: Option<PathBuf>,
    /// Positional arguments that are not `NAME=VALUE`, in order.
    pub tasks: Vec<String>,
    /// `NAME=VALUE` positional arguments; later assignments win.
    pub vars: BTreeMap<String, String>,
}

impl Options {
    /// `true` when `-l` or `-L` was given.
    pub fn is_listing(&self) -> bool {
        self.list_tasks || self.list_all
    }
}
