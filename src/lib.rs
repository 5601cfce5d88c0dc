// src/lib.rs

//! drake: a make-like task runner.
//!
//! A Drakefile is a Rust program that registers tasks and hands control to
//! [`Drake::main`]:
//!
//! ```no_run
//! use drake::{action, sh, Drake, ShOptions, TaskDescriptor};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut drake = Drake::new();
//!     drake.register(
//!         TaskDescriptor::new("build", ["hello.o"])
//!             .unwrap()
//!             .with_description("Build the program")
//!             .with_action(action(|_| async {
//!                 sh("cc -o hello hello.o", &ShOptions::new()).await
//!             })),
//!     );
//!     drake.set_default_task("build");
//!     drake.main().await;
//! }
//! ```

pub mod cli;
pub mod config;
pub mod dag;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod report;
pub mod task;
pub mod util;

use std::sync::Arc;

use tracing::{debug, info};

pub use crate::cli::CliArgs;
pub use crate::config::{Options, RunOptions};
pub use crate::dag::Scheduler;
pub use crate::errors::{DrakeError, Result};
pub use crate::exec::{sh, sh_capture, CaptureOutput, Commands, ShOptions, StdioMode};
pub use crate::report::{ConsoleReporter, MemoryReporter, Reporter};
pub use crate::task::{action, Action, Registry, TaskContext, TaskDescriptor, TaskKind};
pub use crate::util::{abort, glob, quote, read_file, sleep, touch, update_file, write_file};

/// Task registry plus the task to run when none is named.
#[derive(Debug, Default)]
pub struct Drake {
    registry: Registry,
    default_task: Option<String>,
}

impl Drake {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn register(&mut self, descriptor: TaskDescriptor) -> &mut Self {
        self.registry.register(descriptor);
        self
    }

    pub fn set_default_task(&mut self, name: impl Into<String>) -> &mut Self {
        self.default_task = Some(name.into());
        self
    }

    pub fn default_task(&self) -> Option<&str> {
        self.default_task.as_deref()
    }

    /// Execute a parsed command line: change directory, then either list
    /// tasks on stdout or run the requested ones.
    pub async fn run(&self, args: CliArgs) -> Result<()> {
        self.run_with(args, Arc::new(ConsoleReporter)).await
    }

    /// [`Drake::run`] with progress lines sent to `reporter`.
    pub async fn run_with(&self, args: CliArgs, reporter: Arc<dyn Reporter>) -> Result<()> {
        let options = Options::try_from(args)?;

        if let Some(dir) = &options.directory {
            debug!(dir = %dir.display(), "changing directory");
            std::env::set_current_dir(dir)?;
        }

        if options.is_listing() {
            for line in list_tasks(&self.registry, options.list_all) {
                println!("{line}");
            }
            return Ok(());
        }

        let targets = match (options.tasks.is_empty(), &self.default_task) {
            (false, _) => options.tasks.clone(),
            (true, Some(default)) => vec![default.clone()],
            (true, None) => {
                info!("no tasks requested and no default task; nothing to do");
                return Ok(());
            }
        };

        Scheduler::new(self.registry.clone())
            .with_reporter(reporter)
            .with_vars(options.vars)
            .run(&targets, &options.run)
            .await
    }

    /// Parse the process arguments, set up logging and run. Errors,
    /// including unknown flags, are printed to stderr as `drake error: ...`
    /// and the process exits with status 1.
    pub async fn main(self) {
        let args = match cli::parse() {
            Ok(args) => args,
            Err(err) => exit_with_error(&err, false),
        };
        let debug = args.debug;

        let result = match logging::init_logging(&args) {
            Ok(()) => self.run(args).await,
            Err(e) => Err(e),
        };

        if let Err(err) = result {
            exit_with_error(&err, debug);
        }
    }
}

fn exit_with_error(err: &DrakeError, debug: bool) -> ! {
    if debug {
        eprintln!("drake error: {err:?}");
    } else {
        eprintln!("drake error: {err}");
    }
    std::process::exit(1)
}

/// Lines of the `-l` / `-L` task listing, sorted by task name.
///
/// With `all == false`, only tasks that have a description are listed; with
/// `all == true`, every task is listed and followed by its prerequisites,
/// one per line, indented.
pub fn list_tasks(registry: &Registry, all: bool) -> Vec<String> {
    let mut tasks: Vec<TaskDescriptor> = registry
        .all()
        .into_iter()
        .filter(|t| all || t.description().is_some())
        .collect();
    tasks.sort_by(|a, b| a.name().cmp(b.name()));

    let width = tasks.iter().map(|t| t.name().len()).max().unwrap_or(0);

    let mut lines = Vec::new();
    for task in &tasks {
        let line = match task.description() {
            Some(desc) => format!("{:<width$}  {desc}", task.name()),
            None => task.name().to_string(),
        };
        lines.push(line);
        if all {
            lines.extend(task.prerequisites().iter().map(|p| format!("     {p}")));
        }
    }
    lines
}
