// src/dag/scheduler.rs

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, trace};

use crate::config::RunOptions;
use crate::dag::state::RunState;
use crate::errors::{DrakeError, Result};
use crate::fs::{FileSystem, GlobMatcher, PathMatcher, RealFileSystem};
use crate::report::{ConsoleReporter, Reporter};
use crate::task::{
    is_file_task, is_glob, is_normal_task, normalize_path, normalize_task_name, out_of_date,
    Registry, TaskContext, TaskDescriptor, TaskKind,
};

type Resolving<'a> = Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

/// Resolves targets against a [`Registry`] and runs the actions that need
/// running.
///
/// Resolution is depth-first and left-to-right over targets and over each
/// task's prerequisites, so execution order follows declaration order.
/// Within one [`Scheduler::run`]:
/// - every task runs at most once (a diamond runs its shared base once);
/// - a task's prerequisites are settled before its own action is considered;
/// - the first failure aborts the rest of the run.
///
/// Actions run one at a time. The registry is re-read on every lookup, so
/// an action can register tasks that later steps of the same run use.
pub struct Scheduler {
    registry: Registry,
    fs: Arc<dyn FileSystem>,
    matcher: Arc<dyn PathMatcher>,
    reporter: Arc<dyn Reporter>,
    vars: Arc<BTreeMap<String, String>>,
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("registry", &self.registry)
            .field("fs", &self.fs)
            .field("matcher", &self.matcher)
            .field("reporter", &self.reporter)
            .field("vars", &self.vars)
            .finish()
    }
}

impl Scheduler {
    /// Scheduler over the real filesystem, reporting to stderr.
    pub fn new(registry: Registry) -> Self {
        let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
        Self {
            registry,
            matcher: Arc::new(GlobMatcher::new(fs.clone())),
            fs,
            reporter: Arc::new(ConsoleReporter),
            vars: Arc::new(BTreeMap::new()),
        }
    }

    /// Use `fs` for staleness checks, and a [`GlobMatcher`] over it for
    /// wildcard prerequisites. Call [`Scheduler::with_matcher`] afterwards to
    /// substitute a different matcher.
    pub fn with_file_system(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.matcher = Arc::new(GlobMatcher::new(fs.clone()));
        self.fs = fs;
        self
    }

    pub fn with_matcher(mut self, matcher: Arc<dyn PathMatcher>) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Command-line variables handed to every action through
    /// [`TaskContext::vars`].
    pub fn with_vars(mut self, vars: BTreeMap<String, String>) -> Self {
        self.vars = Arc::new(vars);
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Bring `targets` up to date.
    ///
    /// Run state (what has completed, what is being resolved) lives only for
    /// the duration of this call. An empty target list does nothing.
    pub async fn run<S: AsRef<str>>(&self, targets: &[S], options: &RunOptions) -> Result<()> {
        let mut state = RunState::new();
        for target in targets {
            let name = normalize_task_name(target.as_ref())?;
            self.resolve(name, &mut state, options).await?;
        }
        Ok(())
    }

    /// `name` must already be canonical: targets and literal prerequisites
    /// pass through [`normalize_task_name`], wildcard matches through
    /// [`normalize_path`].
    fn resolve<'a>(
        &'a self,
        name: String,
        state: &'a mut RunState,
        options: &'a RunOptions,
    ) -> Resolving<'a> {
        Box::pin(async move {
            if state.is_completed(&name) {
                trace!(task = %name, "already completed in this run");
                return Ok(());
            }

            let Some(task) = self.registry.lookup(&name) else {
                if is_normal_task(&name) {
                    return Err(DrakeError::MissingTask(name));
                }
                trace!(task = %name, "unregistered file; treating as leaf");
                state.mark_completed(&name);
                return Ok(());
            };

            state.enter(&name)?;
            if options.debug {
                self.emit(options, &format!("{name} resolving"));
            }

            // Each prerequisite is expanded just before it is resolved, so
            // a pattern sees files produced by the prerequisites before it.
            let mut prerequisites = Vec::new();
            for raw in task.prerequisites() {
                for prereq in self.expand(&name, raw)? {
                    self.resolve(prereq.clone(), state, options).await?;
                    prerequisites.push(prereq);
                }
            }

            state.leave(&name);
            self.execute(&task, prerequisites, state, options).await?;
            state.mark_completed(&name);
            Ok(())
        })
    }

    /// One prerequisite as written, as canonical task names. Wildcard
    /// matches are existing files, so they are normalized as paths even when
    /// the file name itself contains glob characters.
    fn expand(&self, task: &str, raw: &str) -> Result<Vec<String>> {
        if !is_glob(raw) {
            return Ok(vec![normalize_task_name(raw)?]);
        }

        let matches = self.matcher.expand(&[raw.to_string()])?;
        debug!(task = %task, pattern = %raw, matches = matches.len(), "expanded wildcard prerequisite");
        Ok(matches.iter().map(|path| normalize_path(path)).collect())
    }

    async fn execute(
        &self,
        task: &TaskDescriptor,
        prerequisites: Vec<String>,
        state: &mut RunState,
        options: &RunOptions,
    ) -> Result<()> {
        let name = task.name();
        let Some(action) = task.action().cloned() else {
            trace!(task = %name, "no action");
            return Ok(());
        };

        if task.kind() == TaskKind::File && !options.always_make {
            let files: Vec<String> = prerequisites
                .iter()
                .filter(|p| is_file_task(p))
                .cloned()
                .collect();
            if !self.is_stale(name, &files, state, options)? {
                self.emit(options, &format!("{name} skipped: up to date"));
                return Ok(());
            }
        }

        if options.dry_run {
            state.mark_would_run(name);
            self.emit(options, &format!("{name} skipped: dry run"));
            return Ok(());
        }

        self.emit(options, &format!("{name} started"));
        let started = Instant::now();

        let ctx = TaskContext {
            name: name.to_string(),
            prerequisites,
            registry: self.registry.clone(),
            vars: self.vars.clone(),
        };
        action(ctx).await.map_err(|source| DrakeError::TaskFailed {
            task: name.to_string(),
            source: Box::new(source),
        })?;

        self.emit(options, &format!("{name} finished ({:?})", started.elapsed()));
        Ok(())
    }

    /// Staleness of a file task. In a dry run nothing gets built, so a
    /// prerequisite that would have been rebuilt earlier in the run makes
    /// the target stale, whether its file is missing or merely old.
    fn is_stale(
        &self,
        target: &str,
        files: &[String],
        state: &RunState,
        options: &RunOptions,
    ) -> Result<bool> {
        if options.dry_run && files.iter().any(|p| state.would_run(p)) {
            return Ok(true);
        }
        out_of_date(self.fs.as_ref(), target, files)
    }

    fn emit(&self, options: &RunOptions, line: &str) {
        info!(target: "drake::progress", "{line}");
        if !options.quiet {
            self.reporter.report(line);
        }
    }
}
