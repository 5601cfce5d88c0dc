// src/task/descriptor.rs

//! Task descriptors and actions.

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::errors::{DrakeError, Result};
use crate::task::name::{normalize_task_name, TaskKind};
use crate::task::registry::Registry;

/// Future returned by an [`Action`].
pub type ActionFuture = Pin<Box<dyn Future<Output = Result<()>> + Send>>;

/// Deferred work attached to a task, invoked when the task needs to run.
pub type Action = Arc<dyn Fn(TaskContext) -> ActionFuture + Send + Sync>;

/// Wrap an async closure as an [`Action`].
///
/// ```ignore
/// let build = action(|ctx| async move {
///     sh(format!("cc -o {} main.c", ctx.name), &ShOptions::default()).await
/// });
/// ```
pub fn action<F, Fut>(f: F) -> Action
where
    F: Fn(TaskContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    Arc::new(move |ctx| Box::pin(f(ctx)))
}

/// What an action gets to see when it is invoked.
#[derive(Debug, Clone)]
pub struct TaskContext {
    /// Canonical name of the running task.
    pub name: String,
    /// Resolved prerequisites in declaration order (wildcards expanded,
    /// names normalized).
    pub prerequisites: Vec<String>,
    /// Live handle to the registry; tasks registered here are visible to the
    /// rest of the current run.
    pub registry: Registry,
    /// `NAME=VALUE` variables from the command line.
    pub vars: Arc<BTreeMap<String, String>>,
}

impl TaskContext {
    pub fn var(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }
}

/// A named unit of work.
#[derive(Clone)]
pub struct TaskDescriptor {
    name: String,
    kind: TaskKind,
    prerequisites: Vec<String>,
    action: Option<Action>,
    description: Option<String>,
}

impl fmt::Debug for TaskDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("prerequisites", &self.prerequisites)
            .field("has_action", &self.action.is_some())
            .finish_non_exhaustive()
    }
}

impl TaskDescriptor {
    /// Declare a task.
    ///
    /// The name is normalized and classified immediately, so blank and
    /// wildcard names fail here rather than during a run. Prerequisites are
    /// kept as written (trimmed); wildcard prerequisites are expanded later,
    /// at resolution time.
    pub fn new<I, S>(name: &str, prerequisites: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = normalize_task_name(name)?;
        let kind = TaskKind::classify(&name)?;

        let mut prereqs = Vec::new();
        for prereq in prerequisites {
            let prereq: String = prereq.into();
            let prereq = prereq.trim();
            if prereq.is_empty() {
                return Err(DrakeError::BlankTaskName);
            }
            prereqs.push(prereq.to_string());
        }

        Ok(Self {
            name,
            kind,
            prerequisites: prereqs,
            action: None,
            description: None,
        })
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> TaskKind {
        self.kind
    }

    /// Prerequisites as written, in declaration order.
    pub fn prerequisites(&self) -> &[String] {
        &self.prerequisites
    }

    pub fn action(&self) -> Option<&Action> {
        self.action.as_ref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Fold a later registration of the same name into this one: its
    /// prerequisites are appended, and its action and description (when
    /// present) replace ours.
    pub(crate) fn merge(&mut self, later: TaskDescriptor) {
        self.prerequisites.extend(later.prerequisites);
        if later.action.is_some() {
            self.action = later.action;
        }
        if later.description.is_some() {
            self.description = later.description;
        }
    }
}
