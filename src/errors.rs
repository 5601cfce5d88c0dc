// src/errors.rs

//! Crate-wide error type and result alias.
//!
//! Variants are grouped by when they can occur:
//! - declaration errors are raised while tasks are registered,
//! - resolution and staleness errors are raised during a run,
//! - process errors come out of [`crate::exec`].

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DrakeError {
    #[error("blank task name")]
    BlankTaskName,

    #[error("wildcard task name not allowed: \"{0}\"")]
    WildcardTaskName(String),

    #[error("missing task: {0}")]
    MissingTask(String),

    #[error("circular dependency: {0}")]
    CircularDependency(String),

    #[error("outOfDate: missing prerequisite file: {0}")]
    MissingPrerequisite(String),

    #[error("sh: {command}: error code: {code}")]
    CommandFailed { command: String, code: i32 },

    #[error("sh: {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{task}: {source}")]
    TaskFailed {
        task: String,
        #[source]
        source: Box<DrakeError>,
    },

    #[error("{0}")]
    Config(String),

    #[error("illegal variable name: {0}")]
    IllegalVariable(String),

    #[error("{0}")]
    Abort(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid glob pattern: {0}")]
    Glob(#[from] globset::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DrakeError {
    /// The innermost error, looking through [`DrakeError::TaskFailed`]
    /// wrappers added by the scheduler.
    pub fn root_cause(&self) -> &DrakeError {
        match self {
            DrakeError::TaskFailed { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, DrakeError>;
