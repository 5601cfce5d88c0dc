// src/task/name.rs

//! Task name classification and path normalization.
//!
//! Classification is purely syntactic: no filesystem access happens here.
//! A bare identifier (`build`, `42-foobar`, `_private_`) names a *normal*
//! task; anything else (`./foo`, `foo.o`, `/tmp/x`, `.env`) names a *file*
//! task whose name is a path.

use std::sync::LazyLock;

use regex::Regex;

use crate::errors::{DrakeError, Result};

static NORMAL_TASK_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_-]*$").expect("normal task name regex is valid")
});

/// Kind of a task, derived from the syntax of its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    /// Abstract task with no filesystem target.
    Normal,
    /// Task whose name is the path of the file it produces.
    File,
}

impl TaskKind {
    /// Classify a task name.
    ///
    /// Fails for blank names and names containing wildcard characters; both
    /// are caller errors.
    pub fn classify(name: &str) -> Result<TaskKind> {
        if name.trim().is_empty() {
            return Err(DrakeError::BlankTaskName);
        }
        if is_glob(name) {
            return Err(DrakeError::WildcardTaskName(name.to_string()));
        }
        if is_normal_task(name) {
            Ok(TaskKind::Normal)
        } else {
            Ok(TaskKind::File)
        }
    }
}

/// `true` if `name` is a bare identifier (normal task).
pub fn is_normal_task(name: &str) -> bool {
    NORMAL_TASK_NAME.is_match(name)
}

/// `true` if `name` is not a bare identifier (file task).
pub fn is_file_task(name: &str) -> bool {
    !is_normal_task(name)
}

/// `true` if `s` contains glob wildcard syntax.
pub fn is_glob(s: &str) -> bool {
    s.contains(['*', '?', '[', '{'])
}

/// Lexically normalize a path string.
///
/// - repeated separators collapse, `.` segments vanish;
/// - `..` pops the previous segment; at the root of an absolute path it is
///   dropped, at the start of a relative path it is kept;
/// - a single-segment relative path gets a `./` prefix (`foo` -> `./foo`),
///   multi-segment relative paths stay unqualified (`./lib/io.rs` ->
///   `lib/io.rs`).
///
/// The result is stable under repeated application.
pub fn normalize_path(path: &str) -> String {
    let path = if cfg!(windows) {
        path.replace('\\', "/")
    } else {
        path.to_string()
    };
    let absolute = path.starts_with('/');

    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ if absolute => {}
                _ => segments.push(".."),
            },
            _ => segments.push(segment),
        }
    }

    if absolute {
        return format!("/{}", segments.join("/"));
    }
    match segments.as_slice() {
        [] => ".".to_string(),
        [single] if *single != ".." => format!("./{single}"),
        _ => segments.join("/"),
    }
}

/// Canonical form of a task name.
///
/// Trims whitespace, rejects blank and wildcard names, and normalizes the
/// path of file tasks. Normal task names are returned trimmed.
pub fn normalize_task_name(raw: &str) -> Result<String> {
    let name = raw.trim();
    match TaskKind::classify(name)? {
        TaskKind::Normal => Ok(name.to_string()),
        TaskKind::File => Ok(normalize_path(name)),
    }
}
