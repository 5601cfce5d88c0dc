// src/task/stale.rs

//! Timestamp-based staleness check for file tasks.

use std::path::Path;

use tracing::debug;

use crate::errors::{DrakeError, Result};
use crate::fs::FileSystem;

/// Decide whether `target` must be rebuilt from `prerequisites`.
///
/// - every prerequisite must exist, otherwise
///   [`DrakeError::MissingPrerequisite`];
/// - a missing target is out of date;
/// - a target is out of date if any prerequisite was modified strictly
///   after it.
///
/// Only file prerequisites are passed in; normal tasks carry no timestamp.
pub fn out_of_date(fs: &dyn FileSystem, target: &str, prerequisites: &[String]) -> Result<bool> {
    if let Some(missing) = prerequisites.iter().find(|p| !fs.exists(Path::new(p.as_str()))) {
        return Err(DrakeError::MissingPrerequisite(missing.clone()));
    }

    if !fs.exists(Path::new(target)) {
        debug!(target = %target, "target missing; out of date");
        return Ok(true);
    }

    let target_time = fs.modified(Path::new(target))?;
    for prereq in prerequisites {
        if fs.modified(Path::new(prereq))? > target_time {
            debug!(target = %target, prereq = %prereq, "prerequisite is newer than target");
            return Ok(true);
        }
    }

    Ok(false)
}
