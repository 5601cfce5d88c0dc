// src/dag/state.rs

//! Per-run bookkeeping: which tasks are done and which are on the
//! resolution stack.

use std::collections::HashSet;

use tracing::trace;

use crate::errors::{DrakeError, Result};

/// Memoization and cycle-detection state for one [`crate::Scheduler::run`].
///
/// A fresh `RunState` is created for every run, so a second run over the
/// same registry re-evaluates everything.
#[derive(Debug, Default)]
pub struct RunState {
    completed: HashSet<String>,
    /// Tasks a dry run reported as needing to run.
    would_run: HashSet<String>,
    /// Resolution stack, outermost task first.
    in_progress: Vec<String>,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_completed(&self, name: &str) -> bool {
        self.completed.contains(name)
    }

    pub fn mark_completed(&mut self, name: &str) {
        trace!(task = %name, "completed");
        self.completed.insert(name.to_string());
    }

    /// Record that a dry run skipped `name` although it needed to run.
    pub fn mark_would_run(&mut self, name: &str) {
        self.would_run.insert(name.to_string());
    }

    /// `true` if `name` would have run in this dry run. Its file, if any,
    /// is then treated as out of date by dependents.
    pub fn would_run(&self, name: &str) -> bool {
        self.would_run.contains(name)
    }

    /// Push `name` onto the resolution stack.
    ///
    /// Fails with [`DrakeError::CircularDependency`] if it is already on
    /// the stack; the message spells out the loop, e.g. `a -> b -> a`.
    pub fn enter(&mut self, name: &str) -> Result<()> {
        if let Some(start) = self.in_progress.iter().position(|n| n == name) {
            let mut cycle: Vec<&str> = self.in_progress[start..]
                .iter()
                .map(String::as_str)
                .collect();
            cycle.push(name);
            return Err(DrakeError::CircularDependency(cycle.join(" -> ")));
        }
        self.in_progress.push(name.to_string());
        Ok(())
    }

    /// Pop `name` off the resolution stack.
    pub fn leave(&mut self, name: &str) {
        if let Some(pos) = self.in_progress.iter().rposition(|n| n == name) {
            self.in_progress.remove(pos);
        }
    }

    pub fn depth(&self) -> usize {
        self.in_progress.len()
    }
}
