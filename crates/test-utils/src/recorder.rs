use std::sync::{Arc, Mutex};

use drake::{abort, action, Action};

/// Shared, ordered log of executed actions.
///
/// Every action built from the same log appends to it, so a test can assert
/// the exact execution order of a run.
#[derive(Debug, Clone, Default)]
pub struct ActionLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl ActionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, entry: impl Into<String>) {
        self.entries.lock().unwrap().push(entry.into());
    }

    /// Snapshot of the entries so far.
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }

    /// Action that records the running task's name.
    pub fn recorder(&self) -> Action {
        let log = self.clone();
        action(move |ctx| {
            let log = log.clone();
            async move {
                log.record(ctx.name);
                Ok(())
            }
        })
    }

    /// Action that records the task's name, then fails with `message`.
    pub fn failing(&self, message: &str) -> Action {
        let log = self.clone();
        let message = message.to_string();
        action(move |ctx| {
            let log = log.clone();
            let message = message.clone();
            async move {
                log.record(ctx.name);
                Err(abort(message))
            }
        })
    }
}
