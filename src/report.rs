// src/report.rs

//! Progress reporting sinks.
//!
//! The scheduler writes one human-readable line per task event
//! ("build started", "out/app skipped: up to date") to a [`Reporter`].
//! Every line is also emitted as a `tracing` event by the scheduler, so the
//! reporter only decides where the user-facing copy goes.

use std::fmt;
use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};

/// Destination for progress lines.
pub trait Reporter: Send + Sync + fmt::Debug {
    fn report(&self, line: &str);
}

/// Writes progress lines to stderr, prefixed with `drake: `.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn report(&self, line: &str) {
        let mut stderr = std::io::stderr().lock();
        // A closed stderr leaves nowhere to complain to.
        let _ = writeln!(stderr, "drake: {line}");
    }
}

/// Keeps progress lines in memory. Clones share the same buffer.
#[derive(Debug, Default, Clone)]
pub struct MemoryReporter {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the lines reported so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Reporter for MemoryReporter {
    fn report(&self, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line.to_string());
    }
}
