#![allow(dead_code)]

use std::sync::Arc;

use drake::fs::mock::MockFileSystem;
use drake::{MemoryReporter, Registry, Scheduler};

pub use drake_test_utils::{init_tracing, with_timeout, ActionLog, FakeMatcher, TaskBuilder};

/// Scheduler over an in-memory filesystem, reporting into memory.
pub fn mock_scheduler(registry: &Registry, fs: &MockFileSystem) -> (Scheduler, MemoryReporter) {
    init_tracing();
    let reporter = MemoryReporter::new();
    let scheduler = Scheduler::new(registry.clone())
        .with_file_system(Arc::new(fs.clone()))
        .with_reporter(Arc::new(reporter.clone()));
    (scheduler, reporter)
}
