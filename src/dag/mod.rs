// src/dag/mod.rs

//! Dependency resolution and execution.
//!
//! - [`scheduler`] walks the task graph depth-first and decides which
//!   actions to run.
//! - [`state`] holds the per-run completed set and resolution stack.

pub mod scheduler;
pub mod state;

pub use scheduler::Scheduler;
pub use state::RunState;
