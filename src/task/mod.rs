// src/task/mod.rs

//! Task model.
//!
//! - [`name`] classifies task names and normalizes paths.
//! - [`descriptor`] defines tasks, their actions and the context an action
//!   runs with.
//! - [`registry`] stores descriptors by canonical name.
//! - [`stale`] decides whether a file task needs rebuilding.

pub mod descriptor;
pub mod name;
pub mod registry;
pub mod stale;

pub use descriptor::{action, Action, ActionFuture, TaskContext, TaskDescriptor};
pub use name::{
    is_file_task, is_glob, is_normal_task, normalize_path, normalize_task_name, TaskKind,
};
pub use registry::Registry;
pub use stale::out_of_date;
