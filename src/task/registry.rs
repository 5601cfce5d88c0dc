// src/task/registry.rs

//! Shared task registry.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use crate::task::descriptor::TaskDescriptor;
use crate::task::name::normalize_task_name;

#[derive(Default)]
struct Tasks {
    /// Descriptors in first-registration order.
    ordered: Vec<TaskDescriptor>,
    /// Canonical name -> position in `ordered`.
    index: HashMap<String, usize>,
}

/// Task descriptors keyed by canonical name.
///
/// `Registry` is a cheap handle: clones share the same underlying table.
/// The scheduler holds one and re-reads it on every lookup, so an action
/// that registers tasks through [`crate::TaskContext::registry`] affects the
/// rest of the run it belongs to.
#[derive(Clone, Default)]
pub struct Registry {
    tasks: Arc<RwLock<Tasks>>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("tasks", &self.names())
            .finish()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a descriptor, merging it into an existing one with the same
    /// name (see [`TaskDescriptor`] merge rules: prerequisites append,
    /// action and description replace).
    pub fn register(&self, descriptor: TaskDescriptor) {
        let mut tasks = self.write();
        match tasks.index.get(descriptor.name()).copied() {
            Some(pos) => {
                debug!(task = %descriptor.name(), "merging into existing task");
                tasks.ordered[pos].merge(descriptor);
            }
            None => {
                debug!(task = %descriptor.name(), kind = ?descriptor.kind(), "registering task");
                let pos = tasks.ordered.len();
                tasks.index.insert(descriptor.name().to_string(), pos);
                tasks.ordered.push(descriptor);
            }
        }
    }

    /// Look a task up by name. The name is normalized first, so `foo.o` and
    /// `./foo.o` find the same task; names that cannot be normalized find
    /// nothing.
    pub fn lookup(&self, name: &str) -> Option<TaskDescriptor> {
        let name = normalize_task_name(name).ok()?;
        let tasks = self.read();
        tasks
            .index
            .get(&name)
            .map(|&pos| tasks.ordered[pos].clone())
    }

    /// `true` if a task with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        normalize_task_name(name)
            .map(|name| self.read().index.contains_key(&name))
            .unwrap_or(false)
    }

    /// All descriptors in registration order.
    pub fn all(&self) -> Vec<TaskDescriptor> {
        self.read().ordered.clone()
    }

    pub fn names(&self) -> Vec<String> {
        self.read()
            .ordered
            .iter()
            .map(|t| t.name().to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.read().ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> RwLockReadGuard<'_, Tasks> {
        self.tasks.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tasks> {
        self.tasks.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::descriptor::action;

    #[test]
    fn lookup_uses_canonical_names() {
        let registry = Registry::new();
        registry.register(TaskDescriptor::new("foo.o", ["foo.c"]).unwrap());

        assert!(registry.lookup("./foo.o").is_some());
        assert!(registry.lookup(" foo.o ").is_some());
        assert!(registry.lookup("bar.o").is_none());
        assert!(registry.lookup("*.o").is_none());
        assert!(registry.contains("foo.o"));
        assert!(!registry.contains(""));
    }

    #[test]
    fn all_keeps_first_registration_order() {
        let registry = Registry::new();
        for name in ["c", "a", "b"] {
            registry.register(TaskDescriptor::new(name, Vec::<String>::new()).unwrap());
        }
        registry.register(TaskDescriptor::new("a", ["x"]).unwrap());

        assert_eq!(registry.names(), ["c", "a", "b"]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn duplicate_registration_merges() {
        let registry = Registry::new();
        registry.register(
            TaskDescriptor::new("test", ["fmt"])
                .unwrap()
                .with_description("Run tests"),
        );
        registry.register(
            TaskDescriptor::new("test", ["lint"])
                .unwrap()
                .with_action(action(|_| async { Ok(()) })),
        );

        let task = registry.lookup("test").unwrap();
        assert_eq!(task.prerequisites(), ["fmt", "lint"]);
        assert!(task.action().is_some());
        assert_eq!(task.description(), Some("Run tests"));
    }

    #[test]
    fn clones_share_state() {
        let registry = Registry::new();
        let handle = registry.clone();
        handle.register(TaskDescriptor::new("late", Vec::<String>::new()).unwrap());
        assert!(registry.lookup("late").is_some());
    }
}
