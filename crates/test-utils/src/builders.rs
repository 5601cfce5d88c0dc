use drake::{Action, Registry, TaskDescriptor};

use crate::recorder::ActionLog;

/// Builder for `TaskDescriptor` to simplify test setup.
pub struct TaskBuilder {
    name: String,
    prerequisites: Vec<String>,
    description: Option<String>,
    action: Option<Action>,
}

impl TaskBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            prerequisites: vec![],
            description: None,
            action: None,
        }
    }

    pub fn prereq(mut self, prereq: &str) -> Self {
        self.prerequisites.push(prereq.to_string());
        self
    }

    pub fn prereqs(mut self, prereqs: &[&str]) -> Self {
        self.prerequisites
            .extend(prereqs.iter().map(|p| p.to_string()));
        self
    }

    pub fn description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    pub fn action(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    /// Record the task's name in `log` when its action runs.
    pub fn records(self, log: &ActionLog) -> Self {
        self.action(log.recorder())
    }

    pub fn build(self) -> TaskDescriptor {
        let mut task = TaskDescriptor::new(&self.name, self.prerequisites)
            .expect("Failed to build valid task from builder");
        if let Some(desc) = self.description {
            task = task.with_description(desc);
        }
        if let Some(action) = self.action {
            task = task.with_action(action);
        }
        task
    }

    pub fn register(self, registry: &Registry) {
        registry.register(self.build());
    }
}
