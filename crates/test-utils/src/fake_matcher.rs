use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use drake::errors::Result;
use drake::fs::PathMatcher;

/// A fake path matcher that:
/// - answers each pattern from a table set up by the test
/// - records every pattern it was asked to expand.
///
/// Clones share the table, so an action can add matches mid-run to stand
/// in for files it produced.
#[derive(Debug, Clone, Default)]
pub struct FakeMatcher {
    matches: Arc<Mutex<HashMap<String, Vec<String>>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl FakeMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, pattern: &str, paths: &[&str]) -> Self {
        self.set(pattern, paths);
        self
    }

    pub fn set(&self, pattern: &str, paths: &[&str]) {
        self.matches.lock().unwrap().insert(
            pattern.to_string(),
            paths.iter().map(|p| p.to_string()).collect(),
        );
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl PathMatcher for FakeMatcher {
    fn expand(&self, patterns: &[String]) -> Result<Vec<String>> {
        let table = self.matches.lock().unwrap();
        let mut found = BTreeSet::new();
        for pattern in patterns {
            self.calls.lock().unwrap().push(pattern.clone());
            if let Some(paths) = table.get(pattern) {
                found.extend(paths.iter().cloned());
            }
        }
        Ok(found.into_iter().collect())
    }
}
