// src/fs/mock.rs

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, SystemTime};

use anyhow::{anyhow, Result};

use super::FileSystem;
use crate::task::name::normalize_path;

#[derive(Debug, Clone)]
pub enum MockEntry {
    File { modified: SystemTime },
    Dir(Vec<String>), // List of child names
}

/// In-memory filesystem with explicit modification times.
///
/// Paths are normalized on the way in, so `foo.o`, `./foo.o` and
/// `./a/../foo.o` all name the same entry. Clones share state, which lets a
/// test keep a handle while the scheduler owns another and have actions
/// "produce" files.
#[derive(Debug, Clone)]
pub struct MockFileSystem {
    files: Arc<Mutex<HashMap<PathBuf, MockEntry>>>,
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience for tests: the epoch plus `secs` seconds.
pub fn at(secs: u64) -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
}

fn key(path: &Path) -> PathBuf {
    PathBuf::from(normalize_path(&path.to_string_lossy()))
}

fn parent_key(path: &Path) -> Option<PathBuf> {
    let normalized = normalize_path(&path.to_string_lossy());
    if normalized == "." || normalized == "/" {
        return None;
    }
    let parent = match normalized.rfind('/') {
        Some(0) => "/".to_string(),
        Some(idx) => normalize_path(&normalized[..idx]),
        None => ".".to_string(),
    };
    Some(PathBuf::from(parent))
}

fn file_name(path: &Path) -> String {
    let normalized = normalize_path(&path.to_string_lossy());
    match normalized.rfind('/') {
        Some(idx) => normalized[idx + 1..].to_string(),
        None => normalized,
    }
}

impl MockFileSystem {
    pub fn new() -> Self {
        let mut files = HashMap::new();
        // Ensure root exists
        files.insert(PathBuf::from("."), MockEntry::Dir(Vec::new()));

        Self {
            files: Arc::new(Mutex::new(files)),
        }
    }

    /// Create (or re-stamp) a file with the given modification time.
    pub fn add_file(&self, path: impl AsRef<Path>, modified: SystemTime) {
        let path = key(path.as_ref());
        let mut files = self.lock();
        files.insert(path.clone(), MockEntry::File { modified });
        Self::link_into_parent(&mut files, &path);
    }

    /// Change the modification time of an existing file.
    pub fn set_modified(&self, path: impl AsRef<Path>, modified: SystemTime) -> Result<()> {
        let path = key(path.as_ref());
        let mut files = self.lock();
        match files.get_mut(&path) {
            Some(MockEntry::File { modified: m }) => {
                *m = modified;
                Ok(())
            }
            Some(MockEntry::Dir(_)) => Err(anyhow!("Is a directory: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    pub fn remove(&self, path: impl AsRef<Path>) {
        let path = key(path.as_ref());
        let mut files = self.lock();
        files.remove(&path);
        if let Some(parent) = parent_key(&path) {
            let name = file_name(&path);
            if let Some(MockEntry::Dir(children)) = files.get_mut(&parent) {
                children.retain(|child| *child != name);
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<PathBuf, MockEntry>> {
        self.files.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record `path` as a child of its parent, creating parent directories
    /// as needed.
    fn link_into_parent(files: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
        let Some(parent) = parent_key(path) else {
            return;
        };
        if !files.contains_key(&parent) {
            files.insert(parent.clone(), MockEntry::Dir(Vec::new()));
            Self::link_into_parent(files, &parent);
        }
        let name = file_name(path);
        if let Some(MockEntry::Dir(children)) = files.get_mut(&parent) {
            if !children.contains(&name) {
                children.push(name);
            }
        }
    }
}

impl FileSystem for MockFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.lock().contains_key(&key(path))
    }

    fn is_file(&self, path: &Path) -> bool {
        matches!(self.lock().get(&key(path)), Some(MockEntry::File { .. }))
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.lock().get(&key(path)), Some(MockEntry::Dir(_)))
    }

    fn modified(&self, path: &Path) -> Result<SystemTime> {
        match self.lock().get(&key(path)) {
            Some(MockEntry::File { modified }) => Ok(*modified),
            Some(MockEntry::Dir(_)) => Ok(SystemTime::UNIX_EPOCH),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    // No links in memory.
    fn is_symlink(&self, _path: &Path) -> bool {
        false
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let dir = key(path);
        let files = self.lock();
        match files.get(&dir) {
            Some(MockEntry::Dir(children)) => Ok(children
                .iter()
                .map(|name| PathBuf::from(format!("{}/{}", dir.to_string_lossy(), name)))
                .collect()),
            _ => Err(anyhow!("Not a directory or not found: {:?}", path)),
        }
    }
}
