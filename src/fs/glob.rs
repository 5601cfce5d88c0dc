// src/fs/glob.rs

//! Wildcard expansion for prerequisite patterns.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use globset::GlobBuilder;
use tracing::trace;

use crate::errors::Result;
use crate::fs::{FileSystem, RealFileSystem};
use crate::task::name::{is_glob, normalize_path};

/// Expands glob patterns into existing file paths.
///
/// The scheduler calls this synchronously while resolving a task's
/// prerequisites, so a pattern sees files produced earlier in the same run.
pub trait PathMatcher: Send + Sync + fmt::Debug {
    /// Paths of existing files matching any of `patterns`, relative to the
    /// current directory, normalized, sorted and de-duplicated. Empty when
    /// nothing matches.
    fn expand(&self, patterns: &[String]) -> Result<Vec<String>>;
}

/// [`PathMatcher`] backed by `globset` over a [`FileSystem`].
///
/// `*` and `?` do not cross `/`; `**` does. Literal (non-wildcard) patterns
/// match themselves if the file exists.
#[derive(Debug, Clone)]
pub struct GlobMatcher {
    fs: Arc<dyn FileSystem>,
}

impl GlobMatcher {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Matcher over the real filesystem.
    pub fn real() -> Self {
        Self::new(Arc::new(RealFileSystem))
    }
}

impl Default for GlobMatcher {
    fn default() -> Self {
        Self::real()
    }
}

impl PathMatcher for GlobMatcher {
    fn expand(&self, patterns: &[String]) -> Result<Vec<String>> {
        let mut found = BTreeSet::new();

        for pattern in patterns {
            let pattern = normalize_path(pattern.trim());

            if !is_glob(&pattern) {
                if self.fs.is_file(Path::new(&pattern)) {
                    found.insert(pattern);
                }
                continue;
            }

            let matcher = GlobBuilder::new(match_form(&pattern))
                .literal_separator(true)
                .build()?
                .compile_matcher();

            let base = glob_base(match_form(&pattern));
            for path in collect_files(self.fs.as_ref(), &base)? {
                let candidate = normalize_path(&path);
                if matcher.is_match(match_form(&candidate)) {
                    trace!(pattern = %pattern, path = %candidate, "glob match");
                    found.insert(candidate);
                }
            }
        }

        Ok(found.into_iter().collect())
    }
}

/// Paths are matched without the `./` prefix that [`normalize_path`] adds to
/// single-segment relative paths.
fn match_form(path: &str) -> &str {
    path.strip_prefix("./").unwrap_or(path)
}

/// Longest leading run of wildcard-free segments: the directory to walk.
fn glob_base(pattern: &str) -> String {
    let literal: Vec<&str> = pattern
        .split('/')
        .take_while(|segment| !is_glob(segment))
        .collect();
    match literal.as_slice() {
        [] => ".".to_string(),
        [""] => "/".to_string(),
        _ => literal.join("/"),
    }
}

/// Every file below `base`. A missing base yields nothing. Symlinked
/// directories are not descended into, so link cycles terminate.
fn collect_files(fs: &dyn FileSystem, base: &str) -> Result<Vec<String>> {
    let mut files = Vec::new();
    if !fs.is_dir(Path::new(base)) {
        return Ok(files);
    }

    let mut stack = vec![PathBuf::from(base)];
    while let Some(dir) = stack.pop() {
        for path in fs.read_dir(&dir)? {
            if fs.is_dir(&path) {
                if fs.is_symlink(&path) {
                    trace!(path = %path.display(), "not following symlinked directory");
                } else {
                    stack.push(path);
                }
            } else if fs.is_file(&path) {
                files.push(path.to_string_lossy().replace('\\', "/"));
            }
        }
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::{at, MockFileSystem};

    fn fixture() -> (MockFileSystem, GlobMatcher) {
        let fs = MockFileSystem::new();
        for path in ["a/b/z.ts", "a/y.ts", "u", "x.ts", "lib/io.rs"] {
            fs.add_file(path, at(1));
        }
        let matcher = GlobMatcher::new(Arc::new(fs.clone()));
        (fs, matcher)
    }

    fn expand(matcher: &GlobMatcher, patterns: &[&str]) -> Vec<String> {
        let patterns: Vec<String> = patterns.iter().map(|p| p.to_string()).collect();
        matcher.expand(&patterns).unwrap()
    }

    #[test]
    fn expands_recursive_and_literal_patterns() {
        let (_fs, matcher) = fixture();
        assert_eq!(
            expand(&matcher, &["./**/*.ts", "u"]),
            ["./u", "./x.ts", "a/b/z.ts", "a/y.ts"]
        );
    }

    #[test]
    fn single_star_does_not_cross_directories() {
        let (_fs, matcher) = fixture();
        assert_eq!(expand(&matcher, &["*.ts"]), ["./x.ts"]);
        assert_eq!(expand(&matcher, &["a/*.ts"]), ["a/y.ts"]);
    }

    #[test]
    fn no_match_is_empty() {
        let (_fs, matcher) = fixture();
        assert!(expand(&matcher, &["missing/**/*.c", "nope"]).is_empty());
    }

    #[test]
    fn sees_files_added_later() {
        let (fs, matcher) = fixture();
        assert_eq!(expand(&matcher, &["lib/*.o"]), Vec::<String>::new());
        fs.add_file("lib/io.o", at(2));
        assert_eq!(expand(&matcher, &["lib/*.o"]), ["lib/io.o"]);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directories_are_not_followed() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.c"), "").unwrap();
        std::os::unix::fs::symlink(dir.path(), dir.path().join("loop")).unwrap();
        std::os::unix::fs::symlink(dir.path(), dir.path().join("again")).unwrap();

        let root = normalize_path(&dir.path().to_string_lossy());
        let found = GlobMatcher::real()
            .expand(&[format!("{root}/**/*.c")])
            .unwrap();

        assert_eq!(found, [format!("{root}/a.c")]);
    }

    #[test]
    fn base_directory_of_pattern() {
        assert_eq!(glob_base("src/**/*.rs"), "src");
        assert_eq!(glob_base("*.rs"), ".");
        assert_eq!(glob_base("../x/*.rs"), "../x");
        assert_eq!(glob_base("/tmp/d/*"), "/tmp/d");
        assert_eq!(glob_base("/*"), "/");
    }
}
