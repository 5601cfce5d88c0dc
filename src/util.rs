// src/util.rs

//! Helpers for writing task actions.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::time::{Duration, SystemTime};

use regex::Regex;
use tracing::debug;

use crate::errors::{DrakeError, Result};
use crate::fs::{GlobMatcher, PathMatcher};

/// Error that stops the run with `message`. Return it from an action.
pub fn abort(message: impl Into<String>) -> DrakeError {
    DrakeError::Abort(message.into())
}

/// Double-quote each argument and join them with spaces, for pasting into
/// a shell command line.
///
/// Quotes, backslashes and control characters are backslash-escaped.
pub fn quote<I, S>(args: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    args.into_iter()
        .map(|arg| quote_one(arg.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}

fn quote_one(arg: &str) -> String {
    let mut out = String::with_capacity(arg.len() + 2);
    out.push('"');
    for c in arg.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

pub fn read_file(path: impl AsRef<Path>) -> Result<String> {
    Ok(fs::read_to_string(path)?)
}

/// Write `text` to `path`, creating missing parent directories.
pub fn write_file(path: impl AsRef<Path>, text: &str) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, text)?;
    Ok(())
}

/// Replace every match of `pattern` in the file. Returns `true` if the
/// content changed; the file is only rewritten in that case.
pub fn update_file(path: impl AsRef<Path>, pattern: &Regex, replacement: &str) -> Result<bool> {
    let path = path.as_ref();
    let text = read_file(path)?;
    let updated = pattern.replace_all(&text, replacement);
    if updated == text {
        return Ok(false);
    }
    debug!(path = %path.display(), "updating file");
    write_file(path, &updated)?;
    Ok(true)
}

/// Create missing files (and their directories) empty; bump the
/// modification time of existing ones without touching their contents.
pub fn touch<I, P>(paths: I) -> Result<()>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    for path in paths {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        file.set_modified(SystemTime::now())?;
    }
    Ok(())
}

/// Existing files matching any of `patterns`, sorted and normalized.
pub fn glob<I, S>(patterns: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let patterns: Vec<String> = patterns.into_iter().map(Into::into).collect();
    GlobMatcher::real().expand(&patterns)
}

pub async fn sleep(duration: Duration) {
    tokio::time::sleep(duration).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_escapes_like_a_string_literal() {
        assert_eq!(quote(["foo", "\"bar\""]), r#""foo" "\"bar\"""#);
        assert_eq!(quote(["a\\b", "x\ty"]), r#""a\\b" "x\ty""#);
        assert_eq!(quote(Vec::<String>::new()), "");
    }

    #[test]
    fn write_read_and_update() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("nested/dir/f.txt");

        write_file(&file, "foobar").unwrap();
        assert_eq!(read_file(&file).unwrap(), "foobar");

        let o = Regex::new("o").unwrap();
        assert!(update_file(&file, &o, "O!").unwrap());
        assert_eq!(read_file(&file).unwrap(), "fO!O!bar");
        assert!(!update_file(&file, &o, "O!").unwrap());
        assert!(!update_file(&file, &Regex::new("zzz").unwrap(), "O!").unwrap());
    }

    #[test]
    fn touch_creates_and_preserves_contents() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a/b/c.txt");

        touch([&file]).unwrap();
        assert_eq!(fs::metadata(&file).unwrap().len(), 0);

        write_file(&file, "foobar").unwrap();
        let old = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000);
        OpenOptions::new()
            .append(true)
            .open(&file)
            .unwrap()
            .set_modified(old)
            .unwrap();

        touch([&file]).unwrap();
        let meta = fs::metadata(&file).unwrap();
        assert_eq!(meta.len(), 6);
        assert!(meta.modified().unwrap() > old);
    }

    #[test]
    fn abort_carries_message() {
        assert_eq!(abort("stop").to_string(), "stop");
    }
}
