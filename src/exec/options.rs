// src/exec/options.rs

//! Options shared by [`crate::exec::sh`] and [`crate::exec::sh_capture`].

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::Stdio;

/// What to do with a child's output or error stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdioMode {
    /// Capture into a string.
    Pipe,
    /// Send to the null device.
    Discard,
    /// Pass through to the parent's stream.
    Inherit,
}

impl From<StdioMode> for Stdio {
    fn from(mode: StdioMode) -> Self {
        match mode {
            StdioMode::Pipe => Stdio::piped(),
            StdioMode::Discard => Stdio::null(),
            StdioMode::Inherit => Stdio::inherit(),
        }
    }
}

/// Child process configuration.
///
/// `stdout`/`stderr` left as `None` take the entry point's default:
/// inherited for `sh`, piped for `sh_capture`.
#[derive(Debug, Clone, Default)]
pub struct ShOptions {
    pub cwd: Option<PathBuf>,
    /// Added to (and overriding) the parent's environment.
    pub env: BTreeMap<String, String>,
    /// Written to the child's stdin, which is then closed.
    pub input: Option<String>,
    pub stdout: Option<StdioMode>,
    pub stderr: Option<StdioMode>,
    /// `sh` only: log failures instead of returning them.
    pub ignore_failure: bool,
    /// `sh_capture` only: report launch failures in `CaptureOutput::error`
    /// instead of returning them.
    pub capture_spawn_errors: bool,
}

impl ShOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn env(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(name.into(), value.into());
        self
    }

    pub fn input(mut self, input: impl Into<String>) -> Self {
        self.input = Some(input.into());
        self
    }

    pub fn stdout(mut self, mode: StdioMode) -> Self {
        self.stdout = Some(mode);
        self
    }

    pub fn stderr(mut self, mode: StdioMode) -> Self {
        self.stderr = Some(mode);
        self
    }

    pub fn ignore_failure(mut self) -> Self {
        self.ignore_failure = true;
        self
    }

    pub fn capture_spawn_errors(mut self) -> Self {
        self.capture_spawn_errors = true;
        self
    }
}

/// One script or a sequence of separate command lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Passed to a single interpreter invocation; lines share state, so a
    /// `cd` affects the lines after it.
    Script(String),
    /// Each entry runs in a fresh interpreter, in order.
    Sequence(Vec<String>),
}

impl Commands {
    pub(crate) fn into_lines(self) -> Vec<String> {
        match self {
            Commands::Script(script) => vec![script],
            Commands::Sequence(lines) => lines,
        }
    }
}

impl From<&str> for Commands {
    fn from(script: &str) -> Self {
        Commands::Script(script.to_string())
    }
}

impl From<String> for Commands {
    fn from(script: String) -> Self {
        Commands::Script(script)
    }
}

impl From<&String> for Commands {
    fn from(script: &String) -> Self {
        Commands::Script(script.clone())
    }
}

impl From<Vec<String>> for Commands {
    fn from(lines: Vec<String>) -> Self {
        Commands::Sequence(lines)
    }
}

impl From<Vec<&str>> for Commands {
    fn from(lines: Vec<&str>) -> Self {
        Commands::Sequence(lines.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for Commands {
    fn from(lines: &[&str]) -> Self {
        Commands::Sequence(lines.iter().map(|l| l.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Commands {
    fn from(lines: [&str; N]) -> Self {
        Commands::Sequence(lines.iter().map(|l| l.to_string()).collect())
    }
}
