// src/exec/sh.rs

//! Streaming (`sh`) and capturing (`sh_capture`) entry points.

use tracing::{debug, info, warn};

use crate::errors::{DrakeError, Result};
use crate::exec::options::{Commands, ShOptions, StdioMode};
use crate::exec::runner::run_script;

/// Result of [`sh_capture`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptureOutput {
    /// Exit code of the last command run; `-1` for a launch failure or a
    /// signal.
    pub code: i32,
    pub output: String,
    pub error: String,
}

impl CaptureOutput {
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Run shell commands with output streamed to the terminal.
///
/// A single string is one script; a sequence runs each entry in a fresh
/// shell and stops at the first one that fails. A nonzero exit becomes
/// [`DrakeError::CommandFailed`], a launch failure [`DrakeError::Spawn`],
/// unless `options.ignore_failure` is set.
pub async fn sh(commands: impl Into<Commands>, options: &ShOptions) -> Result<()> {
    for command in commands.into().into_lines() {
        run_streaming(&command, options).await?;
    }
    Ok(())
}

async fn run_streaming(command: &str, options: &ShOptions) -> Result<()> {
    info!(cmd = %command, "sh");

    let failure = match run_script(command, options, StdioMode::Inherit, StdioMode::Inherit).await {
        Ok(finished) if finished.code == 0 => return Ok(()),
        Ok(finished) => DrakeError::CommandFailed {
            command: command.to_string(),
            code: finished.code,
        },
        Err(source) => DrakeError::Spawn {
            command: command.to_string(),
            source,
        },
    };

    if options.ignore_failure {
        warn!(cmd = %command, error = %failure, "ignoring command failure");
        return Ok(());
    }
    Err(failure)
}

/// Run shell commands and collect their output.
///
/// Never fails because of an exit status; the code is returned for the
/// caller to inspect. Sequences stop at the first nonzero exit, and output
/// of every command that ran is concatenated. Only a launch failure is an
/// error, and with `options.capture_spawn_errors` even that is reported in
/// [`CaptureOutput::error`] (with code `-1`).
pub async fn sh_capture(commands: impl Into<Commands>, options: &ShOptions) -> Result<CaptureOutput> {
    let mut captured = CaptureOutput::default();

    for command in commands.into().into_lines() {
        debug!(cmd = %command, "sh_capture");

        match run_script(&command, options, StdioMode::Pipe, StdioMode::Pipe).await {
            Ok(finished) => {
                captured.code = finished.code;
                captured.output.push_str(&finished.output);
                captured.error.push_str(&finished.error);
            }
            Err(source) if options.capture_spawn_errors => {
                captured.code = -1;
                captured.error.push_str(&format!("{command}: {source}"));
            }
            Err(source) => return Err(DrakeError::Spawn { command, source }),
        }

        if !captured.success() {
            break;
        }
    }

    Ok(captured)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn capture_echo() {
        let out = sh_capture("echo Hello", &ShOptions::new()).await.unwrap();
        assert_eq!(out.code, 0);
        assert_eq!(out.output, "Hello\n");
        assert_eq!(out.error, "");
    }

    #[tokio::test]
    async fn capture_sequence_stops_at_failure() {
        let out = sh_capture(["echo A", "exit 3", "echo B"], &ShOptions::new())
            .await
            .unwrap();
        assert_eq!(out.code, 3);
        assert_eq!(out.output, "A\n");
    }

    #[tokio::test]
    async fn streaming_reports_command_and_code() {
        let options = ShOptions::new().stdout(StdioMode::Discard);
        let err = sh(["echo A", "exit 1", "echo B"], &options).await.unwrap_err();
        match err {
            DrakeError::CommandFailed { command, code } => {
                assert_eq!(command, "exit 1");
                assert_eq!(code, 1);
            }
            other => panic!("expected CommandFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn streaming_can_ignore_failures() {
        let options = ShOptions::new()
            .stdout(StdioMode::Discard)
            .stderr(StdioMode::Discard)
            .ignore_failure();
        sh(["exit 2", "true"], &options).await.unwrap();
    }
}
