// src/exec/runner.rs

//! Single command-line process runner shared by both entry points.

use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::exec::options::{ShOptions, StdioMode};

/// Exit status plus whatever was captured from a finished child.
#[derive(Debug)]
pub(crate) struct Finished {
    pub code: i32,
    pub output: String,
    pub error: String,
}

/// Build a shell command appropriate for the platform.
fn shell_command(script: &str) -> Command {
    if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(script);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(script);
        c
    }
}

/// Run one script to completion.
///
/// Stdin is inherited unless `options.input` is set; the input is then
/// written from a separate task while output is drained. An `Err` means the
/// process could not be launched or waited on at all.
pub(crate) async fn run_script(
    script: &str,
    options: &ShOptions,
    default_stdout: StdioMode,
    default_stderr: StdioMode,
) -> std::io::Result<Finished> {
    let mut cmd = shell_command(script);

    if let Some(cwd) = &options.cwd {
        cmd.current_dir(cwd);
    }
    cmd.envs(&options.env);

    cmd.stdin(if options.input.is_some() {
        Stdio::piped()
    } else {
        Stdio::inherit()
    })
    .stdout(options.stdout.unwrap_or(default_stdout))
    .stderr(options.stderr.unwrap_or(default_stderr))
    .kill_on_drop(true);

    let mut child = cmd.spawn()?;
    debug!(pid = child.id(), cmd = %script, "spawned shell");

    let writer = match (options.input.clone(), child.stdin.take()) {
        (Some(input), Some(mut stdin)) => Some(tokio::spawn(async move {
            let res = stdin.write_all(input.as_bytes()).await;
            drop(stdin);
            res
        })),
        _ => None,
    };

    let out = child.wait_with_output().await?;

    if let Some(writer) = writer {
        match writer.await {
            Ok(Err(e)) if e.kind() != std::io::ErrorKind::BrokenPipe => {
                warn!(cmd = %script, error = %e, "failed writing stdin of child process");
            }
            Err(e) => {
                warn!(cmd = %script, error = %e, "stdin writer task failed");
            }
            _ => {}
        }
    }

    let code = out.status.code().unwrap_or(-1);
    debug!(cmd = %script, exit_code = code, success = out.status.success(), "shell exited");

    Ok(Finished {
        code,
        output: String::from_utf8_lossy(&out.stdout).into_owned(),
        error: String::from_utf8_lossy(&out.stderr).into_owned(),
    })
}
