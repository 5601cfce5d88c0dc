// src/exec/mod.rs

//! Process execution layer.
//!
//! Task actions do most of their work by running shell commands through
//! this module, using `tokio::process::Command`.
//!
//! - [`sh`] streams output to the terminal and turns a nonzero exit into an
//!   error.
//! - [`sh_capture`] collects output and returns the exit code as data.
//! - [`options`] holds [`ShOptions`] and [`StdioMode`], shared by both.
//! - [`runner`] is the engine underneath: one script, one child process.

pub mod options;
pub mod runner;
pub mod sh;

pub use options::{Commands, ShOptions, StdioMode};
pub use sh::{sh, sh_capture, CaptureOutput};
