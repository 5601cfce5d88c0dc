// src/config/mod.rs

//! Run configuration for drake.
//!
//! Responsibilities:
//! - Define the strongly typed options (`model.rs`).
//! - Validate the parsed command line into [`Options`] (`validate.rs`).

pub mod model;
pub mod validate;

pub use model::{Options, RunOptions};
