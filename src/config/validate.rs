// src/config/validate.rs

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::cli::CliArgs;
use crate::config::model::{Options, RunOptions};
use crate::errors::{DrakeError, Result};

static VARIABLE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_]\w*$").expect("variable name regex is valid"));

impl TryFrom<CliArgs> for Options {
    type Error = DrakeError;

    fn try_from(args: CliArgs) -> std::result::Result<Self, Self::Error> {
        let directory = args.directory.as_deref().map(validate_directory).transpose()?;

        let mut tasks = Vec::new();
        let mut vars = std::collections::BTreeMap::new();
        for arg in args.args {
            match parse_variable(&arg)? {
                Some((name, value)) => {
                    debug!(var = %name, "command-line variable");
                    vars.insert(name, value);
                }
                None => tasks.push(arg),
            }
        }

        Ok(Options {
            run: RunOptions {
                always_make: args.always_make,
                dry_run: args.dry_run,
                quiet: args.quiet,
                debug: args.debug,
            },
            list_tasks: args.list_tasks,
            list_all: args.list_all,
            directory,
            tasks,
            vars,
        })
    }
}

/// Split a `NAME=VALUE` argument. Arguments without `=` are task names.
fn parse_variable(arg: &str) -> Result<Option<(String, String)>> {
    let Some((name, value)) = arg.split_once('=') else {
        return Ok(None);
    };
    let name = name.trim();
    if !VARIABLE_NAME.is_match(name) {
        return Err(DrakeError::IllegalVariable(name.to_string()));
    }
    Ok(Some((name.to_string(), value.to_string())))
}

fn validate_directory(dir: &str) -> Result<PathBuf> {
    let path = PathBuf::from(dir);
    if !path.is_dir() {
        return Err(DrakeError::Config(format!(
            "--directory missing or not a directory: {dir}"
        )));
    }
    Ok(path)
}
