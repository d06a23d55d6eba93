//! Command-line interface for the Marea tourism-intensity engine.
//!
//! `marea publish` scores a reference dataset for one month and prints the
//! published record set as JSON. `marea validate` checks raw municipality
//! payloads and prints a batch report. Logs go to stderr; stdout carries
//! only JSON.
#![forbid(unsafe_code)]

use std::io::Write;

use camino::Utf8Path;
use clap::{Parser, Subcommand};
use serde::Serialize;

mod error;
mod publish;
mod validate;

pub use error::CliError;

use publish::PublishArgs;
use validate::ValidateArgs;

const ARG_DATASET: &str = "dataset";
const ARG_MONTH: &str = "month";
const ARG_SIGNALS: &str = "signals";
const ARG_MULTIPLIER_TABLE: &str = "multiplier-table";
const ARG_STRATEGY: &str = "strategy";
const ARG_LIVE_WEIGHT: &str = "live-weight";
const ARG_LIVE_SOURCE: &str = "live-source";
const ARG_MIN_CONFIDENCE: &str = "min-confidence";
const ARG_OUTPUT: &str = "output";
const ARG_TOP: &str = "top";
const ARG_INPUT: &str = "input";
const ARG_AUTO_CORRECT: &str = "auto-correct";
const ENV_DATASET: &str = "MAREA_CMDS_PUBLISH_DATASET";
const ENV_INPUT: &str = "MAREA_CMDS_VALIDATE_INPUT";

/// Run the Marea CLI with the current process arguments and environment.
///
/// # Errors
/// Returns [`CliError`] when arguments, configuration, inputs or output
/// writing fail.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Publish(args) => publish::run_publish(args),
        Command::Validate(args) => validate::run_validate(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "marea",
    about = "Tourism-intensity estimation for the municipalities of Catalunya",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score a reference dataset for one month.
    Publish(PublishArgs),
    /// Check raw municipality payloads.
    Validate(ValidateArgs),
}

/// Pretty-print `value` to `path`, or to `writer` when no path is given.
fn emit_json<T: Serialize>(
    value: &T,
    path: Option<&Utf8Path>,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let mut payload = serde_json::to_string_pretty(value).map_err(CliError::SerialiseOutput)?;
    payload.push('\n');
    match path {
        Some(path) => {
            marea_fs::write_utf8_string(path, &payload).map_err(|source| {
                CliError::WriteOutputFile {
                    path: path.to_path_buf(),
                    source,
                }
            })
        }
        None => writer
            .write_all(payload.as_bytes())
            .map_err(CliError::WriteOutput),
    }
}

#[cfg(test)]
mod tests;
