//! Failures surfaced by the `marea` binary.
//!
//! Library errors are wrapped transparently; file failures carry the path.
//! Variants stay small enough for `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use marea_engine::{DatasetError, LiveWeightError, MonthError, SignalSnapshotError};
use thiserror::Error;

/// Errors emitted by the Marea CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name.
        field: &'static str,
        /// Environment variable name.
        env: &'static str,
    },
    /// The month was outside `1..=12`.
    #[error("invalid --month: {0}")]
    InvalidMonth(#[from] MonthError),
    /// The live weight was outside `[0, 1]`.
    #[error("invalid --live-weight: {0}")]
    InvalidLiveWeight(#[from] LiveWeightError),
    /// The minimum confidence was outside `[0, 1]`.
    #[error("invalid --min-confidence: {value} is outside [0, 1]")]
    InvalidMinConfidence {
        /// Rejected value.
        value: f64,
    },
    /// Loading the reference dataset failed.
    #[error(transparent)]
    LoadDataset(#[from] DatasetError),
    /// Loading the signal snapshot failed.
    #[error(transparent)]
    LoadSignals(#[from] SignalSnapshotError),
    /// Reading an input file failed.
    #[error("failed to read {path}: {source}")]
    ReadInput {
        /// Requested path.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: std::io::Error,
    },
    /// An input file was not valid JSON for its purpose.
    #[error("failed to parse {path}: {source}")]
    ParseInput {
        /// Requested path.
        path: Utf8PathBuf,
        /// Source error from `serde_json`.
        #[source]
        source: serde_json::Error,
    },
    /// The validation input held neither records nor a record.
    #[error("{path} must hold a JSON object, an array of objects or a `municipalities` array")]
    InputShape {
        /// Requested path.
        path: Utf8PathBuf,
    },
    /// Serialising command output failed.
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing command output to stdout failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
    /// Writing command output to a file failed.
    #[error("failed to write output to {path}: {source}")]
    WriteOutputFile {
        /// Requested path.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: std::io::Error,
    },
}
