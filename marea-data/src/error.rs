//! Error types raised while loading datasets and signal snapshots.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors raised while loading a reference dataset.
///
/// Individual malformed entries never produce an error; they are reported
/// as [`EntryRejection`](crate::EntryRejection)s instead.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Reading the dataset file failed.
    #[error("failed to read reference dataset at {path}")]
    Read {
        /// Requested path.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: std::io::Error,
    },
    /// The dataset was not valid JSON.
    #[error("failed to parse reference dataset from {origin}")]
    Parse {
        /// File path or other description of the input.
        origin: String,
        /// Source error from `serde_json`.
        #[source]
        source: serde_json::Error,
    },
    /// The JSON did not hold a list of entries.
    #[error("reference dataset from {origin} must be an array or an object with a `municipalities` array")]
    Shape {
        /// File path or other description of the input.
        origin: String,
    },
}

/// Errors raised while loading a signal snapshot.
///
/// Individual malformed signals are logged and skipped.
#[derive(Debug, Error)]
pub enum SignalSnapshotError {
    /// Reading the snapshot file failed.
    #[error("failed to read signal snapshot at {path}")]
    Read {
        /// Requested path.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: std::io::Error,
    },
    /// The snapshot was not valid JSON.
    #[error("failed to parse signal snapshot from {origin}")]
    Parse {
        /// File path or other description of the input.
        origin: String,
        /// Source error from `serde_json`.
        #[source]
        source: serde_json::Error,
    },
    /// The JSON was not an object keyed by municipality id.
    #[error("signal snapshot from {origin} must be an object keyed by municipality id")]
    Shape {
        /// File path or other description of the input.
        origin: String,
    },
}
