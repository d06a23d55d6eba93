//! Live signal snapshots loaded from disk.
//!
//! A snapshot is a JSON object keyed by municipality id, as captured from the
//! occupancy feed:
//!
//! ```json
//! { "170955": { "occupancyPercent": 82.0, "pressure": 0.7, "confidence": 0.9 } }
//! ```

use std::collections::BTreeMap;

use camino::Utf8Path;
use log::{debug, warn};
use marea_core::{ExternalSignal, MunicipalityId, SignalError, SignalProvider};
use serde::Deserialize;
use serde_json::Value;

use crate::error::SignalSnapshotError;

/// Signals captured at one point in time.
///
/// Entries that fail to decode are kept as malformed so lookups for those
/// municipalities report [`SignalError::Malformed`] instead of silently
/// returning nothing.
///
/// # Examples
/// ```
/// use marea_core::{MunicipalityId, SignalProvider};
/// use marea_data::SignalSnapshot;
///
/// let snapshot = SignalSnapshot::from_json_str(
///     r#"{"170955": {"occupancyPercent": 80}, "080193": "broken"}"#,
/// )
/// .unwrap();
/// assert_eq!(snapshot.len(), 1);
/// assert!(snapshot.signal_for(&MunicipalityId::from("170955")).unwrap().is_some());
/// assert!(snapshot.signal_for(&MunicipalityId::from("080193")).is_err());
/// assert_eq!(snapshot.signal_for(&MunicipalityId::from("999999")), Ok(None));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SignalSnapshot {
    signals: BTreeMap<MunicipalityId, ExternalSignal>,
    malformed: BTreeMap<MunicipalityId, String>,
}

impl SignalSnapshot {
    /// Snapshot holding exactly `signals`.
    #[must_use]
    pub const fn new(signals: BTreeMap<MunicipalityId, ExternalSignal>) -> Self {
        Self {
            signals,
            malformed: BTreeMap::new(),
        }
    }

    /// Decode a snapshot from JSON text.
    ///
    /// # Errors
    /// Returns [`SignalSnapshotError`] when the text is not JSON or is not
    /// an object.
    pub fn from_json_str(text: &str) -> Result<Self, SignalSnapshotError> {
        Self::parse(text, "inline input")
    }

    /// Load a snapshot file.
    ///
    /// # Errors
    /// Returns [`SignalSnapshotError`] when the file cannot be read or
    /// parsed.
    pub fn load(path: &Utf8Path) -> Result<Self, SignalSnapshotError> {
        let text =
            marea_fs::read_utf8_to_string(path).map_err(|source| SignalSnapshotError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        Self::parse(&text, path.as_str())
    }

    fn parse(text: &str, origin: &str) -> Result<Self, SignalSnapshotError> {
        let value: Value =
            serde_json::from_str(text).map_err(|source| SignalSnapshotError::Parse {
                origin: origin.to_owned(),
                source,
            })?;
        let Value::Object(entries) = value else {
            return Err(SignalSnapshotError::Shape {
                origin: origin.to_owned(),
            });
        };
        let mut snapshot = Self::default();
        for (key, entry) in entries {
            let id = MunicipalityId::new(key);
            match ExternalSignal::deserialize(&entry) {
                Ok(signal) => {
                    snapshot.signals.insert(id, signal);
                }
                Err(err) => {
                    warn!("Skipped live signal: id={id}, reason={err}");
                    snapshot.malformed.insert(id, err.to_string());
                }
            }
        }
        debug!(
            "Loaded signal snapshot from {origin}: signals={}, malformed={}",
            snapshot.signals.len(),
            snapshot.malformed.len()
        );
        Ok(snapshot)
    }

    /// Number of usable signals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.signals.len()
    }

    /// Whether the snapshot has no usable signal.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    /// Number of entries that failed to decode.
    #[must_use]
    pub fn malformed_count(&self) -> usize {
        self.malformed.len()
    }
}

impl SignalProvider for SignalSnapshot {
    fn signal_for(&self, id: &MunicipalityId) -> Result<Option<ExternalSignal>, SignalError> {
        if let Some(reason) = self.malformed.get(id) {
            return Err(SignalError::Malformed {
                id: id.clone(),
                reason: reason.clone(),
            });
        }
        Ok(self.signals.get(id).copied())
    }
}
