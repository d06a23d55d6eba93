//! Live occupancy signals supplied by an external estimation service.
//!
//! The engine treats every signal as untrusted. Providers may fail or return
//! nothing; both outcomes leave a municipality on its modelled intensity.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::MunicipalityId;

/// One externally estimated reading for a municipality.
///
/// Field names follow the published camelCase contract; the snake_case keys
/// emitted by the estimation agent are accepted as aliases.
///
/// # Examples
/// ```
/// use marea_core::{ExternalSignal, LiveValueSource};
///
/// let signal: ExternalSignal = serde_json::from_str(
///     r#"{"occupation_percentage": 82, "tourist_pressure": 0.7, "confidence": 0.9}"#,
/// )
/// .unwrap();
/// assert_eq!(signal.live_value(LiveValueSource::Occupancy), Some(0.82));
/// assert_eq!(signal.live_value(LiveValueSource::Pressure), Some(0.7));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalSignal {
    /// Estimated hotel occupancy as a percentage.
    #[serde(default, alias = "occupation_percentage", alias = "occupancy_percent")]
    pub occupancy_percent: Option<f64>,
    /// Estimated tourist pressure in `[0, 1]`.
    #[serde(default, alias = "tourist_pressure")]
    pub pressure: Option<f64>,
    /// Self-reported confidence in `[0, 1]`.
    #[serde(default)]
    pub confidence: f64,
}

/// Which field of an [`ExternalSignal`] feeds the live blend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LiveValueSource {
    /// `occupancyPercent / 100`.
    #[default]
    Occupancy,
    /// `pressure` as given.
    Pressure,
}

impl std::str::FromStr for LiveValueSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "occupancy" => Ok(Self::Occupancy),
            "pressure" => Ok(Self::Pressure),
            _ => Err(format!("unknown live value source '{s}'")),
        }
    }
}

impl ExternalSignal {
    /// Build a signal from its three components.
    #[must_use]
    pub const fn new(occupancy_percent: f64, pressure: f64, confidence: f64) -> Self {
        Self {
            occupancy_percent: Some(occupancy_percent),
            pressure: Some(pressure),
            confidence,
        }
    }

    /// Raw live value selected by `source`, on a `0..=1` scale.
    ///
    /// Returns `None` when the field is absent or not finite. Values are not
    /// clamped here; the merger clamps before blending.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "percentages are rescaled to unit range"
    )]
    pub fn live_value(&self, source: LiveValueSource) -> Option<f64> {
        let value = match source {
            LiveValueSource::Occupancy => self.occupancy_percent.map(|percent| percent / 100.0),
            LiveValueSource::Pressure => self.pressure,
        }?;
        value.is_finite().then_some(value)
    }

    /// Report whether the signal's confidence reaches `minimum`.
    ///
    /// Non-finite confidence never qualifies.
    #[must_use]
    pub const fn is_trusted(&self, minimum: f64) -> bool {
        self.confidence.is_finite() && self.confidence >= minimum
    }
}

/// Errors a [`SignalProvider`] may report for a single municipality.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignalError {
    /// The upstream service did not answer in time.
    #[error("signal lookup for {id} timed out")]
    TimedOut {
        /// Municipality being looked up.
        id: MunicipalityId,
    },
    /// The upstream answer could not be interpreted.
    #[error("malformed signal for {id}: {reason}")]
    Malformed {
        /// Municipality being looked up.
        id: MunicipalityId,
        /// Description of the problem.
        reason: String,
    },
    /// The upstream service failed for another reason.
    #[error("signal provider unavailable for {id}: {reason}")]
    Unavailable {
        /// Municipality being looked up.
        id: MunicipalityId,
        /// Description of the failure.
        reason: String,
    },
}

/// Source of live signals keyed by municipality.
///
/// Lookups are independent; a failure for one municipality must not affect
/// another. Callers treat both `Ok(None)` and `Err(_)` as "no signal".
pub trait SignalProvider: Send + Sync {
    /// Fetch the current signal for `id`, if any.
    ///
    /// # Errors
    /// Returns [`SignalError`] when the provider cannot produce an answer.
    fn signal_for(&self, id: &MunicipalityId) -> Result<Option<ExternalSignal>, SignalError>;
}

impl SignalProvider for BTreeMap<MunicipalityId, ExternalSignal> {
    fn signal_for(&self, id: &MunicipalityId) -> Result<Option<ExternalSignal>, SignalError> {
        Ok(self.get(id).copied())
    }
}
