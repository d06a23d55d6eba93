//! Blend live occupancy signals into the modelled intensity.

use log::debug;
use marea_core::{ExternalSignal, LiveValueSource, sanitise_intensity};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Share of the final intensity taken from a live signal, in `[0, 1]`.
///
/// # Examples
/// ```
/// use marea_scorer::LiveWeight;
///
/// assert_eq!(LiveWeight::default().get(), 0.45);
/// assert!(LiveWeight::new(1.2).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct LiveWeight(f64);

/// Errors returned by [`LiveWeight::new`].
#[derive(Debug, Error, PartialEq)]
pub enum LiveWeightError {
    /// The weight was outside `[0, 1]` or not finite.
    #[error("live weight must be within [0, 1], got {value}")]
    OutOfRange {
        /// Rejected weight.
        value: f64,
    },
}

impl LiveWeight {
    /// Weight used when configuration does not override it.
    pub const DEFAULT: Self = Self(0.45);

    /// Validate and construct a weight.
    ///
    /// # Errors
    /// Returns [`LiveWeightError::OutOfRange`] for values outside `[0, 1]`
    /// or non-finite input.
    pub fn new(value: f64) -> Result<Self, LiveWeightError> {
        if (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(LiveWeightError::OutOfRange { value })
        }
    }

    /// The weight as a float.
    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }
}

impl Default for LiveWeight {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<f64> for LiveWeight {
    type Error = LiveWeightError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LiveWeight> for f64 {
    fn from(weight: LiveWeight) -> Self {
        weight.0
    }
}

/// Weighted average of the seasonal intensity and a live value.
///
/// A missing or non-finite live value returns `seasonal` unchanged. Live
/// values are clamped to `[0, 1]` before blending and the result is clamped
/// again.
///
/// # Examples
/// ```
/// use marea_scorer::{LiveWeight, merge_live_signal};
///
/// let weight = LiveWeight::new(0.5).unwrap();
/// assert_eq!(merge_live_signal(0.4, None, weight), 0.4);
/// assert!((merge_live_signal(0.4, Some(0.8), weight) - 0.6).abs() < 1e-9);
/// // Untrusted live values are clamped before blending.
/// assert!((merge_live_signal(0.4, Some(7.0), weight) - 0.7).abs() < 1e-9);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "blending is a weighted average"
)]
pub fn merge_live_signal(seasonal: f64, live: Option<f64>, weight: LiveWeight) -> f64 {
    let Some(live) = live.filter(|value| value.is_finite()) else {
        return seasonal;
    };
    let live = live.clamp(0.0, 1.0);
    let weight = weight.get();
    sanitise_intensity(seasonal * (1.0 - weight) + live * weight)
}

/// Merger configured with a weight, a value source and a confidence gate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignalMerger {
    /// Share of the live value in the blend.
    pub weight: LiveWeight,
    /// Field of the signal that feeds the blend.
    pub source: LiveValueSource,
    /// Signals below this confidence are ignored.
    pub min_confidence: f64,
}

impl Default for SignalMerger {
    fn default() -> Self {
        Self {
            weight: LiveWeight::DEFAULT,
            source: LiveValueSource::Occupancy,
            min_confidence: 0.0,
        }
    }
}

impl SignalMerger {
    /// Blend `signal` into `seasonal`.
    ///
    /// Returns the final intensity and whether the signal contributed.
    #[must_use]
    pub fn merge(&self, seasonal: f64, signal: Option<&ExternalSignal>) -> (f64, bool) {
        let Some(signal) = signal else {
            return (seasonal, false);
        };
        if !signal.is_trusted(self.min_confidence) {
            debug!(
                "ignoring live signal with confidence {} below {}",
                signal.confidence, self.min_confidence
            );
            return (seasonal, false);
        }
        let live = signal.live_value(self.source);
        if live.is_none() {
            debug!("live signal has no usable {:?} value", self.source);
            return (seasonal, false);
        }
        (merge_live_signal(seasonal, live, self.weight), true)
    }
}
