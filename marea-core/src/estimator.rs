//! Estimate the static tourism intensity of a municipality.
//!
//! The `IntensityEstimator` trait turns the static facts of a
//! [`MunicipalityRecord`](crate::MunicipalityRecord) into a base intensity.
//! Strategies live in `marea-scorer`; the pipeline selects one through
//! configuration.

use crate::MunicipalityRecord;

/// Calculate a base intensity for a municipality.
///
/// Implementations must be thread-safe (`Send` + `Sync`) so the pipeline can
/// share one estimator across workers. The method is infallible; missing
/// facts are handled by returning a floor value rather than an error.
///
/// Implementations must:
/// - Produce finite (`f64::is_finite`) values.
/// - Normalise results to the range `0.0..=1.0`.
/// - Depend only on the record, never on ambient state.
///
/// Use [`IntensityEstimator::sanitise`] to apply these guards.
///
/// # Examples
///
/// ```rust
/// use marea_core::{IntensityEstimator, MunicipalityRecord};
///
/// struct Flat;
///
/// impl IntensityEstimator for Flat {
///     fn estimate(&self, _record: &MunicipalityRecord) -> f64 {
///         Self::sanitise(1.7)
///     }
/// }
///
/// let record = MunicipalityRecord::new("080193", "Barcelona");
/// assert_eq!(Flat.estimate(&record), 1.0);
/// ```
pub trait IntensityEstimator: Send + Sync {
    /// Return the base intensity for `record`.
    fn estimate(&self, record: &MunicipalityRecord) -> f64;

    /// Clamp and validate a raw intensity.
    ///
    /// Returns `0.0` for non-finite values and clamps to `0.0..=1.0`.
    fn sanitise(value: f64) -> f64
    where
        Self: Sized,
    {
        sanitise_intensity(value)
    }
}

/// Free-standing form of [`IntensityEstimator::sanitise`].
#[must_use]
pub const fn sanitise_intensity(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(f64::NAN, 0.0)]
    #[case(f64::INFINITY, 0.0)]
    #[case(-0.2, 0.0)]
    #[case(0.4, 0.4)]
    #[case(3.0, 1.0)]
    fn sanitise_bounds_values(#[case] raw: f64, #[case] expected: f64) {
        assert_eq!(sanitise_intensity(raw), expected);
    }
}
