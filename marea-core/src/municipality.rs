//! The municipality record that flows through every pipeline stage.

use geo::Coord;
use serde::{Deserialize, Serialize};

use crate::{Category, DataSource};

/// Official municipal code (INE/IDESCAT style, e.g. `"171032"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MunicipalityId(String);

impl MunicipalityId {
    /// Wrap a municipal code.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Borrow the code as `&str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MunicipalityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MunicipalityId {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

/// A municipality as it is progressively enriched by the pipeline.
///
/// Counts use `0` for "unknown". Location is WGS84 with `x = longitude` and
/// `y = latitude`; `None` means missing or rejected by the region filter.
/// The three intensity fields are derived and always recomputable from the
/// static facts, the month and the optional live signal.
///
/// Stages never mutate a record in place; each `with_*` method consumes the
/// record and returns the updated one.
///
/// # Examples
/// ```
/// use marea_core::{Category, MunicipalityRecord};
///
/// let record = MunicipalityRecord::new("171032", "Lloret de Mar")
///     .with_counts(39_363, 30_000)
///     .with_category(Category::Coastal)
///     .with_base_intensity(0.85);
/// assert_eq!(record.final_intensity, 0.85);
/// assert_eq!(record.seasonally_adjusted_intensity, 0.85);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MunicipalityRecord {
    /// Stable official identifier.
    pub id: MunicipalityId,
    /// Display name.
    pub name: String,
    /// Comarca, used only as a classification signal.
    pub comarca: Option<String>,
    /// Resident population; `0` when unknown.
    pub population: u32,
    /// Hotel bed capacity; `0` when unknown.
    pub hotel_places: u32,
    /// Geographic category; `Interior` until classified.
    pub category: Category,
    /// Centroid inside the mapped region, if known.
    pub location: Option<Coord<f64>>,
    /// Static intensity from the estimator.
    pub base_intensity: f64,
    /// Base intensity after the month multiplier.
    pub seasonally_adjusted_intensity: f64,
    /// Published intensity.
    pub final_intensity: f64,
    /// Most authoritative source behind the static facts.
    pub data_source: DataSource,
    /// Trust in non-official facts, in `[0, 1]`.
    pub confidence: f64,
    /// Whether a live signal contributed to `final_intensity`.
    pub live_signal_applied: bool,
}

impl MunicipalityRecord {
    /// Start a record with unknown facts and zero intensities.
    #[must_use]
    pub fn new(id: impl Into<MunicipalityId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            comarca: None,
            population: 0,
            hotel_places: 0,
            category: Category::Interior,
            location: None,
            base_intensity: 0.0,
            seasonally_adjusted_intensity: 0.0,
            final_intensity: 0.0,
            data_source: DataSource::Heuristic,
            confidence: 0.0,
            live_signal_applied: false,
        }
    }

    /// Set population and hotel places.
    #[must_use]
    pub const fn with_counts(mut self, population: u32, hotel_places: u32) -> Self {
        self.population = population;
        self.hotel_places = hotel_places;
        self
    }

    /// Set the comarca.
    #[must_use]
    pub fn with_comarca(mut self, comarca: impl Into<String>) -> Self {
        self.comarca = Some(comarca.into());
        self
    }

    /// Set the centroid.
    #[must_use]
    pub const fn with_location(mut self, location: Option<Coord<f64>>) -> Self {
        self.location = location;
        self
    }

    /// Set the category.
    #[must_use]
    pub const fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Set provenance; official data is always fully trusted.
    #[must_use]
    pub const fn with_source(mut self, data_source: DataSource, confidence: f64) -> Self {
        self.data_source = data_source;
        self.confidence = match data_source {
            DataSource::Official => 1.0,
            DataSource::AiEnriched | DataSource::Heuristic => confidence,
        };
        self
    }

    /// Record the base intensity and reset the downstream values to it.
    #[must_use]
    pub const fn with_base_intensity(mut self, base: f64) -> Self {
        self.base_intensity = base;
        self.seasonally_adjusted_intensity = base;
        self.final_intensity = base;
        self.live_signal_applied = false;
        self
    }

    /// Record the seasonal intensity, which also becomes the final value.
    #[must_use]
    pub const fn with_seasonal_intensity(mut self, seasonal: f64) -> Self {
        self.seasonally_adjusted_intensity = seasonal;
        self.final_intensity = seasonal;
        self.live_signal_applied = false;
        self
    }

    /// Record the final intensity and whether a live signal produced it.
    #[must_use]
    pub const fn with_final_intensity(mut self, value: f64, live_signal_applied: bool) -> Self {
        self.final_intensity = value;
        self.live_signal_applied = live_signal_applied;
        self
    }

    /// Hotel places per 1000 residents, or `None` when population is unknown.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "ratio of two counts is inherently floating-point"
    )]
    pub fn places_per_thousand(&self) -> Option<f64> {
        (self.population > 0)
            .then(|| f64::from(self.hotel_places) / f64::from(self.population) * 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_population_has_no_ratio() {
        let record = MunicipalityRecord::new("1", "Nowhere").with_counts(0, 50);
        assert_eq!(record.places_per_thousand(), None);
    }

    #[test]
    fn ratio_is_scaled_per_thousand() {
        let record = MunicipalityRecord::new("1", "Somewhere").with_counts(2_000, 100);
        assert_eq!(record.places_per_thousand(), Some(50.0));
    }

    #[test]
    fn official_source_forces_full_confidence() {
        let record = MunicipalityRecord::new("1", "Girona").with_source(DataSource::Official, 0.2);
        assert_eq!(record.confidence, 1.0);
        let enriched =
            MunicipalityRecord::new("2", "Begur").with_source(DataSource::AiEnriched, 0.6);
        assert_eq!(enriched.confidence, 0.6);
    }

    #[test]
    fn seasonal_stage_resets_live_flag() {
        let record = MunicipalityRecord::new("1", "Salou")
            .with_base_intensity(0.5)
            .with_final_intensity(0.7, true)
            .with_seasonal_intensity(0.6);
        assert!(!record.live_signal_applied);
        assert_eq!(record.final_intensity, 0.6);
    }
}
