//! Base intensity strategies.
//!
//! [`PerCapitaRatioEstimator`] maps hotel places per 1000 residents through a
//! step function; [`CategoryHeuristicEstimator`] assigns a flat value per
//! category for datasets without counts. [`EstimatorStrategy`] names them so
//! configuration can pick one.

use marea_core::{Category, IntensityEstimator, MunicipalityRecord, sanitise_intensity};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Intensity reported when population is unknown.
pub const INTENSITY_FLOOR: f64 = 0.15;
/// Highest value any band, or the large-city bonus, may reach.
pub const INTENSITY_CEILING: f64 = 0.95;
/// Fewest bands a custom table may declare.
pub const MIN_BANDS: usize = 6;
/// Population above which the large-city bonus applies.
pub const LARGE_CITY_POPULATION: u32 = 500_000;
/// Flat bonus for large cities.
pub const LARGE_CITY_BONUS: f64 = 0.10;

/// One step of the banding: ratios strictly above `above` map to `intensity`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntensityBand {
    /// Exclusive lower bound on hotel places per 1000 residents.
    pub above: f64,
    /// Intensity assigned to the band.
    pub intensity: f64,
}

/// Validated step function from places-per-1000 to intensity.
///
/// Bands are ordered from the highest threshold down; the first band whose
/// threshold the ratio exceeds wins, and ratios below every threshold fall
/// back to [`INTENSITY_FLOOR`].
///
/// # Examples
/// ```
/// use marea_scorer::IntensityBands;
///
/// let bands = IntensityBands::default();
/// assert_eq!(bands.intensity_for(762.0), 0.85);
/// assert_eq!(bands.intensity_for(5.0), 0.15);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<IntensityBand>", into = "Vec<IntensityBand>")]
pub struct IntensityBands {
    bands: Vec<IntensityBand>,
}

/// Errors returned when building [`IntensityBands`].
#[derive(Debug, Error, PartialEq)]
pub enum BandTableError {
    /// Too few bands to give a useful gradient.
    #[error("intensity table needs at least 6 bands, found {found}")]
    TooFewBands {
        /// Number of bands supplied.
        found: usize,
    },
    /// A threshold was negative or not finite.
    #[error("band {position} has invalid threshold {threshold}")]
    InvalidThreshold {
        /// Zero-based band position.
        position: usize,
        /// Rejected threshold.
        threshold: f64,
    },
    /// Thresholds must strictly decrease from one band to the next.
    #[error("band {position} threshold does not decrease")]
    ThresholdsNotDecreasing {
        /// Zero-based band position.
        position: usize,
    },
    /// Intensities must not increase as thresholds decrease.
    #[error("band {position} intensity rises above the previous band")]
    IntensityIncreases {
        /// Zero-based band position.
        position: usize,
    },
    /// An intensity fell outside the floor/ceiling window.
    #[error("band {position} intensity {value} is outside [0.15, 0.95]")]
    IntensityOutOfRange {
        /// Zero-based band position.
        position: usize,
        /// Rejected intensity.
        value: f64,
    },
}

impl IntensityBands {
    /// Validate and construct a band table.
    ///
    /// # Errors
    /// Returns [`BandTableError`] when the table has fewer than
    /// [`MIN_BANDS`] bands, thresholds are invalid or not strictly
    /// decreasing, or intensities rise or leave `[0.15, 0.95]`.
    pub fn new(bands: Vec<IntensityBand>) -> Result<Self, BandTableError> {
        if bands.len() < MIN_BANDS {
            return Err(BandTableError::TooFewBands { found: bands.len() });
        }
        let mut previous: Option<IntensityBand> = None;
        for (position, band) in bands.iter().enumerate() {
            if !(band.above.is_finite() && band.above >= 0.0) {
                return Err(BandTableError::InvalidThreshold {
                    position,
                    threshold: band.above,
                });
            }
            if !(INTENSITY_FLOOR..=INTENSITY_CEILING).contains(&band.intensity) {
                return Err(BandTableError::IntensityOutOfRange {
                    position,
                    value: band.intensity,
                });
            }
            if let Some(prior) = previous {
                if band.above >= prior.above {
                    return Err(BandTableError::ThresholdsNotDecreasing { position });
                }
                if band.intensity > prior.intensity {
                    return Err(BandTableError::IntensityIncreases { position });
                }
            }
            previous = Some(*band);
        }
        Ok(Self { bands })
    }

    /// Intensity for a places-per-1000 ratio.
    #[must_use]
    pub fn intensity_for(&self, places_per_thousand: f64) -> f64 {
        self.bands
            .iter()
            .find(|band| places_per_thousand > band.above)
            .map_or(INTENSITY_FLOOR, |band| band.intensity)
    }

    /// The bands, highest threshold first.
    #[must_use]
    pub fn bands(&self) -> &[IntensityBand] {
        &self.bands
    }
}

impl Default for IntensityBands {
    fn default() -> Self {
        let reference = [
            (1000.0, 0.95),
            (500.0, 0.85),
            (300.0, 0.75),
            (150.0, 0.65),
            (80.0, 0.55),
            (40.0, 0.45),
            (20.0, 0.35),
            (10.0, 0.25),
        ];
        Self {
            bands: reference
                .into_iter()
                .map(|(above, intensity)| IntensityBand { above, intensity })
                .collect(),
        }
    }
}

impl TryFrom<Vec<IntensityBand>> for IntensityBands {
    type Error = BandTableError;

    fn try_from(bands: Vec<IntensityBand>) -> Result<Self, Self::Error> {
        Self::new(bands)
    }
}

impl From<IntensityBands> for Vec<IntensityBand> {
    fn from(table: IntensityBands) -> Self {
        table.bands
    }
}

/// Hotel-places-per-capita estimator with a large-city adjustment.
///
/// # Examples
/// ```
/// use marea_core::{IntensityEstimator, MunicipalityRecord};
/// use marea_scorer::PerCapitaRatioEstimator;
///
/// let estimator = PerCapitaRatioEstimator::default();
/// let lloret = MunicipalityRecord::new("170955", "Lloret de Mar").with_counts(39_363, 30_000);
/// assert!(estimator.estimate(&lloret) >= 0.85);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PerCapitaRatioEstimator {
    bands: IntensityBands,
}

impl PerCapitaRatioEstimator {
    /// Estimator using a custom band table.
    #[must_use]
    pub const fn new(bands: IntensityBands) -> Self {
        Self { bands }
    }

    /// Estimate directly from counts; `0` population means unknown.
    #[must_use]
    pub fn estimate_from_counts(&self, population: u32, hotel_places: u32) -> f64 {
        self.estimate_from_values(f64::from(population), f64::from(hotel_places))
    }

    /// Estimate from raw numeric facts, as found in unvalidated payloads.
    ///
    /// Non-positive or non-finite populations count as unknown.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "ratio and bonus are floating-point by nature"
    )]
    pub fn estimate_from_values(&self, population: f64, hotel_places: f64) -> f64 {
        if !(population.is_finite() && population > 0.0) {
            return INTENSITY_FLOOR;
        }
        let per_thousand = hotel_places.max(0.0) / population * 1000.0;
        let mut intensity = self.bands.intensity_for(per_thousand);
        if population > f64::from(LARGE_CITY_POPULATION) {
            intensity = (intensity + LARGE_CITY_BONUS).min(INTENSITY_CEILING);
        }
        sanitise_intensity(intensity)
    }

    /// Band table in use.
    #[must_use]
    pub const fn bands(&self) -> &IntensityBands {
        &self.bands
    }
}

impl IntensityEstimator for PerCapitaRatioEstimator {
    fn estimate(&self, record: &MunicipalityRecord) -> f64 {
        self.estimate_from_counts(record.population, record.hotel_places)
    }
}

/// Flat intensity per category, for records without usable counts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryHeuristicEstimator {
    /// Intensity for coastal municipalities.
    pub coastal: f64,
    /// Intensity for mountain municipalities.
    pub mountain: f64,
    /// Intensity for cities.
    pub city: f64,
    /// Intensity for interior municipalities.
    pub interior: f64,
}

impl Default for CategoryHeuristicEstimator {
    fn default() -> Self {
        Self {
            coastal: 0.55,
            mountain: 0.35,
            city: 0.30,
            interior: 0.20,
        }
    }
}

impl IntensityEstimator for CategoryHeuristicEstimator {
    fn estimate(&self, record: &MunicipalityRecord) -> f64 {
        let value = match record.category {
            Category::Coastal => self.coastal,
            Category::Mountain => self.mountain,
            Category::City => self.city,
            Category::Interior => self.interior,
        };
        Self::sanitise(value)
    }
}

/// Named estimator strategies selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EstimatorStrategy {
    /// [`PerCapitaRatioEstimator`].
    #[default]
    PerCapitaRatio,
    /// [`CategoryHeuristicEstimator`].
    CategoryHeuristic,
}

impl std::str::FromStr for EstimatorStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "perCapitaRatio" | "per-capita-ratio" => Ok(Self::PerCapitaRatio),
            "categoryHeuristic" | "category-heuristic" => Ok(Self::CategoryHeuristic),
            _ => Err(format!("unknown estimator strategy '{s}'")),
        }
    }
}

impl std::fmt::Display for EstimatorStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::PerCapitaRatio => "perCapitaRatio",
            Self::CategoryHeuristic => "categoryHeuristic",
        })
    }
}

/// Estimator chosen by an [`EstimatorStrategy`].
#[derive(Debug, Clone, PartialEq)]
pub enum StrategyEstimator {
    /// Per-capita banding.
    PerCapitaRatio(PerCapitaRatioEstimator),
    /// Category defaults.
    CategoryHeuristic(CategoryHeuristicEstimator),
}

impl StrategyEstimator {
    /// Build the estimator for `strategy`.
    #[must_use]
    pub fn new(
        strategy: EstimatorStrategy,
        bands: IntensityBands,
        heuristic: CategoryHeuristicEstimator,
    ) -> Self {
        match strategy {
            EstimatorStrategy::PerCapitaRatio => {
                Self::PerCapitaRatio(PerCapitaRatioEstimator::new(bands))
            }
            EstimatorStrategy::CategoryHeuristic => Self::CategoryHeuristic(heuristic),
        }
    }
}

impl IntensityEstimator for StrategyEstimator {
    fn estimate(&self, record: &MunicipalityRecord) -> f64 {
        match self {
            Self::PerCapitaRatio(inner) => inner.estimate(record),
            Self::CategoryHeuristic(inner) => inner.estimate(record),
        }
    }
}
