//! Typed validation findings and the per-record result.
//!
//! Findings are enums so callers can match on them; their `Display` output
//! is what the serialised [`ValidationResult`] carries.

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Canonical category names listed in error messages.
const CATEGORY_NAMES: &str = "coastal, mountain, city, interior";

/// Hard failures that make a record invalid.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    /// A required field was absent or null.
    #[error("missing required field: {field}")]
    MissingField {
        /// Field name.
        field: &'static str,
    },
    /// A field had the wrong primitive type or was NaN.
    #[error("{field} must be {expected}")]
    WrongType {
        /// Field name.
        field: &'static str,
        /// Expected type in prose.
        expected: &'static str,
    },
    /// A count was below zero.
    #[error("{field} is negative: {value}")]
    Negative {
        /// Field name.
        field: &'static str,
        /// Rejected value.
        value: f64,
    },
    /// A count exceeded its physical maximum.
    #[error("{field} too high: {value} (max: {max})")]
    TooLarge {
        /// Field name.
        field: &'static str,
        /// Rejected value.
        value: f64,
        /// Largest accepted value.
        max: f64,
    },
    /// An intensity fell outside `[0, 1]`.
    #[error("{field} outside [0,1]: {value}")]
    IntensityOutOfRange {
        /// Field name.
        field: &'static str,
        /// Rejected value.
        value: f64,
    },
    /// More than the plausible number of hotel beds per resident.
    #[error(
        "impossible hotel places per capita ratio: {ratio:.2} ({hotel_places} places / {population} residents)"
    )]
    ImpossibleRatio {
        /// Hotel places divided by population.
        ratio: f64,
        /// Hotel places.
        hotel_places: f64,
        /// Population.
        population: f64,
    },
    /// The category was not one of the canonical four.
    #[error("invalid category: {value}. Valid: {CATEGORY_NAMES}", CATEGORY_NAMES = CATEGORY_NAMES)]
    InvalidCategory {
        /// Rejected value.
        value: String,
    },
}

/// Soft anomalies that keep the record but deserve a look.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationWarning {
    /// Population is positive but implausibly small.
    VeryLowPopulation {
        /// Population.
        value: f64,
    },
    /// Population is within range but very large.
    VeryHighPopulation {
        /// Population.
        value: f64,
    },
    /// Hotel places are within range but very large.
    ManyHotelPlaces {
        /// Hotel places.
        value: f64,
    },
    /// Intensity is close to zero.
    VeryLowIntensity {
        /// Intensity.
        value: f64,
    },
    /// Intensity is close to one.
    VeryHighIntensity {
        /// Intensity.
        value: f64,
    },
    /// Hotel places per resident are high but possible.
    HighRatio {
        /// Hotel places divided by population.
        ratio: f64,
    },
    /// Intensity diverges from the value the estimator would give.
    IncoherentIntensity {
        /// Intensity on the record.
        intensity: f64,
        /// Estimator output for the same counts.
        expected: f64,
    },
    /// Intensity without any accommodation.
    IntensityWithoutHotels {
        /// Intensity on the record.
        intensity: f64,
    },
    /// Large municipality with almost no tourist accommodation.
    LargeMunicipalityFewPlaces {
        /// Population.
        population: f64,
        /// Hotel places.
        hotel_places: f64,
    },
    /// Coastal municipality with very low intensity.
    LowCoastalIntensity {
        /// Intensity on the record.
        intensity: f64,
    },
    /// Interior municipality with very high intensity.
    HighInteriorIntensity {
        /// Intensity on the record.
        intensity: f64,
    },
    /// Population diverges from a curated landmark.
    ReferencePopulation {
        /// Value on the record.
        value: f64,
        /// Landmark value.
        reference: f64,
    },
    /// Hotel places diverge from a curated landmark.
    ReferenceHotelPlaces {
        /// Value on the record.
        value: f64,
        /// Landmark value.
        reference: f64,
    },
    /// Intensity diverges from a curated landmark.
    ReferenceIntensity {
        /// Value on the record.
        value: f64,
        /// Landmark value.
        reference: f64,
    },
    /// Centroid lies outside the mapped region and was dropped.
    CentroidOutsideRegion {
        /// Latitude.
        lat: f64,
        /// Longitude.
        lng: f64,
    },
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::VeryLowPopulation { value } => {
                write!(f, "very low population: {value} - verify it is correct")
            }
            Self::VeryHighPopulation { value } => write!(f, "very high population: {value}"),
            Self::ManyHotelPlaces { value } => write!(f, "unusually many hotel places: {value}"),
            Self::VeryLowIntensity { value } => write!(f, "very low intensity: {value} - verify"),
            Self::VeryHighIntensity { value } => {
                write!(f, "very high intensity: {value} - verify")
            }
            Self::HighRatio { ratio } => write!(
                f,
                "very high hotel places per capita ratio: {ratio:.2} - typical of mass tourism, verify"
            ),
            Self::IncoherentIntensity {
                intensity,
                expected,
            } => write!(
                f,
                "intensity ({intensity:.2}) not coherent with hotel places per capita. Expected: ~{expected:.2}"
            ),
            Self::IntensityWithoutHotels { intensity } => {
                write!(f, "high intensity ({intensity}) but no hotel places")
            }
            Self::LargeMunicipalityFewPlaces {
                population,
                hotel_places,
            } => write!(
                f,
                "large municipality ({population} residents) with few hotel places ({hotel_places}) - verify data"
            ),
            Self::LowCoastalIntensity { intensity } => write!(
                f,
                "coastal municipality with very low intensity ({intensity}) - verify category or data"
            ),
            Self::HighInteriorIntensity { intensity } => write!(
                f,
                "interior municipality with very high intensity ({intensity}) - verify category"
            ),
            Self::ReferencePopulation { value, reference } => write!(
                f,
                "population ({value}) differs >20% from reference ({reference})"
            ),
            Self::ReferenceHotelPlaces { value, reference } => write!(
                f,
                "hotel places ({value}) differ >30% from reference ({reference})"
            ),
            Self::ReferenceIntensity { value, reference } => write!(
                f,
                "intensity ({value}) differs >0.15 from reference ({reference})"
            ),
            Self::CentroidOutsideRegion { lat, lng } => {
                write!(f, "centroid ({lat}, {lng}) outside the mapped region, location dropped")
            }
        }
    }
}

/// Auto-correction hints.
#[derive(Debug, Clone, PartialEq)]
pub enum Suggestion {
    /// Replace the intensity with the estimator's value.
    RecalculatedIntensity {
        /// Suggested intensity.
        expected: f64,
    },
}

impl std::fmt::Display for Suggestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RecalculatedIntensity { expected } => {
                write!(f, "suggested intensity: {expected:.2}")
            }
        }
    }
}

/// Outcome of validating one record.
///
/// `is_valid` is `false` exactly when `errors` is non-empty.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// Whether the record may be published.
    pub is_valid: bool,
    /// Reasons for rejection.
    #[serde(serialize_with = "display_list")]
    pub errors: Vec<ValidationError>,
    /// Soft anomalies.
    #[serde(serialize_with = "display_list")]
    pub warnings: Vec<ValidationWarning>,
    /// Correction hints.
    #[serde(serialize_with = "display_list")]
    pub suggestions: Vec<Suggestion>,
}

impl ValidationResult {
    /// An empty, valid result.
    #[must_use]
    pub const fn valid() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    /// Record a hard error.
    pub fn error(&mut self, error: ValidationError) {
        self.is_valid = false;
        self.errors.push(error);
    }

    /// Record a warning.
    pub fn warn(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Record a suggestion.
    pub fn suggest(&mut self, suggestion: Suggestion) {
        self.suggestions.push(suggestion);
    }

    /// Whether any warning was raised.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Error messages as strings.
    #[must_use]
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    /// Warning messages as strings.
    #[must_use]
    pub fn warning_messages(&self) -> Vec<String> {
        self.warnings.iter().map(ToString::to_string).collect()
    }

    /// Suggestion messages as strings.
    #[must_use]
    pub fn suggestion_messages(&self) -> Vec<String> {
        self.suggestions.iter().map(ToString::to_string).collect()
    }
}

fn display_list<T, S>(items: &[T], serializer: S) -> Result<S::Ok, S::Error>
where
    T: std::fmt::Display,
    S: Serializer,
{
    serializer.collect_seq(items.iter().map(ToString::to_string))
}
