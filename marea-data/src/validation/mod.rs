//! Data-quality checks for municipality records.
//!
//! [`DataValidator::validate`] walks a record through five checks:
//! structure, range, coherence, category and reference. A structure failure
//! short-circuits because the remaining checks need typed values; every
//! other check runs regardless of earlier errors so a report lists all
//! problems at once.

mod batch;
mod correct;
mod findings;
mod landmarks;
mod snapshot;

use marea_core::{Category, MunicipalityRecord};
use marea_scorer::PerCapitaRatioEstimator;
use serde_json::Value;

pub use batch::{BatchReport, RecordReport};
pub use correct::INTENSITY_CORRECTED_FLAG;
pub use findings::{Suggestion, ValidationError, ValidationResult, ValidationWarning};
pub use landmarks::{Landmark, ReferenceLandmarks};
pub use snapshot::{Field, RecordSnapshot};

/// Largest plausible population of a Catalan municipality.
pub const MAX_POPULATION: f64 = 2_000_000.0;
/// Largest plausible hotel capacity of a Catalan municipality.
pub const MAX_HOTEL_PLACES: f64 = 100_000.0;
/// Hotel places per resident above which a record is rejected.
pub const MAX_PLACES_PER_CAPITA: f64 = 20.0;
/// Hotel places per resident above which a record is flagged.
pub const WARN_PLACES_PER_CAPITA: f64 = 2.0;
/// Divergence from the estimator that triggers a coherence warning.
pub const COHERENCE_TOLERANCE: f64 = 0.3;

const WARN_MIN_POPULATION: f64 = 10.0;
const WARN_MAX_POPULATION: f64 = 500_000.0;
const WARN_MAX_HOTEL_PLACES: f64 = 50_000.0;
const WARN_MIN_INTENSITY: f64 = 0.05;
const WARN_MAX_INTENSITY: f64 = 0.98;
const LARGE_MUNICIPALITY: f64 = 50_000.0;
const FEW_HOTEL_PLACES: f64 = 100.0;
const REFERENCE_POPULATION_TOLERANCE: f64 = 0.2;
const REFERENCE_PLACES_TOLERANCE: f64 = 0.3;
const REFERENCE_INTENSITY_TOLERANCE: f64 = 0.15;

/// Typed values that survived the structure check.
#[derive(Debug, Clone, Copy)]
struct Facts<'a> {
    name: &'a str,
    population: f64,
    hotel_places: f64,
    intensity: f64,
}

/// Validator for raw payloads and computed records.
///
/// # Examples
/// ```
/// use marea_data::DataValidator;
/// use serde_json::json;
///
/// let validator = DataValidator::default();
/// let result = validator.validate_json(&json!({
///     "name": "Tossa de Mar",
///     "population": 5_900,
///     "hotelPlaces": 6_000,
///     "intensity": 0.9,
///     "category": "coastal"
/// }));
/// assert!(result.is_valid);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataValidator {
    estimator: PerCapitaRatioEstimator,
    landmarks: ReferenceLandmarks,
}

impl DataValidator {
    /// Validator comparing against `estimator` and `landmarks`.
    #[must_use]
    pub const fn new(estimator: PerCapitaRatioEstimator, landmarks: ReferenceLandmarks) -> Self {
        Self {
            estimator,
            landmarks,
        }
    }

    /// Estimator used for coherence checks and auto-correction.
    #[must_use]
    pub const fn estimator(&self) -> &PerCapitaRatioEstimator {
        &self.estimator
    }

    /// Validate a raw JSON record.
    #[must_use]
    pub fn validate_json(&self, payload: &Value) -> ValidationResult {
        self.validate(&RecordSnapshot::from_json(payload))
    }

    /// Validate a computed record, using its base intensity for coherence.
    #[must_use]
    pub fn validate_record(&self, record: &MunicipalityRecord) -> ValidationResult {
        self.validate(&RecordSnapshot::from_record(record))
    }

    /// Run every check over `snapshot`.
    #[must_use]
    pub fn validate(&self, snapshot: &RecordSnapshot) -> ValidationResult {
        let mut result = ValidationResult::valid();
        let Some(facts) = check_structure(snapshot, &mut result) else {
            return result;
        };
        check_ranges(facts, snapshot, &mut result);
        self.check_coherence(facts, &mut result);
        check_category(facts, &snapshot.category, &mut result);
        self.check_reference(facts, &mut result);
        result
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "coherence compares ratios and intensities"
    )]
    fn check_coherence(&self, facts: Facts<'_>, result: &mut ValidationResult) {
        if facts.population > 0.0 {
            let ratio = facts.hotel_places / facts.population;
            if ratio > MAX_PLACES_PER_CAPITA {
                result.error(ValidationError::ImpossibleRatio {
                    ratio,
                    hotel_places: facts.hotel_places,
                    population: facts.population,
                });
            } else if ratio > WARN_PLACES_PER_CAPITA {
                result.warn(ValidationWarning::HighRatio { ratio });
            }
            let expected = self
                .estimator
                .estimate_from_values(facts.population, facts.hotel_places);
            if (facts.intensity - expected).abs() > COHERENCE_TOLERANCE {
                result.warn(ValidationWarning::IncoherentIntensity {
                    intensity: facts.intensity,
                    expected,
                });
                result.suggest(Suggestion::RecalculatedIntensity { expected });
            }
        }
        if facts.hotel_places <= 0.0 && facts.intensity > 0.3 {
            result.warn(ValidationWarning::IntensityWithoutHotels {
                intensity: facts.intensity,
            });
        }
        if facts.population > LARGE_MUNICIPALITY && facts.hotel_places < FEW_HOTEL_PLACES {
            result.warn(ValidationWarning::LargeMunicipalityFewPlaces {
                population: facts.population,
                hotel_places: facts.hotel_places,
            });
        }
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "reference checks compare relative differences"
    )]
    fn check_reference(&self, facts: Facts<'_>, result: &mut ValidationResult) {
        let Some(landmark) = self.landmarks.get(facts.name) else {
            return;
        };
        let relative = |value: f64, reference: f64| {
            (reference > 0.0).then(|| (value - reference).abs() / reference)
        };
        if relative(facts.population, landmark.population)
            .is_some_and(|diff| diff > REFERENCE_POPULATION_TOLERANCE)
        {
            result.warn(ValidationWarning::ReferencePopulation {
                value: facts.population,
                reference: landmark.population,
            });
        }
        if relative(facts.hotel_places, landmark.hotel_places)
            .is_some_and(|diff| diff > REFERENCE_PLACES_TOLERANCE)
        {
            result.warn(ValidationWarning::ReferenceHotelPlaces {
                value: facts.hotel_places,
                reference: landmark.hotel_places,
            });
        }
        if (facts.intensity - landmark.intensity).abs() > REFERENCE_INTENSITY_TOLERANCE {
            result.warn(ValidationWarning::ReferenceIntensity {
                value: facts.intensity,
                reference: landmark.intensity,
            });
        }
    }
}

fn check_structure<'a>(
    snapshot: &'a RecordSnapshot,
    result: &mut ValidationResult,
) -> Option<Facts<'a>> {
    let name = match &snapshot.name {
        Field::Present(name) if !name.trim().is_empty() => Some(name.as_str()),
        Field::Missing => {
            result.error(ValidationError::MissingField { field: "name" });
            None
        }
        Field::Present(_) | Field::WrongType => {
            result.error(ValidationError::WrongType {
                field: "name",
                expected: "a non-empty string",
            });
            None
        }
    };
    let population = number(&snapshot.population, "population", result);
    let hotel_places = number(&snapshot.hotel_places, "hotelPlaces", result);
    let intensity = number(&snapshot.intensity, "intensity", result);
    Some(Facts {
        name: name?,
        population: population?,
        hotel_places: hotel_places?,
        intensity: intensity?,
    })
}

fn number(field: &Field<f64>, name: &'static str, result: &mut ValidationResult) -> Option<f64> {
    match field {
        Field::Present(value) if !value.is_nan() => Some(*value),
        Field::Missing => {
            result.error(ValidationError::MissingField { field: name });
            None
        }
        Field::Present(_) | Field::WrongType => {
            result.error(ValidationError::WrongType {
                field: name,
                expected: "a valid number",
            });
            None
        }
    }
}

fn check_ranges(facts: Facts<'_>, snapshot: &RecordSnapshot, result: &mut ValidationResult) {
    check_count(facts.population, "population", MAX_POPULATION, result);
    if facts.population > 0.0 && facts.population < WARN_MIN_POPULATION {
        result.warn(ValidationWarning::VeryLowPopulation {
            value: facts.population,
        });
    }
    if facts.population > WARN_MAX_POPULATION && facts.population <= MAX_POPULATION {
        result.warn(ValidationWarning::VeryHighPopulation {
            value: facts.population,
        });
    }

    check_count(facts.hotel_places, "hotelPlaces", MAX_HOTEL_PLACES, result);
    if facts.hotel_places > WARN_MAX_HOTEL_PLACES && facts.hotel_places <= MAX_HOTEL_PLACES {
        result.warn(ValidationWarning::ManyHotelPlaces {
            value: facts.hotel_places,
        });
    }

    if in_unit_range(facts.intensity) {
        if facts.intensity < WARN_MIN_INTENSITY {
            result.warn(ValidationWarning::VeryLowIntensity {
                value: facts.intensity,
            });
        } else if facts.intensity > WARN_MAX_INTENSITY {
            result.warn(ValidationWarning::VeryHighIntensity {
                value: facts.intensity,
            });
        }
    } else {
        result.error(ValidationError::IntensityOutOfRange {
            field: "intensity",
            value: facts.intensity,
        });
    }
    for &(field, value) in &snapshot.derived_intensities {
        if !in_unit_range(value) {
            result.error(ValidationError::IntensityOutOfRange { field, value });
        }
    }
}

fn check_count(value: f64, field: &'static str, max: f64, result: &mut ValidationResult) {
    if value < 0.0 {
        result.error(ValidationError::Negative { field, value });
    } else if value > max {
        result.error(ValidationError::TooLarge { field, value, max });
    }
}

fn in_unit_range(value: f64) -> bool {
    (0.0..=1.0).contains(&value)
}

fn check_category(facts: Facts<'_>, category: &Field<String>, result: &mut ValidationResult) {
    let parsed = match category {
        Field::Present(raw) => raw.parse::<Category>().map_err(|_| raw.clone()),
        Field::Missing => {
            result.error(ValidationError::MissingField { field: "category" });
            return;
        }
        Field::WrongType => Err(String::from("<non-string>")),
    };
    match parsed {
        Ok(Category::Coastal) if facts.intensity < 0.2 => {
            result.warn(ValidationWarning::LowCoastalIntensity {
                intensity: facts.intensity,
            });
        }
        Ok(Category::Interior) if facts.intensity > 0.7 => {
            result.warn(ValidationWarning::HighInteriorIntensity {
                intensity: facts.intensity,
            });
        }
        Ok(_) => {}
        Err(value) => result.error(ValidationError::InvalidCategory { value }),
    }
}
