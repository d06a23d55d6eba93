//! A loosely typed view of a record for validation.
//!
//! Raw JSON payloads may have missing fields, wrong types or legacy key
//! names. [`RecordSnapshot`] captures each field as a [`Field`] so the
//! structure check can report problems instead of failing to decode.

use marea_core::MunicipalityRecord;
use serde_json::{Map, Value};

/// Keys accepted for the display name.
pub const NAME_KEYS: [&str; 2] = ["name", "nombre"];
/// Keys accepted for the identifier.
pub const ID_KEYS: [&str; 3] = ["id", "code", "codi"];
/// Keys accepted for population.
pub const POPULATION_KEYS: [&str; 2] = ["population", "poblacion"];
/// Keys accepted for hotel places.
pub const HOTEL_PLACES_KEYS: [&str; 3] = ["hotelPlaces", "hotel_places", "plazas_hoteleras"];
/// Keys accepted for the intensity, in lookup order.
pub const INTENSITY_KEYS: [&str; 4] = [
    "intensity",
    "tourism_intensity",
    "finalIntensity",
    "intensidad",
];
/// Keys accepted for the category.
pub const CATEGORY_KEYS: [&str; 2] = ["category", "categoria"];

/// A field as found in the payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Field<T> {
    /// Absent or `null`.
    Missing,
    /// Present with an unusable type.
    WrongType,
    /// Present with the expected type.
    Present(T),
}

impl<T> Field<T> {
    /// The value, if present.
    #[must_use]
    pub const fn present(&self) -> Option<&T> {
        match self {
            Self::Present(value) => Some(value),
            Self::Missing | Self::WrongType => None,
        }
    }
}

/// Fields the validator inspects.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSnapshot {
    /// Identifier, if one could be read.
    pub id: Option<String>,
    /// Display name.
    pub name: Field<String>,
    /// Resident population.
    pub population: Field<f64>,
    /// Hotel places.
    pub hotel_places: Field<f64>,
    /// Intensity checked for coherence.
    pub intensity: Field<f64>,
    /// Category as written.
    pub category: Field<String>,
    /// Further intensities that must lie in `[0, 1]`.
    pub derived_intensities: Vec<(&'static str, f64)>,
}

impl RecordSnapshot {
    /// Read a snapshot from a JSON object, accepting legacy key names.
    ///
    /// Non-object values produce a snapshot where every field is missing.
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        let empty = Map::new();
        let object = value.as_object().unwrap_or(&empty);
        Self {
            id: lookup(object, &ID_KEYS).and_then(|id| match id {
                Value::String(text) => Some(text.clone()),
                Value::Number(number) => Some(number.to_string()),
                _ => None,
            }),
            name: text_field(lookup(object, &NAME_KEYS)),
            population: number_field(lookup(object, &POPULATION_KEYS)),
            hotel_places: number_field(lookup(object, &HOTEL_PLACES_KEYS)),
            intensity: number_field(lookup(object, &INTENSITY_KEYS)),
            category: text_field(lookup(object, &CATEGORY_KEYS)),
            derived_intensities: Vec::new(),
        }
    }

    /// Snapshot of a computed record.
    ///
    /// The base intensity is checked for coherence; the seasonal and final
    /// values are range-checked only.
    #[must_use]
    pub fn from_record(record: &MunicipalityRecord) -> Self {
        Self {
            id: Some(record.id.to_string()),
            name: Field::Present(record.name.clone()),
            population: Field::Present(f64::from(record.population)),
            hotel_places: Field::Present(f64::from(record.hotel_places)),
            intensity: Field::Present(record.base_intensity),
            category: Field::Present(record.category.as_str().to_owned()),
            derived_intensities: vec![
                (
                    "seasonallyAdjustedIntensity",
                    record.seasonally_adjusted_intensity,
                ),
                ("finalIntensity", record.final_intensity),
            ],
        }
    }

    /// Display name if it is a string, for reports.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.name.present().map(String::as_str)
    }
}

/// First non-null value among `keys`.
fn lookup<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .find(|value| !value.is_null())
}

fn text_field(value: Option<&Value>) -> Field<String> {
    match value {
        None => Field::Missing,
        Some(Value::String(text)) => Field::Present(text.clone()),
        Some(_) => Field::WrongType,
    }
}

fn number_field(value: Option<&Value>) -> Field<f64> {
    match value {
        None => Field::Missing,
        Some(Value::Number(number)) => number.as_f64().map_or(Field::WrongType, Field::Present),
        Some(_) => Field::WrongType,
    }
}
