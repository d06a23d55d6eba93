//! Reference dataset loading and source reconciliation.
//!
//! A dataset file may hold several entries per municipality, one per source
//! layer (official statistics, AI enrichment, heuristics). Reconciliation
//! collapses them into one [`ReferenceRecord`] per id, taking each field
//! from the most authoritative layer that supplies it.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use camino::Utf8Path;
use geo::Coord;
use log::{debug, warn};
use marea_core::{Category, DataSource, MunicipalityId, MunicipalityRecord};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::DatasetError;
use crate::validation::{MAX_HOTEL_PLACES, MAX_POPULATION, ValidationError};

/// One layer's view of a municipality, as written in a dataset file.
///
/// Numeric ids are accepted but lose leading zeros; prefer strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceEntry {
    /// Official municipal code.
    #[serde(deserialize_with = "deserialize_id")]
    pub id: MunicipalityId,
    /// Display name.
    pub name: String,
    /// Comarca.
    #[serde(default)]
    pub comarca: Option<String>,
    /// Resident population.
    #[serde(default, alias = "poblacion")]
    pub population: Option<f64>,
    /// Hotel places.
    #[serde(default, alias = "hotel_places")]
    pub hotel_places: Option<f64>,
    /// Category as written; spelling variants are accepted.
    #[serde(default, alias = "categoria")]
    pub category: Option<String>,
    /// Centroid latitude.
    #[serde(default)]
    pub lat: Option<f64>,
    /// Centroid longitude.
    #[serde(default, alias = "lon")]
    pub lng: Option<f64>,
    /// Layer the entry belongs to.
    #[serde(default)]
    pub source: DataSource,
    /// Layer confidence, meaningful for AI-enriched entries.
    #[serde(default)]
    pub confidence: Option<f64>,
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<MunicipalityId, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(u64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => MunicipalityId::new(text),
        RawId::Number(number) => MunicipalityId::new(number.to_string()),
    })
}

/// A dataset entry that could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryRejection {
    /// Zero-based position in the input.
    pub index: usize,
    /// Identifier, if one could be read.
    pub id: Option<String>,
    /// Name, if one could be read.
    pub name: Option<String>,
    /// Decoder message.
    pub reason: String,
}

/// A municipality after source reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceRecord {
    /// Official municipal code.
    pub id: MunicipalityId,
    /// Display name.
    pub name: String,
    /// Comarca.
    pub comarca: Option<String>,
    /// Resident population, unvalidated.
    pub population: Option<f64>,
    /// Hotel places, unvalidated.
    pub hotel_places: Option<f64>,
    /// Category as written.
    pub category: Option<String>,
    /// Centroid, if both coordinates were supplied.
    pub location: Option<Coord<f64>>,
    /// Most authoritative layer behind population, places or category.
    pub data_source: DataSource,
    /// Trust in the facts, in `[0, 1]`.
    pub confidence: f64,
}

impl ReferenceRecord {
    /// Convert into a pipeline record.
    ///
    /// Returns the record and the category given by the data, if any. The
    /// record's category is `Interior` until the caller classifies it.
    ///
    /// # Errors
    /// Returns every structural or range problem found: an empty name,
    /// non-numeric, negative or oversized counts, and unknown categories.
    pub fn to_record(
        &self,
    ) -> Result<(MunicipalityRecord, Option<Category>), Vec<ValidationError>> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(ValidationError::WrongType {
                field: "name",
                expected: "a non-empty string",
            });
        }
        let population = count(self.population, "population", MAX_POPULATION, &mut errors);
        let hotel_places = count(self.hotel_places, "hotelPlaces", MAX_HOTEL_PLACES, &mut errors);
        let category = match self.category.as_deref() {
            None => None,
            Some(raw) => {
                let parsed = Category::normalise(raw);
                if parsed.is_none() {
                    errors.push(ValidationError::InvalidCategory {
                        value: raw.to_owned(),
                    });
                }
                parsed
            }
        };
        if !errors.is_empty() {
            return Err(errors);
        }
        let mut record = MunicipalityRecord::new(self.id.clone(), self.name.trim())
            .with_counts(population, hotel_places)
            .with_location(self.location)
            .with_source(self.data_source, self.confidence);
        if let Some(comarca) = &self.comarca {
            record = record.with_comarca(comarca.clone());
        }
        if let Some(category) = category {
            record = record.with_category(category);
        }
        Ok((record, category))
    }
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "value is range-checked against a maximum below u32::MAX first"
)]
fn count(
    value: Option<f64>,
    field: &'static str,
    max: f64,
    errors: &mut Vec<ValidationError>,
) -> u32 {
    let Some(value) = value else {
        return 0;
    };
    if value.is_nan() {
        errors.push(ValidationError::WrongType {
            field,
            expected: "a valid number",
        });
    } else if value < 0.0 {
        errors.push(ValidationError::Negative { field, value });
    } else if value > max {
        errors.push(ValidationError::TooLarge { field, value, max });
    } else {
        return value.round() as u32;
    }
    0
}

/// Reconciled reference data for one batch.
///
/// # Examples
/// ```
/// use marea_core::DataSource;
/// use marea_data::ReferenceDataset;
///
/// let dataset = ReferenceDataset::from_json_str(r#"[
///     {"id": "170955", "name": "Lloret de Mar", "population": 39363, "source": "official"},
///     {"id": "170955", "name": "Lloret", "population": 41000, "hotelPlaces": 30000,
///      "source": "aiEnriched", "confidence": 0.8},
///     {"name": "no id"}
/// ]"#)
/// .unwrap();
/// let lloret = &dataset.records()[0];
/// assert_eq!(lloret.population, Some(39363.0));
/// assert_eq!(lloret.hotel_places, Some(30000.0));
/// assert_eq!(lloret.data_source, DataSource::Official);
/// assert_eq!(dataset.rejected().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReferenceDataset {
    records: Vec<ReferenceRecord>,
    rejected: Vec<EntryRejection>,
}

impl ReferenceDataset {
    /// Reconcile decoded entries, ordering records by id.
    #[must_use]
    pub fn reconcile(entries: impl IntoIterator<Item = ReferenceEntry>) -> Self {
        let mut layers: BTreeMap<MunicipalityId, Vec<ReferenceEntry>> = BTreeMap::new();
        for entry in entries {
            layers.entry(entry.id.clone()).or_default().push(entry);
        }
        Self {
            records: layers.into_values().filter_map(collapse_layers).collect(),
            rejected: Vec::new(),
        }
    }

    /// Decode a JSON array (or `{"municipalities": [...]}`) leniently.
    ///
    /// # Errors
    /// Returns [`DatasetError`] when the text is not JSON or has the wrong
    /// top-level shape. Undecodable entries are collected in
    /// [`ReferenceDataset::rejected`].
    pub fn from_json_str(text: &str) -> Result<Self, DatasetError> {
        Self::parse(text, "inline input")
    }

    /// Load a dataset file.
    ///
    /// # Errors
    /// Returns [`DatasetError`] when the file cannot be read or parsed.
    pub fn load(path: &Utf8Path) -> Result<Self, DatasetError> {
        let text = marea_fs::read_utf8_to_string(path).map_err(|source| DatasetError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path.as_str())
    }

    fn parse(text: &str, origin: &str) -> Result<Self, DatasetError> {
        let value: Value = serde_json::from_str(text).map_err(|source| DatasetError::Parse {
            origin: origin.to_owned(),
            source,
        })?;
        let items = match value {
            Value::Array(items) => items,
            Value::Object(mut object) => match object.remove("municipalities") {
                Some(Value::Array(items)) => items,
                _ => {
                    return Err(DatasetError::Shape {
                        origin: origin.to_owned(),
                    });
                }
            },
            _ => {
                return Err(DatasetError::Shape {
                    origin: origin.to_owned(),
                });
            }
        };
        let mut entries = Vec::with_capacity(items.len());
        let mut rejected = Vec::new();
        for (index, item) in items.into_iter().enumerate() {
            match ReferenceEntry::deserialize(&item) {
                Ok(entry) => entries.push(entry),
                Err(err) => {
                    let rejection = EntryRejection {
                        index,
                        id: text_at(&item, "id"),
                        name: text_at(&item, "name"),
                        reason: err.to_string(),
                    };
                    warn!(
                        "Skipped reference entry: index={}, id={:?}, reason={}",
                        rejection.index, rejection.id, rejection.reason
                    );
                    rejected.push(rejection);
                }
            }
        }
        let mut dataset = Self::reconcile(entries);
        dataset.rejected = rejected;
        debug!(
            "Loaded reference dataset from {origin}: records={}, rejected={}",
            dataset.records.len(),
            dataset.rejected.len()
        );
        Ok(dataset)
    }

    /// Reconciled records, ordered by id.
    #[must_use]
    pub fn records(&self) -> &[ReferenceRecord] {
        &self.records
    }

    /// Entries that failed to decode.
    #[must_use]
    pub fn rejected(&self) -> &[EntryRejection] {
        &self.rejected
    }

    /// Number of reconciled records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no record survived reconciliation.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records backed by heuristics only.
    #[must_use]
    pub fn needs_enrichment(&self) -> usize {
        self.records
            .iter()
            .filter(|record| record.data_source == DataSource::Heuristic)
            .count()
    }
}

fn text_at(item: &Value, key: &str) -> Option<String> {
    match item.get(key)? {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Collapse the layers of one municipality.
fn collapse_layers(mut layers: Vec<ReferenceEntry>) -> Option<ReferenceRecord> {
    layers.sort_by_key(|entry| Reverse(entry.source.precedence()));
    let top = layers.first()?;
    let population = layers.iter().find_map(|entry| entry.population);
    let hotel_places = layers.iter().find_map(|entry| entry.hotel_places);
    let category = layers.iter().find_map(|entry| entry.category.clone());
    let data_source = layers
        .iter()
        .find(|entry| {
            entry.population.is_some() || entry.hotel_places.is_some() || entry.category.is_some()
        })
        .map_or(DataSource::Heuristic, |entry| entry.source);
    let confidence = match data_source {
        DataSource::Official => 1.0,
        DataSource::AiEnriched => layers
            .iter()
            .find(|entry| entry.source == DataSource::AiEnriched)
            .and_then(|entry| entry.confidence)
            .filter(|value| value.is_finite())
            .map_or(0.0, |value| value.clamp(0.0, 1.0)),
        DataSource::Heuristic => 0.0,
    };
    let location = layers.iter().find_map(|entry| match (entry.lat, entry.lng) {
        (Some(lat), Some(lng)) => Some(Coord { x: lng, y: lat }),
        _ => None,
    });
    Some(ReferenceRecord {
        id: top.id.clone(),
        name: top.name.clone(),
        comarca: layers.iter().find_map(|entry| entry.comarca.clone()),
        population,
        hotel_places,
        category,
        location,
        data_source,
        confidence,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn entry(source: DataSource) -> ReferenceEntry {
        ReferenceEntry {
            id: MunicipalityId::from("171032"),
            name: "Lloret de Mar".to_owned(),
            comarca: None,
            population: None,
            hotel_places: None,
            category: None,
            lat: None,
            lng: None,
            source,
            confidence: None,
        }
    }

    #[test]
    fn official_fields_win_and_gaps_are_filled() {
        let official = ReferenceEntry {
            population: Some(39_363.0),
            ..entry(DataSource::Official)
        };
        let enriched = ReferenceEntry {
            population: Some(45_000.0),
            hotel_places: Some(30_000.0),
            category: Some("costa".to_owned()),
            confidence: Some(0.7),
            ..entry(DataSource::AiEnriched)
        };
        let dataset = ReferenceDataset::reconcile([enriched, official]);
        let record = dataset.records().first().expect("one record");
        assert_eq!(record.population, Some(39_363.0));
        assert_eq!(record.hotel_places, Some(30_000.0));
        assert_eq!(record.category.as_deref(), Some("costa"));
        assert_eq!(record.data_source, DataSource::Official);
        assert_eq!(record.confidence, 1.0);
    }

    #[rstest]
    #[case(Some(0.65), 0.65)]
    #[case(Some(1.4), 1.0)]
    #[case(None, 0.0)]
    fn enriched_confidence_is_clamped(#[case] confidence: Option<f64>, #[case] expected: f64) {
        let enriched = ReferenceEntry {
            hotel_places: Some(120.0),
            confidence,
            ..entry(DataSource::AiEnriched)
        };
        let dataset = ReferenceDataset::reconcile([enriched, entry(DataSource::Heuristic)]);
        let record = dataset.records().first().expect("one record");
        assert_eq!(record.data_source, DataSource::AiEnriched);
        assert_eq!(record.confidence, expected);
    }

    #[test]
    fn factless_layers_are_heuristic() {
        let dataset = ReferenceDataset::reconcile([entry(DataSource::Official)]);
        assert_eq!(dataset.needs_enrichment(), 1);
        let record = dataset.records().first().expect("one record");
        assert_eq!(record.data_source, DataSource::Heuristic);
        assert_eq!(record.confidence, 0.0);
    }

    #[test]
    fn accepts_numeric_ids_and_wrapped_lists() {
        let text = json!({
            "municipalities": [
                {"id": 80_193, "name": "Barcelona", "poblacion": 1_620_343, "lat": 41.39, "lon": 2.17}
            ]
        })
        .to_string();
        let dataset = ReferenceDataset::from_json_str(&text).expect("dataset parses");
        let record = dataset.records().first().expect("one record");
        assert_eq!(record.id.as_str(), "80193");
        assert_eq!(record.location, Some(Coord { x: 2.17, y: 41.39 }));
    }

    #[test]
    fn bad_entries_are_rejected_individually() {
        let text = json!([
            {"id": "1", "name": "Cadaqués", "population": 2_900},
            {"id": "2", "population": "lots"},
            "not an object"
        ])
        .to_string();
        let dataset = ReferenceDataset::from_json_str(&text).expect("dataset parses");
        assert_eq!(dataset.len(), 1);
        let indices: Vec<usize> = dataset.rejected().iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![1, 2]);
        assert_eq!(
            dataset.rejected().first().and_then(|r| r.id.as_deref()),
            Some("2")
        );
    }

    #[rstest]
    #[case("42")]
    #[case("{\"records\": []}")]
    fn rejects_unexpected_shapes(#[case] text: &str) {
        assert!(matches!(
            ReferenceDataset::from_json_str(text),
            Err(DatasetError::Shape { .. })
        ));
    }

    #[test]
    fn conversion_reports_every_problem() {
        let record = ReferenceRecord {
            id: MunicipalityId::from("9"),
            name: "  ".to_owned(),
            comarca: None,
            population: Some(-3.0),
            hotel_places: Some(250_000.0),
            category: Some("suburb".to_owned()),
            location: None,
            data_source: DataSource::Heuristic,
            confidence: 0.0,
        };
        let errors = record.to_record().expect_err("record is invalid");
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::Negative {
            field: "population",
            value: -3.0
        }));
    }

    #[test]
    fn conversion_rounds_counts_and_normalises_category() {
        let record = ReferenceRecord {
            id: MunicipalityId::from("170955"),
            name: "Lloret de Mar".to_owned(),
            comarca: Some("Selva".to_owned()),
            population: Some(39_362.6),
            hotel_places: None,
            category: Some("Platja".to_owned()),
            location: None,
            data_source: DataSource::Official,
            confidence: 1.0,
        };
        let (converted, category) = record.to_record().expect("record converts");
        assert_eq!(converted.population, 39_363);
        assert_eq!(converted.hotel_places, 0);
        assert_eq!(category, Some(Category::Coastal));
        assert_eq!(converted.comarca.as_deref(), Some("Selva"));
    }
}
