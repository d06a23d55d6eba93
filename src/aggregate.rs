//! Published record set and summary statistics.
//!
//! This is the only contract the map layer depends on: field names are
//! camelCase and every intensity lies in `[0, 1]`.

use marea_core::{Category, DataSource, Month, MunicipalityRecord};
use serde::Serialize;

/// Upper bounds of the first four colour buckets; the fifth is `> 0.8`.
pub const COLOR_BUCKET_LIMITS: [f64; 4] = [0.2, 0.4, 0.6, 0.8];

/// One municipality as the map consumes it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishedRecord {
    /// Official municipal code.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Centroid latitude, `null` when missing or outside the region.
    pub lat: Option<f64>,
    /// Centroid longitude, `null` when missing or outside the region.
    pub lng: Option<f64>,
    /// Published intensity.
    pub final_intensity: f64,
    /// Geographic category.
    pub category: Category,
    /// Resident population, `0` when unknown.
    pub population: u32,
    /// Hotel places, `0` when unknown.
    pub hotel_places: u32,
    /// Most authoritative source behind the facts.
    pub data_source: DataSource,
    /// Static intensity before seasonality.
    pub base_intensity: f64,
    /// Intensity after the month multiplier.
    pub seasonally_adjusted_intensity: f64,
    /// Trust in the facts.
    pub confidence: f64,
    /// Whether a live signal was blended in.
    pub live_signal_applied: bool,
}

impl From<&MunicipalityRecord> for PublishedRecord {
    fn from(record: &MunicipalityRecord) -> Self {
        Self {
            id: record.id.to_string(),
            name: record.name.clone(),
            lat: record.location.map(|location| location.y),
            lng: record.location.map(|location| location.x),
            final_intensity: record.final_intensity,
            category: record.category,
            population: record.population,
            hotel_places: record.hotel_places,
            data_source: record.data_source,
            base_intensity: record.base_intensity,
            seasonally_adjusted_intensity: record.seasonally_adjusted_intensity,
            confidence: record.confidence,
            live_signal_applied: record.live_signal_applied,
        }
    }
}

/// Record counts per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CategoryCounts {
    /// Coastal records.
    pub coastal: usize,
    /// Mountain records.
    pub mountain: usize,
    /// City records.
    pub city: usize,
    /// Interior records.
    pub interior: usize,
}

impl CategoryCounts {
    const fn add(&mut self, category: Category) {
        match category {
            Category::Coastal => self.coastal += 1,
            Category::Mountain => self.mountain += 1,
            Category::City => self.city += 1,
            Category::Interior => self.interior += 1,
        }
    }
}

/// Record counts per data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceCounts {
    /// Records backed by official statistics.
    pub official: usize,
    /// Records backed by AI enrichment.
    pub ai_enriched: usize,
    /// Records backed by heuristics only.
    pub heuristic: usize,
}

impl SourceCounts {
    const fn add(&mut self, source: DataSource) {
        match source {
            DataSource::Official => self.official += 1,
            DataSource::AiEnriched => self.ai_enriched += 1,
            DataSource::Heuristic => self.heuristic += 1,
        }
    }
}

/// Summary statistics over `finalIntensity`.
///
/// `min`, `max` and `avg` are `null` for an empty set.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// Number of records.
    pub count: usize,
    /// Smallest final intensity.
    pub min: Option<f64>,
    /// Largest final intensity.
    pub max: Option<f64>,
    /// Mean final intensity.
    pub avg: Option<f64>,
    /// Records per category.
    pub by_category: CategoryCounts,
    /// Records per colour bucket: `<= 0.2`, `<= 0.4`, `<= 0.6`, `<= 0.8`, `> 0.8`.
    pub color_buckets: [usize; 5],
    /// Records per data source.
    pub by_data_source: SourceCounts,
    /// Records with an in-region centroid.
    pub with_centroid: usize,
    /// Records whose final value blends a live signal.
    pub live_signals: usize,
    /// Records backed by heuristics only.
    pub needs_enrichment: usize,
}

/// Published records with their statistics.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Aggregate {
    /// Records in input order.
    pub records: Vec<PublishedRecord>,
    /// Statistics over `records`.
    pub statistics: Statistics,
}

/// Colour bucket index in `0..5` for `value`.
#[must_use]
pub fn color_bucket(value: f64) -> usize {
    COLOR_BUCKET_LIMITS
        .iter()
        .position(|limit| value <= *limit)
        .unwrap_or(COLOR_BUCKET_LIMITS.len())
}

/// Build published records and statistics from scored records.
///
/// Deterministic: the same records in the same order give the same output.
///
/// # Examples
/// ```
/// use marea_core::{Category, MunicipalityRecord};
/// use marea_engine::aggregate;
///
/// let records = [
///     MunicipalityRecord::new("1", "Tossa de Mar")
///         .with_category(Category::Coastal)
///         .with_base_intensity(0.9),
///     MunicipalityRecord::new("2", "Tremp")
///         .with_category(Category::Mountain)
///         .with_base_intensity(0.3),
/// ];
/// let aggregate = aggregate(&records);
/// assert_eq!(aggregate.statistics.max, Some(0.9));
/// assert_eq!(aggregate.statistics.color_buckets, [0, 1, 0, 0, 1]);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "statistics sum and average intensities"
)]
pub fn aggregate(records: &[MunicipalityRecord]) -> Aggregate {
    let mut statistics = Statistics {
        count: records.len(),
        ..Statistics::default()
    };
    let mut sum = 0.0;
    let mut seen = 0.0;
    for record in records {
        let value = record.final_intensity;
        statistics.min = Some(statistics.min.map_or(value, |min: f64| min.min(value)));
        statistics.max = Some(statistics.max.map_or(value, |max: f64| max.max(value)));
        sum += value;
        seen += 1.0;
        statistics.by_category.add(record.category);
        statistics.by_data_source.add(record.data_source);
        if let Some(bucket) = statistics.color_buckets.get_mut(color_bucket(value)) {
            *bucket += 1;
        }
        if record.location.is_some() {
            statistics.with_centroid += 1;
        }
        if record.live_signal_applied {
            statistics.live_signals += 1;
        }
    }
    statistics.needs_enrichment = statistics.by_data_source.heuristic;
    statistics.avg = (seen > 0.0).then(|| sum / seen);
    Aggregate {
        records: records.iter().map(PublishedRecord::from).collect(),
        statistics,
    }
}

/// Accepted, rejected and warned record counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Records published.
    pub accepted: usize,
    /// Records or entries rejected.
    pub rejected: usize,
    /// Warnings attached to published records.
    pub warning_count: usize,
}

/// A municipality left out of the published set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    /// Identifier, if known.
    pub id: Option<String>,
    /// Name, if known.
    pub name: Option<String>,
    /// Why it was rejected.
    pub reasons: Vec<String>,
}

/// Out-of-band findings for a published municipality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Identifier.
    pub id: String,
    /// Name.
    pub name: String,
    /// Coherence warnings.
    pub warnings: Vec<String>,
    /// Auto-correction hints.
    pub suggestions: Vec<String>,
}

/// Output of [`publish`](crate::publish).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishedRecordSet {
    /// Month the set was computed for.
    pub month: Month,
    /// Accepted, rejected and warned counts.
    pub summary: Summary,
    /// Statistics over `records`.
    pub statistics: Statistics,
    /// Published records, ordered by id.
    pub records: Vec<PublishedRecord>,
    /// `[lat, lng, finalIntensity]` for records with an in-region centroid.
    pub points: Vec<[f64; 3]>,
    /// Rejected municipalities and entries.
    pub rejections: Vec<Rejection>,
    /// Warnings and suggestions for published records.
    pub diagnostics: Vec<Diagnostic>,
}

impl PublishedRecordSet {
    pub(crate) fn assemble(
        month: Month,
        records: &[MunicipalityRecord],
        rejections: Vec<Rejection>,
        diagnostics: Vec<Diagnostic>,
    ) -> Self {
        let Aggregate {
            records: published,
            statistics,
        } = aggregate(records);
        let points = records
            .iter()
            .filter_map(|record| {
                record
                    .location
                    .map(|location| [location.y, location.x, record.final_intensity])
            })
            .collect();
        let summary = Summary {
            accepted: published.len(),
            rejected: rejections.len(),
            warning_count: diagnostics
                .iter()
                .map(|diagnostic| diagnostic.warnings.len())
                .sum(),
        };
        Self {
            month,
            summary,
            statistics,
            records: published,
            points,
            rejections,
            diagnostics,
        }
    }

    /// The `n` most intense records, highest first, ties broken by id.
    #[must_use]
    pub fn top(&self, n: usize) -> Vec<&PublishedRecord> {
        let mut ranked: Vec<&PublishedRecord> = self.records.iter().collect();
        ranked.sort_by(|left, right| {
            right
                .final_intensity
                .total_cmp(&left.final_intensity)
                .then_with(|| left.id.cmp(&right.id))
        });
        ranked.truncate(n);
        ranked
    }
}
