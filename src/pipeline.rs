//! The `publish` batch: reference data in, published record set out.
//!
//! Every municipality runs through classification, estimation, seasonal
//! modulation, live blending and validation on its own. A failure for one
//! municipality becomes a [`Rejection`] and never touches the others.

use std::fmt;
use std::sync::Arc;

use log::{debug, info, warn};
use marea_core::{
    CatalunyaEnvelope, ExternalSignal, IntensityEstimator, Month, MunicipalityRecord,
    RegionFilter, SignalProvider, TemporalMultiplierTable,
};
use marea_data::{
    DataValidator, ReferenceDataset, ReferenceLandmarks, ReferenceRecord, ValidationWarning,
};
use marea_scorer::{
    CategoryHeuristicEstimator, EstimatorStrategy, GeographicClassifier, IntensityBands,
    PerCapitaRatioEstimator, SignalMerger, StrategyEstimator, apply_seasonal,
};

use crate::aggregate::{Diagnostic, PublishedRecordSet, Rejection};

/// Everything the pipeline can be tuned with.
///
/// The defaults reproduce the reference calibration: per-capita banding,
/// the built-in multiplier table, a live weight of 0.45 on occupancy and
/// the Catalunya bounding envelope as region filter.
#[derive(Clone)]
pub struct PipelineConfig {
    /// Estimator used for the base intensity.
    pub strategy: EstimatorStrategy,
    /// Bands for the per-capita strategy and the validator's coherence check.
    pub bands: IntensityBands,
    /// Values for the category-heuristic strategy.
    pub category_heuristic: CategoryHeuristicEstimator,
    /// Month multipliers per category.
    pub multipliers: TemporalMultiplierTable,
    /// Classifier for records without a known category.
    pub classifier: GeographicClassifier,
    /// Live-signal blending.
    pub merger: SignalMerger,
    /// Curated values for the reference cross-check.
    pub landmarks: ReferenceLandmarks,
    region: Arc<dyn RegionFilter>,
}

impl PipelineConfig {
    /// Replace the region filter.
    #[must_use]
    pub fn with_region_filter(mut self, filter: impl RegionFilter + 'static) -> Self {
        self.region = Arc::new(filter);
        self
    }

    /// Region filter applied to centroids.
    #[must_use]
    pub fn region_filter(&self) -> &dyn RegionFilter {
        self.region.as_ref()
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            strategy: EstimatorStrategy::default(),
            bands: IntensityBands::default(),
            category_heuristic: CategoryHeuristicEstimator::default(),
            multipliers: TemporalMultiplierTable::default(),
            classifier: GeographicClassifier::default(),
            merger: SignalMerger::default(),
            landmarks: ReferenceLandmarks::default(),
            region: Arc::new(CatalunyaEnvelope::default()),
        }
    }
}

impl fmt::Debug for PipelineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineConfig")
            .field("strategy", &self.strategy)
            .field("bands", &self.bands)
            .field("category_heuristic", &self.category_heuristic)
            .field("multipliers", &self.multipliers)
            .field("classifier", &self.classifier)
            .field("merger", &self.merger)
            .field("landmarks", &self.landmarks)
            .finish_non_exhaustive()
    }
}

/// Stages built once per batch and shared by every record.
struct Stages<'a> {
    config: &'a PipelineConfig,
    estimator: StrategyEstimator,
    validator: DataValidator,
    month: Month,
    signals: Option<&'a dyn SignalProvider>,
}

enum Outcome {
    Accepted {
        record: MunicipalityRecord,
        diagnostic: Option<Diagnostic>,
    },
    Rejected(Rejection),
}

/// Run the full pipeline over `dataset` for `month`.
///
/// Pure with respect to its inputs: the same dataset, month, signals and
/// configuration always produce the same record set, down to the bytes of
/// its JSON form.
///
/// # Examples
/// ```
/// use marea_core::Month;
/// use marea_data::ReferenceDataset;
/// use marea_engine::{PipelineConfig, publish};
///
/// let dataset = ReferenceDataset::from_json_str(r#"[
///     {"id": "170955", "name": "Lloret de Mar", "comarca": "Selva",
///      "population": 39363, "hotelPlaces": 30000, "lat": 41.70, "lng": 2.845,
///      "source": "official"}
/// ]"#)
/// .unwrap();
/// let published = publish(&dataset, Month::AUGUST, None, &PipelineConfig::default());
/// assert_eq!(published.summary.accepted, 1);
/// assert_eq!(published.records[0].final_intensity, 1.0);
/// ```
#[must_use]
pub fn publish(
    dataset: &ReferenceDataset,
    month: Month,
    signals: Option<&dyn SignalProvider>,
    config: &PipelineConfig,
) -> PublishedRecordSet {
    let stages = Stages {
        config,
        estimator: StrategyEstimator::new(
            config.strategy,
            config.bands.clone(),
            config.category_heuristic,
        ),
        validator: DataValidator::new(
            PerCapitaRatioEstimator::new(config.bands.clone()),
            config.landmarks.clone(),
        ),
        month,
        signals,
    };
    let outcomes = run_stages(dataset.records(), &stages);

    let mut records = Vec::with_capacity(outcomes.len());
    let mut diagnostics = Vec::new();
    let mut rejections: Vec<Rejection> = dataset
        .rejected()
        .iter()
        .map(|entry| Rejection {
            id: entry.id.clone(),
            name: entry.name.clone(),
            reasons: vec![entry.reason.clone()],
        })
        .collect();
    for outcome in outcomes {
        match outcome {
            Outcome::Accepted { record, diagnostic } => {
                records.push(record);
                diagnostics.extend(diagnostic);
            }
            Outcome::Rejected(rejection) => rejections.push(rejection),
        }
    }
    let published = PublishedRecordSet::assemble(month, &records, rejections, diagnostics);
    info!(
        "Published month {month}: accepted={}, rejected={}, warnings={}",
        published.summary.accepted, published.summary.rejected, published.summary.warning_count
    );
    published
}

#[cfg(not(feature = "parallel"))]
fn run_stages(references: &[ReferenceRecord], stages: &Stages<'_>) -> Vec<Outcome> {
    references
        .iter()
        .map(|reference| stages.process(reference))
        .collect()
}

#[cfg(feature = "parallel")]
fn run_stages(references: &[ReferenceRecord], stages: &Stages<'_>) -> Vec<Outcome> {
    use rayon::prelude::*;

    references
        .par_iter()
        .map(|reference| stages.process(reference))
        .collect()
}

impl Stages<'_> {
    fn process(&self, reference: &ReferenceRecord) -> Outcome {
        let (record, known_category) = match reference.to_record() {
            Ok(converted) => converted,
            Err(errors) => {
                return self.reject(reference, errors.iter().map(ToString::to_string).collect());
            }
        };
        let mut warnings = Vec::new();
        let record = self.locate(record, &mut warnings);
        let category = known_category.unwrap_or_else(|| self.config.classifier.classify(&record));
        let record = record.with_category(category);

        let base = self.estimator.estimate(&record);
        let seasonal = apply_seasonal(&self.config.multipliers, base, category, self.month);
        let signal = self.signal_for(&record);
        let (value, applied) = self.config.merger.merge(seasonal, signal.as_ref());
        let record = record
            .with_base_intensity(base)
            .with_seasonal_intensity(seasonal)
            .with_final_intensity(value, applied);
        debug!(
            "Scored {}: category={category}, base={base:.3}, seasonal={seasonal:.3}, final={value:.3}",
            record.id
        );

        let result = self.validator.validate_record(&record);
        if !result.is_valid {
            return self.reject(reference, result.error_messages());
        }
        warnings.extend(result.warning_messages());
        let suggestions = result.suggestion_messages();
        let diagnostic = (!warnings.is_empty() || !suggestions.is_empty()).then(|| Diagnostic {
            id: record.id.to_string(),
            name: record.name.clone(),
            warnings,
            suggestions,
        });
        Outcome::Accepted { record, diagnostic }
    }

    /// Drop centroids the region filter rejects.
    fn locate(&self, record: MunicipalityRecord, warnings: &mut Vec<String>) -> MunicipalityRecord {
        let Some(location) = record.location else {
            return record;
        };
        if self.config.region_filter().is_within_region(location) {
            return record;
        }
        warn!(
            "Dropped centroid outside region: id={}, lat={}, lng={}",
            record.id, location.y, location.x
        );
        warnings.push(
            ValidationWarning::CentroidOutsideRegion {
                lat: location.y,
                lng: location.x,
            }
            .to_string(),
        );
        record.with_location(None)
    }

    fn signal_for(&self, record: &MunicipalityRecord) -> Option<ExternalSignal> {
        match self.signals?.signal_for(&record.id) {
            Ok(signal) => signal,
            Err(err) => {
                warn!("Ignored live signal: id={}, reason={err}", record.id);
                None
            }
        }
    }

    fn reject(&self, reference: &ReferenceRecord, reasons: Vec<String>) -> Outcome {
        warn!(
            "Rejected municipality: id={}, name={}, month={}, reasons={}",
            reference.id,
            reference.name,
            self.month,
            reasons.join("; ")
        );
        Outcome::Rejected(Rejection {
            id: Some(reference.id.to_string()),
            name: Some(reference.name.clone()),
            reasons,
        })
    }
}
