//! Facade crate for the Marea tourism-intensity engine.
//!
//! [`publish`] turns a reconciled [`ReferenceDataset`] and a month into a
//! [`PublishedRecordSet`] for the map layer. It runs each municipality
//! through classification, base estimation, seasonal modulation, optional
//! live-signal blending and validation, then aggregates the survivors.
//! The function does no I/O; loading files and writing output belongs to
//! the caller.
//!
//! The building blocks are re-exported so most callers only need this
//! crate. Enable the `parallel` feature to score records on the `rayon`
//! thread pool; the output is identical to the sequential path.

#![forbid(unsafe_code)]

mod aggregate;
mod pipeline;

pub use aggregate::{
    Aggregate, COLOR_BUCKET_LIMITS, CategoryCounts, Diagnostic, PublishedRecord,
    PublishedRecordSet, Rejection, SourceCounts, Statistics, Summary, aggregate, color_bucket,
};
pub use marea_core::{
    CatalunyaEnvelope, Category, DataSource, ExternalSignal, IntensityEstimator, LiveValueSource,
    Month, MonthError, MultiplierTableError, MunicipalityId, MunicipalityRecord, RegionFilter,
    SignalError, SignalProvider, TemporalMultiplierTable,
};
pub use marea_data::{
    BatchReport, DataValidator, DatasetError, ReferenceDataset, ReferenceLandmarks, SignalSnapshot,
    SignalSnapshotError, ValidationResult,
};
pub use marea_scorer::{
    BandTableError, CategoryHeuristicEstimator, EstimatorStrategy, GeographicClassifier,
    IntensityBands, LiveWeight, LiveWeightError, PerCapitaRatioEstimator, SignalMerger,
};
pub use pipeline::{PipelineConfig, publish};
