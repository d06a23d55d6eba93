//! Scoring stages of the Marea tourism-intensity pipeline.
//!
//! The crate provides four pure stages that run over one
//! [`MunicipalityRecord`](marea_core::MunicipalityRecord) at a time:
//! - **Classification** with [`GeographicClassifier`], from comarca lists,
//!   coastal coordinate bands, name markers and a city population threshold.
//! - **Base estimation** with the strategies in [`estimator`], selected by
//!   [`EstimatorStrategy`].
//! - **Seasonal modulation** with [`apply_seasonal`] over a
//!   [`TemporalMultiplierTable`](marea_core::TemporalMultiplierTable).
//! - **Live blending** with [`merge_live_signal`] and [`SignalMerger`].
//!
//! # Examples
//!
//! ```
//! use marea_core::{IntensityEstimator, Month, MunicipalityRecord, TemporalMultiplierTable};
//! use marea_scorer::{GeographicClassifier, PerCapitaRatioEstimator, apply_seasonal};
//!
//! let record = MunicipalityRecord::new("431233", "Salou")
//!     .with_comarca("Tarragonès")
//!     .with_counts(26_645, 35_000);
//! let category = GeographicClassifier::default().classify(&record);
//! let base = PerCapitaRatioEstimator::default().estimate(&record);
//! let table = TemporalMultiplierTable::default();
//! let august = apply_seasonal(&table, base, category, Month::AUGUST);
//! assert!(august >= base);
//! ```

#![forbid(unsafe_code)]

pub mod classifier;
pub mod estimator;
mod merge;
mod seasonal;

pub use classifier::{CITY_POPULATION_THRESHOLD, CoastalBand, GeographicClassifier};
pub use estimator::{
    BandTableError, CategoryHeuristicEstimator, EstimatorStrategy, INTENSITY_CEILING,
    INTENSITY_FLOOR, IntensityBand, IntensityBands, LARGE_CITY_BONUS, LARGE_CITY_POPULATION,
    PerCapitaRatioEstimator, StrategyEstimator,
};
pub use merge::{LiveWeight, LiveWeightError, SignalMerger, merge_live_signal};
pub use seasonal::{TemporalModulator, apply_seasonal};

#[cfg(test)]
mod tests;
