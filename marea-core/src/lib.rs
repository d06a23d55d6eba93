//! Core domain types for the Marea tourism-intensity engine.
//!
//! The crate defines the municipality record that flows through the
//! pipeline, the closed vocabularies it relies on (categories, data sources,
//! months) and the seams other crates plug into: [`IntensityEstimator`],
//! [`RegionFilter`] and [`SignalProvider`]. Constructors return `Result` so
//! invalid configuration surfaces before a batch starts.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod category;
pub mod estimator;
pub mod month;
pub mod municipality;
pub mod region;
pub mod signal;
pub mod temporal;
#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use category::{Category, DataSource};
pub use estimator::{IntensityEstimator, sanitise_intensity};
pub use month::{Month, MonthError};
pub use municipality::{MunicipalityId, MunicipalityRecord};
pub use region::{CATALUNYA_MAX, CATALUNYA_MIN, CatalunyaEnvelope, RegionFilter};
pub use signal::{ExternalSignal, LiveValueSource, SignalError, SignalProvider};
pub use temporal::{MultiplierTableError, TemporalMultiplierTable};
#[cfg(any(test, feature = "test-support"))]
pub use test_support::{ConstantSignalProvider, FailingSignalProvider};
