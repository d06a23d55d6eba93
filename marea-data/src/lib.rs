//! Data ingestion and quality checks for the Marea engine.
//!
//! - [`ReferenceDataset`] loads municipality facts and reconciles official,
//!   AI-enriched and heuristic layers into one record per id.
//! - [`SignalSnapshot`] loads live occupancy signals and serves them through
//!   [`marea_core::SignalProvider`].
//! - [`DataValidator`] checks raw payloads and computed records, and
//!   [`DataValidator::auto_correct`] repairs common payload mistakes.

#![forbid(unsafe_code)]

mod error;
mod reference;
mod signals;
pub mod validation;

pub use error::{DatasetError, SignalSnapshotError};
pub use reference::{EntryRejection, ReferenceDataset, ReferenceEntry, ReferenceRecord};
pub use signals::SignalSnapshot;
pub use validation::{
    BatchReport, DataValidator, Field, INTENSITY_CORRECTED_FLAG, Landmark, RecordReport,
    RecordSnapshot, ReferenceLandmarks, Suggestion, ValidationError, ValidationResult,
    ValidationWarning,
};
