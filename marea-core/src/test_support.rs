//! Test-only signal providers and sample records used by unit and behaviour
//! tests across the workspace.

use geo::Coord;

use crate::{
    Category, DataSource, ExternalSignal, MunicipalityId, MunicipalityRecord, SignalError,
    SignalProvider,
};

/// `SignalProvider` that fails every lookup.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingSignalProvider;

impl SignalProvider for FailingSignalProvider {
    fn signal_for(&self, id: &MunicipalityId) -> Result<Option<ExternalSignal>, SignalError> {
        Err(SignalError::TimedOut { id: id.clone() })
    }
}

/// `SignalProvider` returning the same signal for every municipality.
#[derive(Debug, Clone, Copy)]
pub struct ConstantSignalProvider(pub ExternalSignal);

impl SignalProvider for ConstantSignalProvider {
    fn signal_for(&self, _id: &MunicipalityId) -> Result<Option<ExternalSignal>, SignalError> {
        Ok(Some(self.0))
    }
}

/// Lloret de Mar with official counts and a coastal centroid.
#[must_use]
pub fn lloret_de_mar() -> MunicipalityRecord {
    MunicipalityRecord::new("170955", "Lloret de Mar")
        .with_comarca("Selva")
        .with_counts(39_363, 30_000)
        .with_category(Category::Coastal)
        .with_location(Some(Coord { x: 2.845, y: 41.70 }))
        .with_source(DataSource::Official, 1.0)
}

/// A small interior village without hotels.
#[must_use]
pub fn sparse_village() -> MunicipalityRecord {
    MunicipalityRecord::new("250001", "Vilanova de la Sal")
        .with_comarca("Noguera")
        .with_counts(200, 0)
        .with_location(Some(Coord { x: 1.05, y: 41.85 }))
}
