//! Synthetic reference datasets for the pipeline benchmarks.
//!
//! Municipalities are drawn from a seeded `ChaCha8Rng`, so every run scores
//! the same dataset.

use marea_core::{DataSource, ExternalSignal, MunicipalityId};
use marea_data::{ReferenceDataset, ReferenceEntry};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;

/// Seed for deterministic dataset generation.
pub const BENCHMARK_SEED: u64 = 42;

/// Comarques to cycle through so every classifier branch is exercised.
const COMARQUES: [Option<&str>; 5] = [
    Some("Selva"),
    Some("Cerdanya"),
    Some("Vallès Occidental"),
    Some("Segrià"),
    None,
];

const SOURCES: [DataSource; 3] = [
    DataSource::Official,
    DataSource::AiEnriched,
    DataSource::Heuristic,
];

/// Generate `count` municipalities spread over Catalunya's envelope.
#[must_use]
pub fn generate_dataset(count: usize, seed: u64) -> ReferenceDataset {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let entries = (0..count).map(|i| {
        #[expect(
            clippy::integer_division_remainder_used,
            reason = "Modulo for cyclic assignment is intentional"
        )]
        let (comarca, source) = (
            COMARQUES.get(i % COMARQUES.len()).copied().flatten(),
            SOURCES.get(i % SOURCES.len()).copied().unwrap_or_default(),
        );
        ReferenceEntry {
            id: MunicipalityId::new(format!("{:06}", 100_000 + i)),
            name: format!("Municipi {i}"),
            comarca: comarca.map(str::to_owned),
            population: Some(rng.gen_range(50.0..200_000.0)),
            hotel_places: Some(rng.gen_range(0.0..20_000.0)),
            category: None,
            lat: Some(rng.gen_range(40.6..42.8)),
            lng: Some(rng.gen_range(0.2..3.3)),
            source,
            confidence: Some(rng.gen_range(0.3..1.0)),
        }
    });
    ReferenceDataset::reconcile(entries)
}

/// Live signals for roughly half of the dataset.
#[must_use]
pub fn generate_signals(
    dataset: &ReferenceDataset,
    seed: u64,
) -> BTreeMap<MunicipalityId, ExternalSignal> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    dataset
        .records()
        .iter()
        .filter_map(|record| {
            rng.gen_bool(0.5).then(|| {
                let signal = ExternalSignal::new(
                    rng.gen_range(0.0..100.0),
                    rng.gen_range(0.0..1.0),
                    rng.gen_range(0.0..1.0),
                );
                (record.id.clone(), signal)
            })
        })
        .collect()
}
