//! Curated ground truth for a handful of well-known municipalities.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Known-good facts for one municipality.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Landmark {
    /// Resident population.
    pub population: f64,
    /// Hotel places.
    pub hotel_places: f64,
    /// Expected intensity.
    pub intensity: f64,
}

/// Landmarks keyed by municipality name.
///
/// Used for regression checks against known destinations, never to reject
/// arbitrary municipalities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferenceLandmarks(BTreeMap<String, Landmark>);

impl ReferenceLandmarks {
    /// Landmarks from an explicit map.
    #[must_use]
    pub const fn new(entries: BTreeMap<String, Landmark>) -> Self {
        Self(entries)
    }

    /// No landmarks at all.
    #[must_use]
    pub const fn empty() -> Self {
        Self(BTreeMap::new())
    }

    /// Landmark for `name`, if curated.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Landmark> {
        self.0.get(name)
    }
}

impl Default for ReferenceLandmarks {
    fn default() -> Self {
        let entries = [
            ("Barcelona", 1_686_208.0, 75_000.0, 0.82),
            ("Lloret de Mar", 39_363.0, 30_000.0, 0.95),
            ("Salou", 26_645.0, 35_000.0, 0.92),
            ("Vielha e Mijaran", 5_474.0, 4_500.0, 0.70),
            ("Girona", 103_369.0, 5_500.0, 0.48),
        ];
        Self(
            entries
                .into_iter()
                .map(|(name, population, hotel_places, intensity)| {
                    (
                        name.to_owned(),
                        Landmark {
                            population,
                            hotel_places,
                            intensity,
                        },
                    )
                })
                .collect(),
        )
    }
}
