//! Assign municipalities to a geographic category.

use geo::{Coord, Intersects, Rect};
use marea_core::{Category, MunicipalityRecord};
use serde::{Deserialize, Serialize};

const MOUNTAIN_COMARQUES: [&str; 9] = [
    "Val d'Aran",
    "Alta Ribagorça",
    "Pallars Sobirà",
    "Pallars Jussà",
    "Alt Urgell",
    "Cerdanya",
    "Ripollès",
    "Berguedà",
    "Garrotxa",
];

const COASTAL_COMARQUES: [&str; 12] = [
    "Alt Empordà",
    "Baix Empordà",
    "Selva",
    "Maresme",
    "Barcelonès",
    "Baix Llobregat",
    "Garraf",
    "Baix Penedès",
    "Tarragonès",
    "Baix Camp",
    "Baix Ebre",
    "Montsià",
];

const COASTAL_NAME_MARKERS: [&str; 3] = ["de Mar", "Platja", "Port de"];

/// Population above which an otherwise unclassified municipality is a city.
pub const CITY_POPULATION_THRESHOLD: u32 = 50_000;

/// Longitude/latitude window treated as Mediterranean coast.
///
/// Bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoastalBand {
    /// Western edge.
    pub min_lng: f64,
    /// Eastern edge.
    pub max_lng: f64,
    /// Southern edge.
    pub min_lat: f64,
    /// Northern edge.
    pub max_lat: f64,
}

impl CoastalBand {
    fn contains(&self, location: Coord<f64>) -> bool {
        let rect = Rect::new(
            Coord {
                x: self.min_lng,
                y: self.min_lat,
            },
            Coord {
                x: self.max_lng,
                y: self.max_lat,
            },
        );
        rect.intersects(&location)
    }
}

fn default_bands() -> Vec<CoastalBand> {
    vec![
        // Costa Brava and the Girona seaboard.
        CoastalBand {
            min_lng: 2.5,
            max_lng: 3.33,
            min_lat: 40.52,
            max_lat: 42.86,
        },
        // Costa Daurada, Terres de l'Ebre and the Garraf.
        CoastalBand {
            min_lng: 1.0,
            max_lng: 3.33,
            min_lat: 40.52,
            max_lat: 41.3,
        },
    ]
}

/// Rule-based classifier for [`Category`].
///
/// Rules run in priority order and the first match wins:
/// 1. comarca in the mountain list → `Mountain`;
/// 2. comarca in the coastal list, centroid in a coastal band, or a coastal
///    name marker → `Coastal`;
/// 3. population above the city threshold → `City`;
/// 4. otherwise `Interior`.
///
/// Comarca and marker matching ignores case, accents and apostrophe style.
///
/// # Examples
/// ```
/// use marea_core::{Category, MunicipalityRecord};
/// use marea_scorer::GeographicClassifier;
///
/// let classifier = GeographicClassifier::default();
/// let puigcerda = MunicipalityRecord::new("171411", "Puigcerdà").with_comarca("Cerdanya");
/// assert_eq!(classifier.classify(&puigcerda), Category::Mountain);
///
/// let lleida = MunicipalityRecord::new("251207", "Lleida").with_counts(140_000, 2_800);
/// assert_eq!(classifier.classify(&lleida), Category::City);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeographicClassifier {
    /// Comarques classified as mountain.
    pub mountain_comarques: Vec<String>,
    /// Comarques classified as coastal.
    pub coastal_comarques: Vec<String>,
    /// Coordinate windows classified as coastal.
    pub coastal_bands: Vec<CoastalBand>,
    /// Name fragments marking a seaside municipality.
    pub coastal_name_markers: Vec<String>,
    /// Population above which a municipality counts as a city.
    pub city_population_threshold: u32,
}

impl Default for GeographicClassifier {
    fn default() -> Self {
        Self {
            mountain_comarques: MOUNTAIN_COMARQUES.map(String::from).to_vec(),
            coastal_comarques: COASTAL_COMARQUES.map(String::from).to_vec(),
            coastal_bands: default_bands(),
            coastal_name_markers: COASTAL_NAME_MARKERS.map(String::from).to_vec(),
            city_population_threshold: CITY_POPULATION_THRESHOLD,
        }
    }
}

impl GeographicClassifier {
    /// Classify `record` from its comarca, centroid, name and population.
    #[must_use]
    pub fn classify(&self, record: &MunicipalityRecord) -> Category {
        let comarca = record.comarca.as_deref().map(fold);
        if comarca
            .as_deref()
            .is_some_and(|name| listed(&self.mountain_comarques, name))
        {
            return Category::Mountain;
        }
        if self.is_coastal(comarca.as_deref(), record) {
            return Category::Coastal;
        }
        if record.population > self.city_population_threshold {
            return Category::City;
        }
        Category::Interior
    }

    fn is_coastal(&self, comarca: Option<&str>, record: &MunicipalityRecord) -> bool {
        if comarca.is_some_and(|name| listed(&self.coastal_comarques, name)) {
            return true;
        }
        if let Some(location) = record.location
            && self.coastal_bands.iter().any(|band| band.contains(location))
        {
            return true;
        }
        let name = fold(&record.name);
        self.coastal_name_markers
            .iter()
            .any(|marker| name.contains(&fold(marker)))
    }
}

fn listed(list: &[String], folded: &str) -> bool {
    list.iter().any(|entry| fold(entry) == folded)
}

/// Lowercase, strip Catalan/Spanish accents and unify apostrophes.
fn fold(raw: &str) -> String {
    raw.trim()
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'à' | 'á' | 'â' | 'ä' => 'a',
            'è' | 'é' | 'ê' | 'ë' => 'e',
            'ì' | 'í' | 'î' | 'ï' => 'i',
            'ò' | 'ó' | 'ô' | 'ö' => 'o',
            'ù' | 'ú' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            'ñ' => 'n',
            '’' | '`' | '´' => '\'',
            other => other,
        })
        .collect()
}
