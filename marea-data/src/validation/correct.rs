//! Best-effort repair of raw payloads.

use log::debug;
use marea_core::Category;
use serde_json::{Map, Value};

use super::DataValidator;
use super::snapshot::{CATEGORY_KEYS, HOTEL_PLACES_KEYS, INTENSITY_KEYS, POPULATION_KEYS};

/// Marker added to payloads whose intensity was changed.
pub const INTENSITY_CORRECTED_FLAG: &str = "_intensityCorrected";

/// Divergence from the estimator above which intensity is recomputed.
const RECOMPUTE_THRESHOLD: f64 = 0.4;

impl DataValidator {
    /// Repair common anomalies in a raw payload.
    ///
    /// - intensities above 1 are read as percentages and divided by 100,
    ///   then clamped to `[0, 1]`;
    /// - counts are rounded and negative counts become 0;
    /// - category spelling variants become the canonical name;
    /// - intensity is recomputed when it diverges from the estimator by
    ///   more than 0.4 and both counts are positive.
    ///
    /// Whenever the intensity changes, [`INTENSITY_CORRECTED_FLAG`] is set
    /// to `true`. Keys keep their original names. Non-object payloads are
    /// returned unchanged.
    ///
    /// # Examples
    /// ```
    /// use marea_data::DataValidator;
    /// use serde_json::json;
    ///
    /// let fixed = DataValidator::default().auto_correct(&json!({"tourism_intensity": 85}));
    /// assert_eq!(fixed["tourism_intensity"], json!(0.85));
    /// assert_eq!(fixed["_intensityCorrected"], json!(true));
    /// ```
    #[must_use]
    pub fn auto_correct(&self, payload: &Value) -> Value {
        let Some(original) = payload.as_object() else {
            return payload.clone();
        };
        let mut corrected = original.clone();
        let population = round_count(&mut corrected, &POPULATION_KEYS);
        let hotel_places = round_count(&mut corrected, &HOTEL_PLACES_KEYS);
        normalise_category(&mut corrected);

        let Some((key, raw)) = intensity_entry(&corrected) else {
            return Value::Object(corrected);
        };
        let mut intensity = rescale_intensity(raw);
        if let (Some(population), Some(hotel_places)) = (population, hotel_places)
            && population > 0.0
            && hotel_places > 0.0
        {
            let expected = self
                .estimator()
                .estimate_from_values(population, hotel_places);
            if exceeds(intensity, expected) {
                intensity = expected;
            }
        }
        if intensity.to_bits() != raw.to_bits() {
            debug!("Corrected intensity for payload: key={key}, from={raw}, to={intensity}");
            corrected.insert(key.clone(), Value::from(intensity));
            corrected.insert(INTENSITY_CORRECTED_FLAG.to_owned(), Value::Bool(true));
        }
        Value::Object(corrected)
    }
}

#[expect(
    clippy::float_arithmetic,
    reason = "percentages are rescaled to unit range"
)]
fn rescale_intensity(raw: f64) -> f64 {
    let scaled = if raw > 1.0 { raw / 100.0 } else { raw };
    scaled.clamp(0.0, 1.0)
}

#[expect(clippy::float_arithmetic, reason = "compares intensity divergence")]
fn exceeds(intensity: f64, expected: f64) -> bool {
    (intensity - expected).abs() > RECOMPUTE_THRESHOLD
}

fn intensity_entry(object: &Map<String, Value>) -> Option<(String, f64)> {
    INTENSITY_KEYS.iter().find_map(|key| {
        object
            .get(*key)
            .and_then(Value::as_f64)
            .filter(|value| value.is_finite())
            .map(|value| ((*key).to_owned(), value))
    })
}

/// Round the first numeric count among `keys`, flooring negatives at 0.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "value is rounded and clamped to the non-negative u64 range first"
)]
fn round_count(object: &mut Map<String, Value>, keys: &[&str]) -> Option<f64> {
    let (key, value) = keys.iter().find_map(|key| {
        object
            .get(*key)
            .and_then(Value::as_f64)
            .filter(|value| value.is_finite())
            .map(|value| ((*key).to_owned(), value))
    })?;
    let rounded = value.round().max(0.0);
    object.insert(key, Value::from(rounded as u64));
    Some(rounded)
}

fn normalise_category(object: &mut Map<String, Value>) {
    let Some((key, canonical)) = CATEGORY_KEYS.iter().find_map(|key| {
        let raw = object.get(*key)?.as_str()?;
        Category::normalise(raw).map(|category| ((*key).to_owned(), category))
    }) else {
        return;
    };
    object.insert(key, Value::from(canonical.as_str()));
}
