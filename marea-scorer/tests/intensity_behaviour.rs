//! Behavioural coverage for classification, estimation and seasonality.

use std::cell::RefCell;

use marea_core::test_support::{lloret_de_mar, sparse_village};
use marea_core::{Category, IntensityEstimator, Month, MunicipalityRecord};
use marea_scorer::{
    GeographicClassifier, INTENSITY_FLOOR, PerCapitaRatioEstimator, SignalMerger,
    TemporalModulator,
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

/// Municipality under test.
#[fixture]
pub fn record() -> RefCell<Option<MunicipalityRecord>> {
    RefCell::new(None)
}

/// Record after scoring.
#[fixture]
pub fn scored() -> RefCell<Option<MunicipalityRecord>> {
    RefCell::new(None)
}

#[given("Lloret de Mar with official counts in a coastal comarca")]
fn lloret(record: &RefCell<Option<MunicipalityRecord>>) {
    *record.borrow_mut() = Some(lloret_de_mar());
}

#[given("an interior village of 200 residents without hotels")]
fn village(record: &RefCell<Option<MunicipalityRecord>>) {
    *record.borrow_mut() = Some(sparse_village());
}

fn score(record: &RefCell<Option<MunicipalityRecord>>) -> MunicipalityRecord {
    let input = record
        .borrow()
        .clone()
        .unwrap_or_else(|| panic!("municipality must be initialised"));
    let category = GeographicClassifier::default().classify(&input);
    let classified = input.with_category(category);
    let base = PerCapitaRatioEstimator::default().estimate(&classified);
    let seasonal = TemporalModulator::default().apply(base, category, Month::AUGUST);
    classified
        .with_base_intensity(base)
        .with_seasonal_intensity(seasonal)
}

#[when("I score the municipality for August")]
fn score_august(
    record: &RefCell<Option<MunicipalityRecord>>,
    scored: &RefCell<Option<MunicipalityRecord>>,
) {
    *scored.borrow_mut() = Some(score(record));
}

#[when("I score the municipality for August without a live signal")]
fn score_without_signal(
    record: &RefCell<Option<MunicipalityRecord>>,
    scored: &RefCell<Option<MunicipalityRecord>>,
) {
    let seasonal = score(record);
    let (value, applied) =
        SignalMerger::default().merge(seasonal.seasonally_adjusted_intensity, None);
    *scored.borrow_mut() = Some(seasonal.with_final_intensity(value, applied));
}

fn scored_record(scored: &RefCell<Option<MunicipalityRecord>>) -> MunicipalityRecord {
    scored
        .borrow()
        .clone()
        .unwrap_or_else(|| panic!("municipality must be scored"))
}

#[then("the municipality is classified as coastal")]
fn is_coastal(scored: &RefCell<Option<MunicipalityRecord>>) {
    assert_eq!(scored_record(scored).category, Category::Coastal);
}

#[then("the municipality is classified as interior")]
fn is_interior(scored: &RefCell<Option<MunicipalityRecord>>) {
    assert_eq!(scored_record(scored).category, Category::Interior);
}

#[then("the base intensity is at least 0.85")]
fn base_is_high(scored: &RefCell<Option<MunicipalityRecord>>) {
    let base = scored_record(scored).base_intensity;
    assert!(base >= 0.85, "expected a high base intensity, got {base}");
}

#[then("the seasonal intensity is exactly 1.0")]
fn seasonal_saturates(scored: &RefCell<Option<MunicipalityRecord>>) {
    assert_eq!(scored_record(scored).seasonally_adjusted_intensity, 1.0);
}

#[then("the base intensity equals the floor")]
fn base_is_floor(scored: &RefCell<Option<MunicipalityRecord>>) {
    let base = scored_record(scored).base_intensity;
    assert_eq!(base, INTENSITY_FLOOR);
    assert!(base > 0.0);
}

#[then("the final intensity equals the seasonal intensity")]
fn final_equals_seasonal(scored: &RefCell<Option<MunicipalityRecord>>) {
    let record = scored_record(scored);
    assert_eq!(record.final_intensity, record.seasonally_adjusted_intensity);
    assert!(!record.live_signal_applied);
}

#[scenario(path = "tests/features/intensity.feature", index = 0)]
fn lloret_in_august(
    record: RefCell<Option<MunicipalityRecord>>,
    scored: RefCell<Option<MunicipalityRecord>>,
) {
    let _ = (record, scored);
}

#[scenario(path = "tests/features/intensity.feature", index = 1)]
fn sparse_village_floor(
    record: RefCell<Option<MunicipalityRecord>>,
    scored: RefCell<Option<MunicipalityRecord>>,
) {
    let _ = (record, scored);
}

#[scenario(path = "tests/features/intensity.feature", index = 2)]
fn absent_signal_no_op(
    record: RefCell<Option<MunicipalityRecord>>,
    scored: RefCell<Option<MunicipalityRecord>>,
) {
    let _ = (record, scored);
}
