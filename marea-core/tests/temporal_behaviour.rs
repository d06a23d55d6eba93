//! Behavioural coverage for the seasonal multiplier table.

use std::cell::RefCell;
use std::collections::BTreeMap;

use marea_core::{Category, Month, MultiplierTableError, TemporalMultiplierTable};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

/// Raw rows used to build a table.
#[fixture]
pub fn rows() -> RefCell<BTreeMap<Category, Vec<f64>>> {
    RefCell::new(BTreeMap::new())
}

/// Outcome of building the table.
#[fixture]
pub fn built() -> RefCell<Option<Result<TemporalMultiplierTable, MultiplierTableError>>> {
    RefCell::new(None)
}

/// Peak month recorded by the lookup step.
#[fixture]
pub fn peak() -> RefCell<Option<Month>> {
    RefCell::new(None)
}

#[given("the default multiplier table")]
fn default_table(
    rows: &RefCell<BTreeMap<Category, Vec<f64>>>,
    built: &RefCell<Option<Result<TemporalMultiplierTable, MultiplierTableError>>>,
) {
    *rows.borrow_mut() = TemporalMultiplierTable::default().into();
    *built.borrow_mut() = Some(Ok(TemporalMultiplierTable::default()));
}

#[given("a multiplier table definition with eleven city months")]
fn eleven_city_months(rows: &RefCell<BTreeMap<Category, Vec<f64>>>) {
    let mut definition: BTreeMap<Category, Vec<f64>> = TemporalMultiplierTable::default().into();
    definition.insert(Category::City, vec![1.0; 11]);
    *rows.borrow_mut() = definition;
}

#[when("I build the multiplier table")]
fn build_table(
    rows: &RefCell<BTreeMap<Category, Vec<f64>>>,
    built: &RefCell<Option<Result<TemporalMultiplierTable, MultiplierTableError>>>,
) {
    *built.borrow_mut() = Some(TemporalMultiplierTable::new(&rows.borrow()));
}

fn record_peak(
    category: Category,
    built: &RefCell<Option<Result<TemporalMultiplierTable, MultiplierTableError>>>,
    peak: &RefCell<Option<Month>>,
) {
    let binding = built.borrow();
    let table = match binding.as_ref() {
        Some(Ok(table)) => table,
        Some(Err(err)) => panic!("table should build, got {err}"),
        None => panic!("table must be initialised"),
    };
    *peak.borrow_mut() = Some(table.peak_month(category));
}

#[when("I look up the coastal peak month")]
fn coastal_peak(
    built: &RefCell<Option<Result<TemporalMultiplierTable, MultiplierTableError>>>,
    peak: &RefCell<Option<Month>>,
) {
    record_peak(Category::Coastal, built, peak);
}

#[when("I look up the mountain peak month")]
fn mountain_peak(
    built: &RefCell<Option<Result<TemporalMultiplierTable, MultiplierTableError>>>,
    peak: &RefCell<Option<Month>>,
) {
    record_peak(Category::Mountain, built, peak);
}

#[then("the peak month is August")]
fn peak_is_august(peak: &RefCell<Option<Month>>) {
    assert_eq!(*peak.borrow(), Some(Month::AUGUST));
}

#[then("the peak month is December")]
fn peak_is_december(peak: &RefCell<Option<Month>>) {
    assert_eq!(*peak.borrow(), Some(Month::DECEMBER));
}

#[then("building fails because the city row has the wrong length")]
fn wrong_length(built: &RefCell<Option<Result<TemporalMultiplierTable, MultiplierTableError>>>) {
    let binding = built.borrow();
    match binding.as_ref() {
        Some(Err(MultiplierTableError::WrongLength { category, found })) => {
            assert_eq!(*category, Category::City);
            assert_eq!(*found, 11);
        }
        Some(Err(other)) => panic!("unexpected error: {other}"),
        Some(Ok(_)) => panic!("expected the table to be rejected"),
        None => panic!("build result must be recorded"),
    }
}

#[scenario(path = "tests/features/temporal.feature", index = 0)]
fn coastal_peaks_in_summer(
    rows: RefCell<BTreeMap<Category, Vec<f64>>>,
    built: RefCell<Option<Result<TemporalMultiplierTable, MultiplierTableError>>>,
    peak: RefCell<Option<Month>>,
) {
    let _ = (rows, built, peak);
}

#[scenario(path = "tests/features/temporal.feature", index = 1)]
fn mountain_peaks_in_winter(
    rows: RefCell<BTreeMap<Category, Vec<f64>>>,
    built: RefCell<Option<Result<TemporalMultiplierTable, MultiplierTableError>>>,
    peak: RefCell<Option<Month>>,
) {
    let _ = (rows, built, peak);
}

#[scenario(path = "tests/features/temporal.feature", index = 2)]
fn short_row_is_rejected(
    rows: RefCell<BTreeMap<Category, Vec<f64>>>,
    built: RefCell<Option<Result<TemporalMultiplierTable, MultiplierTableError>>>,
    peak: RefCell<Option<Month>>,
) {
    let _ = (rows, built, peak);
}
