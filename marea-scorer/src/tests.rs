//! Unit coverage for estimation, seasonal and merge helpers.

use marea_core::test_support::{lloret_de_mar, sparse_village};
use marea_core::{
    Category, ExternalSignal, IntensityEstimator, LiveValueSource, Month, MunicipalityRecord,
    TemporalMultiplierTable,
};
use rstest::rstest;

use crate::{
    BandTableError, CategoryHeuristicEstimator, EstimatorStrategy, INTENSITY_FLOOR, IntensityBand,
    IntensityBands, LiveWeight, PerCapitaRatioEstimator, SignalMerger, StrategyEstimator,
    TemporalModulator, apply_seasonal, merge_live_signal,
};

fn band(above: f64, intensity: f64) -> IntensityBand {
    IntensityBand { above, intensity }
}

#[rstest]
#[case(1_001.0, 0.95)]
#[case(1_000.0, 0.85)]
#[case(150.5, 0.65)]
#[case(40.0, 0.35)]
#[case(10.5, 0.25)]
#[case(0.0, 0.15)]
fn reference_bands_step_down(#[case] ratio: f64, #[case] expected: f64) {
    assert_eq!(IntensityBands::default().intensity_for(ratio), expected);
}

#[rstest]
fn unknown_population_returns_floor() {
    let estimator = PerCapitaRatioEstimator::default();
    assert_eq!(estimator.estimate_from_counts(0, 5_000), INTENSITY_FLOOR);
    assert_eq!(estimator.estimate(&sparse_village()), INTENSITY_FLOOR);
}

#[rstest]
fn large_city_bonus_is_capped() {
    let estimator = PerCapitaRatioEstimator::default();
    // 75 000 places for 1.6M residents is ~44 per 1000 (0.45 band).
    let barcelona = estimator.estimate_from_counts(1_686_208, 75_000);
    assert!((barcelona - 0.55).abs() < 1e-9, "got {barcelona}");
    let saturated = estimator.estimate_from_counts(600_000, 700_000);
    assert_eq!(saturated, 0.95);
}

#[rstest]
fn extreme_ratio_stays_bounded() {
    let estimator = PerCapitaRatioEstimator::default();
    let value = estimator.estimate_from_counts(1, 100_000);
    assert!((0.0..=1.0).contains(&value));
}

#[rstest]
fn rejects_short_band_tables() {
    let bands = vec![band(100.0, 0.9), band(50.0, 0.5)];
    assert_eq!(
        IntensityBands::new(bands),
        Err(BandTableError::TooFewBands { found: 2 })
    );
}

#[rstest]
#[case(
    vec![band(500.0, 0.9), band(500.0, 0.8), band(100.0, 0.7), band(50.0, 0.6), band(20.0, 0.5), band(5.0, 0.4)],
    BandTableError::ThresholdsNotDecreasing { position: 1 }
)]
#[case(
    vec![band(500.0, 0.8), band(300.0, 0.9), band(100.0, 0.7), band(50.0, 0.6), band(20.0, 0.5), band(5.0, 0.4)],
    BandTableError::IntensityIncreases { position: 1 }
)]
#[case(
    vec![band(500.0, 0.99), band(300.0, 0.9), band(100.0, 0.7), band(50.0, 0.6), band(20.0, 0.5), band(5.0, 0.4)],
    BandTableError::IntensityOutOfRange { position: 0, value: 0.99 }
)]
fn rejects_incoherent_band_tables(
    #[case] bands: Vec<IntensityBand>,
    #[case] expected: BandTableError,
) {
    assert_eq!(IntensityBands::new(bands), Err(expected));
}

#[rstest]
fn band_tables_deserialise_with_validation() {
    let json = serde_json::to_string(&IntensityBands::default()).expect("serialise bands");
    let parsed: IntensityBands = serde_json::from_str(&json).expect("parse bands");
    assert_eq!(parsed, IntensityBands::default());
    let short = r#"[{"above": 10.0, "intensity": 0.5}]"#;
    assert!(serde_json::from_str::<IntensityBands>(short).is_err());
}

#[rstest]
#[case(Category::Coastal, 0.55)]
#[case(Category::Mountain, 0.35)]
#[case(Category::City, 0.30)]
#[case(Category::Interior, 0.20)]
fn category_heuristic_uses_flat_values(#[case] category: Category, #[case] expected: f64) {
    let record = MunicipalityRecord::new("1", "Anywhere").with_category(category);
    assert_eq!(CategoryHeuristicEstimator::default().estimate(&record), expected);
}

#[rstest]
fn strategy_selects_estimator() {
    let record = lloret_de_mar();
    let heuristic = StrategyEstimator::new(
        EstimatorStrategy::CategoryHeuristic,
        IntensityBands::default(),
        CategoryHeuristicEstimator::default(),
    );
    assert_eq!(heuristic.estimate(&record), 0.55);
    let ratio = StrategyEstimator::new(
        EstimatorStrategy::PerCapitaRatio,
        IntensityBands::default(),
        CategoryHeuristicEstimator::default(),
    );
    assert_eq!(ratio.estimate(&record), 0.85);
    assert_eq!(
        "categoryHeuristic".parse::<EstimatorStrategy>(),
        Ok(EstimatorStrategy::CategoryHeuristic)
    );
}

#[rstest]
fn seasonal_adjustment_clamps_at_one() {
    let table = TemporalMultiplierTable::default();
    assert_eq!(
        apply_seasonal(&table, 0.85, Category::Coastal, Month::AUGUST),
        1.0
    );
}

#[rstest]
fn seasonal_adjustment_scales_down_in_low_season() {
    let modulator = TemporalModulator::default();
    let january = modulator.apply(0.5, Category::Coastal, Month::JANUARY);
    assert!((january - 0.15).abs() < 1e-9, "got {january}");
}

#[rstest]
#[case(0.0)]
#[case(0.37)]
#[case(1.0)]
fn missing_signal_is_a_no_op(#[case] seasonal: f64) {
    assert_eq!(merge_live_signal(seasonal, None, LiveWeight::DEFAULT), seasonal);
    assert_eq!(
        merge_live_signal(seasonal, Some(f64::NAN), LiveWeight::DEFAULT),
        seasonal
    );
}

#[rstest]
fn negative_live_values_are_clamped() {
    let weight = LiveWeight::new(1.0).expect("valid weight");
    assert_eq!(merge_live_signal(0.8, Some(-3.0), weight), 0.0);
}

#[rstest]
#[case(-0.1)]
#[case(1.01)]
#[case(f64::NAN)]
fn live_weight_rejects_out_of_range(#[case] value: f64) {
    assert!(LiveWeight::new(value).is_err());
}

#[rstest]
fn merger_respects_confidence_gate() {
    let merger = SignalMerger {
        min_confidence: 0.6,
        ..SignalMerger::default()
    };
    let weak = ExternalSignal::new(90.0, 0.9, 0.5);
    assert_eq!(merger.merge(0.3, Some(&weak)), (0.3, false));
    let strong = ExternalSignal::new(90.0, 0.9, 0.7);
    let (value, applied) = merger.merge(0.3, Some(&strong));
    assert!(applied);
    assert!((value - (0.3 * 0.55 + 0.9 * 0.45)).abs() < 1e-9);
}

#[rstest]
fn merger_reads_pressure_when_configured() {
    let merger = SignalMerger {
        weight: LiveWeight::new(1.0).expect("valid weight"),
        source: LiveValueSource::Pressure,
        min_confidence: 0.0,
    };
    let signal = ExternalSignal {
        occupancy_percent: None,
        pressure: Some(0.4),
        confidence: 0.2,
    };
    assert_eq!(merger.merge(0.9, Some(&signal)), (0.4, true));
    let occupancy_only = SignalMerger {
        source: LiveValueSource::Occupancy,
        ..merger
    };
    assert_eq!(occupancy_only.merge(0.9, Some(&signal)), (0.9, false));
}
