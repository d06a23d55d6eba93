//! Focused unit tests covering `validate` configuration and execution.

use super::helpers::Workspace;
use super::*;
use crate::validate::{ValidateArgs, ValidateConfig, execute_validate, validate_file};
use rstest::rstest;
use serde_json::Value;

fn config_for(input: camino::Utf8PathBuf, auto_correct: bool) -> ValidateConfig {
    ValidateConfig::try_from(ValidateArgs {
        input: Some(input),
        auto_correct,
        output: None,
    })
    .expect("config should build")
}

#[rstest]
fn converting_without_input_errors() {
    let err = ValidateConfig::try_from(ValidateArgs::default()).expect_err("input is required");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_INPUT);
            assert_eq!(env, ENV_INPUT);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn batch_report_isolates_bad_payloads() {
    let workspace = Workspace::new();
    let input = workspace.write(
        "payloads.json",
        r#"[
            {"name": "Calella", "population": 19000, "hotelPlaces": 9000,
             "intensity": 0.85, "category": "coastal"},
            {"name": "Fantasma", "population": -5, "hotelPlaces": 0,
             "intensity": 0.1, "category": "interior"}
        ]"#,
    );
    let output = validate_file(&config_for(input, false)).expect("validation runs");
    assert_eq!(output.report.total, 2);
    assert_eq!(output.report.valid, 1);
    assert_eq!(output.report.invalid, 1);
    assert!(output.corrected.is_none());
}

#[rstest]
fn auto_correct_rescales_percentages() {
    let workspace = Workspace::new();
    let input = workspace.write(
        "payload.json",
        r#"{"name": "Blanes", "population": 40000, "hotelPlaces": 12000,
            "tourism_intensity": 85, "category": "Costa"}"#,
    );
    let mut buffer = Vec::new();
    execute_validate(&config_for(input, true), &mut buffer).expect("validation runs");
    let output: Value = serde_json::from_slice(&buffer).expect("output is JSON");
    let corrected = &output["corrected"][0];
    assert_eq!(corrected["tourism_intensity"], 0.85);
    assert_eq!(corrected["category"], "coastal");
    assert_eq!(corrected["_intensityCorrected"], true);
    assert_eq!(output["report"]["valid"], 1);
}

#[rstest]
fn scalar_input_is_rejected() {
    let workspace = Workspace::new();
    let input = workspace.write("scalar.json", "42");
    let err = validate_file(&config_for(input, false)).expect_err("scalar input");
    assert!(matches!(err, CliError::InputShape { .. }), "found {err:?}");
}
