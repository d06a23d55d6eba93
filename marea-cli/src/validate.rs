//! `validate` command: check raw municipality payloads.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use marea_engine::{BatchReport, DataValidator};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::{ARG_AUTO_CORRECT, ARG_INPUT, ARG_OUTPUT, CliError, ENV_INPUT, emit_json};

/// CLI arguments for the `validate` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Validate raw municipality payloads for structure, ranges, \
                 coherence, category and reference landmarks. With \
                 --auto-correct, common mistakes are repaired and flagged \
                 before validation.",
    about = "Validate municipality payloads"
)]
#[ortho_config(prefix = "MAREA")]
pub(crate) struct ValidateArgs {
    /// JSON object, array of objects, or `{"municipalities": [...]}`.
    #[arg(long = ARG_INPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) input: Option<Utf8PathBuf>,
    /// Repair payloads before validating them.
    #[arg(long = ARG_AUTO_CORRECT)]
    #[serde(default)]
    pub(crate) auto_correct: bool,
    /// Write JSON here instead of stdout.
    #[arg(long = ARG_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
}

impl ValidateArgs {
    pub(crate) fn into_config(self) -> Result<ValidateConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ValidateConfig::try_from(merged)
    }
}

/// Resolved `validate` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ValidateConfig {
    pub(crate) input: Utf8PathBuf,
    pub(crate) auto_correct: bool,
    pub(crate) output: Option<Utf8PathBuf>,
}

impl TryFrom<ValidateArgs> for ValidateConfig {
    type Error = CliError;

    fn try_from(args: ValidateArgs) -> Result<Self, Self::Error> {
        let input = args.input.ok_or(CliError::MissingArgument {
            field: ARG_INPUT,
            env: ENV_INPUT,
        })?;
        Ok(Self {
            input,
            auto_correct: args.auto_correct,
            output: args.output,
        })
    }
}

/// Report printed by `validate`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct ValidateOutput {
    pub(crate) report: BatchReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) corrected: Option<Vec<Value>>,
}

pub(crate) fn run_validate(args: ValidateArgs) -> Result<(), CliError> {
    let config = args.into_config()?;
    let mut stdout = std::io::stdout().lock();
    execute_validate(&config, &mut stdout)
}

pub(crate) fn execute_validate(
    config: &ValidateConfig,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let output = validate_file(config)?;
    info!(
        total = output.report.total,
        valid = output.report.valid,
        invalid = output.report.invalid,
        with_warnings = output.report.with_warnings,
        "validated payloads"
    );
    emit_json(&output, config.output.as_deref(), writer)
}

pub(crate) fn validate_file(config: &ValidateConfig) -> Result<ValidateOutput, CliError> {
    let payloads = load_payloads(&config.input)?;
    let validator = DataValidator::default();
    if config.auto_correct {
        let corrected: Vec<Value> = payloads
            .iter()
            .map(|payload| validator.auto_correct(payload))
            .collect();
        Ok(ValidateOutput {
            report: validator.validate_batch(&corrected),
            corrected: Some(corrected),
        })
    } else {
        Ok(ValidateOutput {
            report: validator.validate_batch(&payloads),
            corrected: None,
        })
    }
}

fn load_payloads(path: &Utf8Path) -> Result<Vec<Value>, CliError> {
    let text = marea_fs::read_utf8_to_string(path).map_err(|source| CliError::ReadInput {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value = serde_json::from_str(&text).map_err(|source| CliError::ParseInput {
        path: path.to_path_buf(),
        source,
    })?;
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(mut object) => match object.remove("municipalities") {
            Some(Value::Array(items)) => Ok(items),
            Some(_) => Err(CliError::InputShape {
                path: path.to_path_buf(),
            }),
            None => Ok(vec![Value::Object(object)]),
        },
        _ => Err(CliError::InputShape {
            path: path.to_path_buf(),
        }),
    }
}
