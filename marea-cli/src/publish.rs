//! `publish` command: score a dataset for one month.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use chrono::Datelike;
use clap::Parser;
use marea_engine::{
    EstimatorStrategy, LiveValueSource, LiveWeight, Month, PipelineConfig, PublishedRecordSet,
    ReferenceDataset, SignalMerger, SignalProvider, SignalSnapshot, TemporalMultiplierTable,
    publish,
};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    ARG_DATASET, ARG_LIVE_SOURCE, ARG_LIVE_WEIGHT, ARG_MIN_CONFIDENCE, ARG_MONTH,
    ARG_MULTIPLIER_TABLE, ARG_OUTPUT, ARG_SIGNALS, ARG_STRATEGY, ARG_TOP, CliError, ENV_DATASET,
    emit_json,
};

/// Records listed in the stderr summary unless overridden.
const DEFAULT_TOP: usize = 5;

/// CLI arguments for the `publish` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Score every municipality in a reference dataset for one \
                 month and print the published record set as JSON. Options \
                 can come from CLI flags, configuration files, or MAREA_* \
                 environment variables.",
    about = "Publish tourism intensity for a month"
)]
#[ortho_config(prefix = "MAREA")]
pub(crate) struct PublishArgs {
    /// Reference dataset (JSON array or `{"municipalities": [...]}`).
    #[arg(long = ARG_DATASET, value_name = "path")]
    #[serde(default)]
    pub(crate) dataset: Option<Utf8PathBuf>,
    /// Month to publish, 1-12. Defaults to the current month.
    #[arg(long = ARG_MONTH, value_name = "1-12")]
    #[serde(default)]
    pub(crate) month: Option<u8>,
    /// Live signal snapshot keyed by municipality id.
    #[arg(long = ARG_SIGNALS, value_name = "path")]
    #[serde(default)]
    pub(crate) signals: Option<Utf8PathBuf>,
    /// Replacement month multipliers (`{"coastal": [12 numbers], ...}`).
    #[arg(long = ARG_MULTIPLIER_TABLE, value_name = "path")]
    #[serde(default)]
    pub(crate) multiplier_table: Option<Utf8PathBuf>,
    /// Base estimator: `perCapitaRatio` or `categoryHeuristic`.
    #[arg(long = ARG_STRATEGY, value_name = "name")]
    #[serde(default)]
    pub(crate) strategy: Option<EstimatorStrategy>,
    /// Share of the live value in the blend, 0-1.
    #[arg(long = ARG_LIVE_WEIGHT, value_name = "weight")]
    #[serde(default)]
    pub(crate) live_weight: Option<f64>,
    /// Signal field to blend: `occupancy` or `pressure`.
    #[arg(long = ARG_LIVE_SOURCE, value_name = "field")]
    #[serde(default)]
    pub(crate) live_source: Option<LiveValueSource>,
    /// Ignore signals below this confidence, 0-1.
    #[arg(long = ARG_MIN_CONFIDENCE, value_name = "confidence")]
    #[serde(default)]
    pub(crate) min_confidence: Option<f64>,
    /// Write JSON here instead of stdout.
    #[arg(long = ARG_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
    /// Number of most intense municipalities to log.
    #[arg(long = ARG_TOP, value_name = "count")]
    #[serde(default)]
    pub(crate) top: Option<usize>,
}

impl PublishArgs {
    pub(crate) fn into_config(self) -> Result<PublishConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        PublishConfig::try_from(merged)
    }
}

/// Resolved `publish` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PublishConfig {
    pub(crate) dataset: Utf8PathBuf,
    pub(crate) month: Month,
    pub(crate) signals: Option<Utf8PathBuf>,
    pub(crate) multiplier_table: Option<Utf8PathBuf>,
    pub(crate) strategy: EstimatorStrategy,
    pub(crate) merger: SignalMerger,
    pub(crate) output: Option<Utf8PathBuf>,
    pub(crate) top: usize,
}

impl TryFrom<PublishArgs> for PublishConfig {
    type Error = CliError;

    fn try_from(args: PublishArgs) -> Result<Self, Self::Error> {
        let dataset = args.dataset.ok_or(CliError::MissingArgument {
            field: ARG_DATASET,
            env: ENV_DATASET,
        })?;
        let month = match args.month {
            Some(value) => Month::new(value)?,
            None => current_month()?,
        };
        let defaults = SignalMerger::default();
        let weight = args
            .live_weight
            .map_or(Ok(defaults.weight), LiveWeight::new)?;
        let min_confidence = args.min_confidence.unwrap_or(defaults.min_confidence);
        if !(0.0..=1.0).contains(&min_confidence) {
            return Err(CliError::InvalidMinConfidence {
                value: min_confidence,
            });
        }
        Ok(Self {
            dataset,
            month,
            signals: args.signals,
            multiplier_table: args.multiplier_table,
            strategy: args.strategy.unwrap_or_default(),
            merger: SignalMerger {
                weight,
                source: args.live_source.unwrap_or(defaults.source),
                min_confidence,
            },
            output: args.output,
            top: args.top.unwrap_or(DEFAULT_TOP),
        })
    }
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<PublishConfig, CliError> {
    let merged = PublishArgs::merge_from_layers(layers).map_err(CliError::from)?;
    PublishConfig::try_from(merged)
}

fn current_month() -> Result<Month, CliError> {
    let number = chrono::Local::now().month();
    // `month()` is always in 1..=12.
    Ok(Month::new(u8::try_from(number).unwrap_or(0))?)
}

pub(crate) fn run_publish(args: PublishArgs) -> Result<(), CliError> {
    let config = args.into_config()?;
    let mut stdout = std::io::stdout().lock();
    execute_publish(&config, &mut stdout)
}

/// Load inputs, publish and emit the record set.
pub(crate) fn execute_publish(
    config: &PublishConfig,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let published = publish_from_files(config)?;
    log_summary(&published, config.top);
    emit_json(&published, config.output.as_deref(), writer)
}

pub(crate) fn publish_from_files(config: &PublishConfig) -> Result<PublishedRecordSet, CliError> {
    let dataset = ReferenceDataset::load(&config.dataset)?;
    let signals = config
        .signals
        .as_deref()
        .map(SignalSnapshot::load)
        .transpose()?;
    let mut pipeline = PipelineConfig::default();
    pipeline.strategy = config.strategy;
    pipeline.merger = config.merger;
    if let Some(path) = &config.multiplier_table {
        pipeline.multipliers = load_multiplier_table(path)?;
    }
    let provider = signals
        .as_ref()
        .map(|snapshot| snapshot as &dyn SignalProvider);
    Ok(publish(&dataset, config.month, provider, &pipeline))
}

pub(crate) fn load_multiplier_table(path: &Utf8Path) -> Result<TemporalMultiplierTable, CliError> {
    let text = marea_fs::read_utf8_to_string(path).map_err(|source| CliError::ReadInput {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CliError::ParseInput {
        path: path.to_path_buf(),
        source,
    })
}

fn log_summary(published: &PublishedRecordSet, top: usize) {
    let statistics = &published.statistics;
    info!(
        month = %published.month,
        accepted = published.summary.accepted,
        rejected = published.summary.rejected,
        warnings = published.summary.warning_count,
        avg = ?statistics.avg,
        "published record set"
    );
    for rejection in &published.rejections {
        info!(
            id = rejection.id.as_deref().unwrap_or("?"),
            name = rejection.name.as_deref().unwrap_or("?"),
            reasons = %rejection.reasons.join("; "),
            "rejected"
        );
    }
    for (rank, record) in published.top(top).into_iter().enumerate() {
        info!(
            rank = rank + 1,
            id = %record.id,
            name = %record.name,
            intensity = record.final_intensity,
            category = %record.category,
            "top municipality"
        );
    }
}
