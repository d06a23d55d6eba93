//! Validate many payloads and summarise the outcome.

use serde::Serialize;
use serde_json::Value;

use super::{DataValidator, RecordSnapshot, ValidationResult};

/// Validation outcome for one payload in a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordReport {
    /// Identifier, if the payload carried one.
    pub id: Option<String>,
    /// Name, if the payload carried a string name.
    pub name: Option<String>,
    /// Findings for the payload.
    #[serde(flatten)]
    pub result: ValidationResult,
}

/// Summary of a validated batch.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    /// Number of payloads.
    pub total: usize,
    /// Payloads without errors.
    pub valid: usize,
    /// Payloads with at least one error.
    pub invalid: usize,
    /// Valid payloads carrying warnings.
    pub with_warnings: usize,
    /// Per-payload findings in input order.
    pub details: Vec<RecordReport>,
}

impl DataValidator {
    /// Validate every payload independently.
    ///
    /// One bad payload never affects the findings for another.
    #[must_use]
    pub fn validate_batch(&self, payloads: &[Value]) -> BatchReport {
        let mut report = BatchReport {
            total: payloads.len(),
            ..BatchReport::default()
        };
        for payload in payloads {
            let snapshot = RecordSnapshot::from_json(payload);
            let result = self.validate(&snapshot);
            if result.is_valid {
                report.valid += 1;
                if result.has_warnings() {
                    report.with_warnings += 1;
                }
            } else {
                report.invalid += 1;
            }
            report.details.push(RecordReport {
                id: snapshot.id.clone(),
                name: snapshot.display_name().map(str::to_owned),
                result,
            });
        }
        report
    }
}
