//! Validation layer.
//!
//! Pure checks run before anything enters the store. Every violation is
//! collected so a caller can fix all of them in one round-trip.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Assessment, NewApiVersion, NewTechnology, TechnologyEntry, UsageMetrics};
use crate::errors::RadarError;

const SCORE_MIN: u8 = 1;
const SCORE_MAX: u8 = 5;

/// Outcome of a validation pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// Convert into a `Result`, failing with `RadarError::Validation`.
    ///
    /// # Errors
    ///
    /// Returns `RadarError::Validation` carrying every collected violation.
    pub fn into_result(self) -> Result<(), RadarError> {
        if self.valid {
            Ok(())
        } else {
            Err(RadarError::Validation {
                errors: self.errors,
            })
        }
    }
}

/// Validate a draft technology.
#[must_use]
pub fn validate_technology(draft: &NewTechnology) -> ValidationReport {
    let mut errors = Vec::new();
    check_common(
        &draft.name,
        &draft.description,
        &draft.assessment,
        draft.assessment.overall(),
        draft.adoption_level,
        &mut errors,
    );
    ValidationReport::from_errors(errors)
}

/// Validate a stored entry after a revision was applied to it.
#[must_use]
pub fn validate_entry(entry: &TechnologyEntry) -> ValidationReport {
    let mut errors = Vec::new();
    check_common(
        &entry.name,
        &entry.description,
        &entry.assessment,
        entry.overall_score,
        entry.adoption_level,
        &mut errors,
    );
    ValidationReport::from_errors(errors)
}

/// Validate a draft API version.
#[must_use]
pub fn validate_api_version(draft: &NewApiVersion) -> ValidationReport {
    let mut errors = Vec::new();
    if draft.api_name.trim().is_empty() {
        errors.push("api_name is required".to_string());
    }
    if draft.consumer_teams.iter().any(|t| t.trim().is_empty()) {
        errors.push("consumer team names must not be empty".to_string());
    }
    ValidationReport::from_errors(errors)
}

/// Validate reported API usage.
#[must_use]
pub fn validate_usage(usage: &UsageMetrics) -> ValidationReport {
    let mut errors = Vec::new();
    if !(0.0..=1.0).contains(&usage.error_rate) {
        errors.push(format!(
            "error_rate must be between 0 and 1, got {}",
            usage.error_rate
        ));
    }
    if !usage.mean_latency_ms.is_finite() || usage.mean_latency_ms < 0.0 {
        errors.push(format!(
            "mean_latency_ms must be a non-negative number, got {}",
            usage.mean_latency_ms
        ));
    }
    ValidationReport::from_errors(errors)
}

fn check_common(
    name: &str,
    description: &str,
    assessment: &Assessment,
    overall: f64,
    adoption_level: f64,
    errors: &mut Vec<String>,
) {
    if name.trim().is_empty() {
        errors.push("name is required".to_string());
    }
    if description.trim().is_empty() {
        errors.push("description is required".to_string());
    }
    for (field, score) in assessment.scores() {
        if !(SCORE_MIN..=SCORE_MAX).contains(&score) {
            errors.push(format!(
                "{field} score must be between {SCORE_MIN} and {SCORE_MAX}, got {score}"
            ));
        }
    }
    if !(1.0..=5.0).contains(&overall) {
        errors.push(format!("overall score must be between 1 and 5, got {overall}"));
    }
    if !(0.0..=100.0).contains(&adoption_level) {
        errors.push(format!(
            "adoption level must be between 0 and 100, got {adoption_level}"
        ));
    }
}
