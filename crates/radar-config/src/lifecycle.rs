//! Deprecation timeline configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const fn default_sunset_period_days() -> u32 {
    180
}

const fn default_removal_period_days() -> u32 {
    365
}

fn default_warn_before_removal_days() -> Vec<u32> {
    vec![90, 30, 7]
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct LifecycleConfig {
    /// Days from deprecation until support drops to sunset.
    #[serde(default = "default_sunset_period_days")]
    pub sunset_period_days: u32,

    /// Days from deprecation until removal.
    #[serde(default = "default_removal_period_days")]
    pub removal_period_days: u32,

    /// Reminder thresholds, in days before the removal date.
    #[serde(default = "default_warn_before_removal_days")]
    pub warn_before_removal_days: Vec<u32>,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            sunset_period_days: default_sunset_period_days(),
            removal_period_days: default_removal_period_days(),
            warn_before_removal_days: default_warn_before_removal_days(),
        }
    }
}

impl LifecycleConfig {
    /// Check that the periods produce an ordered timeline.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sunset_period_days == 0 {
            return Err(ConfigError::invalid(
                "lifecycle.sunset_period_days",
                "must be positive",
            ));
        }
        if self.removal_period_days <= self.sunset_period_days {
            return Err(ConfigError::invalid(
                "lifecycle.removal_period_days",
                format!(
                    "must exceed sunset_period_days ({} <= {})",
                    self.removal_period_days, self.sunset_period_days
                ),
            ));
        }
        if let Some(bad) = self
            .warn_before_removal_days
            .iter()
            .find(|d| **d == 0 || **d > self.removal_period_days)
        {
            return Err(ConfigError::invalid(
                "lifecycle.warn_before_removal_days",
                format!(
                    "offset {bad} must be between 1 and removal_period_days ({})",
                    self.removal_period_days
                ),
            ));
        }
        Ok(())
    }
}
