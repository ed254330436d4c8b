//! Review cadence configuration.

use radar_core::enums::ReviewCadence;
use serde::{Deserialize, Serialize};

const fn default_monthly_days() -> u32 {
    30
}

const fn default_quarterly_days() -> u32 {
    90
}

const fn default_biannual_days() -> u32 {
    180
}

const fn default_annual_days() -> u32 {
    365
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ReviewConfig {
    /// Cadence applied when an entry is added or moved.
    #[serde(default)]
    pub cadence: ReviewCadence,

    #[serde(default = "default_monthly_days")]
    pub monthly_days: u32,

    #[serde(default = "default_quarterly_days")]
    pub quarterly_days: u32,

    #[serde(default = "default_biannual_days")]
    pub biannual_days: u32,

    #[serde(default = "default_annual_days")]
    pub annual_days: u32,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            cadence: ReviewCadence::default(),
            monthly_days: default_monthly_days(),
            quarterly_days: default_quarterly_days(),
            biannual_days: default_biannual_days(),
            annual_days: default_annual_days(),
        }
    }
}

impl ReviewConfig {
    /// Day count configured for `cadence`.
    #[must_use]
    pub const fn days_for(&self, cadence: ReviewCadence) -> u32 {
        match cadence {
            ReviewCadence::Monthly => self.monthly_days,
            ReviewCadence::Quarterly => self.quarterly_days,
            ReviewCadence::Biannual => self.biannual_days,
            ReviewCadence::Annual => self.annual_days,
        }
    }

    /// Day count for the active cadence.
    #[must_use]
    pub const fn interval_days(&self) -> u32 {
        self.days_for(self.cadence)
    }
}
