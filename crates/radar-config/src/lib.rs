//! # radar-config
//!
//! Layered configuration loading for the technology radar using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`RADAR_*` prefix, `__` as separator)
//! 2. Project-level `.radar/config.toml`
//! 3. User-level `~/.config/radar/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `RADAR_LIFECYCLE__SUNSET_PERIOD_DAYS` -> `lifecycle.sunset_period_days`,
//! `RADAR_LAYOUT__PLACEMENT` -> `layout.placement`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use radar_config::RadarConfig;
//!
//! let config = RadarConfig::load_with_dotenv().expect("config");
//! println!("sunset after {} days", config.lifecycle.sunset_period_days);
//! ```

mod error;
mod layout;
mod lifecycle;
mod notifications;
mod review;
mod snapshot;

pub use error::ConfigError;
pub use layout::{LayoutConfig, RingColors};
pub use lifecycle::LifecycleConfig;
pub use notifications::{NotificationConfig, RecipientConfig};
pub use review::ReviewConfig;
pub use snapshot::SnapshotConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct RadarConfig {
    #[serde(default)]
    pub lifecycle: LifecycleConfig,
    #[serde(default)]
    pub review: ReviewConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
    #[serde(default)]
    pub snapshot: SnapshotConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
}

impl RadarConfig {
    /// Load configuration from all sources (TOML files + environment variables)
    /// and validate it.
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` if a source cannot be parsed, or
    /// `ConfigError::InvalidValue` if the merged values are inconsistent.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Extract and validate from an arbitrary figment.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".radar/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment = figment.merge(Env::prefixed("RADAR_").split("__"));

        figment
    }

    /// Reject values that would produce an inconsistent deprecation timeline
    /// or an unusable layout.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.lifecycle.validate()?;
        if self.review.interval_days() == 0 {
            return Err(ConfigError::InvalidValue {
                field: format!("review.{}_days", self.review.cadence),
                reason: "must be positive".into(),
            });
        }
        if self.layout.min_canvas == 0 {
            return Err(ConfigError::InvalidValue {
                field: "layout.min_canvas".into(),
                reason: "must be positive".into(),
            });
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("radar").join("config.toml"))
    }

    /// Load `.env` from the workspace root.
    ///
    /// Walks up from `CARGO_MANIFEST_DIR` (if available) or current dir looking
    /// for a `.env` file. Silently does nothing if no `.env` is found.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // crate -> crates/ -> workspace root
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use radar_core::enums::{PlacementMode, ReviewCadence};

    #[test]
    fn default_config_is_valid() {
        let config = RadarConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.review.cadence, ReviewCadence::Quarterly);
        assert_eq!(config.snapshot.new_window_days, 30);
        assert_eq!(config.layout.placement, PlacementMode::Random);
        assert_eq!(config.layout.min_canvas, 200);
        assert!(config.notifications.deprecation_warning_recipients.is_empty());
    }

    #[test]
    fn figment_builds_without_files() {
        let figment = RadarConfig::figment();
        let config: RadarConfig = figment.extract().expect("should extract defaults");
        assert_eq!(config.lifecycle.sunset_period_days, 180);
        assert_eq!(config.lifecycle.removal_period_days, 365);
    }

    #[test]
    fn zero_review_interval_is_rejected() {
        let mut config = RadarConfig::default();
        config.review.quarterly_days = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("review.quarterly_days"));
    }
}
