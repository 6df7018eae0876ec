//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all settings. Every
//! section is optional in the TOML file; missing sections fall back to
//! their defaults.
//!
//! # Example
//!
//! ```
//! use depthrace::domain::PriceUnit;
//! use depthrace::infrastructure::config::settings::Config;
//!
//! let config = Config::parse_toml(
//!     r#"
//!     [simulator]
//!     unit = "cents"
//!
//!     [races]
//!     time_window_ms = 2000
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.simulator.unit, PriceUnit::Cents);
//! assert_eq!(config.races.options().time_window_ms, 2000);
//! ```

use serde::Deserialize;
use std::path::Path;

use super::logging::LoggingConfig;
use crate::domain::race::{RaceOptions, DEFAULT_MAX_RACES};
use crate::domain::PriceUnit;
use crate::error::{ConfigError, Result};

/// Execution simulator settings.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Unit ladders are quoted in when the caller does not say otherwise.
    pub unit: PriceUnit,
}

/// Race construction settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RaceConfig {
    /// Maximum spread between first and last detection; 0 disables it.
    pub time_window_ms: i64,
    /// Races kept after sorting by recency.
    pub max_races: usize,
}

impl RaceConfig {
    #[must_use]
    pub const fn options(&self) -> RaceOptions {
        RaceOptions {
            time_window_ms: self.time_window_ms,
            max_races: self.max_races,
        }
    }

    /// Options with command-line overrides applied.
    ///
    /// Overrides are held to the same rules as values from the file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for a negative window or a zero
    /// race cap.
    pub fn options_with(
        &self,
        time_window_ms: Option<i64>,
        max_races: Option<usize>,
    ) -> Result<RaceOptions> {
        let merged = Self {
            time_window_ms: time_window_ms.unwrap_or(self.time_window_ms),
            max_races: max_races.unwrap_or(self.max_races),
        };
        merged.validate()?;
        Ok(merged.options())
    }

    fn validate(&self) -> Result<()> {
        if self.time_window_ms < 0 {
            return Err(ConfigError::InvalidValue {
                field: "races.time_window_ms",
                reason: "must be 0 or greater".to_string(),
            }
            .into());
        }
        if self.max_races == 0 {
            return Err(ConfigError::InvalidValue {
                field: "races.max_races",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            time_window_ms: 0,
            max_races: DEFAULT_MAX_RACES,
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Execution simulator defaults.
    #[serde(default)]
    pub simulator: SimulatorConfig,

    /// Race construction defaults.
    #[serde(default)]
    pub races: RaceConfig,
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML content is
    /// malformed, or validation fails.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Load the file if it exists, otherwise use defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Initialize logging from the `[logging]` section.
    pub fn init_logging(&self) {
        self.logging.init();
    }

    fn validate(&self) -> Result<()> {
        if !LoggingConfig::FORMATS.contains(&self.logging.format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "logging.format",
                reason: format!("must be one of {:?}", LoggingConfig::FORMATS),
            }
            .into());
        }
        self.races.validate()
    }
}
