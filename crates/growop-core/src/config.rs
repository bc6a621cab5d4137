//! Configuration loading for a headless growop run.
//!
//! A run is described by a small YAML file (`growop.yaml` by default).
//! Every section and every field is optional; missing values fall back to
//! the cadences the simulation was balanced against.

use std::path::{Path, PathBuf};

use growop_types::Settings;
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level run configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// Seed, clock and duration of the run.
    #[serde(default)]
    pub run: RunConfig,

    /// How often each tick entry point fires.
    #[serde(default)]
    pub cadence: CadenceConfig,

    /// Player settings applied to a fresh game.
    #[serde(default)]
    pub settings: SettingsConfig,

    /// Where and how often the game is saved.
    #[serde(default)]
    pub snapshot: SnapshotConfig,

    /// Log output.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Optional YAML catalog replacing the built-in tables.
    #[serde(default)]
    pub catalog: Option<PathBuf>,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_yml::from_str(&contents)?;
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        Ok(config)
    }
}

/// Seed and simulated clock.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RunConfig {
    /// Random seed for reproducibility.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Simulated start time, milliseconds since the Unix epoch.
    #[serde(default = "default_start_ms")]
    pub start_ms: u64,

    /// Simulated time to run for.
    #[serde(default = "default_duration_ms")]
    pub duration_ms: u64,

    /// Length of one scheduler step; every cadence is rounded to it.
    #[serde(default = "default_step_ms")]
    pub step_ms: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            start_ms: default_start_ms(),
            duration_ms: default_duration_ms(),
            step_ms: default_step_ms(),
        }
    }
}

/// Tick cadences in simulated milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CadenceConfig {
    /// Plant phase advance.
    #[serde(default = "default_one_second")]
    pub phases_ms: u64,

    /// Curing completion and event expiry.
    #[serde(default = "default_one_second")]
    pub curing_ms: u64,

    /// Research progress.
    #[serde(default = "default_one_second")]
    pub research_ms: u64,

    /// Automation pass.
    #[serde(default = "default_one_second")]
    pub automation_ms: u64,

    /// Market data update.
    #[serde(default = "default_market_ms")]
    pub market_ms: u64,

    /// Micro-environment drift.
    #[serde(default = "default_drift_ms")]
    pub drift_ms: u64,

    /// Random event roll.
    #[serde(default = "default_event_roll_ms")]
    pub event_roll_ms: u64,

    /// Pest check.
    #[serde(default = "default_pest_check_ms")]
    pub pest_check_ms: u64,
}

impl Default for CadenceConfig {
    fn default() -> Self {
        Self {
            phases_ms: default_one_second(),
            curing_ms: default_one_second(),
            research_ms: default_one_second(),
            automation_ms: default_one_second(),
            market_ms: default_market_ms(),
            drift_ms: default_drift_ms(),
            event_roll_ms: default_event_roll_ms(),
            pest_check_ms: default_pest_check_ms(),
        }
    }
}

/// Starting player settings.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct SettingsConfig {
    /// Scales pest chances, `0..=1`.
    #[serde(default = "default_pest_frequency")]
    pub pest_frequency: f64,

    /// Whether global events may trigger.
    #[serde(default = "default_true")]
    pub random_events: bool,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            pest_frequency: default_pest_frequency(),
            random_events: true,
        }
    }
}

impl SettingsConfig {
    /// The game settings these values describe.
    pub const fn to_settings(self) -> Settings {
        Settings {
            pest_frequency: self.pest_frequency.clamp(0.0, 1.0),
            random_events: self.random_events,
        }
    }
}

/// Snapshot persistence.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SnapshotConfig {
    /// File to resume from and save to. No saving when absent.
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Simulated time between saves.
    #[serde(default = "default_snapshot_interval_ms")]
    pub interval_ms: u64,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            path: None,
            interval_ms: default_snapshot_interval_ms(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::Text,
        }
    }
}

const fn default_seed() -> u64 {
    42
}

// 2026-01-01T00:00:00Z
const fn default_start_ms() -> u64 {
    1_767_225_600_000
}

// one simulated hour
const fn default_duration_ms() -> u64 {
    3_600_000
}

const fn default_step_ms() -> u64 {
    1_000
}

const fn default_one_second() -> u64 {
    1_000
}

const fn default_market_ms() -> u64 {
    30_000
}

const fn default_drift_ms() -> u64 {
    10_000
}

const fn default_event_roll_ms() -> u64 {
    30_000
}

const fn default_pest_check_ms() -> u64 {
    60_000
}

const fn default_pest_frequency() -> f64 {
    0.3
}

const fn default_true() -> bool {
    true
}

const fn default_snapshot_interval_ms() -> u64 {
    300_000
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::float_cmp)]

    use super::*;

    #[test]
    fn defaults_match_the_balanced_cadences() {
        let config = SimulationConfig::default();
        assert_eq!(config.run.seed, 42);
        assert_eq!(config.run.step_ms, 1_000);
        assert_eq!(config.cadence.event_roll_ms, 30_000);
        assert_eq!(config.cadence.pest_check_ms, 60_000);
        assert_eq!(config.settings.pest_frequency, 0.3);
        assert!(config.snapshot.path.is_none());
        assert_eq!(config.logging.format, LogFormat::Text);
        assert!(config.catalog.is_none());
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let yaml = r"
run:
  seed: 7
  duration_ms: 120000
cadence:
  market_ms: 5000
settings:
  random_events: false
snapshot:
  path: saves/game.json
logging:
  format: json
";
        let config = SimulationConfig::parse(yaml).unwrap();
        assert_eq!(config.run.seed, 7);
        assert_eq!(config.run.duration_ms, 120_000);
        assert_eq!(config.run.step_ms, 1_000);
        assert_eq!(config.cadence.market_ms, 5_000);
        assert_eq!(config.cadence.drift_ms, 10_000);
        assert!(!config.settings.random_events);
        assert_eq!(config.settings.pest_frequency, 0.3);
        assert_eq!(config.snapshot.path, Some(PathBuf::from("saves/game.json")));
        assert_eq!(config.snapshot.interval_ms, 300_000);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn empty_document_is_default() {
        let config = SimulationConfig::parse("{}").unwrap();
        assert_eq!(config, SimulationConfig::default());
    }

    #[test]
    fn settings_are_clamped() {
        let settings = SettingsConfig {
            pest_frequency: 4.0,
            random_events: true,
        }
        .to_settings();
        assert_eq!(settings.pest_frequency, 1.0);
    }

    #[test]
    fn malformed_yaml_is_rejected() {
        let err = SimulationConfig::parse("run: [unclosed").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml { .. }));
    }
}
