//! Addressable configuration keys.

use std::path::PathBuf;
use std::str::FromStr;

use super::{ConfigError, ConfigFile};
use crate::logging::parse_level;

/// A `section.key` setting that can be read and written by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    TrackingAccuracy,
    TrackingDistanceIntervalM,
    TrackingTimeIntervalMs,
    GeofenceBoundariesFile,
    LoggingLevel,
    LoggingDirectory,
}

const ALL_KEYS: &[ConfigKey] = &[
    ConfigKey::TrackingAccuracy,
    ConfigKey::TrackingDistanceIntervalM,
    ConfigKey::TrackingTimeIntervalMs,
    ConfigKey::GeofenceBoundariesFile,
    ConfigKey::LoggingLevel,
    ConfigKey::LoggingDirectory,
];

impl ConfigKey {
    /// Every key, grouped by section.
    pub fn all() -> &'static [ConfigKey] {
        ALL_KEYS
    }

    /// Full `section.key` name.
    pub fn name(&self) -> &'static str {
        match self {
            ConfigKey::TrackingAccuracy => "tracking.accuracy",
            ConfigKey::TrackingDistanceIntervalM => "tracking.distance_interval_m",
            ConfigKey::TrackingTimeIntervalMs => "tracking.time_interval_ms",
            ConfigKey::GeofenceBoundariesFile => "geofence.boundaries_file",
            ConfigKey::LoggingLevel => "logging.level",
            ConfigKey::LoggingDirectory => "logging.directory",
        }
    }

    /// INI section name.
    pub fn section(&self) -> &'static str {
        self.split().0
    }

    /// Key name within the section.
    pub fn key_name(&self) -> &'static str {
        self.split().1
    }

    fn split(&self) -> (&'static str, &'static str) {
        self.name().split_once('.').unwrap_or(("", self.name()))
    }

    /// Current value as it would be written to the file. Empty means unset.
    pub fn get(&self, config: &ConfigFile) -> String {
        let path_or_empty = |path: &Option<PathBuf>| {
            path.as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        };

        match self {
            ConfigKey::TrackingAccuracy => config.tracking.accuracy.to_string(),
            ConfigKey::TrackingDistanceIntervalM => config.tracking.distance_interval_m.to_string(),
            ConfigKey::TrackingTimeIntervalMs => config.tracking.time_interval_ms.to_string(),
            ConfigKey::GeofenceBoundariesFile => path_or_empty(&config.geofence.boundaries_file),
            ConfigKey::LoggingLevel => config.logging.level.clone(),
            ConfigKey::LoggingDirectory => path_or_empty(&config.logging.directory),
        }
    }

    /// Parse `value` and store it in `config`.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        let invalid = || ConfigError::InvalidValue {
            key: self.name().to_string(),
            value: value.to_string(),
        };
        let optional_path = |v: &str| (!v.is_empty()).then(|| PathBuf::from(v));

        match self {
            ConfigKey::TrackingAccuracy => {
                config.tracking.accuracy = value.parse().map_err(|_| invalid())?;
            }
            ConfigKey::TrackingDistanceIntervalM => {
                let meters: f64 = value.parse().map_err(|_| invalid())?;
                if !meters.is_finite() || meters < 0.0 {
                    return Err(invalid());
                }
                config.tracking.distance_interval_m = meters;
            }
            ConfigKey::TrackingTimeIntervalMs => {
                config.tracking.time_interval_ms = value.parse().map_err(|_| invalid())?;
            }
            ConfigKey::GeofenceBoundariesFile => {
                config.geofence.boundaries_file = optional_path(value);
            }
            ConfigKey::LoggingLevel => {
                parse_level(value).ok_or_else(invalid)?;
                config.logging.level = value.to_ascii_lowercase();
            }
            ConfigKey::LoggingDirectory => {
                config.logging.directory = optional_path(value);
            }
        }
        Ok(())
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ALL_KEYS
            .iter()
            .copied()
            .find(|key| key.name() == wanted)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}
