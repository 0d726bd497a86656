//! Configuration file support.
//!
//! Settings live in an INI file at `<config_dir>/campusnav/config.ini`:
//!
//! ```ini
//! [tracking]
//! accuracy = high
//! distance_interval_m = 2
//! time_interval_ms = 3000
//!
//! [geofence]
//! boundaries_file =
//!
//! [logging]
//! level = info
//! directory =
//! ```
//!
//! A missing file yields the defaults. Empty values mean "not set". Keys are
//! addressed as `section.key` through [`ConfigKey`].

mod keys;

pub use keys::ConfigKey;

use std::path::{Path, PathBuf};
use std::time::Duration;

use ini::Ini;
use thiserror::Error;
use tracing::{debug, warn};

use crate::logging::LoggingConfig;
use crate::tracking::{Accuracy, TrackingOptions, DEFAULT_DISTANCE_INTERVAL_M, DEFAULT_TIME_INTERVAL};

/// Directory name under the platform config directory.
pub const CONFIG_DIR_NAME: &str = "campusnav";

/// Config file name.
pub const CONFIG_FILE_NAME: &str = "config.ini";

/// Errors from loading, saving or editing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read or written.
    #[error("Failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid INI.
    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// A value does not parse for its key.
    #[error("Invalid value '{value}' for {key}")]
    InvalidValue { key: String, value: String },

    /// No such `section.key`.
    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),
}

/// `[tracking]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackingSettings {
    pub accuracy: Accuracy,
    pub distance_interval_m: f64,
    pub time_interval_ms: u64,
}

impl Default for TrackingSettings {
    fn default() -> Self {
        Self {
            accuracy: Accuracy::default(),
            distance_interval_m: DEFAULT_DISTANCE_INTERVAL_M,
            time_interval_ms: DEFAULT_TIME_INTERVAL.as_millis() as u64,
        }
    }
}

/// `[geofence]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeofenceSettings {
    /// Boundary registry JSON. `None` uses the bundled campus table.
    pub boundaries_file: Option<PathBuf>,
}

/// Parsed configuration file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    pub tracking: TrackingSettings,
    pub geofence: GeofenceSettings,
    pub logging: LoggingConfig,
}

/// Platform config directory for campusnav.
pub fn config_directory() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
}

/// Default config file location.
pub fn config_file_path() -> PathBuf {
    config_directory().join(CONFIG_FILE_NAME)
}

impl ConfigFile {
    /// Load from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path())
    }

    /// Load from `path`, falling back to defaults when it does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path).map_err(|e| match e {
            ini::Error::Io(source) => ConfigError::Io {
                path: path.to_path_buf(),
                source,
            },
            ini::Error::Parse(e) => ConfigError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            },
        })?;

        Self::from_ini(&ini)
    }

    /// Parse INI text.
    pub fn from_ini_str(text: &str) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_str(text).map_err(|e| ConfigError::Parse {
            path: PathBuf::from("<string>"),
            message: e.to_string(),
        })?;
        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        for (section, properties) in ini.iter() {
            for (key, value) in properties.iter() {
                let name = match section {
                    Some(section) => format!("{}.{}", section, key),
                    None => key.to_string(),
                };
                match name.parse::<ConfigKey>() {
                    Ok(config_key) => config_key.set(&mut config, value)?,
                    Err(_) => warn!(key = %name, "Ignoring unknown config key"),
                }
            }
        }

        Ok(config)
    }

    /// Save to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file_path())
    }

    /// Save to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        self.to_ini().write_to_file(path).map_err(io_err)?;

        debug!(path = %path.display(), "Config file saved");
        Ok(())
    }

    fn to_ini(&self) -> Ini {
        let mut ini = Ini::new();
        for key in ConfigKey::all() {
            ini.with_section(Some(key.section()))
                .set(key.key_name(), key.get(self));
        }
        ini
    }

    /// Boundary file override, if configured.
    pub fn boundaries_file(&self) -> Option<&Path> {
        self.geofence.boundaries_file.as_deref()
    }
}

impl From<&ConfigFile> for TrackingOptions {
    fn from(config: &ConfigFile) -> Self {
        TrackingOptions::default()
            .with_accuracy(config.tracking.accuracy)
            .with_distance_interval_m(config.tracking.distance_interval_m)
            .with_time_interval(Duration::from_millis(config.tracking.time_interval_ms))
    }
}
