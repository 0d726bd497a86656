//! CLI error type.

use std::fmt;
use std::path::PathBuf;

use campusnav::config::ConfigError;
use campusnav::coord::CoordError;
use campusnav::geofence::GeofenceError;
use campusnav::logging::LoggingError;
use campusnav::tracking::TrackingError;

/// Errors surfaced by CLI commands. Any of them exits with status 1.
#[derive(Debug)]
pub enum CliError {
    /// Configuration file or key problem.
    Config(String),

    /// Boundary registry could not be loaded.
    Boundaries(GeofenceError),

    /// Coordinates given on the command line are out of range.
    Coordinate(CoordError),

    /// Destination is not in the registry.
    UnknownDestination(String),

    /// Track file could not be read or parsed.
    Track { path: PathBuf, message: String },

    /// Tracking could not be started.
    Tracking(TrackingError),

    /// Logging could not be initialized.
    Logging(LoggingError),

    /// Failed to create the Tokio runtime.
    Runtime(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Boundaries(e) => write!(f, "Failed to load boundaries: {}", e),
            CliError::Coordinate(e) => write!(f, "Invalid coordinate: {}", e),
            CliError::UnknownDestination(name) => write!(
                f,
                "Unknown destination '{}'. Use 'campusnav destinations' to list them.",
                name
            ),
            CliError::Track { path, message } => {
                write!(f, "Invalid track file {}: {}", path.display(), message)
            }
            CliError::Tracking(e) => write!(f, "Tracking failed: {}", e),
            CliError::Logging(e) => write!(f, "Failed to initialize logging: {}", e),
            CliError::Runtime(msg) => write!(f, "Failed to create Tokio runtime: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Boundaries(e) => Some(e),
            CliError::Coordinate(e) => Some(e),
            CliError::Tracking(e) => Some(e),
            CliError::Logging(e) => Some(e),
            CliError::Config(_)
            | CliError::UnknownDestination(_)
            | CliError::Track { .. }
            | CliError::Runtime(_) => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<GeofenceError> for CliError {
    fn from(e: GeofenceError) -> Self {
        CliError::Boundaries(e)
    }
}

impl From<CoordError> for CliError {
    fn from(e: CoordError) -> Self {
        CliError::Coordinate(e)
    }
}

impl From<TrackingError> for CliError {
    fn from(e: TrackingError) -> Self {
        CliError::Tracking(e)
    }
}

impl From<LoggingError> for CliError {
    fn from(e: LoggingError) -> Self {
        CliError::Logging(e)
    }
}
