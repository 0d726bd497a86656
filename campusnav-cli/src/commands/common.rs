//! Common setup shared across CLI commands.

use std::path::PathBuf;
use std::sync::Arc;

use campusnav::config::ConfigFile;
use campusnav::geofence::{BoundaryRegistry, GeofenceEvaluator};
use campusnav::logging::{init_logging, WorkerGuard};
use campusnav::tracking::TrackingOptions;
use tracing::warn;

use crate::error::CliError;

/// Loaded configuration, logging and boundary registry for one invocation.
pub struct CliContext {
    config: ConfigFile,
    registry: Arc<BoundaryRegistry>,
    _log_guard: Option<WorkerGuard>,
}

impl CliContext {
    /// Load config, start logging and load the boundary registry.
    ///
    /// `boundaries` takes precedence over `geofence.boundaries_file`.
    pub fn new(boundaries: Option<PathBuf>, verbose: bool) -> Result<Self, CliError> {
        let (config, config_error) = match ConfigFile::load() {
            Ok(config) => (config, None),
            Err(e) => (ConfigFile::default(), Some(e)),
        };

        let mut logging = config.logging.clone();
        if verbose {
            logging.level = "debug".to_string();
        }
        let log_guard = init_logging(&logging)?;

        if let Some(e) = config_error {
            warn!(error = %e, "Using default configuration");
        }

        let boundaries_file = boundaries.or_else(|| config.geofence.boundaries_file.clone());
        let registry = BoundaryRegistry::load_or_default(boundaries_file.as_deref())?;

        Ok(Self {
            config,
            registry: Arc::new(registry),
            _log_guard: log_guard,
        })
    }

    pub fn registry(&self) -> &BoundaryRegistry {
        &self.registry
    }

    /// Evaluator over the loaded registry.
    pub fn evaluator(&self) -> GeofenceEvaluator {
        GeofenceEvaluator::new(Arc::clone(&self.registry))
    }

    /// Subscription options from the `[tracking]` section.
    pub fn tracking_options(&self) -> TrackingOptions {
        TrackingOptions::from(&self.config)
    }

    /// Fail unless `name` is a registered destination.
    pub fn require_destination(&self, name: &str) -> Result<(), CliError> {
        if self.registry.contains(name) {
            Ok(())
        } else {
            Err(CliError::UnknownDestination(name.to_string()))
        }
    }
}
