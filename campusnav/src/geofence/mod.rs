//! Geofencing
//!
//! Decides whether a coordinate lies within a named destination's boundary
//! polygon and dispatches proximity events on arrival.
//!
//! # Components
//!
//! - [`BoundaryPolygon`] / [`is_inside`] - even-odd containment test
//! - [`BoundaryRegistry`] - destination name → polygon, loaded once
//! - [`GeofenceEvaluator`] - registry lookup + containment + dispatch
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use campusnav::geofence::{BoundaryRegistry, GeofenceEvaluator};
//!
//! let registry = Arc::new(BoundaryRegistry::campus_default()?);
//! let evaluator = GeofenceEvaluator::new(registry);
//! let arrived = evaluator.contains("NIE Admin", &here);
//! ```

mod evaluator;
mod polygon;
mod registry;

pub use evaluator::GeofenceEvaluator;
pub use polygon::{is_inside, BoundaryPolygon, PolygonError, MIN_VERTICES};
pub use registry::BoundaryRegistry;

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building or loading a boundary registry.
///
/// Evaluating against an unknown destination is not an error; see
/// [`GeofenceEvaluator::contains`].
#[derive(Debug, Error)]
pub enum GeofenceError {
    /// A destination's vertices do not form a valid polygon.
    #[error("Invalid boundary for '{name}': {source}")]
    InvalidPolygon {
        name: String,
        #[source]
        source: PolygonError,
    },

    /// The same destination name appears twice.
    #[error("Duplicate destination '{0}'")]
    DuplicateDestination(String),

    /// Registry file could not be read.
    #[error("Failed to read boundary file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Registry document is not valid JSON or has the wrong shape.
    #[error("Invalid boundary document: {0}")]
    Parse(#[from] serde_json::Error),
}
