//! campusnav - geofenced arrival detection for campus navigation
//!
//! Tracks a user's live position during navigation and reports arrival when
//! a position falls inside the selected destination's boundary polygon.
//!
//! # Modules
//!
//! - [`coord`] - coordinates, headings and distance helpers
//! - [`geofence`] - boundary polygons, the destination registry and the evaluator
//! - [`proximity`] - arrival event channel
//! - [`tracking`] - location subscriptions, throttling and observable state
//! - [`config`] - INI configuration file
//! - [`logging`] - `tracing` subscriber setup
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use campusnav::geofence::{BoundaryRegistry, GeofenceEvaluator};
//! use campusnav::proximity::ProximityNotifier;
//! use campusnav::tracking::{LocationTracker, TrackingRequest};
//!
//! let registry = Arc::new(BoundaryRegistry::campus_default()?);
//! let tracker = LocationTracker::new(provider, GeofenceEvaluator::new(registry));
//!
//! let (notifier, mut arrivals) = ProximityNotifier::channel();
//! tracker.reconcile(TrackingRequest::navigate("NIE Admin", notifier)).await;
//!
//! if let Some(event) = arrivals.recv().await {
//!     println!("Arrived at {}", event.destination);
//! }
//! ```

pub mod config;
pub mod coord;
pub mod geofence;
pub mod logging;
pub mod proximity;
pub mod tracking;

pub use coord::{Coordinate, Heading};
pub use geofence::{BoundaryRegistry, GeofenceEvaluator};
pub use proximity::{ProximityEvent, ProximityNotifier, ProximityReceiver};
pub use tracking::{LocationTracker, TrackingRequest, TrackingStatus};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
