//! Location tracking
//!
//! Manages the platform position and heading subscriptions for one
//! navigation session and feeds every accepted position through the
//! geofence evaluator.
//!
//! # Architecture
//!
//! ```text
//! LocationProvider ──positions──► location task ──► UpdateThrottle
//!        │                                              │
//!        └──────headings──► heading task                ▼
//!                               │            LocationState.location
//!                               ▼                       │
//!                   LocationState.heading               ▼
//!                                          GeofenceEvaluator ──► ProximityNotifier
//! ```
//!
//! [`LocationTracker`] owns at most one session at a time. Starting a new
//! session (or reconciling to a different destination) stops the previous
//! one and waits for its tasks, so no stale event can arrive afterwards.

mod error;
mod options;
mod provider;
mod session;
mod simulated;
mod state;
mod throttle;
mod tracker;

pub use error::{StreamKind, TrackingError};
pub use options::{Accuracy, TrackingOptions, DEFAULT_DISTANCE_INTERVAL_M, DEFAULT_TIME_INTERVAL};
pub use provider::{BoxFuture, LocationProvider, PermissionStatus};
pub use simulated::{SimulatedProvider, SUBSCRIPTION_BUFFER};
pub use state::LocationState;
pub use throttle::UpdateThrottle;
pub use tracker::{LocationTracker, TrackingRequest, TrackingStatus};
