//! Platform location services seam.
//!
//! The host application implements [`LocationProvider`] on top of whatever
//! the platform offers (a mobile OS location manager, a GNSS receiver, a
//! replay file). The tracker only sees permission outcomes and two streams.
//!
//! # Subscriptions
//!
//! Each `watch_*` call returns the receiving half of a channel. Dropping the
//! receiver *is* releasing the subscription: providers must watch for the
//! closed channel and stop delivering (and release any OS listener) when it
//! happens.
//!
//! # Dyn Compatibility
//!
//! Methods return [`BoxFuture`] so the tracker can hold an
//! `Arc<dyn LocationProvider>`.

use std::future::Future;
use std::pin::Pin;

use tokio::sync::mpsc;

use super::error::TrackingError;
use super::options::TrackingOptions;
use crate::coord::{Heading, PositionFix};

/// Boxed future type for dyn-compatible async methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Outcome of a foreground location permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

/// Source of live position and heading samples.
pub trait LocationProvider: Send + Sync {
    /// Ask the platform for foreground location permission.
    fn request_permission(&self) -> BoxFuture<'_, PermissionStatus>;

    /// Subscribe to position updates.
    fn watch_position(
        &self,
        options: TrackingOptions,
    ) -> BoxFuture<'_, Result<mpsc::Receiver<PositionFix>, TrackingError>>;

    /// Subscribe to heading updates.
    fn watch_heading(&self) -> BoxFuture<'_, Result<mpsc::Receiver<Heading>, TrackingError>>;
}
