//! Tracking error types.

use std::fmt;

use thiserror::Error;

/// Which platform feed a subscription belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    /// Position (latitude/longitude) updates.
    Position,
    /// Compass heading updates.
    Heading,
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamKind::Position => write!(f, "position"),
            StreamKind::Heading => write!(f, "heading"),
        }
    }
}

/// Errors that can occur while starting a tracking session.
///
/// Neither variant is retried automatically. A new attempt only happens on
/// the next session start.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackingError {
    /// Foreground location permission was refused.
    #[error("Location permission not granted")]
    PermissionDenied,

    /// The platform failed to establish a subscription.
    #[error("Failed to subscribe to {stream} updates: {reason}")]
    SubscriptionFailure { stream: StreamKind, reason: String },
}

impl TrackingError {
    /// Convenience constructor for subscription failures.
    pub fn subscription(stream: StreamKind, reason: impl Into<String>) -> Self {
        TrackingError::SubscriptionFailure {
            stream,
            reason: reason.into(),
        }
    }
}
