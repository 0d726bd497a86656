//! Distance/time rate limiting for position updates.

use std::time::Duration;

use tokio::time::Instant;

use super::options::TrackingOptions;
use crate::coord::Coordinate;

/// Decides which raw position fixes are forwarded.
///
/// The first fix always passes. After that a fix passes only when at least
/// `time_interval` has elapsed since the last forwarded fix and it is at
/// least `distance_interval_m` away from it.
#[derive(Debug, Clone)]
pub struct UpdateThrottle {
    time_interval: Duration,
    distance_interval_m: f64,
    last: Option<(Instant, Coordinate)>,
}

impl UpdateThrottle {
    /// Create a throttle from subscription options.
    pub fn new(options: &TrackingOptions) -> Self {
        Self {
            time_interval: options.time_interval,
            distance_interval_m: options.distance_interval_m,
            last: None,
        }
    }

    /// Whether the fix at `coordinate`, received at `now`, should be forwarded.
    ///
    /// Forwarded fixes become the new reference point.
    pub fn should_emit(&mut self, coordinate: Coordinate, now: Instant) -> bool {
        if let Some((at, previous)) = self.last {
            if now.saturating_duration_since(at) < self.time_interval {
                return false;
            }
            if self.distance_interval_m > 0.0
                && previous.distance_to(&coordinate) < self.distance_interval_m
            {
                return false;
            }
        }

        self.last = Some((now, coordinate));
        true
    }
}
