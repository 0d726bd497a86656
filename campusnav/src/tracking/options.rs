//! Location subscription options.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Default minimum movement between reported positions (meters).
pub const DEFAULT_DISTANCE_INTERVAL_M: f64 = 2.0;

/// Default minimum time between reported positions.
pub const DEFAULT_TIME_INTERVAL: Duration = Duration::from_millis(3000);

/// Requested accuracy tier for the platform position feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Accuracy {
    Lowest,
    Low,
    Balanced,
    #[default]
    High,
    Highest,
}

impl Accuracy {
    /// Config file spelling of this tier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Accuracy::Lowest => "lowest",
            Accuracy::Low => "low",
            Accuracy::Balanced => "balanced",
            Accuracy::High => "high",
            Accuracy::Highest => "highest",
        }
    }
}

impl fmt::Display for Accuracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Accuracy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lowest" => Ok(Accuracy::Lowest),
            "low" => Ok(Accuracy::Low),
            "balanced" => Ok(Accuracy::Balanced),
            "high" => Ok(Accuracy::High),
            "highest" => Ok(Accuracy::Highest),
            other => Err(format!(
                "unknown accuracy '{}' (expected lowest, low, balanced, high or highest)",
                other
            )),
        }
    }
}

/// Options passed to the provider when subscribing to positions.
///
/// The tracker also enforces the two intervals itself, so a provider that
/// ignores them still yields a bounded update rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackingOptions {
    /// Accuracy tier to request.
    pub accuracy: Accuracy,
    /// Minimum movement between updates in meters (0 disables).
    pub distance_interval_m: f64,
    /// Minimum time between updates (zero disables).
    pub time_interval: Duration,
}

impl Default for TrackingOptions {
    fn default() -> Self {
        Self {
            accuracy: Accuracy::High,
            distance_interval_m: DEFAULT_DISTANCE_INTERVAL_M,
            time_interval: DEFAULT_TIME_INTERVAL,
        }
    }
}

impl TrackingOptions {
    /// Set the accuracy tier.
    pub fn with_accuracy(mut self, accuracy: Accuracy) -> Self {
        self.accuracy = accuracy;
        self
    }

    /// Set the minimum movement between updates.
    pub fn with_distance_interval_m(mut self, meters: f64) -> Self {
        self.distance_interval_m = meters.max(0.0);
        self
    }

    /// Set the minimum time between updates.
    pub fn with_time_interval(mut self, interval: Duration) -> Self {
        self.time_interval = interval;
        self
    }

    /// Options that forward every sample (used for replay and tests).
    pub fn unthrottled() -> Self {
        Self::default()
            .with_distance_interval_m(0.0)
            .with_time_interval(Duration::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_campus_app() {
        let options = TrackingOptions::default();
        assert_eq!(options.accuracy, Accuracy::High);
        assert_eq!(options.distance_interval_m, 2.0);
        assert_eq!(options.time_interval, Duration::from_millis(3000));
    }

    #[test]
    fn test_accuracy_parse() {
        assert_eq!("HIGH".parse::<Accuracy>(), Ok(Accuracy::High));
        assert_eq!(" balanced ".parse::<Accuracy>(), Ok(Accuracy::Balanced));
        assert!("extreme".parse::<Accuracy>().is_err());
        for tier in [
            Accuracy::Lowest,
            Accuracy::Low,
            Accuracy::Balanced,
            Accuracy::High,
            Accuracy::Highest,
        ] {
            assert_eq!(tier.to_string().parse::<Accuracy>(), Ok(tier));
        }
    }

    #[test]
    fn test_negative_distance_clamped() {
        let options = TrackingOptions::default().with_distance_interval_m(-5.0);
        assert_eq!(options.distance_interval_m, 0.0);
    }

    #[test]
    fn test_unthrottled() {
        let options = TrackingOptions::unthrottled();
        assert_eq!(options.distance_interval_m, 0.0);
        assert_eq!(options.time_interval, Duration::ZERO);
    }
}
