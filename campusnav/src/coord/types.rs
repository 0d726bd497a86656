//! Geographic value types shared by the geofence and tracking modules.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum valid latitude in degrees.
pub const MIN_LAT: f64 = -90.0;

/// Maximum valid latitude in degrees.
pub const MAX_LAT: f64 = 90.0;

/// Minimum valid longitude in degrees.
pub const MIN_LON: f64 = -180.0;

/// Maximum valid longitude in degrees.
pub const MAX_LON: f64 = 180.0;

/// Errors that can occur when building coordinates from raw input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordError {
    /// Latitude outside [-90, 90] or not finite.
    #[error("Invalid latitude: {0} (must be between -90 and 90)")]
    InvalidLatitude(f64),

    /// Longitude outside [-180, 180] or not finite.
    #[error("Invalid longitude: {0} (must be between -180 and 180)")]
    InvalidLongitude(f64),

    /// Heading is NaN or infinite.
    #[error("Invalid heading: {0} (must be finite)")]
    InvalidHeading(f64),
}

/// A WGS84 position as reported by the location feed.
///
/// Coordinates are plain values: once a sample is emitted it is never
/// mutated, only replaced by the next one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl Coordinate {
    /// Create a coordinate without range checks.
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Create a coordinate, rejecting out-of-range or non-finite values.
    pub fn validated(latitude: f64, longitude: f64) -> Result<Self, CoordError> {
        if !latitude.is_finite() || !(MIN_LAT..=MAX_LAT).contains(&latitude) {
            return Err(CoordError::InvalidLatitude(latitude));
        }
        if !longitude.is_finite() || !(MIN_LON..=MAX_LON).contains(&longitude) {
            return Err(CoordError::InvalidLongitude(longitude));
        }
        Ok(Self::new(latitude, longitude))
    }

    /// Great-circle distance to another coordinate in meters.
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        super::haversine_distance_m(self, other)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

/// True-north heading in degrees, within `[0, 360)` for any finite input.
///
/// Platform readings are untrusted: build them with [`Heading::validated`].
/// The tracker drops non-finite headings before publishing.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Heading(f64);

impl Heading {
    /// Create a heading, wrapping the value into `[0, 360)`.
    ///
    /// NaN and infinities stay non-finite; see [`is_finite`](Self::is_finite).
    pub fn new(degrees: f64) -> Self {
        Self(super::normalize_heading(degrees))
    }

    /// Create a heading, rejecting NaN and infinities.
    pub fn validated(degrees: f64) -> Result<Self, CoordError> {
        if !degrees.is_finite() {
            return Err(CoordError::InvalidHeading(degrees));
        }
        Ok(Self::new(degrees))
    }

    /// Whether the heading holds a usable angle.
    pub fn is_finite(&self) -> bool {
        self.0.is_finite()
    }

    /// Heading in degrees.
    pub fn degrees(&self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Heading {
    type Error = CoordError;

    fn try_from(degrees: f64) -> Result<Self, Self::Error> {
        Self::validated(degrees)
    }
}

impl From<Heading> for f64 {
    fn from(heading: Heading) -> Self {
        heading.0
    }
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}°", self.0)
    }
}

/// A single position sample delivered by a location provider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionFix {
    /// Reported position.
    pub coordinate: Coordinate,
    /// Horizontal accuracy radius in meters, if the platform reports one.
    pub accuracy_m: Option<f64>,
}

impl PositionFix {
    /// Create a fix without accuracy information.
    pub fn new(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            accuracy_m: None,
        }
    }

    /// Whether the reported position is finite and in range.
    pub fn is_valid(&self) -> bool {
        Coordinate::validated(self.coordinate.latitude, self.coordinate.longitude).is_ok()
    }
}

impl From<Coordinate> for PositionFix {
    fn from(coordinate: Coordinate) -> Self {
        Self::new(coordinate)
    }
}

/// Geographic bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    /// Minimum (southernmost) latitude
    pub min_lat: f64,
    /// Maximum (northernmost) latitude
    pub max_lat: f64,
    /// Minimum (westernmost) longitude
    pub min_lon: f64,
    /// Maximum (easternmost) longitude
    pub max_lon: f64,
}

impl GeoBounds {
    /// Create a bounding box from a single point.
    pub fn from_point(lat: f64, lon: f64) -> Self {
        Self {
            min_lat: lat,
            max_lat: lat,
            min_lon: lon,
            max_lon: lon,
        }
    }

    /// Expand this bounding box to include a point.
    pub fn expand(&mut self, lat: f64, lon: f64) {
        self.min_lat = self.min_lat.min(lat);
        self.max_lat = self.max_lat.max(lat);
        self.min_lon = self.min_lon.min(lon);
        self.max_lon = self.max_lon.max(lon);
    }

    /// Whether a coordinate lies within the box (edges included).
    pub fn contains(&self, point: &Coordinate) -> bool {
        (self.min_lat..=self.max_lat).contains(&point.latitude)
            && (self.min_lon..=self.max_lon).contains(&point.longitude)
    }

    /// Get the center point of the bounds.
    pub fn center(&self) -> Coordinate {
        Coordinate::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }
}

impl fmt::Display for GeoBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "lat {:.6}..{:.6}, lon {:.6}..{:.6}",
            self.min_lat, self.max_lat, self.min_lon, self.max_lon
        )
    }
}
