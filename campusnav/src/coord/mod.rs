//! Coordinate module
//!
//! Value types for positions, headings and bounding boxes, plus the distance
//! and angle helpers the tracker uses for rate limiting.

mod types;

pub use types::{
    CoordError, Coordinate, GeoBounds, Heading, PositionFix, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON,
};

/// Mean earth radius in meters (IUGG).
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance between two coordinates using the haversine formula.
///
/// Accurate to well under a meter at campus scale, which is all the
/// distance-interval throttle needs.
pub fn haversine_distance_m(a: &Coordinate, b: &Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

/// Wrap an angle in degrees into `[0, 360)`.
///
/// NaN and infinities come back as NaN.
#[inline]
pub fn normalize_heading(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round tiny negative inputs up to exactly 360.0
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_same_point_is_zero() {
        let p = Coordinate::new(12.2838, 76.6415);
        assert_eq!(haversine_distance_m(&p, &p), 0.0);
    }

    #[test]
    fn test_distance_one_degree_latitude() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(1.0, 0.0);
        let d = haversine_distance_m(&a, &b);
        // 1° of arc on a 6371 km sphere is ~111.195 km
        assert!((d - 111_195.0).abs() < 10.0, "got {}", d);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = Coordinate::new(12.283582, 76.641534);
        let b = Coordinate::new(12.281633, 76.640710);
        let ab = a.distance_to(&b);
        let ba = b.distance_to(&a);
        assert!((ab - ba).abs() < 1e-6);
        assert!(ab > 200.0 && ab < 300.0, "campus buildings ~235m apart, got {}", ab);
    }

    #[test]
    fn test_normalize_heading() {
        assert_eq!(normalize_heading(0.0), 0.0);
        assert!((normalize_heading(725.0) - 5.0).abs() < 1e-9);
        assert!((normalize_heading(-1.0) - 359.0).abs() < 1e-9);
        let tiny = normalize_heading(-1e-20);
        assert!((0.0..360.0).contains(&tiny));
        assert!(normalize_heading(f64::INFINITY).is_nan());
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_heading_always_in_range(deg in -10_000.0..10_000.0_f64) {
                let h = normalize_heading(deg);
                prop_assert!((0.0..360.0).contains(&h), "{} -> {}", deg, h);
            }

            #[test]
            fn test_distance_non_negative(
                lat1 in -89.0..89.0_f64,
                lon1 in -179.0..179.0_f64,
                lat2 in -89.0..89.0_f64,
                lon2 in -179.0..179.0_f64,
            ) {
                let d = haversine_distance_m(
                    &Coordinate::new(lat1, lon1),
                    &Coordinate::new(lat2, lon2),
                );
                prop_assert!(d >= 0.0);
                prop_assert!(d <= std::f64::consts::PI * EARTH_RADIUS_M + 1.0);
            }
        }
    }
}
