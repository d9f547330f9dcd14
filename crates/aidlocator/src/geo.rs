//! Great-circle distance on a spherical Earth.
use serde::{Deserialize, Serialize};

/// Mean Earth radius used by the haversine formula, in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Position used when no better location is known (San Rafael, CA).
pub const DEFAULT_COORDINATE: Coordinate = Coordinate {
    latitude: 37.9735,
    longitude: -122.5311,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Finite and within the WGS84 latitude/longitude ranges.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    pub fn distance_km(&self, other: &Self) -> f64 {
        distance_km(
            self.latitude,
            self.longitude,
            other.latitude,
            other.longitude,
        )
    }
}

pub fn to_radians(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

/// Haversine distance between two points in kilometres.
///
/// NaN inputs propagate to a NaN result.
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = to_radians(lat2 - lat1);
    let d_lon = to_radians(lon2 - lon1);
    let a = (d_lat / 2.0).sin().powi(2)
        + to_radians(lat1).cos() * to_radians(lat2).cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_distance() {
        assert_eq!(distance_km(37.9735, -122.5311, 37.9735, -122.5311), 0.0);
        assert_eq!(distance_km(-33.86, 151.2, -33.86, 151.2), 0.0);
    }

    #[test]
    fn test_symmetry() {
        let pairs = [
            (37.9735, -122.5311, 37.7749, -122.4194),
            (51.5074, -0.1278, 48.8566, 2.3522),
            (-33.8688, 151.2093, 35.6762, 139.6503),
            (0.0, 179.9, 0.0, -179.9),
        ];
        for (a, b, c, d) in pairs {
            let forward = distance_km(a, b, c, d);
            let backward = distance_km(c, d, a, b);
            assert!((forward - backward).abs() < 1e-9, "{forward} != {backward}");
        }
    }

    #[test]
    fn test_known_distances() {
        // San Rafael to San Francisco
        let d = distance_km(37.9735, -122.5311, 37.7749, -122.4194);
        assert!((d - 24.2).abs() < 0.5, "got {d}");

        // London to Paris
        let d = distance_km(51.5074, -0.1278, 48.8566, 2.3522);
        assert!((d - 343.5).abs() < 1.0, "got {d}");

        // One degree of latitude
        let d = distance_km(0.0, 0.0, 1.0, 0.0);
        assert!((d - 111.19).abs() < 0.01, "got {d}");
    }

    #[test]
    fn test_antimeridian_is_short() {
        let d = distance_km(0.0, 179.9, 0.0, -179.9);
        assert!(d < 25.0, "got {d}");
    }

    #[test]
    fn test_nan_propagates() {
        assert!(distance_km(f64::NAN, 0.0, 1.0, 1.0).is_nan());
    }

    #[test]
    fn test_coordinate_validation() {
        assert!(DEFAULT_COORDINATE.is_valid());
        assert!(!Coordinate::new(91.0, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, -180.5).is_valid());
        assert!(!Coordinate::new(f64::NAN, 0.0).is_valid());
    }
}
