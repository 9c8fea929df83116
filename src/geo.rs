/*!
 * Geographic calculations.
 *
 * Only the simple (spherical Earth) calculations needed to group markers on a map live here.
 */
use crate::error::InvalidCoordinate;
use serde::{Deserialize, Serialize};

/// Mean radius of the Earth used for all distance calculations.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude / longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a new point, no checking is done.
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        GeoPoint {
            latitude,
            longitude,
        }
    }

    /// Create a point, rejecting NaN, infinite, and out of range values.
    pub fn checked(latitude: f64, longitude: f64) -> Result<Self, InvalidCoordinate> {
        let pnt = GeoPoint::new(latitude, longitude);
        if pnt.is_valid() {
            Ok(pnt)
        } else {
            Err(InvalidCoordinate {
                latitude,
                longitude,
            })
        }
    }

    /// Is this a coordinate that can be placed on the globe?
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Great circle distance to another point in kilometers.
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        haversine_distance(*self, *other)
    }

    /// Are these two points within eps degrees of each other in both directions?
    pub fn is_close(&self, other: &GeoPoint, eps: f64) -> bool {
        (self.latitude - other.latitude).abs() < eps
            && (self.longitude - other.longitude).abs() < eps
    }
}

/**
 * The haversine great circle distance.
 *
 * # Arguments
 * * a - the first point, degrees.
 * * b - the second point, degrees.
 *
 * # Returns
 * The distance between the points in kilometers.
 */
pub fn haversine_distance(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1_r = a.latitude.to_radians();
    let lat2_r = b.latitude.to_radians();

    let dlat2 = (b.latitude - a.latitude).to_radians() / 2.0;
    let dlon2 = (b.longitude - a.longitude).to_radians() / 2.0;

    let sin_dlat = f64::sin(dlat2);
    let sin_dlon = f64::sin(dlon2);

    // Keep the cosine product grouped so the result is symmetric in its arguments.
    let h = sin_dlat * sin_dlat + sin_dlon * sin_dlon * (f64::cos(lat1_r) * f64::cos(lat2_r));

    // Rounding can push h a hair past 1.0 for antipodal points.
    let h = h.clamp(0.0, 1.0);

    let arc = 2.0 * f64::atan2(f64::sqrt(h), f64::sqrt(1.0 - h));

    arc * EARTH_RADIUS_KM
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_distance_to_self_is_zero() {
        let pnts = [
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(63.4186, 10.4059),
            GeoPoint::new(-45.5, -120.0),
            GeoPoint::new(90.0, 180.0),
        ];

        for p in pnts {
            assert_eq!(haversine_distance(p, p), 0.0);
        }
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = GeoPoint::new(63.4186, 10.4059);
        let b = GeoPoint::new(59.9139, 10.7522);

        let ab = haversine_distance(a, b);
        let ba = haversine_distance(b, a);

        assert!((ab - ba).abs() < 1.0e-12);
        // Trondheim to Oslo is about 390 km as the crow flies.
        assert!(ab > 380.0 && ab < 400.0, "{}", ab);
    }

    #[test]
    fn test_one_degree_on_equator() {
        let d = haversine_distance(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 1.0));
        let expected = EARTH_RADIUS_KM * std::f64::consts::PI / 180.0;

        assert!((d - expected).abs() < 1.0e-9);
    }

    #[test]
    fn test_antipodes() {
        let d = haversine_distance(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 180.0));

        assert!((d - EARTH_RADIUS_KM * std::f64::consts::PI).abs() < 1.0e-6);
    }

    #[test]
    fn test_checked_coordinates() {
        assert!(GeoPoint::checked(45.0, -120.0).is_ok());
        assert!(GeoPoint::checked(90.0, 180.0).is_ok());

        assert!(GeoPoint::checked(f64::NAN, 0.0).is_err());
        assert!(GeoPoint::checked(0.0, f64::INFINITY).is_err());
        assert!(GeoPoint::checked(90.5, 0.0).is_err());
        assert!(GeoPoint::checked(0.0, -180.5).is_err());
    }
}
