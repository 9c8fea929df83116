/*!
 * The visible extent of the map and how it drives the clustering distance.
 */
use crate::geo::GeoPoint;
use serde::{Deserialize, Serialize};

/// Clustering distance in kilometers at the reference zoom level.
pub const BASE_RADIUS_KM: f64 = 0.06;
/// The latitude span (degrees) at which the clustering distance equals the base radius.
pub const REFERENCE_DELTA: f64 = 0.01;
/// Smallest latitude span accepted before it is clamped.
pub const MIN_LATITUDE_DELTA: f64 = 1.0e-6;
/// Relative change in latitude span that warrants re-clustering.
pub const SETTLE_TOLERANCE: f64 = 0.05;

/// The currently visible map region, as reported by the map view when a pan or zoom settles.
///
/// On the wire this is the flat region form, see [Region].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "Region", into = "Region")]
pub struct Viewport {
    /// Center of the visible region.
    pub center: GeoPoint,
    /// Visible latitude span in degrees.
    pub latitude_delta: f64,
    /// Visible longitude span in degrees.
    pub longitude_delta: f64,
}

/// The flat region record pushed by the map view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub latitude: f64,
    pub longitude: f64,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

impl From<Region> for Viewport {
    fn from(r: Region) -> Self {
        Viewport::new(
            GeoPoint::new(r.latitude, r.longitude),
            r.latitude_delta,
            r.longitude_delta,
        )
    }
}

impl From<Viewport> for Region {
    fn from(vp: Viewport) -> Self {
        Region {
            latitude: vp.center.latitude,
            longitude: vp.center.longitude,
            latitude_delta: vp.latitude_delta,
            longitude_delta: vp.longitude_delta,
        }
    }
}

impl Viewport {
    pub fn new(center: GeoPoint, latitude_delta: f64, longitude_delta: f64) -> Self {
        Viewport {
            center,
            latitude_delta,
            longitude_delta,
        }
    }

    /// Is the point inside the visible region?
    ///
    /// Longitude wrapping at the anti-meridian is taken into account.
    pub fn contains(&self, pnt: &GeoPoint) -> bool {
        let dlat = (pnt.latitude - self.center.latitude).abs();

        let mut dlon = (pnt.longitude - self.center.longitude).abs() % 360.0;
        if dlon > 180.0 {
            dlon = 360.0 - dlon;
        }

        dlat <= self.latitude_delta / 2.0 && dlon <= self.longitude_delta / 2.0
    }
}

/// Tunable parameters for turning a viewport into a clustering distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterConfig {
    /// Clustering distance in kilometers when the latitude span equals `reference_delta`.
    pub base_radius_km: f64,
    /// Reference latitude span in degrees.
    pub reference_delta: f64,
    /// Latitude spans at or below zero (or NaN) are clamped to this value.
    pub min_latitude_delta: f64,
    /// Relative change in latitude span considered material for re-clustering.
    pub settle_tolerance: f64,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        ClusterConfig {
            base_radius_km: BASE_RADIUS_KM,
            reference_delta: REFERENCE_DELTA,
            min_latitude_delta: MIN_LATITUDE_DELTA,
            settle_tolerance: SETTLE_TOLERANCE,
        }
    }
}

impl ClusterConfig {
    /**
     * Calculate the clustering distance for a viewport latitude span.
     *
     * The distance scales linearly with the span, so zooming out groups markers more
     * aggressively.
     *
     * # Arguments
     * * latitude_delta - the visible latitude span in degrees, should be positive.
     *
     * # Returns
     * The clustering distance in kilometers.
     */
    pub fn compute_cluster_radius(&self, latitude_delta: f64) -> f64 {
        let delta = self.clamp_latitude_delta(latitude_delta);
        self.base_radius_km * (delta / self.reference_delta)
    }

    /// Clamp degenerate spans so they never produce NaN or negative radii.
    pub fn clamp_latitude_delta(&self, latitude_delta: f64) -> f64 {
        if latitude_delta.is_nan() || latitude_delta < self.min_latitude_delta {
            log::warn!(
                "clamping latitude delta {} to {}",
                latitude_delta,
                self.min_latitude_delta
            );
            self.min_latitude_delta
        } else {
            latitude_delta
        }
    }

    /// Has the zoom level changed enough between these spans to re-cluster?
    pub fn is_material_change(&self, old_delta: f64, new_delta: f64) -> bool {
        let old_delta = self.clamp_latitude_delta(old_delta);
        let new_delta = self.clamp_latitude_delta(new_delta);

        (new_delta - old_delta).abs() > self.settle_tolerance * old_delta
    }
}

/// Calculate the clustering distance in kilometers using the default configuration.
pub fn compute_cluster_radius(latitude_delta: f64) -> f64 {
    ClusterConfig::default().compute_cluster_radius(latitude_delta)
}
