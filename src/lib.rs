pub use cluster::{cluster, Cluster, ClusterList};
pub use error::{ErrorMapError, ErrorMapResult, InvalidCoordinate};
pub use filter::ErrorFilter;
pub use geo::{haversine_distance, GeoPoint, EARTH_RADIUS_KM};
pub use kml::{KmlFile, KmlWriter};
pub use marker::Marker;
pub use report::{markers_from_reports, ErrorReport};
pub use session::{ClusterEvent, ClusterSession, ClusterUpdate, ClusterWorker};
pub use system::System;
pub use viewport::{
    compute_cluster_radius, ClusterConfig, Region, Viewport, BASE_RADIUS_KM, MIN_LATITUDE_DELTA,
    REFERENCE_DELTA, SETTLE_TOLERANCE,
};

// Clustering is run from UI event handlers and worker threads alike.
static_assertions::assert_impl_all!(GeoPoint: Send, Sync, Copy);
static_assertions::assert_impl_all!(Marker: Send, Sync);
static_assertions::assert_impl_all!(Viewport: Send, Sync, Copy);
static_assertions::assert_impl_all!(Cluster: Send, Sync);
static_assertions::assert_impl_all!(ClusterList: Send, Sync);

/**************************************************************************************************
 * Private Implementation
 *************************************************************************************************/
mod cluster;
mod error;
mod filter;
mod geo;
mod kml;
mod marker;
mod report;
mod session;
mod system;
mod viewport;
