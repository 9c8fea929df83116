use crate::{
    cluster::{cluster, Cluster},
    marker::Marker,
    viewport::{ClusterConfig, Viewport},
};

/**
 * The clusters from one clustering pass along with the viewport and distance that produced them.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterList {
    /// The viewport the clusters were computed for.
    pub viewport: Viewport,
    /// The clustering distance derived from the viewport, kilometers.
    pub radius_km: f64,
    /// List of Cluster objects, in the order their seed markers appeared in the input.
    pub clusters: Vec<Cluster>,
}

impl ClusterList {
    /**
     * Cluster markers for display in a viewport.
     *
     * # Arguments
     * markers - the current markers, in load order.
     * viewport - the settled map region.
     * config - the parameters used to derive the clustering distance.
     */
    pub fn from_markers(markers: &[Marker], viewport: &Viewport, config: &ClusterConfig) -> Self {
        let radius_km = config.compute_cluster_radius(viewport.latitude_delta);
        let clusters = cluster(markers, radius_km);

        ClusterList {
            viewport: *viewport,
            radius_km,
            clusters,
        }
    }

    /// Total number of markers across all the clusters.
    pub fn total_markers(&self) -> usize {
        self.clusters.iter().map(Cluster::len).sum()
    }

    /// Number of clusters, not markers.
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    /// True when there were no markers to cluster.
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Iterate over the clusters whose centroid is inside the viewport they were computed for.
    pub fn visible(&self) -> impl Iterator<Item = &Cluster> {
        self.clusters
            .iter()
            .filter(move |c| self.viewport.contains(&c.centroid()))
    }
}
