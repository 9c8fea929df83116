use crate::{
    geo::{haversine_distance, GeoPoint},
    marker::Marker,
};

/**
 * A group of markers drawn as a single pin.
 *
 * Clusters are recomputed from scratch on every clustering pass and never updated in place.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    /// The markers in this cluster, the seed marker first and the rest in input order.
    members: Vec<Marker>,
    /// Unweighted average of the member coordinates.
    centroid: GeoPoint,
}

impl Cluster {
    /// Build a cluster from its members, computing the centroid.
    ///
    /// Returns `None` if `members` is empty.
    pub fn from_members(members: Vec<Marker>) -> Option<Self> {
        if members.is_empty() {
            return None;
        }

        let mut lat_sum = 0.0;
        let mut lon_sum = 0.0;
        for m in &members {
            lat_sum += m.coordinate.latitude;
            lon_sum += m.coordinate.longitude;
        }

        let count = members.len() as f64;
        let centroid = GeoPoint::new(lat_sum / count, lon_sum / count);

        Some(Cluster { members, centroid })
    }

    /// The markers in this cluster.
    pub fn members(&self) -> &[Marker] {
        &self.members
    }

    /// The render position of this cluster.
    pub fn centroid(&self) -> GeoPoint {
        self.centroid
    }

    /// Number of markers in the cluster, never zero.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always false for clusters built by [cluster] or [Cluster::from_members].
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Is this a lone marker that gets drawn as itself rather than as a group?
    pub fn is_singleton(&self) -> bool {
        self.members.len() == 1
    }

    /// The error ids of the members, in member order, skipping members without one.
    ///
    /// This is the pick-one list shown when a multi-member cluster is selected.
    pub fn error_ids(&self) -> impl Iterator<Item = &str> {
        self.members.iter().filter_map(|m| m.error_id.as_deref())
    }

    /// Distance in kilometers from the centroid to the farthest member.
    pub fn extent_km(&self) -> f64 {
        self.members
            .iter()
            .map(|m| haversine_distance(self.centroid, m.coordinate))
            .fold(0.0, f64::max)
    }

    /// Consume the cluster and hand back the members.
    pub fn into_members(self) -> Vec<Marker> {
        self.members
    }
}

/**
 * Group markers into clusters.
 *
 * This is a greedy, single pass grouping. Each marker not yet assigned to a cluster seeds a new
 * one, and every other unassigned marker strictly closer than `radius_km` to that seed joins it.
 * Distances are only ever measured against the seed, so membership does not chain through other
 * members. The result depends on the input order.
 *
 * Every marker ends up in exactly one cluster, and the clusters come out in the order their seeds
 * appear in the input. A radius of zero (or negative, or NaN) leaves every marker on its own.
 *
 * # Arguments
 * markers - the markers to group.
 * radius_km - the clustering distance in kilometers.
 *
 * # Returns
 * The clusters, empty if there were no markers.
 */
pub fn cluster(markers: &[Marker], radius_km: f64) -> Vec<Cluster> {
    let mut clusters: Vec<Cluster> = vec![];
    let mut claimed = vec![false; markers.len()];

    for i in 0..markers.len() {
        if claimed[i] {
            continue;
        }

        claimed[i] = true;
        let seed = markers[i].coordinate;
        let mut cluster_members: Vec<Marker> = vec![markers[i].clone()];

        for j in 0..markers.len() {
            if claimed[j] {
                continue;
            }

            if haversine_distance(seed, markers[j].coordinate) < radius_km {
                claimed[j] = true;
                cluster_members.push(markers[j].clone());
            }
        }

        // There is always at least the seed in the group.
        if let Some(clust) = Cluster::from_members(cluster_members) {
            clusters.push(clust);
        }
    }

    log::debug!(
        "grouped {} markers into {} clusters (radius {:.3} km)",
        markers.len(),
        clusters.len(),
        radius_km
    );

    clusters
}
