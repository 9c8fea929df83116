/*!
 * Types and functions for working with clusters.
 *
 * A cluster is a group of markers close enough together at the current zoom level that they are
 * drawn as a single pin at their centroid.
 */

pub use cluster::{cluster, Cluster};
pub use cluster_list::ClusterList;

mod cluster;
mod cluster_list;
