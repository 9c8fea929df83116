/*!
 * A point on the map representing the location of one reported error.
 */
use crate::geo::GeoPoint;
use serde::{Deserialize, Serialize};

/// One reported error's location on the map.
///
/// Markers are rebuilt wholesale every time the error list is reloaded, they are never updated
/// in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    /// Where the error was reported.
    pub coordinate: GeoPoint,
    /// The title of the error report.
    pub title: String,
    /// The backend id of the error report, used to navigate to its details.
    pub error_id: Option<String>,
}

impl Marker {
    pub fn new<S: Into<String>>(coordinate: GeoPoint, title: S, error_id: Option<String>) -> Self {
        Marker {
            coordinate,
            title: title.into(),
            error_id,
        }
    }

    pub fn latitude(&self) -> f64 {
        self.coordinate.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.coordinate.longitude
    }
}
