/*!
 * Error reports as they come back from the backend.
 *
 * This is the data-loading boundary. Reports are decoded from the JSON returned by `GET /errors`
 * and turned into [Marker] values here, and malformed coordinates are rejected here so the
 * clustering code never has to deal with them.
 */
use crate::{error::InvalidCoordinate, geo::GeoPoint, marker::Marker, ErrorMapResult};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// One error report resource from the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Backend id, missing on reports that have not been stored yet.
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    /// Id of the image resource (`/images/{id}`).
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub system: String,
    #[serde(default)]
    pub subsystem: String,
    pub location: GeoPoint,
    /// Milliseconds since the Unix epoch.
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default)]
    pub resolved: bool,
    /// Id of the user that reported it (`/users/{id}`).
    #[serde(default)]
    pub user: String,
}

impl ErrorReport {
    /// Decode the body of a `GET /errors` response.
    pub fn parse_list(json: &str) -> ErrorMapResult<Vec<ErrorReport>> {
        let reports: Vec<ErrorReport> = serde_json::from_str(json)?;
        Ok(reports)
    }

    /// Read a saved `GET /errors` response from a file.
    pub fn load_list<P: AsRef<std::path::Path>>(path: P) -> ErrorMapResult<Vec<ErrorReport>> {
        let f = std::fs::File::open(path.as_ref())?;
        let reports: Vec<ErrorReport> = serde_json::from_reader(std::io::BufReader::new(f))?;
        Ok(reports)
    }

    /// When the error was reported, if the timestamp is representable.
    pub fn reported_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.timestamp).single()
    }

    /// Map this report to a map marker, validating the location.
    pub fn to_marker(&self) -> Result<Marker, InvalidCoordinate> {
        let coordinate = GeoPoint::checked(self.location.latitude, self.location.longitude)?;
        Ok(Marker::new(coordinate, self.title.clone(), self.id.clone()))
    }
}

/**
 * Build the markers for a list of reports.
 *
 * Reports with locations that can't be placed on the map are logged and skipped. Order is
 * preserved.
 */
pub fn markers_from_reports<'a, I>(reports: I) -> Vec<Marker>
where
    I: IntoIterator<Item = &'a ErrorReport>,
{
    reports
        .into_iter()
        .filter_map(|rpt| match rpt.to_marker() {
            Ok(m) => Some(m),
            Err(err) => {
                log::warn!(
                    "skipping report {:?} ({}): {}",
                    rpt.id.as_deref().unwrap_or("<no id>"),
                    rpt.title,
                    err
                );
                None
            }
        })
        .collect()
}
