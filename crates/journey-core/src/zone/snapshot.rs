//! Immutable zone snapshots and the query view handed to the backend layer

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

use super::{Zone, ZoneRole};

/// Owned copy of both zones at one store revision
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneSnapshot {
    pub revision: u64,
    pub source: Zone,
    pub destination: Zone,
}

impl ZoneSnapshot {
    pub fn zone(&self, role: ZoneRole) -> &Zone {
        match role {
            ZoneRole::Source => &self.source,
            ZoneRole::Destination => &self.destination,
        }
    }

    /// The `{source, destination}` circles a journey query is built from
    pub fn query(&self) -> JourneyQuery {
        JourneyQuery {
            source: CircleQuery::from(&self.source),
            destination: CircleQuery::from(&self.destination),
        }
    }
}

/// One circle of a journey query
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircleQuery {
    pub center: GeoPoint,
    pub radius_km: f64,
}

impl From<&Zone> for CircleQuery {
    fn from(zone: &Zone) -> Self {
        Self {
            center: zone.center(),
            radius_km: zone.radius_km(),
        }
    }
}

/// Trips starting in `source` and ending in `destination`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JourneyQuery {
    pub source: CircleQuery,
    pub destination: CircleQuery,
}

impl JourneyQuery {
    /// Endpoint path understood by the journey backend
    pub const ENDPOINT: &'static str = "/journey_query";

    /// GET parameters in the backend's naming
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("src_lat", self.source.center.lat.to_string()),
            ("src_long", self.source.center.lon.to_string()),
            ("src_radius", self.source.radius_km.to_string()),
            ("dst_lat", self.destination.center.lat.to_string()),
            ("dst_long", self.destination.center.lon.to_string()),
            ("dst_radius", self.destination.radius_km.to_string()),
        ]
    }

    /// Request path with the query string attached
    pub fn request_path(&self) -> String {
        let params: Vec<String> = self
            .query_params()
            .into_iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect();
        format!("{}?{}", Self::ENDPOINT, params.join("&"))
    }
}
