//! Render view of the zones for drawing surfaces

use serde::Serialize;
use serde_json::{Value, json};

use crate::geo::GeoPoint;
use crate::zone::{Connector, ZoneRole, ZoneStore};

/// Feature id of the connector line
pub const CONNECTOR_FEATURE_ID: &str = "trip_line";

/// One zone as drawn
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneFeature {
    pub role: ZoneRole,
    pub center: GeoPoint,
    pub radius_km: f64,
    /// Open boundary ring; the last vertex connects back to the first
    pub ring: Vec<GeoPoint>,
    pub active: bool,
    pub hovered: bool,
}

/// Everything a drawing surface needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderFeatures {
    pub zones: [ZoneFeature; 2],
    pub connector: Option<Connector>,
    /// Resize handle while a radius drag is running
    pub handle: Option<GeoPoint>,
}

impl RenderFeatures {
    pub fn from_store(store: &ZoneStore, handle: Option<GeoPoint>) -> Self {
        let feature = |role: ZoneRole| {
            let zone = store.zone(role);
            ZoneFeature {
                role,
                center: zone.center(),
                radius_km: zone.radius_km(),
                ring: zone.boundary().to_vec(),
                active: zone.is_active(),
                hovered: zone.is_hovered(),
            }
        };
        Self {
            zones: [feature(ZoneRole::Source), feature(ZoneRole::Destination)],
            connector: store.connector(),
            handle,
        }
    }

    pub fn zone(&self, role: ZoneRole) -> &ZoneFeature {
        &self.zones[role.index()]
    }

    /// GeoJSON `FeatureCollection` with closed polygon rings
    pub fn to_geojson(&self) -> Value {
        let mut features: Vec<Value> = self
            .zones
            .iter()
            .map(|zone| {
                let mut ring: Vec<[f64; 2]> = zone.ring.iter().map(|p| (*p).into()).collect();
                if let Some(first) = ring.first().copied() {
                    ring.push(first);
                }
                json!({
                    "type": "Feature",
                    "id": zone.role.id(),
                    "properties": {
                        "active": zone.active,
                        "hover": zone.hovered,
                        "center": zone.center,
                        "radiusKm": zone.radius_km,
                    },
                    "geometry": {"type": "Polygon", "coordinates": [ring]},
                })
            })
            .collect();

        if let Some(connector) = self.connector {
            features.push(json!({
                "type": "Feature",
                "id": CONNECTOR_FEATURE_ID,
                "properties": {"lengthKm": connector.length_km()},
                "geometry": {
                    "type": "LineString",
                    "coordinates": [connector.start, connector.end],
                },
            }));
        }

        if let Some(handle) = self.handle {
            let parent = self
                .zones
                .iter()
                .find(|zone| zone.active)
                .map(|zone| zone.role.id());
            features.push(json!({
                "type": "Feature",
                "properties": {"meta": "vertex", "parent": parent},
                "geometry": {"type": "Point", "coordinates": handle},
            }));
        }

        json!({"type": "FeatureCollection", "features": features})
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{InitialZone, ZoneConfig};
    use crate::geo::destination;

    fn store(distance_km: f64) -> ZoneStore {
        let origin = GeoPoint::new(-73.99, 40.73);
        let config = ZoneConfig {
            polygon_segments: 8,
            ..ZoneConfig::default()
        }
        .with_zones(
            InitialZone::new(origin, 1.0),
            InitialZone::new(destination(origin, distance_km, 45.0), 1.0),
        );
        ZoneStore::new(config).unwrap()
    }

    #[test]
    fn test_features_mirror_store() {
        let mut store = store(5.0);
        store.set_hovered(ZoneRole::Destination, true);
        let features = RenderFeatures::from_store(&store, None);

        assert_eq!(features.zone(ZoneRole::Source).ring.len(), 8);
        assert!(features.zone(ZoneRole::Destination).hovered);
        assert_eq!(features.connector, store.connector());
    }

    #[test]
    fn test_geojson_closes_rings() {
        let features = RenderFeatures::from_store(&store(5.0), None);
        let geojson = features.to_geojson();

        let items = geojson["features"].as_array().unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0]["id"], "src");
        let ring = items[0]["geometry"]["coordinates"][0].as_array().unwrap();
        assert_eq!(ring.len(), 9);
        assert_eq!(ring.first(), ring.last());
        assert_eq!(items[2]["id"], CONNECTOR_FEATURE_ID);
    }

    #[test]
    fn test_geojson_without_connector_with_handle() {
        let mut store = store(1.0);
        store.set_active(ZoneRole::Source, true);
        let handle = GeoPoint::new(-73.98, 40.73);
        let geojson = RenderFeatures::from_store(&store, Some(handle)).to_geojson();

        let items = geojson["features"].as_array().unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[2]["geometry"]["type"], "Point");
        assert_eq!(items[2]["properties"]["parent"], "src");
    }
}
