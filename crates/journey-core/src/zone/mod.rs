//! Source and destination zones
//!
//! A zone is a circle on the map. Its boundary ring is derived from the
//! center and radius and is rebuilt by every write that touches either, so a
//! ring can never outlive the geometry that produced it.

mod snapshot;
mod store;

pub use snapshot::*;
pub use store::*;

use serde::{Deserialize, Serialize};

use crate::geo::{GeoPoint, circle_polygon, geodesic_distance_km};

/// Which of the two zones a value refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneRole {
    #[serde(rename = "src")]
    Source,
    #[serde(rename = "dst")]
    Destination,
}

impl ZoneRole {
    pub const ALL: [ZoneRole; 2] = [ZoneRole::Source, ZoneRole::Destination];

    /// Stable feature id used by drawing surfaces
    pub fn id(&self) -> &'static str {
        match self {
            ZoneRole::Source => "src",
            ZoneRole::Destination => "dst",
        }
    }

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            ZoneRole::Source => "Source",
            ZoneRole::Destination => "Destination",
        }
    }

    /// The other zone of the pair
    pub fn other(&self) -> ZoneRole {
        match self {
            ZoneRole::Source => ZoneRole::Destination,
            ZoneRole::Destination => ZoneRole::Source,
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            ZoneRole::Source => 0,
            ZoneRole::Destination => 1,
        }
    }
}

impl std::fmt::Display for ZoneRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// One circular zone
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    role: ZoneRole,
    center: GeoPoint,
    radius_km: f64,
    is_active: bool,
    is_hovered: bool,
    #[serde(skip)]
    boundary: Vec<GeoPoint>,
}

impl Zone {
    pub(crate) fn new(role: ZoneRole, center: GeoPoint, radius_km: f64, segments: usize) -> Self {
        Self {
            role,
            center,
            radius_km,
            is_active: false,
            is_hovered: false,
            boundary: circle_polygon(center, radius_km, segments),
        }
    }

    pub fn role(&self) -> ZoneRole {
        self.role
    }

    pub fn center(&self) -> GeoPoint {
        self.center
    }

    pub fn radius_km(&self) -> f64 {
        self.radius_km
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn is_hovered(&self) -> bool {
        self.is_hovered
    }

    /// Boundary ring for the current center and radius
    pub fn boundary(&self) -> &[GeoPoint] {
        &self.boundary
    }

    /// Whether `point` lies inside or on the circle
    pub fn contains(&self, point: GeoPoint) -> bool {
        geodesic_distance_km(self.center, point) <= self.radius_km
    }

    pub(crate) fn set_center(&mut self, center: GeoPoint, segments: usize) {
        self.center = center;
        self.boundary = circle_polygon(self.center, self.radius_km, segments);
    }

    pub(crate) fn set_radius(&mut self, radius_km: f64, segments: usize) {
        self.radius_km = radius_km;
        self.boundary = circle_polygon(self.center, self.radius_km, segments);
    }

    pub(crate) fn set_active(&mut self, active: bool) -> bool {
        let changed = self.is_active != active;
        self.is_active = active;
        changed
    }

    pub(crate) fn set_hovered(&mut self, hovered: bool) -> bool {
        let changed = self.is_hovered != hovered;
        self.is_hovered = hovered;
        changed
    }
}

/// Segment joining the facing boundary points of the two zones
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Connector {
    /// Point on the source boundary
    pub start: GeoPoint,
    /// Point on the destination boundary
    pub end: GeoPoint,
}

impl Connector {
    pub fn length_km(&self) -> f64 {
        geodesic_distance_km(self.start, self.end)
    }
}
