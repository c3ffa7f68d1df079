//! Geographic point type

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

use crate::error::{ZoneError, ZoneResult};

/// A longitude/latitude position in degrees
///
/// Serialized as a `[lon, lat]` pair, the same order map surfaces use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Check that both components are finite and inside the lon/lat ranges
    pub fn is_valid(&self) -> bool {
        self.lon.is_finite()
            && self.lat.is_finite()
            && (-180.0..=180.0).contains(&self.lon)
            && (-90.0..=90.0).contains(&self.lat)
    }

    /// Canonical form of a valid point, otherwise `InvalidCoordinate`
    ///
    /// Longitude 180 becomes -180 and a pole gets longitude 0, so two
    /// validated points are equal exactly when their distance is 0.
    pub fn validated(self) -> ZoneResult<Self> {
        if self.is_valid() {
            let lon = if self.lat.abs() == 90.0 {
                0.0
            } else if self.lon == 180.0 {
                -180.0
            } else {
                self.lon
            };
            Ok(Self::new(lon, self.lat))
        } else {
            Err(ZoneError::InvalidCoordinate {
                lon: self.lon,
                lat: self.lat,
            })
        }
    }

    /// Degree delta from `self` to `other` (x = lon, y = lat)
    pub fn delta_to(&self, other: GeoPoint) -> DVec2 {
        other.as_dvec2() - self.as_dvec2()
    }

    /// Shift by a degree delta. The result is not validated.
    pub fn offset(&self, delta: DVec2) -> GeoPoint {
        GeoPoint::from(self.as_dvec2() + delta)
    }

    pub fn as_dvec2(&self) -> DVec2 {
        DVec2::new(self.lon, self.lat)
    }

    /// Unit vector on the sphere (x toward lon 0, z toward the north pole)
    pub(crate) fn to_unit_vector(self) -> DVec3 {
        let lon = self.lon.to_radians();
        let lat = self.lat.to_radians();
        DVec3::new(lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin())
    }

    pub(crate) fn from_unit_vector(v: DVec3) -> Self {
        let v = v.normalize();
        let lat = v.z.clamp(-1.0, 1.0).asin();
        let lon = v.y.atan2(v.x);
        Self::new(lon.to_degrees(), lat.to_degrees())
    }
}

impl From<DVec2> for GeoPoint {
    fn from(v: DVec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<[f64; 2]> for GeoPoint {
    fn from([lon, lat]: [f64; 2]) -> Self {
        Self::new(lon, lat)
    }
}

impl From<GeoPoint> for [f64; 2] {
    fn from(p: GeoPoint) -> Self {
        [p.lon, p.lat]
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:.6}, {:.6}]", self.lon, self.lat)
    }
}
