//! Zone editor configuration
//!
//! Everything the editor treats as a constant (radius limit, ring resolution,
//! initial zones) lives here and is passed into the store and state machine
//! constructors, so independent editors can run side by side.

mod loader;

pub use loader::ConfigError;

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;
use crate::zone::ZoneRole;

/// Initial geometry of one zone
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct InitialZone {
    pub center: GeoPoint,
    pub radius_km: f64,
}

impl InitialZone {
    pub fn new(center: GeoPoint, radius_km: f64) -> Self {
        Self { center, radius_km }
    }
}

/// Complete zone editor configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ZoneConfig {
    /// Configuration format version
    pub version: u32,
    /// Upper bound for any zone radius
    pub max_radius_km: f64,
    /// Number of vertices in each boundary ring
    pub polygon_segments: usize,
    /// How close to a boundary a pointer must be to grab the resize handle
    pub vertex_pick_tolerance_km: f64,
    /// Zone opened in direct-manipulation mode at startup
    pub initially_selected: Option<ZoneRole>,
    pub source: InitialZone,
    pub destination: InitialZone,
}

impl Default for ZoneConfig {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            max_radius_km: 2.5,
            polygon_segments: 64,
            vertex_pick_tolerance_km: 0.05,
            initially_selected: None,
            source: InitialZone::new(GeoPoint::new(-74.00811876441851, 40.71602161602726), 0.7),
            destination: InitialZone::new(
                GeoPoint::new(-73.98468539999953, 40.75472153232781),
                1.2,
            ),
        }
    }
}

impl ZoneConfig {
    /// Current configuration version
    pub const CURRENT_VERSION: u32 = 1;

    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style override of the radius limit
    pub fn with_max_radius_km(mut self, max_radius_km: f64) -> Self {
        self.max_radius_km = max_radius_km;
        self
    }

    /// Builder-style override of both initial zones
    pub fn with_zones(mut self, source: InitialZone, destination: InitialZone) -> Self {
        self.source = source;
        self.destination = destination;
        self
    }

    /// Initial geometry for a role
    pub fn initial(&self, role: ZoneRole) -> InitialZone {
        match role {
            ZoneRole::Source => self.source,
            ZoneRole::Destination => self.destination,
        }
    }

    /// Check that every value is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.max_radius_km.is_finite() || self.max_radius_km <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "max_radius_km must be a positive number, got {}",
                self.max_radius_km
            )));
        }
        if self.polygon_segments < 3 {
            return Err(ConfigError::Invalid(format!(
                "polygon_segments must be at least 3, got {}",
                self.polygon_segments
            )));
        }
        if !self.vertex_pick_tolerance_km.is_finite() || self.vertex_pick_tolerance_km < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "vertex_pick_tolerance_km must be non-negative, got {}",
                self.vertex_pick_tolerance_km
            )));
        }
        for role in ZoneRole::ALL {
            let zone = self.initial(role);
            if !zone.center.is_valid() {
                return Err(ConfigError::Invalid(format!(
                    "{} center {} is out of range",
                    role.name(),
                    zone.center
                )));
            }
            if !zone.radius_km.is_finite() || zone.radius_km < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{} radius must be non-negative, got {}",
                    role.name(),
                    zone.radius_km
                )));
            }
        }
        Ok(())
    }
}
