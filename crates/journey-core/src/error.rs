//! Error types for zone geometry and editing

use thiserror::Error;

use crate::config::ConfigError;

/// Errors raised while validating or mutating zone geometry
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ZoneError {
    #[error("Invalid coordinate: lon={lon}, lat={lat}")]
    InvalidCoordinate { lon: f64, lat: f64 },

    #[error("Invalid radius: {0} km")]
    InvalidRadius(f64),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Internal-consistency fault: a point was requested beyond the end of its path
    #[error("Distance {requested_km} km exceeds path length {length_km} km")]
    OutOfRangeDistance { requested_km: f64, length_km: f64 },
}

impl ZoneError {
    /// Whether this error means the engine itself is inconsistent, as opposed
    /// to a rejected user input
    pub fn is_internal_fault(&self) -> bool {
        matches!(self, ZoneError::OutOfRangeDistance { .. })
    }
}

impl From<ConfigError> for ZoneError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Invalid(msg) => ZoneError::InvalidConfig(msg),
            other => ZoneError::InvalidConfig(other.to_string()),
        }
    }
}

/// Result type for zone operations
pub type ZoneResult<T> = Result<T, ZoneError>;
