//! Journey zones core
//!
//! Two circular zones on a map, a source and a destination, edited by
//! pointer gestures. The crate provides:
//! - Spherical geometry helpers (distance, bearing, destination, circle rings)
//! - The zone store and the connector between the zones
//! - The interaction state machine that turns pointer events into edits
//! - Snapshot and render-feature publishing for downstream consumers

pub mod config;
pub mod error;
pub mod geo;
pub mod interaction;
pub mod publish;
pub mod zone;

pub use config::{ConfigError, InitialZone, ZoneConfig};
pub use error::{ZoneError, ZoneResult};
pub use geo::GeoPoint;
pub use interaction::{
    DragKind, EventOutcome, InteractionState, InteractionStateMachine, PointerEvent, PointerPhase,
    PointerTarget,
};
pub use publish::{FeatureSink, RenderFeatures, SnapshotConsumer, SnapshotPublisher};
pub use zone::{Connector, JourneyQuery, Zone, ZoneRole, ZoneSnapshot, ZoneStore};
