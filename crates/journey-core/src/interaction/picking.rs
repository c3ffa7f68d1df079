//! Resolve a map position to the zone feature under it

use crate::geo::{GeoPoint, geodesic_distance_km};
use crate::zone::{ZoneRole, ZoneStore};

use super::PointerTarget;

/// Find what lies under `position`
///
/// Only the active zone exposes its boundary handle, and it wins within
/// `tolerance_km` of the boundary. Otherwise the body of a containing zone
/// is returned, preferring the active zone and then the nearer center.
pub fn pick(store: &ZoneStore, position: GeoPoint, tolerance_km: f64) -> PointerTarget {
    if !position.is_valid() {
        return PointerTarget::none();
    }

    if let Some(active) = store.active_zone() {
        let zone = store.zone(active);
        let from_boundary = geodesic_distance_km(zone.center(), position) - zone.radius_km();
        if from_boundary.abs() <= tolerance_km {
            return PointerTarget::vertex(active);
        }
    }

    let active = store.active_zone();
    ZoneRole::ALL
        .into_iter()
        .filter(|role| store.zone(*role).contains(position))
        .min_by(|a, b| {
            let rank = |role: &ZoneRole| Some(*role) != active;
            let distance = |role: &ZoneRole| geodesic_distance_km(store.zone(*role).center(), position);
            rank(a)
                .cmp(&rank(b))
                .then(distance(a).total_cmp(&distance(b)))
        })
        .map(PointerTarget::body)
        .unwrap_or_default()
}
