//! Zone store: sole owner of the two zones and their connector

use crate::config::ZoneConfig;
use crate::error::{ZoneError, ZoneResult};
use crate::geo::{GeoPoint, clamp_radius, geodesic_distance_km, point_at_distance_km};

use super::{Connector, Zone, ZoneRole, ZoneSnapshot};

/// A single write to the store
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZoneMutation {
    SetCenter { role: ZoneRole, center: GeoPoint },
    SetRadius { role: ZoneRole, radius_km: f64 },
    SetActive { role: ZoneRole, active: bool },
    SetHovered { role: ZoneRole, hovered: bool },
}

impl ZoneMutation {
    pub fn role(&self) -> ZoneRole {
        match self {
            ZoneMutation::SetCenter { role, .. }
            | ZoneMutation::SetRadius { role, .. }
            | ZoneMutation::SetActive { role, .. }
            | ZoneMutation::SetHovered { role, .. } => *role,
        }
    }

    /// Whether this mutation can move a zone or change its size
    pub fn is_geometric(&self) -> bool {
        matches!(
            self,
            ZoneMutation::SetCenter { .. } | ZoneMutation::SetRadius { .. }
        )
    }
}

/// Which groups of fields a committed write actually changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreChanges {
    /// A center or radius changed; boundaries and connector were recomputed
    pub geometry: bool,
    /// An `is_active` flag changed
    pub active: bool,
    /// An `is_hovered` flag changed
    pub hover: bool,
}

impl StoreChanges {
    pub fn is_empty(&self) -> bool {
        !(self.geometry || self.active || self.hover)
    }

    /// Whether consumers of zone snapshots need to hear about this change
    pub fn needs_snapshot(&self) -> bool {
        self.geometry || self.active
    }
}

/// Owns both zones and the derived connector
///
/// All writes go through [`ZoneStore::apply`] (or the single-field helpers
/// built on it), which stages the batch on a copy, recomputes derived
/// geometry, and only then swaps the copy in.
#[derive(Debug, Clone)]
pub struct ZoneStore {
    config: ZoneConfig,
    zones: [Zone; 2],
    connector: Option<Connector>,
    revision: u64,
}

impl ZoneStore {
    /// Create both zones from their configured initial geometry
    ///
    /// The configuration is validated first, so a store never runs with a
    /// non-finite radius limit or a degenerate ring resolution.
    pub fn new(config: ZoneConfig) -> ZoneResult<Self> {
        config.validate()?;
        let zones = Self::initial_zones(&config)?;
        let connector = compute_connector(&zones[0], &zones[1])?;
        Ok(Self {
            config,
            zones,
            connector,
            revision: 0,
        })
    }

    fn initial_zones(config: &ZoneConfig) -> ZoneResult<[Zone; 2]> {
        let build = |role: ZoneRole| -> ZoneResult<Zone> {
            let initial = config.initial(role);
            let center = initial.center.validated()?;
            if initial.radius_km.is_nan() {
                return Err(ZoneError::InvalidRadius(initial.radius_km));
            }
            let radius_km = clamp_radius(initial.radius_km, config.max_radius_km);
            Ok(Zone::new(role, center, radius_km, config.polygon_segments))
        };
        Ok([build(ZoneRole::Source)?, build(ZoneRole::Destination)?])
    }

    pub fn config(&self) -> &ZoneConfig {
        &self.config
    }

    pub fn zone(&self, role: ZoneRole) -> &Zone {
        &self.zones[role.index()]
    }

    pub fn source(&self) -> &Zone {
        self.zone(ZoneRole::Source)
    }

    pub fn destination(&self) -> &Zone {
        self.zone(ZoneRole::Destination)
    }

    /// Connector between the zones, absent while they overlap or touch
    pub fn connector(&self) -> Option<Connector> {
        self.connector
    }

    /// Counter bumped by every committed change
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Zone currently marked active, if any
    pub fn active_zone(&self) -> Option<ZoneRole> {
        ZoneRole::ALL
            .into_iter()
            .find(|role| self.zone(*role).is_active())
    }

    /// Owned copy of both zones
    pub fn snapshot(&self) -> ZoneSnapshot {
        ZoneSnapshot {
            revision: self.revision,
            source: self.zones[0].clone(),
            destination: self.zones[1].clone(),
        }
    }

    /// Move a zone's center
    pub fn set_center(&mut self, role: ZoneRole, center: GeoPoint) -> ZoneResult<StoreChanges> {
        self.apply(&[ZoneMutation::SetCenter { role, center }])
    }

    /// Resize a zone; the stored radius is clamped into `[0, max_radius_km]`
    pub fn set_radius(&mut self, role: ZoneRole, radius_km: f64) -> ZoneResult<StoreChanges> {
        self.apply(&[ZoneMutation::SetRadius { role, radius_km }])
    }

    /// Toggle the active flag. Returns whether it changed.
    pub fn set_active(&mut self, role: ZoneRole, active: bool) -> bool {
        let changed = self.zones[role.index()].set_active(active);
        if changed {
            self.revision += 1;
        }
        changed
    }

    /// Toggle the hover flag. Returns whether it changed.
    pub fn set_hovered(&mut self, role: ZoneRole, hovered: bool) -> bool {
        let changed = self.zones[role.index()].set_hovered(hovered);
        if changed {
            self.revision += 1;
        }
        changed
    }

    /// Apply an ordered batch of mutations, all or nothing
    pub fn apply(&mut self, mutations: &[ZoneMutation]) -> ZoneResult<StoreChanges> {
        let segments = self.config.polygon_segments;
        let mut staged = self.zones.clone();
        let mut changes = StoreChanges::default();

        for mutation in mutations {
            let zone = &mut staged[mutation.role().index()];
            match *mutation {
                ZoneMutation::SetCenter { center, .. } => {
                    let center = center.validated()?;
                    if zone.center() != center {
                        zone.set_center(center, segments);
                        changes.geometry = true;
                    }
                }
                ZoneMutation::SetRadius { radius_km, .. } => {
                    if radius_km.is_nan() {
                        return Err(ZoneError::InvalidRadius(radius_km));
                    }
                    let radius_km = clamp_radius(radius_km, self.config.max_radius_km);
                    if zone.radius_km() != radius_km {
                        zone.set_radius(radius_km, segments);
                        changes.geometry = true;
                    }
                }
                ZoneMutation::SetActive { active, .. } => {
                    changes.active |= zone.set_active(active);
                }
                ZoneMutation::SetHovered { hovered, .. } => {
                    changes.hover |= zone.set_hovered(hovered);
                }
            }
        }

        if changes.is_empty() {
            return Ok(changes);
        }

        let connector = if changes.geometry {
            compute_connector(&staged[0], &staged[1]).inspect_err(|e| {
                tracing::error!("Connector recompute failed, store left unchanged: {}", e);
            })?
        } else {
            self.connector
        };

        self.zones = staged;
        self.connector = connector;
        self.revision += 1;
        Ok(changes)
    }

    /// Restore both zones to their configured initial geometry
    pub fn reset(&mut self) -> ZoneResult<()> {
        let zones = Self::initial_zones(&self.config)?;
        self.connector = compute_connector(&zones[0], &zones[1])?;
        self.zones = zones;
        self.revision += 1;
        tracing::debug!("Zones reset to initial geometry");
        Ok(())
    }
}

/// Connector between the facing boundary points, or `None` when the gap
/// between the circles is not positive
pub fn compute_connector(source: &Zone, destination: &Zone) -> ZoneResult<Option<Connector>> {
    let gap_km = geodesic_distance_km(source.center(), destination.center())
        - source.radius_km()
        - destination.radius_km();
    if gap_km <= 0.0 {
        return Ok(None);
    }

    let start = point_at_distance_km(source.center(), destination.center(), source.radius_km())?;
    let end = point_at_distance_km(destination.center(), source.center(), destination.radius_km())?;
    Ok(Some(Connector { start, end }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InitialZone;
    use crate::geo::destination;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn origin() -> GeoPoint {
        GeoPoint::new(-73.99, 40.73)
    }

    fn store_with(distance_km: f64, src_radius: f64, dst_radius: f64) -> ZoneStore {
        let config = ZoneConfig::default().with_zones(
            InitialZone::new(origin(), src_radius),
            InitialZone::new(destination(origin(), distance_km, 90.0), dst_radius),
        );
        ZoneStore::new(config).unwrap()
    }

    #[test]
    fn test_connector_present_when_separated() {
        let store = store_with(5.0, 1.0, 1.0);
        let connector = store.connector().expect("connector");
        assert_relative_eq!(connector.length_km(), 3.0, epsilon = 1e-9);
        assert_abs_diff_eq!(
            geodesic_distance_km(store.source().center(), connector.start),
            1.0,
            epsilon = 1e-9
        );
        assert_abs_diff_eq!(
            geodesic_distance_km(store.destination().center(), connector.end),
            1.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_connector_absent_when_overlapping() {
        let store = store_with(1.0, 1.0, 1.0);
        assert!(store.connector().is_none());
    }

    #[test]
    fn test_set_radius_clamps_idempotently() {
        let mut store = store_with(10.0, 1.0, 1.0);
        let changes = store.set_radius(ZoneRole::Source, 9.0).unwrap();
        assert!(changes.geometry);
        assert_eq!(store.source().radius_km(), 2.5);

        let again = store.set_radius(ZoneRole::Source, 9.0).unwrap();
        assert!(again.is_empty());
        assert_eq!(store.source().radius_km(), 2.5);

        store.set_radius(ZoneRole::Source, f64::INFINITY).unwrap();
        assert_eq!(store.source().radius_km(), 2.5);

        store.set_radius(ZoneRole::Source, -4.0).unwrap();
        assert_eq!(store.source().radius_km(), 0.0);
    }

    #[test]
    fn test_nan_radius_rejected() {
        let mut store = store_with(10.0, 1.0, 1.0);
        let err = store.set_radius(ZoneRole::Destination, f64::NAN).unwrap_err();
        assert!(matches!(err, ZoneError::InvalidRadius(_)));
        assert_eq!(store.destination().radius_km(), 1.0);
    }

    #[test]
    fn test_invalid_center_leaves_store_untouched() {
        let mut store = store_with(5.0, 1.0, 1.0);
        let before = store.snapshot();
        let connector = store.connector();

        let err = store
            .apply(&[
                ZoneMutation::SetRadius {
                    role: ZoneRole::Source,
                    radius_km: 2.0,
                },
                ZoneMutation::SetCenter {
                    role: ZoneRole::Source,
                    center: GeoPoint::new(0.0, 120.0),
                },
            ])
            .unwrap_err();

        assert!(matches!(err, ZoneError::InvalidCoordinate { .. }));
        assert_eq!(store.snapshot(), before);
        assert_eq!(store.connector(), connector);
    }

    #[test]
    fn test_set_center_recomputes_boundary_and_connector() {
        let mut store = store_with(5.0, 1.0, 1.0);
        let moved = destination(origin(), 1.0, 90.0);
        let changes = store.set_center(ZoneRole::Destination, moved).unwrap();

        assert!(changes.geometry);
        assert_eq!(store.destination().center(), moved);
        for p in store.destination().boundary() {
            assert_abs_diff_eq!(geodesic_distance_km(moved, *p), 1.0, epsilon = 1e-9);
        }
        assert!(store.connector().is_none());
    }

    #[test]
    fn test_flags_do_not_touch_geometry() {
        let mut store = store_with(5.0, 1.0, 1.0);
        let revision = store.revision();
        let changes = store
            .apply(&[
                ZoneMutation::SetActive {
                    role: ZoneRole::Source,
                    active: true,
                },
                ZoneMutation::SetHovered {
                    role: ZoneRole::Destination,
                    hovered: true,
                },
            ])
            .unwrap();

        assert!(!changes.geometry);
        assert!(changes.active && changes.hover);
        assert!(changes.needs_snapshot());
        assert_eq!(store.revision(), revision + 1);
        assert_eq!(store.active_zone(), Some(ZoneRole::Source));
        assert!(store.destination().is_hovered());
    }

    #[test]
    fn test_noop_batch_keeps_revision() {
        let mut store = store_with(5.0, 1.0, 1.0);
        let revision = store.revision();
        let center = store.source().center();
        let changes = store.set_center(ZoneRole::Source, center).unwrap();
        assert!(changes.is_empty());
        assert!(!store.set_hovered(ZoneRole::Source, false));
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut store = store_with(5.0, 1.0, 1.0);
        let snapshot = store.snapshot();
        store.set_radius(ZoneRole::Source, 2.0).unwrap();
        assert_eq!(snapshot.source.radius_km(), 1.0);
        assert_eq!(store.source().radius_km(), 2.0);
    }

    #[test]
    fn test_connector_monotonic_in_separation() {
        let mut store = store_with(0.5, 1.0, 1.0);
        let mut seen_present = false;
        for step in 0..60 {
            let distance = 0.5 + step as f64 * 0.1;
            let center = destination(origin(), distance, 90.0);
            store.set_center(ZoneRole::Destination, center).unwrap();
            let present = store.connector().is_some();
            assert!(!(seen_present && !present), "connector vanished at {distance} km");
            seen_present |= present;
        }
        assert!(seen_present);

        for step in (0..60).rev() {
            let distance = 0.5 + step as f64 * 0.1;
            let center = destination(origin(), distance, 90.0);
            let before = store.connector().is_some();
            store.set_center(ZoneRole::Destination, center).unwrap();
            let after = store.connector().is_some();
            assert!(before || !after, "connector appeared at {distance} km");
        }
    }

    #[test]
    fn test_reset_restores_initial_geometry() {
        let mut store = store_with(5.0, 1.0, 1.0);
        let initial = store.snapshot();
        store.set_radius(ZoneRole::Source, 2.0).unwrap();
        store.set_active(ZoneRole::Source, true);
        store.reset().unwrap();

        assert_eq!(store.source(), &initial.source);
        assert_eq!(store.destination(), &initial.destination);
        assert!(store.connector().is_some());
        assert!(store.revision() > initial.revision);
    }

    #[test]
    fn test_initial_radius_clamped() {
        let config = ZoneConfig::default()
            .with_max_radius_km(1.5)
            .with_zones(
                InitialZone::new(origin(), 4.0),
                InitialZone::new(destination(origin(), 20.0, 0.0), 1.0),
            );
        let store = ZoneStore::new(config).unwrap();
        assert_eq!(store.source().radius_km(), 1.5);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let err = ZoneStore::new(ZoneConfig::default().with_max_radius_km(f64::NAN)).unwrap_err();
        assert!(matches!(err, ZoneError::InvalidConfig(_)));

        let config = ZoneConfig {
            polygon_segments: 0,
            ..ZoneConfig::default()
        };
        let err = ZoneStore::new(config).unwrap_err();
        assert!(matches!(err, ZoneError::InvalidConfig(_)));
    }

    #[test]
    fn test_antimeridian_alias_is_same_center() {
        let mut store = store_with(5.0, 1.0, 1.0);
        store.set_center(ZoneRole::Source, GeoPoint::new(180.0, 10.0)).unwrap();
        assert_eq!(store.source().center(), GeoPoint::new(-180.0, 10.0));

        let changes = store
            .set_center(ZoneRole::Source, GeoPoint::new(-180.0, 10.0))
            .unwrap();
        assert!(changes.is_empty());
    }
}
