//! Direct manipulation of the selected zone: move, resize, release

use crate::error::ZoneResult;
use crate::geo::{GeoPoint, geodesic_distance_km, point_at_distance_km};
use crate::zone::{ZoneMutation, ZoneRole, ZoneStore};

use super::{
    DragKind, IgnoreReason, InteractionState, ModeController, PointerEvent, PointerPhase, Step,
    Transition, drag_start_step, hover_step, select_step,
};

/// Controller for a selected zone and for running drags
#[derive(Debug, Default, Clone, Copy)]
pub struct DirectManipulationController;

impl DirectManipulationController {
    fn on_selected(
        &self,
        state: &InteractionState,
        selected: ZoneRole,
        event: &PointerEvent,
        store: &ZoneStore,
    ) -> ZoneResult<Step> {
        let step = match event.phase {
            PointerPhase::Enter | PointerPhase::Leave => hover_step(state, event, store).into(),
            PointerPhase::Click => match event.target.zone {
                // clicking empty map releases the selection
                None => Transition::to(InteractionState::Idle)
                    .with(ZoneMutation::SetActive {
                        role: selected,
                        active: false,
                    })
                    .into(),
                Some(zone) if zone == selected => Transition::to(*state).into(),
                Some(zone) => select_step(zone, store).into(),
            },
            PointerPhase::DragStart => drag_start_step(state, event, store)?.into(),
            PointerPhase::Move | PointerPhase::DragEnd => Step::Ignore(IgnoreReason::StaleEvent),
        };
        Ok(step)
    }

    fn on_dragging(
        &self,
        state: &InteractionState,
        zone: ZoneRole,
        kind: DragKind,
        anchor: GeoPoint,
        event: &PointerEvent,
        store: &ZoneStore,
    ) -> ZoneResult<Step> {
        match event.phase {
            PointerPhase::Enter | PointerPhase::Leave | PointerPhase::Click => {
                Ok(Step::Ignore(IgnoreReason::DragInProgress))
            }
            // a new press on empty map means the previous one was released
            PointerPhase::DragStart if event.target.zone.is_none() => {
                tracing::debug!("Drag on {} ended by a press on the map", zone);
                Ok(Transition::to(InteractionState::Selected(zone))
                    .with(ZoneMutation::SetActive {
                        role: zone,
                        active: true,
                    })
                    .into())
            }
            PointerPhase::DragStart => {
                tracing::debug!(
                    "Drag on {} taken over by drag-start on {:?}",
                    zone,
                    event.target.zone
                );
                Ok(drag_start_step(state, event, store)?.into())
            }
            PointerPhase::Move | PointerPhase::DragEnd
                if event.target.zone.is_some_and(|target| target != zone) =>
            {
                Ok(Step::Ignore(IgnoreReason::StaleEvent))
            }
            PointerPhase::Move => {
                let pointer = event.position.validated()?;
                let transition = match kind {
                    DragKind::MoveWhole => move_whole(zone, anchor, pointer, store),
                    DragKind::ResizeRadius => resize_radius(zone, kind, pointer, store)?,
                };
                Ok(transition.into())
            }
            PointerPhase::DragEnd => Ok(Transition::to(InteractionState::Selected(zone))
                .with(ZoneMutation::SetActive {
                    role: zone,
                    active: true,
                })
                .into()),
        }
    }
}

/// Translate the zone by the pointer's lon/lat delta since the last commit
fn move_whole(zone: ZoneRole, anchor: GeoPoint, pointer: GeoPoint, store: &ZoneStore) -> Transition {
    let center = store.zone(zone).center().offset(anchor.delta_to(pointer));
    tracing::trace!("Move {} center to {}", zone, center);
    Transition::to(InteractionState::Dragging {
        zone,
        kind: DragKind::MoveWhole,
        anchor: pointer,
    })
    .with(ZoneMutation::SetCenter { role: zone, center })
}

/// Set the radius to the pointer's distance from the center
///
/// Past the maximum the radius stops and the handle is pinned on the ray
/// toward the pointer at the maximum distance.
fn resize_radius(
    zone: ZoneRole,
    kind: DragKind,
    pointer: GeoPoint,
    store: &ZoneStore,
) -> ZoneResult<Transition> {
    let center = store.zone(zone).center();
    let max_radius_km = store.config().max_radius_km;
    let candidate_km = geodesic_distance_km(center, pointer);

    let (radius_km, handle) = if candidate_km > max_radius_km {
        (
            max_radius_km,
            point_at_distance_km(center, pointer, max_radius_km)?,
        )
    } else {
        (candidate_km, pointer)
    };
    tracing::trace!(
        "Resize {} to {:.4} km (pointer at {:.4} km)",
        zone,
        radius_km,
        candidate_km
    );

    Ok(Transition::to(InteractionState::Dragging {
        zone,
        kind,
        anchor: pointer,
    })
    .with(ZoneMutation::SetRadius {
        role: zone,
        radius_km,
    })
    .with_handle(handle))
}

impl ModeController for DirectManipulationController {
    fn name(&self) -> &'static str {
        "direct_select"
    }

    fn handles(&self, state: &InteractionState) -> bool {
        !matches!(state, InteractionState::Idle)
    }

    fn on_pointer_event(
        &self,
        state: &InteractionState,
        event: &PointerEvent,
        store: &ZoneStore,
    ) -> ZoneResult<Step> {
        match *state {
            InteractionState::Selected(selected) => self.on_selected(state, selected, event, store),
            InteractionState::Dragging { zone, kind, anchor } => {
                self.on_dragging(state, zone, kind, anchor, event, store)
            }
            // not routed here; behave like an unselected map
            InteractionState::Idle => Ok(hover_step(state, event, store).into()),
        }
    }
}
