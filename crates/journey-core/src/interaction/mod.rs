//! Pointer-driven zone editing
//!
//! Two mode controllers share one interface:
//! - [`SimpleSelectController`] handles the idle mode (hover, click to select,
//!   drag-start)
//! - [`DirectManipulationController`] handles a selected zone and active drags
//!   (move, resize, release, takeover)
//!
//! Controllers only decide. They read the store and return a [`Step`]; the
//! [`InteractionStateMachine`] commits the mutations and publishes.

mod direct;
mod machine;
mod picking;
mod simple_select;

pub use direct::DirectManipulationController;
pub use machine::{EventOutcome, InteractionStateMachine};
pub use picking::pick;
pub use simple_select::SimpleSelectController;

use serde::{Deserialize, Serialize};

use crate::error::ZoneResult;
use crate::geo::GeoPoint;
use crate::zone::{ZoneMutation, ZoneRole, ZoneStore};

/// Phase of a pointer event delivered by the drawing surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerPhase {
    Enter,
    Leave,
    Click,
    DragStart,
    Move,
    DragEnd,
}

/// What the pointer was over when the event fired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PointerTarget {
    #[serde(default)]
    pub zone: Option<ZoneRole>,
    /// The pointer is on the zone's boundary handle rather than its body
    #[serde(default)]
    pub is_vertex: bool,
}

impl PointerTarget {
    pub const fn none() -> Self {
        Self {
            zone: None,
            is_vertex: false,
        }
    }

    pub const fn body(role: ZoneRole) -> Self {
        Self {
            zone: Some(role),
            is_vertex: false,
        }
    }

    pub const fn vertex(role: ZoneRole) -> Self {
        Self {
            zone: Some(role),
            is_vertex: true,
        }
    }
}

/// A single pointer event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    #[serde(default)]
    pub target: PointerTarget,
    pub position: GeoPoint,
}

impl PointerEvent {
    pub fn new(phase: PointerPhase, target: PointerTarget, position: GeoPoint) -> Self {
        Self {
            phase,
            target,
            position,
        }
    }

    pub fn enter(role: ZoneRole, position: GeoPoint) -> Self {
        Self::new(PointerPhase::Enter, PointerTarget::body(role), position)
    }

    pub fn leave(role: Option<ZoneRole>, position: GeoPoint) -> Self {
        let target = PointerTarget {
            zone: role,
            is_vertex: false,
        };
        Self::new(PointerPhase::Leave, target, position)
    }

    pub fn click(target: PointerTarget, position: GeoPoint) -> Self {
        Self::new(PointerPhase::Click, target, position)
    }

    pub fn drag_start(target: PointerTarget, position: GeoPoint) -> Self {
        Self::new(PointerPhase::DragStart, target, position)
    }

    pub fn move_to(target: PointerTarget, position: GeoPoint) -> Self {
        Self::new(PointerPhase::Move, target, position)
    }

    pub fn drag_end(target: PointerTarget, position: GeoPoint) -> Self {
        Self::new(PointerPhase::DragEnd, target, position)
    }
}

/// What a drag session changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DragKind {
    /// Translate the whole zone
    MoveWhole,
    /// Drag the boundary handle to change the radius
    ResizeRadius,
}

/// Interaction mode of the editor
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    /// A zone is in direct-manipulation mode with its handles visible
    Selected(ZoneRole),
    /// A drag session is running
    Dragging {
        zone: ZoneRole,
        kind: DragKind,
        /// Last pointer position committed by this session
        anchor: GeoPoint,
    },
}

impl InteractionState {
    pub fn name(&self) -> &'static str {
        match self {
            InteractionState::Idle => "Idle",
            InteractionState::Selected(_) => "Selected",
            InteractionState::Dragging {
                kind: DragKind::MoveWhole,
                ..
            } => "Dragging(MoveWhole)",
            InteractionState::Dragging {
                kind: DragKind::ResizeRadius,
                ..
            } => "Dragging(ResizeRadius)",
        }
    }

    /// Zone that is selected or being dragged
    pub fn focused_zone(&self) -> Option<ZoneRole> {
        match self {
            InteractionState::Idle => None,
            InteractionState::Selected(zone) | InteractionState::Dragging { zone, .. } => {
                Some(*zone)
            }
        }
    }

    pub fn dragging(&self) -> Option<(ZoneRole, DragKind)> {
        match self {
            InteractionState::Dragging { zone, kind, .. } => Some((*zone, *kind)),
            _ => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging().is_some()
    }
}

/// Why an event was dropped without touching the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Move or drag-end for a zone that is not being dragged
    StaleEvent,
    /// Hover or click while a drag is running
    DragInProgress,
}

/// A controller's decision for one event
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// Store writes, applied in order and all-or-nothing
    pub mutations: Vec<ZoneMutation>,
    /// Mode after the writes commit
    pub next: InteractionState,
    /// Resize handle position to show after this event
    pub handle: Option<GeoPoint>,
}

impl Transition {
    pub fn to(next: InteractionState) -> Self {
        Self {
            mutations: Vec::new(),
            next,
            handle: None,
        }
    }

    pub fn with(mut self, mutation: ZoneMutation) -> Self {
        self.mutations.push(mutation);
        self
    }

    pub fn with_handle(mut self, handle: GeoPoint) -> Self {
        self.handle = Some(handle);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Transition(Transition),
    Ignore(IgnoreReason),
}

impl From<Transition> for Step {
    fn from(transition: Transition) -> Self {
        Step::Transition(transition)
    }
}

/// One interaction mode
pub trait ModeController {
    /// Name used in logs
    fn name(&self) -> &'static str;

    /// Whether this controller is responsible for `state`
    fn handles(&self, state: &InteractionState) -> bool;

    /// Decide how to react to `event` in `state`. Must not assume the
    /// returned mutations will be committed.
    fn on_pointer_event(
        &self,
        state: &InteractionState,
        event: &PointerEvent,
        store: &ZoneStore,
    ) -> ZoneResult<Step>;
}

/// Hover bookkeeping shared by the idle and selected modes
///
/// `Leave` with no target means the pointer left the map entirely.
pub(crate) fn hover_step(
    state: &InteractionState,
    event: &PointerEvent,
    store: &ZoneStore,
) -> Transition {
    let mut transition = Transition::to(*state);
    match (event.phase, event.target.zone) {
        (PointerPhase::Enter, Some(zone)) if state.focused_zone() != Some(zone) => {
            transition = transition.with(ZoneMutation::SetHovered {
                role: zone,
                hovered: true,
            });
        }
        (PointerPhase::Leave, Some(zone)) => {
            transition = transition.with(ZoneMutation::SetHovered {
                role: zone,
                hovered: false,
            });
        }
        (PointerPhase::Leave, None) => {
            for role in ZoneRole::ALL {
                if store.zone(role).is_hovered() {
                    transition = transition.with(ZoneMutation::SetHovered {
                        role,
                        hovered: false,
                    });
                }
            }
        }
        _ => {}
    }
    transition
}

/// Start a drag on the event's target, releasing whatever zone held focus
///
/// A drag-start with no zone under the pointer belongs to the map (panning)
/// and leaves the mode unchanged.
pub(crate) fn drag_start_step(
    state: &InteractionState,
    event: &PointerEvent,
    store: &ZoneStore,
) -> ZoneResult<Transition> {
    let Some(zone) = event.target.zone else {
        return Ok(Transition::to(*state));
    };
    let anchor = event.position.validated()?;
    let kind = if event.target.is_vertex {
        DragKind::ResizeRadius
    } else {
        DragKind::MoveWhole
    };

    let mut transition = Transition::to(InteractionState::Dragging { zone, kind, anchor });
    if store.zone(zone.other()).is_active() {
        transition = transition.with(ZoneMutation::SetActive {
            role: zone.other(),
            active: false,
        });
    }
    transition = transition.with(ZoneMutation::SetActive {
        role: zone,
        active: true,
    });
    if store.zone(zone).is_hovered() {
        transition = transition.with(ZoneMutation::SetHovered {
            role: zone,
            hovered: false,
        });
    }
    Ok(transition)
}

/// Select `zone`, deselecting the other one if needed
pub(crate) fn select_step(zone: ZoneRole, store: &ZoneStore) -> Transition {
    let mut transition = Transition::to(InteractionState::Selected(zone));
    if store.zone(zone.other()).is_active() {
        transition = transition.with(ZoneMutation::SetActive {
            role: zone.other(),
            active: false,
        });
    }
    transition = transition.with(ZoneMutation::SetActive {
        role: zone,
        active: true,
    });
    if store.zone(zone).is_hovered() {
        transition = transition.with(ZoneMutation::SetHovered {
            role: zone,
            hovered: false,
        });
    }
    transition
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ZoneConfig;

    fn store() -> ZoneStore {
        ZoneStore::new(ZoneConfig::default()).unwrap()
    }

    fn here() -> GeoPoint {
        GeoPoint::new(-74.0, 40.72)
    }

    #[test]
    fn test_state_accessors() {
        let dragging = InteractionState::Dragging {
            zone: ZoneRole::Source,
            kind: DragKind::ResizeRadius,
            anchor: here(),
        };
        assert_eq!(dragging.focused_zone(), Some(ZoneRole::Source));
        assert_eq!(
            dragging.dragging(),
            Some((ZoneRole::Source, DragKind::ResizeRadius))
        );
        assert_eq!(dragging.name(), "Dragging(ResizeRadius)");
        assert!(!InteractionState::Selected(ZoneRole::Destination).is_dragging());
        assert_eq!(InteractionState::default(), InteractionState::Idle);
    }

    #[test]
    fn test_hover_skips_focused_zone() {
        let store = store();
        let state = InteractionState::Selected(ZoneRole::Source);

        let t = hover_step(&state, &PointerEvent::enter(ZoneRole::Source, here()), &store);
        assert!(t.mutations.is_empty());

        let t = hover_step(
            &state,
            &PointerEvent::enter(ZoneRole::Destination, here()),
            &store,
        );
        assert_eq!(
            t.mutations,
            vec![ZoneMutation::SetHovered {
                role: ZoneRole::Destination,
                hovered: true
            }]
        );
        assert_eq!(t.next, state);
    }

    #[test]
    fn test_leave_canvas_clears_all_hover() {
        let mut store = store();
        store.set_hovered(ZoneRole::Source, true);
        store.set_hovered(ZoneRole::Destination, true);

        let t = hover_step(&InteractionState::Idle, &PointerEvent::leave(None, here()), &store);
        assert_eq!(t.mutations.len(), 2);
    }

    #[test]
    fn test_drag_start_kind_from_target() {
        let store = store();
        let t = drag_start_step(
            &InteractionState::Idle,
            &PointerEvent::drag_start(PointerTarget::vertex(ZoneRole::Destination), here()),
            &store,
        )
        .unwrap();
        assert_eq!(
            t.next.dragging(),
            Some((ZoneRole::Destination, DragKind::ResizeRadius))
        );

        let t = drag_start_step(
            &InteractionState::Idle,
            &PointerEvent::drag_start(PointerTarget::none(), here()),
            &store,
        )
        .unwrap();
        assert_eq!(t.next, InteractionState::Idle);
        assert!(t.mutations.is_empty());
    }

    #[test]
    fn test_drag_start_rejects_bad_position() {
        let store = store();
        let result = drag_start_step(
            &InteractionState::Idle,
            &PointerEvent::drag_start(
                PointerTarget::body(ZoneRole::Source),
                GeoPoint::new(f64::NAN, 0.0),
            ),
            &store,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_event_deserializes_with_default_target() {
        let event: PointerEvent =
            ron::from_str("(phase: Leave, position: (-74.0, 40.7))").unwrap();
        assert_eq!(event.target, PointerTarget::none());
        assert_eq!(event.phase, PointerPhase::Leave);
    }
}
