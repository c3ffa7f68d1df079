//! Event dispatcher: routes pointer events to the mode controllers and
//! commits their decisions

use crate::config::ZoneConfig;
use crate::error::ZoneResult;
use crate::geo::GeoPoint;
use crate::publish::{FeatureSink, RenderFeatures, SnapshotConsumer, SnapshotPublisher};
use crate::zone::{StoreChanges, ZoneRole, ZoneStore};

use super::{
    DirectManipulationController, IgnoreReason, InteractionState, ModeController, PointerEvent,
    PointerTarget, SimpleSelectController, Step, pick,
};

/// Result of feeding one event to the machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// The controller's transition was committed
    Applied {
        changes: StoreChanges,
        /// A snapshot went out to consumers
        published: bool,
    },
    /// The event was dropped; nothing changed
    Ignored(IgnoreReason),
}

impl EventOutcome {
    pub fn is_ignored(&self) -> bool {
        matches!(self, EventOutcome::Ignored(_))
    }

    pub fn published(&self) -> bool {
        matches!(self, EventOutcome::Applied { published: true, .. })
    }
}

/// The zone editor
///
/// Owns the store, the current mode, and the publisher. Each event runs
/// to completion before the next one is looked at.
#[derive(Debug)]
pub struct InteractionStateMachine {
    store: ZoneStore,
    state: InteractionState,
    select: SimpleSelectController,
    direct: DirectManipulationController,
    publisher: SnapshotPublisher,
    resize_handle: Option<GeoPoint>,
}

impl InteractionStateMachine {
    pub fn new(config: ZoneConfig) -> ZoneResult<Self> {
        let initially_selected = config.initially_selected;
        let mut store = ZoneStore::new(config)?;

        let state = match initially_selected {
            Some(role) => {
                store.set_active(role, true);
                InteractionState::Selected(role)
            }
            None => InteractionState::Idle,
        };

        tracing::info!("Zone editor ready in {} mode", state.name());
        Ok(Self {
            store,
            state,
            select: SimpleSelectController,
            direct: DirectManipulationController,
            publisher: SnapshotPublisher::new(),
            resize_handle: None,
        })
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn store(&self) -> &ZoneStore {
        &self.store
    }

    pub fn publisher(&self) -> &SnapshotPublisher {
        &self.publisher
    }

    pub fn subscribe(&mut self, consumer: impl SnapshotConsumer + 'static) {
        self.publisher.subscribe(consumer);
    }

    pub fn attach_sink(&mut self, sink: impl FeatureSink + 'static) {
        self.publisher.attach_sink(sink);
    }

    /// Handle shown while a radius drag runs
    pub fn resize_handle(&self) -> Option<GeoPoint> {
        self.resize_handle
    }

    pub fn features(&self) -> RenderFeatures {
        RenderFeatures::from_store(&self.store, self.resize_handle)
    }

    /// Resolve a map position with the configured tolerance
    pub fn pick(&self, position: GeoPoint) -> PointerTarget {
        pick(
            &self.store,
            position,
            self.store.config().vertex_pick_tolerance_km,
        )
    }

    /// Publish the current state so consumers can issue the first query
    pub fn announce(&mut self) {
        self.publisher.publish(&self.store.snapshot());
        self.publisher.render(&self.features());
    }

    /// Restore the configured zones and return to the initial mode
    pub fn reset(&mut self) -> ZoneResult<()> {
        self.store.reset()?;
        for role in ZoneRole::ALL {
            let selected = self.store.config().initially_selected == Some(role);
            self.store.set_active(role, selected);
            self.store.set_hovered(role, false);
        }
        self.state = match self.store.config().initially_selected {
            Some(role) => InteractionState::Selected(role),
            None => InteractionState::Idle,
        };
        self.resize_handle = None;
        self.announce();
        Ok(())
    }

    fn controller(&self) -> &dyn ModeController {
        match self.state {
            InteractionState::Idle => &self.select,
            InteractionState::Selected(_) | InteractionState::Dragging { .. } => &self.direct,
        }
    }

    /// Feed one pointer event
    ///
    /// On error nothing was committed and the mode is unchanged.
    pub fn handle_event(&mut self, event: &PointerEvent) -> ZoneResult<EventOutcome> {
        let controller = self.controller();
        debug_assert!(controller.handles(&self.state));

        let step = controller
            .on_pointer_event(&self.state, event, &self.store)
            .inspect_err(|e| {
                tracing::warn!("{} rejected {:?}: {}", controller.name(), event.phase, e);
            })?;

        let transition = match step {
            Step::Ignore(reason) => {
                tracing::trace!(
                    "Ignored {:?} on {:?} in {}: {:?}",
                    event.phase,
                    event.target.zone,
                    self.state.name(),
                    reason
                );
                return Ok(EventOutcome::Ignored(reason));
            }
            Step::Transition(transition) => transition,
        };

        let changes = self.store.apply(&transition.mutations).inspect_err(|e| {
            if e.is_internal_fault() {
                tracing::error!("Store rejected {:?}: {}", event.phase, e);
            } else {
                tracing::warn!("Store rejected {:?}: {}", event.phase, e);
            }
        })?;

        if transition.next.name() != self.state.name()
            || transition.next.focused_zone() != self.state.focused_zone()
        {
            tracing::debug!(
                "{} -> {} ({:?})",
                self.state.name(),
                transition.next.name(),
                transition.next.focused_zone()
            );
        }
        self.state = transition.next;

        let handle_changed = self.resize_handle != transition.handle;
        self.resize_handle = transition.handle;

        let published = changes.needs_snapshot();
        if published {
            self.publisher.publish(&self.store.snapshot());
        }
        if !changes.is_empty() || handle_changed {
            self.publisher.render(&self.features());
        }

        Ok(EventOutcome::Applied { changes, published })
    }
}
