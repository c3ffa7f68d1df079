//! Idle mode: hover feedback, click-to-select, drag-start

use crate::error::ZoneResult;
use crate::zone::ZoneStore;

use super::{
    IgnoreReason, InteractionState, ModeController, PointerEvent, PointerPhase, Step, Transition,
    drag_start_step, hover_step, select_step,
};

/// Controller for the idle mode
#[derive(Debug, Default, Clone, Copy)]
pub struct SimpleSelectController;

impl ModeController for SimpleSelectController {
    fn name(&self) -> &'static str {
        "simple_select"
    }

    fn handles(&self, state: &InteractionState) -> bool {
        matches!(state, InteractionState::Idle)
    }

    fn on_pointer_event(
        &self,
        state: &InteractionState,
        event: &PointerEvent,
        store: &ZoneStore,
    ) -> ZoneResult<Step> {
        let step = match event.phase {
            PointerPhase::Enter | PointerPhase::Leave => hover_step(state, event, store).into(),
            PointerPhase::Click => match event.target.zone {
                Some(zone) => select_step(zone, store).into(),
                None => Transition::to(*state).into(),
            },
            PointerPhase::DragStart => drag_start_step(state, event, store)?.into(),
            PointerPhase::Move | PointerPhase::DragEnd => Step::Ignore(IgnoreReason::StaleEvent),
        };
        Ok(step)
    }
}
