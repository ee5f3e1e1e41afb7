use crate::domain::AppState;
use crate::run::{RunEvent, RunPhase, RunState};
use restyle_core::ResultSlot;

use super::events::DomainEvent;

pub fn reduce(mut state: AppState, ev: DomainEvent) -> AppState {
    match ev {
        DomainEvent::ImageSelected { role, image } => state.selection.set(role, Some(image)),
        DomainEvent::ImageRemoved(role) => state.selection.set(role, None),

        DomainEvent::RunStarted { run_id, flow } => {
            state.run = RunState::starting(run_id, flow);
            state.generated = None;
            state.slots = ResultSlot::empty_set();
        }

        DomainEvent::Run { run_id: _, ev } => apply_run_event(&mut state, ev),

        DomainEvent::Reset => {
            state.run = RunState::idle();
            state.generated = None;
            state.slots = ResultSlot::empty_set();
        }

        DomainEvent::UserError(msg) => {
            state.run.error_message = Some(msg);
        }
    }
    state
}

fn apply_run_event(state: &mut AppState, ev: RunEvent) {
    // Phases only move forward; a finished run accepts nothing further.
    if !state.run.phase.is_busy() {
        return;
    }

    match ev {
        RunEvent::PromptsReady { prompts } => {
            state.slots = ResultSlot::from_prompts(&prompts);
        }

        RunEvent::SynthesisStarted => {
            state.run.phase = RunPhase::SynthesizingImages;
        }

        RunEvent::SingleImageReady { image } => {
            state.generated = Some(image);
            state.run.phase = RunPhase::Done;
        }

        RunEvent::ImagesReady { images } => {
            for (kind, image) in images {
                if let Some(slot) = state.slots.iter_mut().find(|s| s.kind == kind) {
                    slot.image = Some(image);
                }
            }
            state.run.phase = RunPhase::Done;
        }

        RunEvent::Failed { message } => {
            state.run.phase = RunPhase::Failed;
            state.run.error_message = Some(message);
            state.generated = None;
            state.slots = ResultSlot::empty_set();
        }
    }
}
