use crate::domain::ImageRole;
use crate::run::{FlowKind, RunEvent, RunId};
use restyle_core::EncodedImage;

#[derive(Debug, Clone)]
pub enum DomainEvent {
    // Intake
    ImageSelected { role: ImageRole, image: EncodedImage },
    ImageRemoved(ImageRole),

    // Runs
    RunStarted { run_id: RunId, flow: FlowKind },
    Run { run_id: RunId, ev: RunEvent },
    Reset,

    // User-visible errors that do not change the phase
    UserError(String),
}
