pub mod app_core;
mod async_runtime;
pub mod domain;
pub mod kernel;
pub mod orchestrator;
pub mod ports;
pub mod run;
pub mod viewmodel;

pub use app_core::*;
pub use domain::{AppState, ImageRole, Selection};
pub use kernel::RestyleKernel;
pub use ports::*;
pub use run::{FlowKind, RunEvent, RunId, RunPhase, RunState};
pub use viewmodel::*;
