use crate::domain::{AppState, ImageRole};
use crate::run::{FlowKind, RunPhase};
use restyle_core::PromptKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploaderVm {
    pub title: &'static str,
    pub file_name: Option<String>,
    pub preview_data_url: Option<String>,
}

pub fn uploader_vm(state: &AppState, role: ImageRole) -> UploaderVm {
    let image = state.selection.get(role);
    UploaderVm {
        title: role.title(),
        file_name: image.map(|i| i.name().to_string()),
        preview_data_url: image.map(|i| i.data_url().to_string()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateButtonVm {
    pub enabled: bool,
    pub is_loading: bool,
}

pub fn generate_button_vm(state: &AppState) -> GenerateButtonVm {
    let busy = state.run.phase.is_busy();
    GenerateButtonVm {
        enabled: state.selection.is_complete() && !busy,
        is_loading: busy,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImageVm {
    pub image_data_url: Option<String>,
    pub is_loading: bool,
}

pub fn generated_image_vm(state: &AppState) -> GeneratedImageVm {
    let single = state.run.flow == Some(FlowKind::SingleShot);
    GeneratedImageVm {
        image_data_url: state.generated.as_ref().map(|i| i.data_url().to_string()),
        is_loading: single && state.run.phase.is_busy(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultCardVm {
    pub kind: PromptKind,
    pub title: String,
    pub prompt: Option<String>,
    pub image_data_url: Option<String>,
    pub is_prompt_loading: bool,
    pub is_image_loading: bool,
}

pub fn result_cards_vm(state: &AppState) -> Vec<ResultCardVm> {
    let multi = state.run.flow == Some(FlowKind::MultiPrompt);
    let phase = state.run.phase;

    state
        .slots
        .iter()
        .map(|slot| ResultCardVm {
            kind: slot.kind,
            title: slot.title.clone(),
            prompt: slot.prompt.clone(),
            image_data_url: slot.image.as_ref().map(|i| i.data_url().to_string()),
            is_prompt_loading: multi && phase == RunPhase::DerivingPrompts,
            is_image_loading: multi
                && slot.image.is_none()
                && matches!(
                    phase,
                    RunPhase::DerivingPrompts | RunPhase::SynthesizingImages
                ),
        })
        .collect()
}

/// One-line status for the current run.
pub fn status_line(state: &AppState) -> String {
    match (&state.run.error_message, state.run.phase) {
        (Some(msg), _) => format!("Error: {msg}"),
        (None, phase) => phase.label().to_string(),
    }
}
