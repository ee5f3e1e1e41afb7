use serde::Serialize;

use crate::image::EncodedImage;
use crate::prompts::{PromptKind, PromptSet};

/// One result card of a multi-prompt run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultSlot {
    pub kind: PromptKind,
    pub title: String,
    pub prompt: Option<String>,
    pub image: Option<EncodedImage>,
}

impl ResultSlot {
    pub fn empty(kind: PromptKind) -> Self {
        Self {
            kind,
            title: kind.title().to_string(),
            prompt: None,
            image: None,
        }
    }

    /// Fresh slots in display order: simple, detailed, technical.
    pub fn empty_set() -> Vec<ResultSlot> {
        PromptKind::ALL.into_iter().map(ResultSlot::empty).collect()
    }

    /// Slots carrying prompts and no images yet.
    pub fn from_prompts(prompts: &PromptSet) -> Vec<ResultSlot> {
        prompts
            .iter()
            .map(|(kind, prompt)| ResultSlot {
                prompt: Some(prompt.to_string()),
                ..ResultSlot::empty(kind)
            })
            .collect()
    }

    pub fn is_blank(&self) -> bool {
        self.prompt.is_none() && self.image.is_none()
    }
}
