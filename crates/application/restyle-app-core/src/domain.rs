use serde::Serialize;

use crate::run::RunState;
use restyle_core::{EncodedImage, ResultSlot};

pub const SINGLE_SHOT_MISSING_IMAGES: &str = "Please upload both a style and a source image.";
pub const MULTI_PROMPT_MISSING_IMAGES: &str = "Please upload both a reference and a source image.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageRole {
    /// Style or reference image: supplies the scene.
    Reference,
    /// Supplies the subject whose identity is kept.
    Source,
}

impl ImageRole {
    pub fn title(&self) -> &'static str {
        match self {
            ImageRole::Reference => "Reference Style Image",
            ImageRole::Source => "Source Face Image",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub reference: Option<EncodedImage>,
    pub source: Option<EncodedImage>,
}

impl Selection {
    pub fn get(&self, role: ImageRole) -> Option<&EncodedImage> {
        match role {
            ImageRole::Reference => self.reference.as_ref(),
            ImageRole::Source => self.source.as_ref(),
        }
    }

    pub fn set(&mut self, role: ImageRole, image: Option<EncodedImage>) {
        match role {
            ImageRole::Reference => self.reference = image,
            ImageRole::Source => self.source = image,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.reference.is_some() && self.source.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppState {
    pub selection: Selection,
    pub run: RunState,

    // single-shot result
    pub generated: Option<EncodedImage>,
    // multi-prompt results, always three in kind order
    pub slots: Vec<ResultSlot>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            selection: Selection::default(),
            run: RunState::idle(),
            generated: None,
            slots: ResultSlot::empty_set(),
        }
    }
}
