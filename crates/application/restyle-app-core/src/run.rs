use std::fmt;

use serde::Serialize;

use restyle_core::{EncodedImage, PromptKind, PromptSet};

/// Identifier of one run. Issued in increasing order by the kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RunId(u64);

impl RunId {
    pub fn first() -> Self {
        RunId(1)
    }

    pub fn next(self) -> Self {
        RunId(self.0 + 1)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlowKind {
    /// One style image and one source image to one result.
    SingleShot,
    /// One reference image to three prompts to three results.
    MultiPrompt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunPhase {
    Idle,
    DerivingPrompts,
    SynthesizingImages,
    Done,
    Failed,
}

impl RunPhase {
    pub fn is_busy(&self) -> bool {
        matches!(self, RunPhase::DerivingPrompts | RunPhase::SynthesizingImages)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RunPhase::Done | RunPhase::Failed)
    }

    pub fn label(&self) -> &'static str {
        match self {
            RunPhase::Idle => "Idle",
            RunPhase::DerivingPrompts => "Generating prompts...",
            RunPhase::SynthesizingImages => "Generating images...",
            RunPhase::Done => "Done",
            RunPhase::Failed => "Failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunState {
    pub run_id: Option<RunId>,
    pub flow: Option<FlowKind>,
    pub phase: RunPhase,
    pub error_message: Option<String>,
}

impl RunState {
    pub fn idle() -> Self {
        Self {
            run_id: None,
            flow: None,
            phase: RunPhase::Idle,
            error_message: None,
        }
    }

    pub fn starting(run_id: RunId, flow: FlowKind) -> Self {
        Self {
            run_id: Some(run_id),
            flow: Some(flow),
            phase: match flow {
                FlowKind::SingleShot => RunPhase::SynthesizingImages,
                FlowKind::MultiPrompt => RunPhase::DerivingPrompts,
            },
            error_message: None,
        }
    }
}

impl Default for RunState {
    fn default() -> Self {
        Self::idle()
    }
}

/// Progress reported by a run worker, tagged with its [`RunId`] on the wire.
#[derive(Debug, Clone)]
pub enum RunEvent {
    PromptsReady {
        prompts: PromptSet,
    },
    SynthesisStarted,
    SingleImageReady {
        image: EncodedImage,
    },
    ImagesReady {
        images: Vec<(PromptKind, EncodedImage)>,
    },
    Failed {
        message: String,
    },
}
