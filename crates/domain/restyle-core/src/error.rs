/// Failures that end a run. `Display` is the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RestyleError {
    #[error("{0}")]
    Validation(String),
    #[error("Failed to generate prompts: {0}")]
    PromptDerivation(String),
    #[error("Failed to generate image: {0}")]
    ImageSynthesis(String),
    #[error("An unexpected error occurred.")]
    Unknown(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestyleErrorKind {
    Validation,
    PromptDerivation,
    ImageSynthesis,
    Unknown,
}

impl RestyleError {
    pub fn kind(&self) -> RestyleErrorKind {
        match self {
            RestyleError::Validation(_) => RestyleErrorKind::Validation,
            RestyleError::PromptDerivation(_) => RestyleErrorKind::PromptDerivation,
            RestyleError::ImageSynthesis(_) => RestyleErrorKind::ImageSynthesis,
            RestyleError::Unknown(_) => RestyleErrorKind::Unknown,
        }
    }

    /// Underlying detail without the user-facing prefix.
    pub fn detail(&self) -> &str {
        match self {
            RestyleError::Validation(m)
            | RestyleError::PromptDerivation(m)
            | RestyleError::ImageSynthesis(m)
            | RestyleError::Unknown(m) => m,
        }
    }
}
