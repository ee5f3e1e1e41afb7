use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptKind {
    Simple,
    Detailed,
    Technical,
}

impl PromptKind {
    pub const ALL: [PromptKind; 3] = [PromptKind::Simple, PromptKind::Detailed, PromptKind::Technical];

    /// JSON key used by the prompt-derivation response.
    pub fn key(&self) -> &'static str {
        match self {
            PromptKind::Simple => "simple",
            PromptKind::Detailed => "detailed",
            PromptKind::Technical => "technical",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            PromptKind::Simple => "Simple",
            PromptKind::Detailed => "Detailed",
            PromptKind::Technical => "Technical",
        }
    }

    /// Description sent with the response schema.
    pub fn schema_description(&self) -> &'static str {
        match self {
            PromptKind::Simple => "A simple prompt describing style, background and pose.",
            PromptKind::Detailed => "A detailed, moody prompt describing style, background and pose.",
            PromptKind::Technical => {
                "A technical, photographic prompt describing style, background and pose."
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PromptParseError {
    #[error("response is not valid JSON: {0}")]
    NotJson(String),
    #[error("response is not a JSON object")]
    NotObject,
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("field `{0}` is not a string")]
    NotString(&'static str),
    #[error("field `{0}` is empty")]
    EmptyField(&'static str),
}

/// The three prompts derived from one reference image. All fields are non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptSet {
    simple: String,
    detailed: String,
    technical: String,
}

impl PromptSet {
    pub fn new(
        simple: impl Into<String>,
        detailed: impl Into<String>,
        technical: impl Into<String>,
    ) -> Result<Self, PromptParseError> {
        let simple = non_empty(PromptKind::Simple, simple.into())?;
        let detailed = non_empty(PromptKind::Detailed, detailed.into())?;
        let technical = non_empty(PromptKind::Technical, technical.into())?;
        Ok(Self {
            simple,
            detailed,
            technical,
        })
    }

    /// Parses model output into a set, rejecting anything but an object with
    /// three non-empty string fields. Extra keys are ignored.
    pub fn from_model_json(text: &str) -> Result<Self, PromptParseError> {
        let body = strip_code_fence(text.trim());
        let value: Value =
            serde_json::from_str(body).map_err(|e| PromptParseError::NotJson(e.to_string()))?;
        let obj = value.as_object().ok_or(PromptParseError::NotObject)?;

        let field = |kind: PromptKind| -> Result<String, PromptParseError> {
            let key = kind.key();
            match obj.get(key) {
                None | Some(Value::Null) => Err(PromptParseError::MissingField(key)),
                Some(Value::String(s)) => non_empty(kind, s.clone()),
                Some(_) => Err(PromptParseError::NotString(key)),
            }
        };

        Ok(Self {
            simple: field(PromptKind::Simple)?,
            detailed: field(PromptKind::Detailed)?,
            technical: field(PromptKind::Technical)?,
        })
    }

    pub fn get(&self, kind: PromptKind) -> &str {
        match kind {
            PromptKind::Simple => &self.simple,
            PromptKind::Detailed => &self.detailed,
            PromptKind::Technical => &self.technical,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (PromptKind, &str)> + '_ {
        PromptKind::ALL.into_iter().map(move |k| (k, self.get(k)))
    }
}

// Blank text is rejected; anything else is kept exactly as returned.
fn non_empty(kind: PromptKind, value: String) -> Result<String, PromptParseError> {
    if value.trim().is_empty() {
        return Err(PromptParseError::EmptyField(kind.key()));
    }
    Ok(value)
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
