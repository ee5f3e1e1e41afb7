use serde_json::{json, Map, Value};

use restyle_core::PromptKind;

pub(crate) const PROMPT_SYSTEM_INSTRUCTION: &str = "You are a prompt engineer for generative image models. \
Study the supplied image and write three distinct prompts that capture its style, scene and pose \
without describing who the person is. Reply with a single JSON object that follows the given schema and nothing else.";

pub(crate) const PROMPT_INSTRUCTION: &str = "Extract the aesthetic and compositional elements of the attached image. \
Write three distinct prompts covering the background, environment, lighting, color grading, camera angle \
and the pose of the subject (for example 'sitting on a bench' or 'leaning against a wall'). \
Do not describe facial features or identity; describe only the scene and the pose, so that a different \
person can later be placed into exactly this style and setting. Follow the JSON schema precisely.";

pub(crate) const STYLED_INSTRUCTION: &str = "The first image is the style reference and the second image shows the subject. \
Recreate the scene of the first image, keeping its background, lighting, color grading, camera angle and pose, \
and place the person from the second image into it. Preserve the identity and facial features of that person exactly. \
Do not carry over the background or style of the second image.";

pub(crate) fn synthesis_instruction(prompt: &str) -> String {
    format!(
        "Use the provided image as the subject and place the person from it into a new scene described by the prompt below. \
Preserve the identity and facial features of that person exactly. Replace their clothing, their pose, the background \
and the overall artistic style completely with what the prompt describes. Do not mix in the background or style of the \
source image. The result must show the person from the source image reimagined in the new context. Prompt: {prompt}"
    )
}

/// `responseSchema` requiring the three prompt fields as strings.
pub(crate) fn prompt_schema() -> Value {
    let mut properties = Map::new();
    for kind in PromptKind::ALL {
        properties.insert(
            kind.key().to_string(),
            json!({ "type": "STRING", "description": kind.schema_description() }),
        );
    }
    let required: Vec<&str> = PromptKind::ALL.iter().map(|k| k.key()).collect();

    json!({
        "type": "OBJECT",
        "properties": properties,
        "required": required,
    })
}
