//! REST client for the Gemini `generateContent` endpoint.
//!
//! Each operation is a single call with no retries. Transport and HTTP failures
//! are folded into [`RestyleError`] at this boundary.

mod instructions;
mod wire;

use reqwest::header::HeaderValue;
use reqwest::{Client, Url};
use tracing::{debug, warn};

use restyle_config::ApiConfig;
use restyle_core::{EncodedImage, MediaType, PromptSet, RestyleError};

use crate::error::ApiError;
use wire::{
    Content, ErrorWrapper, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part,
};

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: Url,
    api_key: String,
    prompt_model: String,
    image_model: String,
}

/// Parse the configured endpoint and make sure it acts as a directory base,
/// so `join("models/...")` appends instead of replacing the last segment.
pub(crate) fn normalize_base_url(raw: &str) -> Result<Url, ApiError> {
    let mut url =
        Url::parse(raw.trim()).map_err(|e| ApiError::Endpoint(format!("{raw}: {e}")))?;
    if !url.path().ends_with('/') {
        url.set_path(&format!("{}/", url.path()));
    }
    Ok(url)
}

impl GeminiClient {
    pub fn new(client: Client, config: &ApiConfig) -> Result<Self, ApiError> {
        Ok(Self {
            client,
            base_url: normalize_base_url(&config.base_url)?,
            api_key: config.api_key.clone(),
            prompt_model: config.prompt_model.clone(),
            image_model: config.image_model.clone(),
        })
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = crate::net::default_http_client(config.request_timeout)?;
        Self::new(client, config)
    }

    fn endpoint(&self, model: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(&format!("models/{model}:generateContent"))
            .map_err(|e| ApiError::Endpoint(format!("{model}: {e}")))
    }

    async fn generate_content(
        &self,
        model: &str,
        body: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ApiError> {
        let url = self.endpoint(model)?;
        let key = HeaderValue::from_str(&self.api_key)
            .map_err(|_| ApiError::Transport("API key is not a valid header value".into()))?;

        debug!(%model, "sending generateContent request");
        let response = self
            .client
            .post(url)
            .header(API_KEY_HEADER, key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error body".to_string());
            return Err(ApiError::Http {
                status: status.as_u16(),
                message: error_message(&body_text),
            });
        }

        let bytes = response.bytes().await?;
        debug!(%model, bytes = bytes.len(), "generateContent response received");
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Asks the prompt model for the simple/detailed/technical descriptions of
    /// `reference`. The reply is validated strictly.
    pub async fn derive_prompts(&self, reference: &EncodedImage) -> Result<PromptSet, RestyleError> {
        let mut request = GenerateContentRequest::user(vec![
            Part::text(instructions::PROMPT_INSTRUCTION),
            Part::image(reference),
        ]);
        request.system_instruction = Some(Content {
            role: None,
            parts: vec![Part::text(instructions::PROMPT_SYSTEM_INSTRUCTION)],
        });
        request.generation_config = Some(GenerationConfig {
            response_mime_type: Some("application/json".into()),
            response_schema: Some(instructions::prompt_schema()),
            ..GenerationConfig::default()
        });

        let response = self
            .generate_content(&self.prompt_model, &request)
            .await
            .map_err(|e| RestyleError::PromptDerivation(e.to_string()))?;

        let Some(text) = response.parts().find_map(|p| p.text.as_deref()) else {
            if let Some(reason) = response.block_reason() {
                warn!(%reason, "prompt request was blocked");
                return Err(RestyleError::PromptDerivation(format!(
                    "request blocked: {reason}"
                )));
            }
            warn!("prompt response carried no text");
            return Err(RestyleError::PromptDerivation("malformed response".into()));
        };

        PromptSet::from_model_json(text).map_err(|e| {
            warn!(error = %e, "prompt response failed validation");
            RestyleError::PromptDerivation("malformed response".into())
        })
    }

    /// Places the subject of `source` into the scene described by `prompt`.
    pub async fn synthesize_image(
        &self,
        prompt: &str,
        source: &EncodedImage,
    ) -> Result<EncodedImage, RestyleError> {
        let request = image_request(vec![
            Part::image(source),
            Part::text(instructions::synthesis_instruction(prompt)),
        ]);
        self.request_image(&request).await
    }

    /// Single-shot variant: the scene comes from `style`, the subject from `source`.
    pub async fn synthesize_styled(
        &self,
        style: &EncodedImage,
        source: &EncodedImage,
    ) -> Result<EncodedImage, RestyleError> {
        let request = image_request(vec![
            Part::image(style),
            Part::image(source),
            Part::text(instructions::STYLED_INSTRUCTION),
        ]);
        self.request_image(&request).await
    }

    async fn request_image(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<EncodedImage, RestyleError> {
        let response = self
            .generate_content(&self.image_model, request)
            .await
            .map_err(|e| RestyleError::ImageSynthesis(e.to_string()))?;
        first_image(&response)
    }
}

fn image_request(parts: Vec<Part>) -> GenerateContentRequest {
    let mut request = GenerateContentRequest::user(parts);
    request.generation_config = Some(GenerationConfig {
        response_modalities: Some(vec!["IMAGE".into(), "TEXT".into()]),
        ..GenerationConfig::default()
    });
    request
}

fn first_image(response: &GenerateContentResponse) -> Result<EncodedImage, RestyleError> {
    let inline = response
        .parts()
        .filter_map(|p| p.inline_data.as_ref())
        .find(|d| d.data.as_deref().is_some_and(|data| !data.is_empty()));

    let Some(inline) = inline else {
        warn!(block_reason = ?response.block_reason(), "image response carried no image part");
        return Err(RestyleError::ImageSynthesis("no image returned".into()));
    };

    let mime = inline.mime_type.as_deref().unwrap_or("image/png");
    let media_type = MediaType::from_mime(mime).ok_or_else(|| {
        RestyleError::ImageSynthesis(format!("unsupported image type returned: {mime}"))
    })?;
    let data = inline.data.as_deref().unwrap_or_default();

    EncodedImage::from_base64(data, media_type, format!("generated.{}", media_type.file_extension()))
        .map_err(|e| RestyleError::ImageSynthesis(format!("invalid image data: {e}")))
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorWrapper>(body)
        .map(|wrapper| {
            let msg = wrapper.error.message.unwrap_or_else(|| body.to_string());
            match wrapper.error.status.filter(|s| !s.is_empty()) {
                Some(status) => format!("{status}: {msg}"),
                None => msg,
            }
        })
        .unwrap_or_else(|_| body.trim().to_string())
}
