use async_trait::async_trait;

use restyle_core::{EncodedImage, PromptSet, RestyleError};
use restyle_infra::GeminiClient;

/// The remote generative service. Each call is a single attempt.
#[async_trait]
pub trait GenerativeApi: Send + Sync + 'static {
    async fn derive_prompts(&self, reference: &EncodedImage) -> Result<PromptSet, RestyleError>;

    async fn synthesize_image(
        &self,
        prompt: &str,
        source: &EncodedImage,
    ) -> Result<EncodedImage, RestyleError>;

    async fn synthesize_styled(
        &self,
        style: &EncodedImage,
        source: &EncodedImage,
    ) -> Result<EncodedImage, RestyleError>;
}

#[async_trait]
impl GenerativeApi for GeminiClient {
    async fn derive_prompts(&self, reference: &EncodedImage) -> Result<PromptSet, RestyleError> {
        GeminiClient::derive_prompts(self, reference).await
    }

    async fn synthesize_image(
        &self,
        prompt: &str,
        source: &EncodedImage,
    ) -> Result<EncodedImage, RestyleError> {
        GeminiClient::synthesize_image(self, prompt, source).await
    }

    async fn synthesize_styled(
        &self,
        style: &EncodedImage,
        source: &EncodedImage,
    ) -> Result<EncodedImage, RestyleError> {
        GeminiClient::synthesize_styled(self, style, source).await
    }
}
