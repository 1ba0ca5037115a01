use async_trait::async_trait;

use crate::core::errors::ApiError;

#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// return the provider name (e.g. "gemini")
    fn name(&self) -> &str;

    /// one-shot text generation, no streaming; at most one attempt
    async fn generate(&self, prompt: &str) -> Result<String, ApiError>;
}
