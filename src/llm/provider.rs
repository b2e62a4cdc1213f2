use async_trait::async_trait;
use crate::errors::GuardianError;
use super::types::{ChatMessage, GenerationResponse, InlineData};

/// The sole boundary to the upstream generation API. Everything above this
/// trait treats the reply as an untrusted text blob.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Single-turn text completion.
    async fn generate(
        &self,
        prompt: &str,
        system: Option<&str>,
    ) -> Result<GenerationResponse, GuardianError>;

    /// Text completion with one inline binary attachment.
    async fn generate_with_image(
        &self,
        prompt: &str,
        image: &InlineData,
    ) -> Result<GenerationResponse, GuardianError>;

    /// Multi-turn completion over a caller-supplied conversation.
    async fn generate_chat(
        &self,
        messages: &[ChatMessage],
        system: Option<&str>,
    ) -> Result<GenerationResponse, GuardianError>;

    /// Model identifier for logging.
    fn model_name(&self) -> &str;
}

/// Builds a client per request from the caller's resolved key. Keys arrive
/// with each request, so there is no long-lived client handle to cache.
pub trait ClientFactory: Send + Sync {
    fn create(&self, api_key: &str, model: Option<&str>) -> Box<dyn GenerationClient>;
}
