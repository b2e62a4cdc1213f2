use tracing::debug;
use uuid::Uuid;

use crate::errors::GuardianError;
use crate::llm::GenerationClient;
use super::normalizer;
use super::prompt;
use super::request::AnalysisRequest;
use super::result::AnalysisOutcome;

/// One analysis pipeline: validate, render, generate, normalize.
///
/// The client handle is passed in at construction, one per request on the
/// API path, so nothing is shared across requests.
pub struct Analyzer {
    client: Box<dyn GenerationClient>,
}

impl Analyzer {
    pub fn new(client: Box<dyn GenerationClient>) -> Self {
        Self { client }
    }

    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisOutcome, GuardianError> {
        request.validate()?;

        let request_id = Uuid::new_v4();
        let rendered = prompt::render(request)?;
        debug!(
            %request_id,
            kind = %request.kind(),
            model = self.client.model_name(),
            "Dispatching analysis prompt"
        );

        let response = match &rendered.image {
            Some(image) => self.client.generate_with_image(&rendered.text, image).await?,
            None => self.client.generate(&rendered.text, rendered.system.as_deref()).await?,
        };

        debug!(
            %request_id,
            input_tokens = ?response.input_tokens,
            output_tokens = ?response.output_tokens,
            "Upstream reply received"
        );

        Ok(normalizer::normalize(request.kind(), &response.content))
    }
}
