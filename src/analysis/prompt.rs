use crate::errors::GuardianError;
use crate::llm::InlineData;
use super::request::AnalysisRequest;

// The JSON examples inside these templates are the contract with the
// normalizer: field names must match what it reads. They ship in the binary
// so prompt and parser can never drift apart.
const URL_TEMPLATE: &str = include_str!("templates/url.txt");
const IMAGE_TEMPLATE: &str = include_str!("templates/image.txt");
const VULNERABILITIES_TEMPLATE: &str = include_str!("templates/vulnerabilities.txt");
const CHATBOT_TEMPLATE: &str = include_str!("templates/chatbot.txt");
const CHAT_SYSTEM_TEMPLATE: &str = include_str!("templates/chat_system.txt");

/// A fully rendered instruction ready for the upstream client.
#[derive(Debug, Clone)]
pub struct RenderedPrompt {
    pub text: String,
    pub system: Option<String>,
    pub image: Option<InlineData>,
}

/// Render the fixed template for a request's kind with its subject
/// interpolated.
pub fn render(request: &AnalysisRequest) -> Result<RenderedPrompt, GuardianError> {
    let rendered = match request {
        AnalysisRequest::Url { url } => RenderedPrompt {
            text: interpolate(URL_TEMPLATE, &[("{{URL}}", url)]),
            system: None,
            image: None,
        },
        AnalysisRequest::Image { .. } => RenderedPrompt {
            text: IMAGE_TEMPLATE.to_string(),
            system: None,
            image: request.inline_data()?,
        },
        AnalysisRequest::Vulnerabilities { url } => RenderedPrompt {
            text: interpolate(VULNERABILITIES_TEMPLATE, &[("{{URL}}", url)]),
            system: None,
            image: None,
        },
        AnalysisRequest::Chat { question } => RenderedPrompt {
            text: interpolate(CHATBOT_TEMPLATE, &[("{{QUESTION}}", question)]),
            system: None,
            image: None,
        },
    };
    Ok(rendered)
}

/// System persona for the chat-style conversation endpoint.
pub fn chat_system_prompt() -> &'static str {
    CHAT_SYSTEM_TEMPLATE
}

/// Replace {{PLACEHOLDER}} markers with values. The subject is transmitted as
/// text, never executed, so plain interpolation is all the sanitization
/// needed.
fn interpolate(template: &str, replacements: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (placeholder, value) in replacements {
        result = result.replace(placeholder, value);
    }
    result
}
