use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use crate::config::types::DEFAULT_MODEL;
use crate::errors::GuardianError;
use super::provider::{ClientFactory, GenerationClient};
use super::types::{ChatMessage, GenerationResponse, InlineData};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: &str, model: Option<&str>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            model: model.unwrap_or(DEFAULT_MODEL).to_string(),
        }
    }

    async fn call(&self, contents: Vec<Value>, system: Option<&str>) -> Result<GenerationResponse, GuardianError> {
        // The credential check runs before any client is built; an empty key
        // here means a caller bypassed it.
        if self.api_key.is_empty() {
            return Err(GuardianError::MissingCredential);
        }

        let mut body = json!({
            "contents": contents,
            "generationConfig": {
                "maxOutputTokens": 8192,
            }
        });
        if let Some(sys) = system {
            body["systemInstruction"] = json!({"parts": [{"text": sys}]});
        }

        let url = format!("{}/{}:generateContent?key={}", API_BASE, self.model, self.api_key);

        let resp = self.client.post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| GuardianError::Network(format!("Gemini request failed: {}", e)))?;

        let status = resp.status();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(GuardianError::AuthRejected(format!("Gemini returned {}", status)));
        }
        if status.as_u16() == 429 {
            return Err(GuardianError::RateLimited("Gemini rate limit".into()));
        }

        let data: Value = resp.json().await
            .map_err(|e| GuardianError::Upstream(format!("Parse error: {}", e)))?;

        if let Some(error) = data.get("error") {
            let message = error["message"].as_str().unwrap_or("Unknown").to_string();
            // Invalid keys come back as a 400 with a structured reason.
            let reason = error["status"].as_str().unwrap_or("");
            if reason == "UNAUTHENTICATED"
                || reason == "PERMISSION_DENIED"
                || message.contains("API key")
            {
                return Err(GuardianError::AuthRejected(message));
            }
            return Err(GuardianError::Upstream(message));
        }

        let content = data["candidates"][0]["content"]["parts"][0]["text"]
            .as_str().unwrap_or("").to_string();

        let input_tokens = data["usageMetadata"]["promptTokenCount"].as_u64();
        let output_tokens = data["usageMetadata"]["candidatesTokenCount"].as_u64();

        Ok(GenerationResponse {
            content,
            input_tokens,
            output_tokens,
            model: self.model.clone(),
        })
    }
}

#[async_trait]
impl GenerationClient for GeminiClient {
    async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<GenerationResponse, GuardianError> {
        let contents = vec![json!({"role": "user", "parts": [{"text": prompt}]})];
        self.call(contents, system).await
    }

    async fn generate_with_image(&self, prompt: &str, image: &InlineData) -> Result<GenerationResponse, GuardianError> {
        let contents = vec![json!({
            "role": "user",
            "parts": [
                {"text": prompt},
                {"inlineData": {"mimeType": image.mime_type, "data": image.data}},
            ]
        })];
        self.call(contents, None).await
    }

    async fn generate_chat(&self, messages: &[ChatMessage], system: Option<&str>) -> Result<GenerationResponse, GuardianError> {
        let contents: Vec<Value> = messages.iter().map(|m| {
            // Gemini names the assistant role "model".
            let role = if m.role == "assistant" { "model" } else { "user" };
            json!({"role": role, "parts": [{"text": m.content}]})
        }).collect();
        self.call(contents, system).await
    }

    fn model_name(&self) -> &str { &self.model }
}

/// Default factory: one fresh Gemini client per request key.
pub struct GeminiFactory {
    default_model: String,
}

impl GeminiFactory {
    pub fn new(default_model: &str) -> Self {
        Self { default_model: default_model.to_string() }
    }
}

impl ClientFactory for GeminiFactory {
    fn create(&self, api_key: &str, model: Option<&str>) -> Box<dyn GenerationClient> {
        Box::new(GeminiClient::new(api_key, Some(model.unwrap_or(&self.default_model))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_model() {
        let client = GeminiClient::new("AIzaSyTest", None);
        assert_eq!(client.model_name(), DEFAULT_MODEL);
    }

    #[test]
    fn test_factory_applies_model() {
        let factory = GeminiFactory::new("gemini-2.5-pro");
        let client = factory.create("AIzaSyTest", None);
        assert_eq!(client.model_name(), "gemini-2.5-pro");

        let overridden = factory.create("AIzaSyTest", Some("gemini-2.0-flash"));
        assert_eq!(overridden.model_name(), "gemini-2.0-flash");
    }

    #[tokio::test]
    async fn test_empty_key_rejected_before_network() {
        let client = GeminiClient::new("", None);
        let result = client.generate("hello", None).await;
        assert!(matches!(result, Err(GuardianError::MissingCredential)));
    }
}
