use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::llm::ChatMessage;

#[derive(Deserialize)]
pub struct AnalyzeUrlRequest {
    pub messages: Vec<ChatMessage>,
    #[serde(rename = "apiKey")]
    pub api_key: Option<String>,
}

#[derive(Serialize)]
pub struct AnalyzeUrlResponse {
    pub message: String,
    pub success: bool,
}

#[derive(Deserialize)]
pub struct AnalyzeImageRequest {
    #[serde(rename = "imageBase64")]
    pub image_base64: String,
}

#[derive(Deserialize)]
pub struct AnalyzeVulnerabilitiesRequest {
    pub url: String,
}

#[derive(Deserialize)]
pub struct ChatbotRequest {
    pub question: String,
}

#[derive(Serialize)]
pub struct SettingsResponse {
    /// Redacted; the full key never leaves the server.
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
pub struct UpdateSettingsRequest {
    #[serde(alias = "apiKey")]
    pub api_key: Option<String>,
    pub model: Option<String>,
}
