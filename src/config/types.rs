use serde::{Deserialize, Serialize};

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct GuardianConfig {
    pub server: Option<ServerConfig>,
    pub llm: Option<LlmConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LlmConfig {
    /// Gemini model identifier.
    pub model: Option<String>,
    /// API key, or a `$VAR` environment reference.
    pub api_key: Option<String>,
}

impl GuardianConfig {
    /// Config with no file on disk: model default, key from the process
    /// environment if present.
    pub fn from_env() -> Self {
        Self {
            server: None,
            llm: Some(LlmConfig {
                model: None,
                api_key: std::env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty()),
            }),
        }
    }

    pub fn model(&self) -> &str {
        self.llm
            .as_ref()
            .and_then(|l| l.model.as_deref())
            .unwrap_or(DEFAULT_MODEL)
    }

    /// Process-level API key, with `$VAR` references resolved.
    pub fn api_key(&self) -> Option<String> {
        self.llm
            .as_ref()
            .and_then(|l| l.api_key.as_deref())
            .map(super::credentials::resolve_credential)
            .filter(|k| !k.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_defaults() {
        let config = GuardianConfig::default();
        assert_eq!(config.model(), DEFAULT_MODEL);
    }

    #[test]
    fn test_model_override() {
        let config = GuardianConfig {
            llm: Some(LlmConfig {
                model: Some("gemini-2.5-pro".to_string()),
                api_key: None,
            }),
            ..Default::default()
        };
        assert_eq!(config.model(), "gemini-2.5-pro");
    }

    #[test]
    fn test_api_key_empty_is_none() {
        let config = GuardianConfig {
            llm: Some(LlmConfig {
                model: None,
                api_key: Some(String::new()),
            }),
            ..Default::default()
        };
        assert!(config.api_key().is_none());
    }
}
