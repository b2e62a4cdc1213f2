use thiserror::Error;

#[derive(Debug, Error)]
pub enum GuardianError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("API key required. Provide one in the request, the x-api-key header, or GEMINI_API_KEY")]
    MissingCredential,

    #[error("Invalid API key format: {0}")]
    InvalidCredentialFormat(String),

    #[error("API key rejected by provider: {0}")]
    AuthRejected(String),

    #[error("Upstream generation error: {0}")]
    Upstream(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl GuardianError {
    /// True for failures of the credential check itself, which surface to
    /// callers as authentication problems rather than generation problems.
    pub fn is_credential(&self) -> bool {
        matches!(
            self,
            GuardianError::MissingCredential
                | GuardianError::InvalidCredentialFormat(_)
                | GuardianError::AuthRejected(_)
        )
    }
}
