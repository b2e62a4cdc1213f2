use std::path::Path;
use crate::errors::GuardianError;
use super::types::GuardianConfig;

pub async fn parse_config(path: &Path) -> Result<GuardianConfig, GuardianError> {
    if !path.exists() {
        return Err(GuardianError::Config(format!(
            "Config file not found: {}",
            path.display()
        )));
    }

    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > 1_048_576 {
        return Err(GuardianError::Config("Config file exceeds 1MB limit".into()));
    }

    let content = tokio::fs::read_to_string(path).await?;
    let config: GuardianConfig = serde_yaml::from_str(&content)?;

    validate(&config)?;

    Ok(config)
}

fn validate(config: &GuardianConfig) -> Result<(), GuardianError> {
    if let Some(server) = &config.server {
        if let Some(port) = server.port {
            if port == 0 {
                return Err(GuardianError::Config("Server port must be non-zero".into()));
            }
        }
    }

    if let Some(llm) = &config.llm {
        if let Some(model) = &llm.model {
            if model.trim().is_empty() {
                return Err(GuardianError::Config("LLM model must not be empty".into()));
            }
        }
    }

    Ok(())
}
