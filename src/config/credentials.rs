use tracing::debug;
use crate::errors::GuardianError;

/// Literal prefix carried by every Google AI Studio API key.
pub const GEMINI_KEY_PREFIX: &str = "AIza";

/// Resolve a credential value. If the value starts with '$', treat it as an
/// environment variable reference and resolve from the environment.
pub fn resolve_credential(value: &str) -> String {
    if let Some(var_name) = value.strip_prefix('$') {
        match std::env::var(var_name) {
            Ok(resolved) => {
                debug!(var = %var_name, "Resolved credential from environment");
                resolved
            }
            Err(_) => {
                debug!(var = %var_name, "Environment variable not set, using literal");
                value.to_string()
            }
        }
    } else {
        value.to_string()
    }
}

/// Check that a key looks like a Gemini key before it goes anywhere near the
/// network. Rejecting malformed keys here keeps garbage out of upstream calls.
pub fn validate_key_format(key: &str) -> Result<(), GuardianError> {
    if key.starts_with(GEMINI_KEY_PREFIX) {
        Ok(())
    } else {
        Err(GuardianError::InvalidCredentialFormat(format!(
            "expected a key starting with '{}', got '{}'",
            GEMINI_KEY_PREFIX,
            redact(key)
        )))
    }
}

/// Pick the API key from the caller-supplied sources in priority order:
/// explicit request value, then `x-api-key` header, then stored settings,
/// then process configuration. The winning key must pass the format check.
pub fn resolve_api_key(
    explicit: Option<&str>,
    header: Option<&str>,
    configured: Option<&str>,
) -> Result<String, GuardianError> {
    let key = [explicit, header, configured]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|k| !k.is_empty())
        .ok_or(GuardianError::MissingCredential)?;

    validate_key_format(key)?;
    Ok(key.to_string())
}

/// Mask all but the first four characters of a key for log/error output.
pub fn redact(key: &str) -> String {
    if key.len() <= 4 {
        "****".to_string()
    } else {
        format!("{}****", &key[..4])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_credential_literal() {
        assert_eq!(resolve_credential("AIzaSyLiteral"), "AIzaSyLiteral");
    }

    #[test]
    fn test_resolve_credential_env_var() {
        std::env::set_var("TEST_GUARDIAN_CRED", "AIzaSyFromEnv");
        assert_eq!(resolve_credential("$TEST_GUARDIAN_CRED"), "AIzaSyFromEnv");
        std::env::remove_var("TEST_GUARDIAN_CRED");
    }

    #[test]
    fn test_resolve_credential_missing_env_var() {
        assert_eq!(
            resolve_credential("$NONEXISTENT_GUARDIAN_VAR"),
            "$NONEXISTENT_GUARDIAN_VAR"
        );
    }

    #[test]
    fn test_validate_key_format_accepts_gemini_prefix() {
        assert!(validate_key_format("AIzaSyABC123").is_ok());
    }

    #[test]
    fn test_validate_key_format_rejects_wrong_prefix() {
        let result = validate_key_format("sk-wrongprefix");
        assert!(matches!(
            result,
            Err(GuardianError::InvalidCredentialFormat(_))
        ));
    }

    #[test]
    fn test_resolve_api_key_priority_order() {
        let key = resolve_api_key(
            Some("AIzaSyExplicit"),
            Some("AIzaSyHeader"),
            Some("AIzaSyConfig"),
        )
        .unwrap();
        assert_eq!(key, "AIzaSyExplicit");

        let key = resolve_api_key(None, Some("AIzaSyHeader"), Some("AIzaSyConfig")).unwrap();
        assert_eq!(key, "AIzaSyHeader");

        let key = resolve_api_key(None, None, Some("AIzaSyConfig")).unwrap();
        assert_eq!(key, "AIzaSyConfig");
    }

    #[test]
    fn test_resolve_api_key_skips_blank_sources() {
        let key = resolve_api_key(Some("  "), None, Some("AIzaSyConfig")).unwrap();
        assert_eq!(key, "AIzaSyConfig");
    }

    #[test]
    fn test_resolve_api_key_none_found() {
        assert!(matches!(
            resolve_api_key(None, None, None),
            Err(GuardianError::MissingCredential)
        ));
    }

    #[test]
    fn test_resolve_api_key_malformed_wins_then_fails() {
        // A present-but-malformed key is an error, not a fall-through.
        assert!(matches!(
            resolve_api_key(Some("sk-wrongprefix"), None, Some("AIzaSyConfig")),
            Err(GuardianError::InvalidCredentialFormat(_))
        ));
    }

    #[test]
    fn test_redact() {
        assert_eq!(redact("AIzaSySecretSecret"), "AIza****");
        assert_eq!(redact("ab"), "****");
    }
}
