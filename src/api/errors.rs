use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use crate::errors::GuardianError;

/// Stable machine-readable code for each failure class. Credential problems
/// are the caller's to fix; everything else upstream collapses into one
/// generation error.
fn error_code(error: &GuardianError) -> &'static str {
    match error {
        GuardianError::MissingCredential => "MISSING_API_KEY",
        GuardianError::InvalidCredentialFormat(_) | GuardianError::AuthRejected(_) => {
            "INVALID_API_KEY"
        }
        GuardianError::InvalidRequest(_) => "INVALID_REQUEST",
        GuardianError::Config(_) => "CONFIG_ERROR",
        _ => "GENERATION_ERROR",
    }
}

impl IntoResponse for GuardianError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            GuardianError::MissingCredential
            | GuardianError::InvalidCredentialFormat(_)
            | GuardianError::AuthRejected(_) => StatusCode::UNAUTHORIZED,
            GuardianError::InvalidRequest(_) | GuardianError::Config(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = json!({
            "error": self.to_string(),
            "code": error_code(&self),
        });

        (status, Json(body)).into_response()
    }
}
