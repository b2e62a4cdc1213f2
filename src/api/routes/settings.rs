use axum::{extract::State, Json};

use crate::api::models::{SettingsResponse, UpdateSettingsRequest};
use crate::api::AppState;
use crate::config::credentials;
use crate::errors::GuardianError;

fn to_response(settings: crate::store::Settings) -> SettingsResponse {
    SettingsResponse {
        api_key: settings
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .map(credentials::redact),
        model: settings.model,
        updated_at: settings.updated_at,
    }
}

pub async fn get_settings(State(state): State<AppState>) -> Json<SettingsResponse> {
    Json(to_response(state.settings.current()))
}

pub async fn update_settings(
    State(state): State<AppState>,
    Json(req): Json<UpdateSettingsRequest>,
) -> Result<Json<SettingsResponse>, GuardianError> {
    // A malformed key is rejected at write time rather than on first use.
    if let Some(key) = req.api_key.as_deref() {
        if !key.is_empty() {
            credentials::validate_key_format(key)?;
        }
    }

    let updated = state.settings.update(|settings| {
        if let Some(key) = req.api_key {
            settings.api_key = Some(key).filter(|k| !k.is_empty());
        }
        if let Some(model) = req.model {
            settings.model = Some(model).filter(|m| !m.is_empty());
        }
    })?;

    Ok(Json(to_response(updated)))
}
