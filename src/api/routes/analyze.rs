use axum::{extract::State, http::HeaderMap, Json};
use tracing::info;

use crate::analysis::{prompt, AnalysisOutcome, AnalysisRequest, Analyzer};
use crate::api::models::{
    AnalyzeImageRequest, AnalyzeUrlRequest, AnalyzeUrlResponse, AnalyzeVulnerabilitiesRequest,
};
use crate::api::AppState;
use crate::config::credentials;
use crate::errors::GuardianError;

/// Resolve the caller's key in priority order: request body, `x-api-key`
/// header, stored settings, process configuration. The winner must pass the
/// format check before any client is built.
pub(crate) fn resolve_request_key(
    state: &AppState,
    explicit: Option<&str>,
    headers: &HeaderMap,
) -> Result<String, GuardianError> {
    let header_key = headers.get("x-api-key").and_then(|v| v.to_str().ok());
    let configured = state.configured_key();
    credentials::resolve_api_key(explicit, header_key, configured.as_deref())
}

pub(crate) fn run_analyzer(state: &AppState, key: &str) -> Analyzer {
    let client = state.factory.create(key, state.model_override().as_deref());
    Analyzer::new(client)
}

/// Chat-style URL analysis: the conversation is forwarded under the
/// GuardianAI persona and the reply returned verbatim.
pub async fn analyze_url(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<AnalyzeUrlRequest>,
) -> Result<Json<AnalyzeUrlResponse>, GuardianError> {
    if req.messages.is_empty() {
        return Err(GuardianError::InvalidRequest("messages must not be empty".into()));
    }

    let key = resolve_request_key(&state, req.api_key.as_deref(), &headers)?;
    let client = state.factory.create(&key, state.model_override().as_deref());

    info!(messages = req.messages.len(), "Forwarding URL analysis conversation");
    let response = client
        .generate_chat(&req.messages, Some(prompt::chat_system_prompt()))
        .await?;

    Ok(Json(AnalyzeUrlResponse { message: response.content, success: true }))
}

pub async fn analyze_image(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<AnalyzeImageRequest>,
) -> Result<Json<AnalysisOutcome>, GuardianError> {
    let request = AnalysisRequest::Image { image_base64: req.image_base64 };
    request.validate()?;

    let key = resolve_request_key(&state, None, &headers)?;
    let outcome = run_analyzer(&state, &key).analyze(&request).await?;
    Ok(Json(outcome))
}

pub async fn analyze_vulnerabilities(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<AnalyzeVulnerabilitiesRequest>,
) -> Result<Json<AnalysisOutcome>, GuardianError> {
    let request = AnalysisRequest::Vulnerabilities { url: req.url };
    request.validate()?;

    let key = resolve_request_key(&state, None, &headers)?;
    info!("Running vulnerability assessment");
    let outcome = run_analyzer(&state, &key).analyze(&request).await?;
    Ok(Json(outcome))
}
