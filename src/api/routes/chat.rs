use axum::{extract::State, http::HeaderMap, Json};

use crate::analysis::{AnalysisOutcome, AnalysisRequest};
use crate::api::models::ChatbotRequest;
use crate::api::routes::analyze::{resolve_request_key, run_analyzer};
use crate::api::AppState;
use crate::errors::GuardianError;

pub async fn chatbot(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<ChatbotRequest>,
) -> Result<Json<AnalysisOutcome>, GuardianError> {
    let request = AnalysisRequest::Chat { question: req.question };
    request.validate()?;

    let key = resolve_request_key(&state, None, &headers)?;
    let outcome = run_analyzer(&state, &key).analyze(&request).await?;
    Ok(Json(outcome))
}
