pub mod errors;
pub mod models;
pub mod routes;

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::GuardianConfig;
use crate::errors::GuardianError;
use crate::llm::{ClientFactory, GeminiFactory};
use crate::store::{FileBackend, SettingsStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GuardianConfig>,
    pub settings: Arc<SettingsStore>,
    pub factory: Arc<dyn ClientFactory>,
}

impl AppState {
    /// Configured API key visible to request handlers: runtime settings
    /// first, then process configuration.
    pub fn configured_key(&self) -> Option<String> {
        self.settings.api_key().or_else(|| self.config.api_key())
    }

    pub fn model_override(&self) -> Option<String> {
        self.settings.model()
    }
}

pub fn create_app_state(
    config: GuardianConfig,
    settings_path: Option<PathBuf>,
) -> Result<AppState, GuardianError> {
    let settings = match settings_path {
        Some(path) => SettingsStore::new(Box::new(FileBackend::new(path)))?,
        None => SettingsStore::in_memory(),
    };
    let factory = GeminiFactory::new(config.model());
    Ok(AppState {
        config: Arc::new(config),
        settings: Arc::new(settings),
        factory: Arc::new(factory),
    })
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", axum::routing::get(routes::health::health_check))
        .route("/api/analyze-url", axum::routing::post(routes::analyze::analyze_url))
        .route("/api/analyze-image", axum::routing::post(routes::analyze::analyze_image))
        .route(
            "/api/analyze-vulnerabilities",
            axum::routing::post(routes::analyze::analyze_vulnerabilities),
        )
        .route("/api/chatbot", axum::routing::post(routes::chat::chatbot))
        .route(
            "/api/settings",
            axum::routing::get(routes::settings::get_settings)
                .put(routes::settings::update_settings),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
