use std::path::PathBuf;
use tracing::info;

use crate::api;
use crate::cli::commands::ServeArgs;
use crate::config::{self, GuardianConfig};
use crate::errors::GuardianError;

pub async fn handle_serve(args: ServeArgs) -> Result<(), GuardianError> {
    let config = match &args.config {
        Some(path) => config::parse_config(&PathBuf::from(path)).await?,
        None => GuardianConfig::from_env(),
    };

    info!(host = %args.host, port = args.port, model = config.model(), "Starting API server");
    if config.api_key().is_none() {
        info!("No API key configured; requests must supply their own");
    }

    let state = api::create_app_state(config, args.settings.map(PathBuf::from))?;
    let app = api::build_router(state);

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| GuardianError::Internal(format!("Server error: {}", e)))?;

    Ok(())
}
