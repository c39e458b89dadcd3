pub mod router;
pub mod server;
pub mod state;
pub mod tracing;

use crate::config::Settings;
use crate::error::HeraldError;
use tokio_util::sync::CancellationToken;

/// Load settings from the environment.
///
/// # Errors
/// Returns [`HeraldError::Config`] naming the offending variable.
pub fn load_settings() -> Result<Settings, HeraldError> {
    let settings = Settings::from_env().map_err(|e| HeraldError::Config(e.to_string()))?;
    ::tracing::info!(
        site_url = %settings.site_url,
        api_url = %settings.api_url,
        refresh_url = %settings.refresh_url,
        categories = settings.category_slugs.len(),
        "Loaded settings"
    );
    Ok(settings)
}

/// Application entry point. Initializes tracing, configuration, and starts the server.
pub async fn run() -> Result<(), HeraldError> {
    tracing::init_tracing();

    let settings = load_settings()?;
    let shutdown_token = CancellationToken::new();

    let app_state = state::AppState::from_settings(&settings)?;
    let app = router::main_router(app_state);

    server::serve(app, settings.http_port, shutdown_token).await
}
