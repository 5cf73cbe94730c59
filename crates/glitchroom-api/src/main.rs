//! Glitchroom API server entry point.

use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;

use glitchroom_api::config::ServerConfig;
use glitchroom_api::error::AppError;
use glitchroom_api::state::AppState;
use glitchroom_core::clock::SystemClock;
use glitchroom_orchestrator::application::module_host::ModuleHost;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Glitchroom API server");

    let config = ServerConfig::from_env()?;

    let script = match &config.script_path {
        Some(path) => glitchroom_content::load_script_file(path).map_err(AppError::from)?,
        None => glitchroom_content::default_script().map_err(AppError::from)?,
    };

    // Every module must name a known challenge.
    ModuleHost::build(&script, glitchroom_challenges::build)
        .map_err(|e| AppError::Config(e.to_string()))?;

    let app_state = AppState::new(
        Arc::new(SystemClock),
        Arc::new(script),
        glitchroom_challenges::build,
    )
    .with_idle_ttl(config.game_ttl);

    let ticker = glitchroom_api::ticker::spawn(app_state.clone(), config.tick_interval);
    let app = glitchroom_api::app(app_state);

    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.map_err(AppError::from)?;

    axum::serve(listener, app).await.map_err(AppError::from)?;
    ticker.abort();

    Ok(())
}
