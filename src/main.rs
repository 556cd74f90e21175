use anyhow::Result;
use bikecast::api::AppState;
use bikecast::{BikecastConfig, SessionRegistry, forecast, logging, web};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = BikecastConfig::load()?;
    logging::init(&config.logging)?;

    let provider = forecast::provider_from_config(&config)?;
    info!(
        provider = provider.name(),
        bind = %config.bind_address(),
        "BikeCast starting up"
    );

    let sessions = SessionRegistry::with_idle_timeout(provider, config.session_idle_timeout());
    let state = AppState::new(sessions);
    web::run(&config.server, state).await
}
