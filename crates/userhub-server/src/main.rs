//! UserHub Server — application entry point.

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use userhub_auth::IdentityService;
use userhub_db::open_account_store;
use userhub_server::config::Settings;
use userhub_server::{AppState, router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("userhub=info".parse()?))
        .json()
        .init();

    tracing::info!("Starting UserHub server...");

    let settings = Settings::load().context("failed to load settings")?;

    let repo = open_account_store(&settings.db_config())
        .await
        .context("failed to open the account store")?;
    let identity = IdentityService::new(repo, settings.auth_config());
    let app = router(AppState::new(identity), settings.request_timeout());

    let listener = TcpListener::bind(&settings.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", settings.bind_addr))?;
    tracing::info!(addr = %settings.bind_addr, "Listening");

    axum::serve(listener, app).await?;

    tracing::info!("UserHub server stopped.");
    Ok(())
}
