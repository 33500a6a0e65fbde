use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use timey::auth::TokenCodec;
use timey::config;
use timey::database::DatabaseManager;
use timey::middleware::{Gatekeeper, RouteTable};
use timey::notify::ResendMailer;
use timey::{router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up JWT_SECRET, DATABASE_URL, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("timey=info,tower_http=info")),
        )
        .init();

    let config = config::init().context("invalid configuration")?;
    tracing::info!("Starting Timey in {:?} mode", config.environment);

    let codec = TokenCodec::new(config.security.jwt_secret.as_bytes())
        .context("cannot build token codec")?;
    let routes = RouteTable::standard().context("invalid route table")?;
    let gatekeeper = Gatekeeper::new(
        Arc::new(codec),
        Arc::new(routes),
        config.security.cookie_name.as_str(),
    );

    let pool = DatabaseManager::connect_lazy(&config.database).context("cannot create database pool")?;

    if config.mail.api_key.is_none() {
        tracing::warn!("RESEND_API_KEY is not set; employee invitations will fail");
    }
    let mailer = Arc::new(ResendMailer::new(config.mail.clone()));

    let state = AppState::new(Arc::new(config.clone()), pool, gatekeeper, mailer);
    let app = router(state);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Timey listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
