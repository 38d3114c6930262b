use std::sync::Arc;

use anyhow::Context;
use db::DBService;
use secrecy::ExposeSecret;
use server::{AppState, build_router, config::Config};
use services::services::{
    claude_api::ClaudeApiClient,
    daily_qt::{ClaudeGenerator, DailyQtService},
    notifier::{HttpPushRelay, NotificationService},
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn")),
        )
        .init();

    let config = Config::from_env().context("configuration")?;

    let db = DBService::new(&config.database_url)
        .await
        .with_context(|| format!("open database at {}", config.database_url))?;

    let claude = ClaudeApiClient::new(
        config.anthropic_api_key.expose_secret().to_string(),
        config.claude_model.clone(),
    )?;
    let generator = Arc::new(ClaudeGenerator::new(claude));

    if config.cron_secret.is_none() {
        warn!("CRON_SECRET is not set; the cron trigger accepts unauthenticated requests");
    }
    if config.push_relay_url.is_none() {
        warn!("PUSH_RELAY_URL is not set; device push delivery is disabled");
    }

    let push = Arc::new(HttpPushRelay::new(config.push_relay_url.clone())?);
    let notifier = NotificationService::new(db.clone(), push);
    let daily_qt = Arc::new(DailyQtService::new(db.clone(), generator, notifier));

    let addr = format!("{}:{}", config.host, config.port);
    let state = AppState::new(db, daily_qt, Arc::new(config));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    info!(addr = %addr, "server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
