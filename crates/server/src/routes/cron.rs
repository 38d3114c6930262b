//! Cron trigger for the daily devotional pipeline.
//!
//! Response bodies here are fixed contracts with the scheduler and are not
//! wrapped in the client envelope.

use axum::{
    Router,
    extract::State,
    http::{HeaderMap, header},
    response::Json as ResponseJson,
    routing::get,
};
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use services::services::daily_qt::CronOutcome;
use tracing::warn;

use crate::{AppState, error::ApiError};

/// Compare the Authorization header against the configured secret. An
/// unconfigured secret skips the check entirely.
fn authorize(headers: &HeaderMap, secret: Option<&SecretString>) -> Result<(), ApiError> {
    let Some(secret) = secret else {
        warn!("CRON_SECRET is not configured, accepting unauthenticated trigger");
        return Ok(());
    };

    let expected = format!("Bearer {}", secret.expose_secret());
    match headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
    {
        Some(value) if value == expected => Ok(()),
        _ => Err(ApiError::Unauthorized),
    }
}

pub async fn trigger_daily_qt(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<ResponseJson<serde_json::Value>, ApiError> {
    authorize(&headers, state.config.cron_secret.as_ref())?;

    let today = utils::time::today_kst();
    let body = match state.daily_qt.run(today).await? {
        CronOutcome::AlreadyPublished { date } => json!({
            "message": "오늘 큐티가 이미 존재합니다.",
            "date": date.to_string(),
        }),
        CronOutcome::Published { date, reference } => json!({
            "success": true,
            "date": date.to_string(),
            "reference": reference,
            "message": "오늘의 큐티가 생성되었습니다.",
        }),
    };

    Ok(ResponseJson(body))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/cron/daily-qt", get(trigger_daily_qt))
}
