//! Read endpoints for published devotionals.

use axum::{
    Router,
    extract::{Path, Query, State},
    response::Json as ResponseJson,
    routing::get,
};
use chrono::NaiveDate;
use db::models::devotional::{Devotional, DevotionalPayload};
use serde::Deserialize;
use utils::response::ApiResponse;

use crate::{AppState, error::ApiError};

const DEFAULT_LIMIT: i64 = 7;
const MAX_LIMIT: i64 = 31;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
}

/// Today's devotional (KST), `data: null` before it is published.
pub async fn get_today(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Option<DevotionalPayload>>>, ApiError> {
    let today = utils::time::today_kst();
    let record = Devotional::find_by_date(&state.db.pool, today).await?;
    Ok(ResponseJson(ApiResponse::success(record.map(Into::into))))
}

pub async fn get_by_date(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
) -> Result<ResponseJson<ApiResponse<DevotionalPayload>>, ApiError> {
    let record = Devotional::find_by_date(&state.db.pool, date)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("no devotional for {date}")))?;
    Ok(ResponseJson(ApiResponse::success(record.into())))
}

pub async fn list_recent(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<DevotionalPayload>>>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let records = Devotional::find_recent(&state.db.pool, limit).await?;
    Ok(ResponseJson(ApiResponse::success(
        records.into_iter().map(Into::into).collect(),
    )))
}

pub fn router() -> Router<AppState> {
    Router::new().nest(
        "/api/devotionals",
        Router::new()
            .route("/", get(list_recent))
            .route("/today", get(get_today))
            .route("/{date}", get(get_by_date)),
    )
}
