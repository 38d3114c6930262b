//! In-app notification feed.

use axum::{
    Router,
    extract::{Path, Query, State},
    response::Json as ResponseJson,
    routing::{get, post},
};
use db::models::notification::Notification;
use serde::Deserialize;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

const DEFAULT_LIMIT: i64 = 20;
const MAX_LIMIT: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    pub limit: Option<i64>,
}

/// A member's feed, newest first.
pub async fn list_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<FeedQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<Notification>>>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let feed = Notification::find_by_user(&state.db.pool, user_id, limit).await?;
    Ok(ResponseJson(ApiResponse::success(feed)))
}

pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Notification>>, ApiError> {
    let notification = Notification::mark_read(&state.db.pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("no notification {id}")))?;
    Ok(ResponseJson(ApiResponse::success(notification)))
}

pub fn router() -> Router<AppState> {
    // Both paths bind {id} so the segment shares one parameter name; for the
    // feed route the id is the user's.
    Router::new().nest(
        "/api/notifications",
        Router::new()
            .route("/{id}", get(list_for_user))
            .route("/{id}/read", post(mark_read)),
    )
}
