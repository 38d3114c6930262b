//! Push device registration.

use axum::{
    Json, Router,
    extract::State,
    response::Json as ResponseJson,
    routing::post,
};
use db::models::subscription::PushSubscription;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateSubscriptionRequest {
    pub user_id: Option<Uuid>,
    /// The browser's push subscription object, stored as-is.
    pub subscription: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct DeleteSubscriptionRequest {
    pub endpoint: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct DeleteSubscriptionResponse {
    pub removed: u64,
}

pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<CreateSubscriptionRequest>,
) -> Result<ResponseJson<ApiResponse<PushSubscription>>, ApiError> {
    let endpoint = request
        .subscription
        .get("endpoint")
        .and_then(|value| value.as_str())
        .ok_or_else(|| ApiError::BadRequest("subscription has no endpoint".to_string()))?
        .to_string();

    let stored = PushSubscription::create_or_update(
        &state.db.pool,
        request.user_id,
        &endpoint,
        &request.subscription,
    )
    .await?;
    Ok(ResponseJson(ApiResponse::success(stored)))
}

pub async fn unregister(
    State(state): State<AppState>,
    Json(request): Json<DeleteSubscriptionRequest>,
) -> Result<ResponseJson<ApiResponse<DeleteSubscriptionResponse>>, ApiError> {
    let removed = PushSubscription::delete_by_endpoint(&state.db.pool, &request.endpoint).await?;
    Ok(ResponseJson(ApiResponse::success(
        DeleteSubscriptionResponse { removed },
    )))
}

pub fn router() -> Router<AppState> {
    Router::new().nest(
        "/api/push",
        Router::new().route("/subscriptions", post(register).delete(unregister)),
    )
}
