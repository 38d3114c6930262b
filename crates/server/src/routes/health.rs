use axum::{Router, response::Json as ResponseJson, routing::get};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utils::response::ApiResponse;

use crate::AppState;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct HealthStatus {
    pub status: String,
    pub module: String,
    pub version: String,
}

pub async fn health() -> ResponseJson<ApiResponse<HealthStatus>> {
    ResponseJson(ApiResponse::success(HealthStatus {
        status: "ok".to_string(),
        module: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
