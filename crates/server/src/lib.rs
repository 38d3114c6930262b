pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use db::DBService;
use services::services::daily_qt::DailyQtService;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub db: DBService,
    pub daily_qt: Arc<DailyQtService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: DBService, daily_qt: Arc<DailyQtService>, config: Arc<Config>) -> Self {
        Self {
            db,
            daily_qt,
            config,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::cron::router())
        .merge(routes::devotionals::router())
        .merge(routes::subscriptions::router())
        .merge(routes::notifications::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
