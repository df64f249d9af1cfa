use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::app_state::AppState;
use super::{bonuses, health};

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/bonuses", get(bonuses::list_bonuses))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
