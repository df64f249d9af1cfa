use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use super::app_state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    /// `ready` once the spreadsheet client is connected, `pending` before.
    pub sheets: &'static str,
}

/// Liveness probe. Never calls the spreadsheet API.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let sheets = if state.bonuses.is_ready().await {
        "ready"
    } else {
        "pending"
    };

    let response = HealthResponse {
        status: "ok",
        service: env!("CARGO_PKG_NAME"),
        sheets,
    };

    (StatusCode::OK, Json(response))
}
