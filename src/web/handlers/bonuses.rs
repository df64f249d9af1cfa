use axum::extract::State;
use axum::Json;

use super::api_error::ApiError;
use super::app_state::AppState;
use crate::core::bonuses::BonusRecord;

/// `GET /bonuses` - every bonus currently in the sheet.
pub async fn list_bonuses(
    State(state): State<AppState>,
) -> Result<Json<Vec<BonusRecord>>, ApiError> {
    match state.bonuses.get_bonuses().await {
        Ok(bonuses) => {
            tracing::info!(count = bonuses.len(), "Served bonuses");
            Ok(Json(bonuses))
        }
        Err(e) => {
            // Details can mention key paths or key formats; keep them server-side.
            tracing::error!(error = %e, "Failed to fetch bonuses");
            Err(ApiError::internal("Failed to fetch bonuses"))
        }
    }
}
