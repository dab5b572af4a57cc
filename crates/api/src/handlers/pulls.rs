use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use gacha_core::error::CoreError;
use serde::Deserialize;

use super::accrue_income;
use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PullRequest {
    pub count: i64,
    pub ticket_type: String,
}

/// POST /api/v1/players/{player_id}/pulls
pub async fn pull(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
    Json(input): Json<PullRequest>,
) -> AppResult<impl IntoResponse> {
    accrue_income(&state, &player_id).await?;

    // Detached so a request timeout cannot stop a batch half-applied.
    let engine = state.engine.clone();
    let result = tokio::spawn(async move {
        engine
            .gacha_pull(&player_id, input.count, &input.ticket_type)
            .await
    })
    .await
    .map_err(|e| CoreError::Internal(format!("pull task failed: {e}")))??;
    Ok(Json(DataResponse { data: result }))
}
