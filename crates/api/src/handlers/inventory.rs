//! Handlers for a player's obtained characters.
//!
//! Mounted under `/players/{player_id}/inventory`.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use super::accrue_income;
use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NicknameRequest {
    pub nickname: String,
}

/// GET /api/v1/players/{player_id}/inventory
pub async fn get_inventory(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    accrue_income(&state, &player_id).await?;
    let inventory = state.engine.get_inventory(&player_id).await?;
    Ok(Json(DataResponse { data: inventory }))
}

/// GET /api/v1/players/{player_id}/inventory/{character_id}
pub async fn get_character(
    State(state): State<AppState>,
    Path((player_id, character_id)): Path<(String, String)>,
) -> AppResult<impl IntoResponse> {
    accrue_income(&state, &player_id).await?;
    let character = state
        .engine
        .get_character(&player_id, &character_id)
        .await?;
    Ok(Json(DataResponse { data: character }))
}

/// PUT /api/v1/players/{player_id}/inventory/{character_id}/nickname
pub async fn set_nickname(
    State(state): State<AppState>,
    Path((player_id, character_id)): Path<(String, String)>,
    Json(input): Json<NicknameRequest>,
) -> AppResult<impl IntoResponse> {
    accrue_income(&state, &player_id).await?;
    let character = state
        .engine
        .set_nickname(&player_id, &character_id, &input.nickname)
        .await?;
    Ok(Json(DataResponse { data: character }))
}

/// POST /api/v1/players/{player_id}/inventory/{character_id}/feed
pub async fn feed(
    State(state): State<AppState>,
    Path((player_id, character_id)): Path<(String, String)>,
) -> AppResult<impl IntoResponse> {
    accrue_income(&state, &player_id).await?;
    let result = state.engine.feed(&player_id, &character_id).await?;
    Ok(Json(DataResponse { data: result }))
}
