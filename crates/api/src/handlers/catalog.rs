//! Handlers for the character index.
//!
//! Adding an index entry also creates its gacha pool entry.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateIndexEntry {
    pub name: String,
    pub rarity: String,
    pub image: String,
    pub description: String,
}

/// GET /api/v1/catalog
pub async fn list(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let entries = state.engine.list_index_entries().await?;
    Ok(Json(DataResponse { data: entries }))
}

/// POST /api/v1/catalog
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateIndexEntry>,
) -> AppResult<impl IntoResponse> {
    let entry = state
        .engine
        .add_index_entry(&input.name, &input.rarity, &input.image, &input.description)
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: entry })))
}

/// GET /api/v1/catalog/{character_id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(character_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let entry = state.engine.get_index_entry(&character_id).await?;
    Ok(Json(DataResponse { data: entry }))
}
