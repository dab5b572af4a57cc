use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use super::accrue_income;
use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PurchaseRequest {
    pub item: String,
    pub quantity: i64,
}

/// GET /api/v1/shop
pub async fn list(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let items = state.engine.list_shop_items().await?;
    Ok(Json(DataResponse { data: items }))
}

/// POST /api/v1/players/{player_id}/purchases
///
/// Income is accrued first so freshly earned currency can be spent.
pub async fn purchase(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
    Json(input): Json<PurchaseRequest>,
) -> AppResult<impl IntoResponse> {
    accrue_income(&state, &player_id).await?;
    let receipt = state
        .engine
        .purchase(&player_id, &input.item, input.quantity)
        .await?;
    Ok(Json(DataResponse { data: receipt }))
}
