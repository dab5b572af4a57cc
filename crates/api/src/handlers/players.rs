//! Handlers for player accounts, tickets and pull history.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::accrue_income;
use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TicketBalance {
    pub ticket_type: String,
    pub balance: i64,
}

/// POST /api/v1/players
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<impl IntoResponse> {
    let profile = state
        .engine
        .register(&input.username, &input.email, &input.password)
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: profile })))
}

/// POST /api/v1/players/login
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let profile = state.engine.login(&input.email, &input.password).await?;
    Ok(Json(DataResponse { data: profile }))
}

/// GET /api/v1/players/{player_id}
pub async fn get_metadata(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    accrue_income(&state, &player_id).await?;
    let metadata = state.engine.get_metadata(&player_id).await?;
    Ok(Json(DataResponse { data: metadata }))
}

/// DELETE /api/v1/players/{player_id}
pub async fn remove(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
) -> AppResult<StatusCode> {
    state.engine.remove_account(&player_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/players/{player_id}/history
///
/// Most recent pull first.
pub async fn get_history(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    accrue_income(&state, &player_id).await?;
    let history = state.engine.get_pull_history(&player_id).await?;
    Ok(Json(DataResponse { data: history }))
}

/// GET /api/v1/players/{player_id}/tickets
pub async fn get_tickets(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    accrue_income(&state, &player_id).await?;
    let tickets = state.engine.get_ticket_balances(&player_id).await?;
    Ok(Json(DataResponse { data: tickets }))
}

/// GET /api/v1/players/{player_id}/tickets/{ticket_type}
pub async fn get_ticket_balance(
    State(state): State<AppState>,
    Path((player_id, ticket_type)): Path<(String, String)>,
) -> AppResult<impl IntoResponse> {
    accrue_income(&state, &player_id).await?;
    let balance = state
        .engine
        .get_ticket_balance(&player_id, &ticket_type)
        .await?;
    Ok(Json(DataResponse {
        data: TicketBalance {
            ticket_type: ticket_type.trim().to_lowercase(),
            balance,
        },
    }))
}

/// POST /api/v1/players/{player_id}/tickets/free
///
/// Grants one normal ticket when the cooldown has elapsed; otherwise reports
/// the remaining wait.
pub async fn claim_free_ticket(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    accrue_income(&state, &player_id).await?;
    let status = state.engine.check_free_ticket(&player_id).await?;
    Ok(Json(DataResponse { data: status }))
}
