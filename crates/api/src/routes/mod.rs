pub mod catalog;
pub mod health;
pub mod players;
pub mod shop;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /players                                         register
/// /players/login                                   login
/// /players/{player_id}                             metadata, remove
/// /players/{player_id}/history                     pull history
/// /players/{player_id}/tickets                     both balances
/// /players/{player_id}/tickets/free                claim free ticket (POST)
/// /players/{player_id}/tickets/{ticket_type}       one balance
/// /players/{player_id}/pulls                       pull (POST)
/// /players/{player_id}/inventory                   inventory
/// /players/{player_id}/inventory/{character_id}    obtained entry
/// /players/{player_id}/inventory/{character_id}/nickname   rename (PUT)
/// /players/{player_id}/inventory/{character_id}/feed       feed (POST)
/// /players/{player_id}/purchases                   purchase (POST)
///
/// /catalog                                         list, add (cascades to pool)
/// /catalog/{character_id}                          get
///
/// /shop                                            list
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/players", players::router())
        .nest("/catalog", catalog::router())
        .nest("/shop", shop::router())
}
