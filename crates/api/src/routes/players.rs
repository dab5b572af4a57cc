//! Route definitions for players and everything they own.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{inventory, players, pulls, shop};
use crate::state::AppState;

/// Routes mounted at `/players`.
///
/// ```text
/// POST   /                                          -> register
/// POST   /login                                     -> login
/// GET    /{player_id}                               -> get_metadata
/// DELETE /{player_id}                               -> remove
/// GET    /{player_id}/history                       -> get_history
/// GET    /{player_id}/tickets                       -> get_tickets
/// POST   /{player_id}/tickets/free                  -> claim_free_ticket
/// GET    /{player_id}/tickets/{ticket_type}         -> get_ticket_balance
/// POST   /{player_id}/pulls                         -> pull
/// POST   /{player_id}/purchases                     -> purchase
/// GET    /{player_id}/inventory                     -> get_inventory
/// GET    /{player_id}/inventory/{character_id}      -> get_character
/// PUT    /{player_id}/inventory/{character_id}/nickname -> set_nickname
/// POST   /{player_id}/inventory/{character_id}/feed -> feed
/// ```
pub fn router() -> Router<AppState> {
    let inventory_routes = Router::new()
        .route("/", get(inventory::get_inventory))
        .route("/{character_id}", get(inventory::get_character))
        .route("/{character_id}/nickname", put(inventory::set_nickname))
        .route("/{character_id}/feed", post(inventory::feed));

    Router::new()
        .route("/", post(players::register))
        .route("/login", post(players::login))
        .route(
            "/{player_id}",
            get(players::get_metadata).delete(players::remove),
        )
        .route("/{player_id}/history", get(players::get_history))
        .route("/{player_id}/tickets", get(players::get_tickets))
        .route("/{player_id}/tickets/free", post(players::claim_free_ticket))
        .route(
            "/{player_id}/tickets/{ticket_type}",
            get(players::get_ticket_balance),
        )
        .route("/{player_id}/pulls", post(pulls::pull))
        .route("/{player_id}/purchases", post(shop::purchase))
        .nest("/{player_id}/inventory", inventory_routes)
}
