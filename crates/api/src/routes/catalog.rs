use axum::routing::get;
use axum::Router;

use crate::handlers::catalog;
use crate::state::AppState;

/// Routes mounted at `/catalog`.
///
/// ```text
/// GET    /                  -> list
/// POST   /                  -> create (index entry plus pool entry)
/// GET    /{character_id}    -> get_by_id
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(catalog::list).post(catalog::create))
        .route("/{character_id}", get(catalog::get_by_id))
}
