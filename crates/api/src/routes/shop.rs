use axum::routing::get;
use axum::Router;

use crate::handlers::shop;
use crate::state::AppState;

/// Routes mounted at `/shop`.
///
/// ```text
/// GET    /    -> list
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(shop::list))
}
