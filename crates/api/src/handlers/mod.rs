pub mod catalog;
pub mod inventory;
pub mod players;
pub mod pulls;
pub mod shop;

use crate::error::AppResult;
use crate::state::AppState;

/// Credit passive income before serving a player-scoped request.
pub(crate) async fn accrue_income(state: &AppState, player_id: &str) -> AppResult<()> {
    let earned = state.engine.accrue_passive_income(player_id).await?;
    if earned > 0 {
        tracing::debug!(player_id, earned, "Accrued passive income on request");
    }
    Ok(())
}
