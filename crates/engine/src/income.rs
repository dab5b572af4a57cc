//! Passive income, accrued lazily from wall-clock deltas between requests.

use gacha_core::error::CoreResult;
use gacha_core::progression::income_rate;
use gacha_core::types::PlayerId;

use crate::{parse_player_id, GachaEngine};

impl GachaEngine {
    /// Credit the currency the player's characters earned since the last
    /// accrual. Returns the amount granted.
    ///
    /// A player with no stored timestamp starts the clock now and earns
    /// nothing on this call. Less than a whole minute accrues nothing and
    /// leaves the timestamp alone.
    pub async fn accrue_passive_income(&self, player_id: &str) -> CoreResult<i64> {
        let player_id = parse_player_id(player_id)?;
        let _guard = self.locks.lock(player_id).await;
        self.accrue_income_locked(player_id).await
    }

    async fn accrue_income_locked(&self, player_id: PlayerId) -> CoreResult<i64> {
        let account = self.require_account(player_id).await?;
        let now = self.now();

        let Some(last) = account.metadata.last_passive_income_at else {
            self.stores
                .accounts
                .set_last_passive_income(player_id, now)
                .await?;
            return Ok(0);
        };

        let minutes = (now - last).num_minutes();
        if minutes < 1 {
            return Ok(0);
        }

        let per_minute: f64 = match self.stores.inventory.get(player_id).await? {
            Some(record) => record
                .obtained
                .iter()
                .map(|c| income_rate(&self.tuning.rarity, c.rarity, c.experience.level))
                .sum(),
            None => 0.0,
        };
        let earned = (per_minute * minutes as f64).floor() as i64;

        if earned > 0 {
            self.stores
                .accounts
                .adjust_currency(player_id, earned)
                .await?;
            tracing::info!(player_id = %player_id, minutes, earned, "Passive income granted");
        }
        self.stores
            .accounts
            .set_last_passive_income(player_id, now)
            .await?;

        Ok(earned)
    }
}
