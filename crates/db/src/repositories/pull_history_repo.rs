//! Repository for the `pull_history` table.

use gacha_core::account::PullHistoryEntry;
use gacha_core::types::PlayerId;
use sqlx::PgPool;

use crate::models::player::PullHistoryRow;

const COLUMNS: &str = "id, player_id, pull_type, pulled, created_at";

pub struct PullHistoryRepo;

impl PullHistoryRepo {
    /// History for a player, most recent first.
    pub async fn list_for_player(
        pool: &PgPool,
        player_id: PlayerId,
    ) -> Result<Vec<PullHistoryRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM pull_history WHERE player_id = $1 ORDER BY id DESC"
        );
        sqlx::query_as::<_, PullHistoryRow>(&query)
            .bind(player_id)
            .fetch_all(pool)
            .await
    }

    /// Insert `entry` and evict everything beyond the `limit` most recent
    /// entries, within one transaction.
    pub async fn push(
        pool: &PgPool,
        player_id: PlayerId,
        entry: &PullHistoryEntry,
        limit: usize,
    ) -> Result<(), sqlx::Error> {
        let pulled = serde_json::to_value(&entry.pulled)
            .map_err(|e| sqlx::Error::Encode(Box::new(e)))?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let mut tx = pool.begin().await?;

        sqlx::query("INSERT INTO pull_history (player_id, pull_type, pulled) VALUES ($1, $2, $3)")
            .bind(player_id)
            .bind(entry.pull_type.as_str())
            .bind(pulled)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "DELETE FROM pull_history
             WHERE player_id = $1
               AND id NOT IN (
                   SELECT id FROM pull_history WHERE player_id = $1 ORDER BY id DESC LIMIT $2
               )",
        )
        .bind(player_id)
        .bind(limit)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }
}
