//! Repository for the `gacha_pool` table. Insert and read only.

use gacha_core::catalog::GachaPoolEntry;
use gacha_core::types::CharacterId;
use sqlx::PgPool;

use crate::models::character::GachaPoolRow;

const COLUMNS: &str = "character_id, pull_rate, duplicate_currency, created_at";

pub struct GachaPoolRepo;

impl GachaPoolRepo {
    pub async fn create(pool: &PgPool, entry: &GachaPoolEntry) -> Result<GachaPoolRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO gacha_pool (character_id, pull_rate, duplicate_currency)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, GachaPoolRow>(&query)
            .bind(entry.character_id)
            .bind(entry.pull_rate)
            .bind(entry.duplicate_currency)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        character_id: CharacterId,
    ) -> Result<Option<GachaPoolRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM gacha_pool WHERE character_id = $1");
        sqlx::query_as::<_, GachaPoolRow>(&query)
            .bind(character_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<GachaPoolRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM gacha_pool ORDER BY created_at, character_id");
        sqlx::query_as::<_, GachaPoolRow>(&query).fetch_all(pool).await
    }
}
