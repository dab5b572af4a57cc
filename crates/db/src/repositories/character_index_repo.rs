//! Repository for the `character_index` table.

use gacha_core::catalog::CharacterIndexEntry;
use gacha_core::types::CharacterId;
use sqlx::PgPool;

use crate::models::character::CharacterIndexRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, rarity, image, description, collected, created_at";

pub struct CharacterIndexRepo;

impl CharacterIndexRepo {
    /// Insert a new index entry, returning the created row.
    pub async fn create(
        pool: &PgPool,
        entry: &CharacterIndexEntry,
    ) -> Result<CharacterIndexRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO character_index (id, name, rarity, image, description, collected)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CharacterIndexRow>(&query)
            .bind(entry.id)
            .bind(&entry.name)
            .bind(entry.rarity.as_str())
            .bind(&entry.image)
            .bind(&entry.description)
            .bind(entry.collected)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: CharacterId,
    ) -> Result<Option<CharacterIndexRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM character_index WHERE id = $1");
        sqlx::query_as::<_, CharacterIndexRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an entry by name (case-insensitive).
    pub async fn find_by_name(
        pool: &PgPool,
        name: &str,
    ) -> Result<Option<CharacterIndexRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM character_index WHERE LOWER(name) = LOWER($1)");
        sqlx::query_as::<_, CharacterIndexRow>(&query)
            .bind(name.trim())
            .fetch_optional(pool)
            .await
    }

    /// List every entry in insertion order.
    pub async fn list(pool: &PgPool) -> Result<Vec<CharacterIndexRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM character_index ORDER BY created_at, id");
        sqlx::query_as::<_, CharacterIndexRow>(&query)
            .fetch_all(pool)
            .await
    }

    /// Flip `collected` only when it is still false.
    ///
    /// Returns `true` if this statement performed the flip. Two concurrent
    /// callers can never both see `true`.
    pub async fn mark_collected(pool: &PgPool, id: CharacterId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE character_index SET collected = true WHERE id = $1 AND collected = false",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Clear the flag again. Returns `true` if it was set.
    pub async fn unmark_collected(pool: &PgPool, id: CharacterId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE character_index SET collected = false WHERE id = $1 AND collected = true",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn exists(pool: &PgPool, id: CharacterId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM character_index WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Permanently delete an entry (cascades to its pool entry).
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: CharacterId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM character_index WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
