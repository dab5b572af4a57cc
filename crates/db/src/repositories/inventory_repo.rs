//! Repository for the `inventories` and `inventory_characters` tables.

use gacha_core::inventory::{CharacterExperience, ObtainedCharacter};
use gacha_core::types::{CharacterId, PlayerId};
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::inventory::InventoryCharacterRow;

const COLUMNS: &str = "player_id, character_id, name, nickname, rarity, image, \
                       curr_exp, exp_capacity, level, income, obtained_at";

pub struct InventoryRepo;

impl InventoryRepo {
    /// Create the inventory header plus any initial characters in one
    /// transaction.
    pub async fn create(
        pool: &PgPool,
        player_id: PlayerId,
        characters: &[ObtainedCharacter],
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query("INSERT INTO inventories (player_id) VALUES ($1)")
            .bind(player_id)
            .execute(&mut *tx)
            .await?;
        for character in characters {
            Self::insert_character(&mut tx, player_id, character).await?;
        }
        tx.commit().await
    }

    pub async fn exists(pool: &PgPool, player_id: PlayerId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM inventories WHERE player_id = $1)",
        )
        .bind(player_id)
        .fetch_one(pool)
        .await
    }

    /// All characters owned by a player, in the order they were obtained.
    pub async fn list_characters(
        pool: &PgPool,
        player_id: PlayerId,
    ) -> Result<Vec<InventoryCharacterRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM inventory_characters
             WHERE player_id = $1
             ORDER BY obtained_at, character_id"
        );
        sqlx::query_as::<_, InventoryCharacterRow>(&query)
            .bind(player_id)
            .fetch_all(pool)
            .await
    }

    /// Add a character unless the player already owns it.
    ///
    /// Returns `true` if a row was inserted. A missing inventory header
    /// surfaces as a foreign-key violation.
    pub async fn add_character(
        pool: &PgPool,
        player_id: PlayerId,
        character: &ObtainedCharacter,
    ) -> Result<bool, sqlx::Error> {
        let exp = &character.experience;
        let result = sqlx::query(
            "INSERT INTO inventory_characters
                 (player_id, character_id, name, nickname, rarity, image,
                  curr_exp, exp_capacity, level, income)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             ON CONFLICT (player_id, character_id) DO NOTHING",
        )
        .bind(player_id)
        .bind(character.character_id)
        .bind(&character.name)
        .bind(&character.nickname)
        .bind(character.rarity.as_str())
        .bind(&character.image)
        .bind(exp.curr_exp)
        .bind(exp.exp_capacity)
        .bind(exp.level)
        .bind(exp.income)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_character(
        tx: &mut Transaction<'_, Postgres>,
        player_id: PlayerId,
        character: &ObtainedCharacter,
    ) -> Result<(), sqlx::Error> {
        let exp = &character.experience;
        sqlx::query(
            "INSERT INTO inventory_characters
                 (player_id, character_id, name, nickname, rarity, image,
                  curr_exp, exp_capacity, level, income)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(player_id)
        .bind(character.character_id)
        .bind(&character.name)
        .bind(&character.nickname)
        .bind(character.rarity.as_str())
        .bind(&character.image)
        .bind(exp.curr_exp)
        .bind(exp.exp_capacity)
        .bind(exp.level)
        .bind(exp.income)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    pub async fn find_character(
        pool: &PgPool,
        player_id: PlayerId,
        character_id: CharacterId,
    ) -> Result<Option<InventoryCharacterRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM inventory_characters
             WHERE player_id = $1 AND character_id = $2"
        );
        sqlx::query_as::<_, InventoryCharacterRow>(&query)
            .bind(player_id)
            .bind(character_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn remove_character(
        pool: &PgPool,
        player_id: PlayerId,
        character_id: CharacterId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM inventory_characters WHERE player_id = $1 AND character_id = $2",
        )
        .bind(player_id)
        .bind(character_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn set_nickname(
        pool: &PgPool,
        player_id: PlayerId,
        character_id: CharacterId,
        nickname: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE inventory_characters SET nickname = $3
             WHERE player_id = $1 AND character_id = $2",
        )
        .bind(player_id)
        .bind(character_id)
        .bind(nickname)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn set_experience(
        pool: &PgPool,
        player_id: PlayerId,
        character_id: CharacterId,
        experience: CharacterExperience,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE inventory_characters
             SET curr_exp = $3, exp_capacity = $4, level = $5, income = $6
             WHERE player_id = $1 AND character_id = $2",
        )
        .bind(player_id)
        .bind(character_id)
        .bind(experience.curr_exp)
        .bind(experience.exp_capacity)
        .bind(experience.level)
        .bind(experience.income)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete the inventory (cascades to its characters).
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, player_id: PlayerId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM inventories WHERE player_id = $1")
            .bind(player_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
