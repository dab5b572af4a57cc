//! Character index and gacha pool rows.

use gacha_core::catalog::{CharacterIndexEntry, GachaPoolEntry};
use gacha_core::error::CoreError;
use gacha_core::types::{CharacterId, Timestamp};
use sqlx::FromRow;

/// A row from the `character_index` table.
#[derive(Debug, Clone, FromRow)]
pub struct CharacterIndexRow {
    pub id: CharacterId,
    pub name: String,
    pub rarity: String,
    pub image: String,
    pub description: String,
    pub collected: bool,
    pub created_at: Timestamp,
}

impl TryFrom<CharacterIndexRow> for CharacterIndexEntry {
    type Error = CoreError;

    fn try_from(row: CharacterIndexRow) -> Result<Self, Self::Error> {
        let rarity = row
            .rarity
            .parse()
            .map_err(|e| CoreError::Internal(format!("character {}: {e}", row.id)))?;
        Ok(CharacterIndexEntry {
            id: row.id,
            name: row.name,
            rarity,
            image: row.image,
            description: row.description,
            collected: row.collected,
        })
    }
}

/// A row from the `gacha_pool` table.
#[derive(Debug, Clone, FromRow)]
pub struct GachaPoolRow {
    pub character_id: CharacterId,
    pub pull_rate: f64,
    pub duplicate_currency: i64,
    pub created_at: Timestamp,
}

impl From<GachaPoolRow> for GachaPoolEntry {
    fn from(row: GachaPoolRow) -> Self {
        GachaPoolEntry {
            character_id: row.character_id,
            pull_rate: row.pull_rate,
            duplicate_currency: row.duplicate_currency,
        }
    }
}
