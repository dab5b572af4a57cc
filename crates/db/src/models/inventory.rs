//! Inventory rows.

use gacha_core::error::CoreError;
use gacha_core::inventory::{CharacterExperience, ObtainedCharacter};
use gacha_core::types::{CharacterId, PlayerId, Timestamp};
use sqlx::FromRow;

/// A row from the `inventory_characters` table.
#[derive(Debug, Clone, FromRow)]
pub struct InventoryCharacterRow {
    pub player_id: PlayerId,
    pub character_id: CharacterId,
    pub name: String,
    pub nickname: String,
    pub rarity: String,
    pub image: String,
    pub curr_exp: i64,
    pub exp_capacity: i64,
    pub level: i64,
    pub income: f64,
    pub obtained_at: Timestamp,
}

impl TryFrom<InventoryCharacterRow> for ObtainedCharacter {
    type Error = CoreError;

    fn try_from(row: InventoryCharacterRow) -> Result<Self, Self::Error> {
        let rarity = row.rarity.parse().map_err(|e| {
            CoreError::Internal(format!("inventory character {}: {e}", row.character_id))
        })?;
        Ok(ObtainedCharacter {
            character_id: row.character_id,
            name: row.name,
            nickname: row.nickname,
            rarity,
            image: row.image,
            experience: CharacterExperience {
                curr_exp: row.curr_exp,
                exp_capacity: row.exp_capacity,
                level: row.level,
                income: row.income,
            },
        })
    }
}
