//! Shop item rows.

use gacha_core::error::CoreError;
use gacha_core::shop::ShopItem;
use gacha_core::types::Timestamp;
use sqlx::FromRow;

/// A row from the `shop_items` table.
#[derive(Debug, Clone, FromRow)]
pub struct ShopItemRow {
    pub name: String,
    pub cost: i64,
    pub description: String,
    pub image: String,
    pub effect: String,
    pub created_at: Timestamp,
}

impl TryFrom<ShopItemRow> for ShopItem {
    type Error = CoreError;

    fn try_from(row: ShopItemRow) -> Result<Self, Self::Error> {
        let effect = row
            .effect
            .parse()
            .map_err(|e| CoreError::Internal(format!("shop item {}: {e}", row.name)))?;
        Ok(ShopItem {
            name: row.name,
            cost: row.cost,
            description: row.description,
            image: row.image,
            effect,
        })
    }
}
