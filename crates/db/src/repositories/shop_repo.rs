//! Repository for the `shop_items` table.

use gacha_core::shop::ShopItem;
use sqlx::PgPool;

use crate::models::shop::ShopItemRow;

const COLUMNS: &str = "name, cost, description, image, effect, created_at";

pub struct ShopRepo;

impl ShopRepo {
    pub async fn create(pool: &PgPool, item: &ShopItem) -> Result<ShopItemRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO shop_items (name, cost, description, image, effect)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ShopItemRow>(&query)
            .bind(&item.name)
            .bind(item.cost)
            .bind(&item.description)
            .bind(&item.image)
            .bind(item.effect.as_str())
            .fetch_one(pool)
            .await
    }

    /// Find an item by name (case-insensitive).
    pub async fn find_by_name(
        pool: &PgPool,
        name: &str,
    ) -> Result<Option<ShopItemRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM shop_items WHERE LOWER(name) = LOWER($1)");
        sqlx::query_as::<_, ShopItemRow>(&query)
            .bind(name.trim())
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<ShopItemRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM shop_items ORDER BY cost, name");
        sqlx::query_as::<_, ShopItemRow>(&query)
            .fetch_all(pool)
            .await
    }
}
