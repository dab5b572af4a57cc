//! Shop catalog and purchases.

use gacha_core::account::TicketType;
use gacha_core::error::{CoreError, CoreResult};
use gacha_core::shop::{ShopEffect, ShopItem};
use gacha_core::validation::{validate_positive_integer, validate_string};
use serde::Serialize;

use crate::{parse_player_id, GachaEngine};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurchaseReceipt {
    pub item: String,
    pub quantity: i64,
    pub total_cost: i64,
    /// Balance left after the purchase.
    pub currency: i64,
}

impl GachaEngine {
    pub async fn add_shop_item(
        &self,
        name: &str,
        cost: i64,
        description: &str,
        image: &str,
        effect: &str,
    ) -> CoreResult<ShopItem> {
        let name = validate_string(name, "Item name")?.to_lowercase();
        let cost = validate_positive_integer(cost, "Cost")?;
        let description = validate_string(description, "Description")?;
        let image = validate_string(image, "Image URL")?;
        let effect: ShopEffect = effect.parse()?;

        let item = ShopItem {
            name,
            cost,
            description,
            image,
            effect,
        };
        self.stores.shop.insert(&item).await?;
        tracing::info!(item = %item.name, cost, effect = %effect, "Shop item added");
        Ok(item)
    }

    pub async fn list_shop_items(&self) -> CoreResult<Vec<ShopItem>> {
        self.stores.shop.list().await
    }

    pub async fn get_shop_item(&self, name: &str) -> CoreResult<ShopItem> {
        let name = validate_string(name, "Item name")?.to_lowercase();
        self.stores
            .shop
            .find_by_name(&name)
            .await?
            .ok_or_else(|| CoreError::not_found("shop item", &name))
    }

    /// Buy `quantity` units of an item. The player is only charged if the
    /// whole total is covered.
    pub async fn purchase(
        &self,
        player_id: &str,
        item_name: &str,
        quantity: i64,
    ) -> CoreResult<PurchaseReceipt> {
        let player_id = parse_player_id(player_id)?;
        let quantity = validate_positive_integer(quantity, "Quantity")?;
        let item = self.get_shop_item(item_name).await?;
        let total_cost = item
            .cost
            .checked_mul(quantity)
            .ok_or_else(|| CoreError::invalid("Quantity", "is too large"))?;

        let _guard = self.locks.lock(player_id).await;
        let account = self.require_account(player_id).await?;

        let Some(currency) = self
            .stores
            .accounts
            .try_spend_currency(player_id, total_cost)
            .await?
        else {
            return Err(CoreError::InsufficientResource {
                resource: "currency".into(),
                required: total_cost,
                available: account.metadata.currency,
            });
        };

        match item.effect {
            ShopEffect::NormalTicket => {
                self.stores
                    .accounts
                    .adjust_tickets(player_id, TicketType::Normal, quantity)
                    .await?;
            }
            ShopEffect::GoldenTicket => {
                self.stores
                    .accounts
                    .adjust_tickets(player_id, TicketType::Golden, quantity)
                    .await?;
            }
            ShopEffect::Food => {
                self.stores.accounts.adjust_food(player_id, quantity).await?;
            }
        }

        tracing::info!(
            player_id = %player_id,
            item = %item.name,
            quantity,
            total_cost,
            "Purchase completed",
        );

        Ok(PurchaseReceipt {
            item: item.name,
            quantity,
            total_cost,
            currency,
        })
    }
}
