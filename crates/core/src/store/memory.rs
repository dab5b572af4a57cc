//! In-memory implementation of every store port.
//!
//! Backs the engine tests and database-less local runs. Each map sits behind
//! its own `RwLock`; every trait method takes the lock once, so each method is
//! atomic on its own. [`FailPoint`]s let tests simulate an unavailable store.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{
    AccountStore, CharacterIndexStore, GachaPoolStore, InventoryStore, ShopStore, Stores,
};
use crate::account::{PlayerAccount, PullHistoryEntry, TicketType};
use crate::catalog::{CharacterIndexEntry, GachaPoolEntry};
use crate::error::{CoreError, CoreResult};
use crate::inventory::{CharacterExperience, InventoryRecord, ObtainedCharacter};
use crate::progression::Experience;
use crate::shop::ShopItem;
use crate::types::{CharacterId, PlayerId, Timestamp};

/// Store operations that can be forced to fail with `Transient`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailPoint {
    PoolInsert,
    InventoryCreate,
    InventoryAdd,
    InventoryDelete,
    AccountDelete,
    AdjustTickets,
    PushHistory,
    SetExperience,
}

#[derive(Default)]
pub struct MemoryStore {
    index: RwLock<Vec<CharacterIndexEntry>>,
    pool: RwLock<Vec<GachaPoolEntry>>,
    accounts: RwLock<HashMap<PlayerId, PlayerAccount>>,
    inventories: RwLock<HashMap<PlayerId, InventoryRecord>>,
    shop: RwLock<Vec<ShopItem>>,
    failures: Mutex<HashSet<FailPoint>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh store wired into every port.
    pub fn stores() -> (Arc<Self>, Stores) {
        let backend = Arc::new(Self::new());
        let stores = Stores::from_backend(backend.clone());
        (backend, stores)
    }

    /// Make every call through `point` fail until [`MemoryStore::heal`].
    pub fn fail(&self, point: FailPoint) {
        self.failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(point);
    }

    pub fn heal(&self, point: FailPoint) {
        self.failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&point);
    }

    fn check(&self, point: FailPoint) -> CoreResult<()> {
        let failing = self
            .failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&point);
        if failing {
            return Err(CoreError::Transient(format!("{point:?} unavailable")));
        }
        Ok(())
    }

    async fn with_account<T>(
        &self,
        id: PlayerId,
        f: impl FnOnce(&mut PlayerAccount) -> T + Send,
    ) -> CoreResult<T> {
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .get_mut(&id)
            .ok_or_else(|| CoreError::not_found("player", id))?;
        Ok(f(account))
    }
}

#[async_trait]
impl CharacterIndexStore for MemoryStore {
    async fn insert(&self, entry: &CharacterIndexEntry) -> CoreResult<()> {
        let mut index = self.index.write().await;
        if index
            .iter()
            .any(|e| e.name.eq_ignore_ascii_case(&entry.name))
        {
            return Err(CoreError::Conflict(format!(
                "{} is already in the character index",
                entry.name
            )));
        }
        index.push(entry.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: CharacterId) -> CoreResult<Option<CharacterIndexEntry>> {
        Ok(self.index.read().await.iter().find(|e| e.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> CoreResult<Option<CharacterIndexEntry>> {
        Ok(self
            .index
            .read()
            .await
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(name.trim()))
            .cloned())
    }

    async fn list(&self) -> CoreResult<Vec<CharacterIndexEntry>> {
        Ok(self.index.read().await.clone())
    }

    async fn mark_collected(&self, id: CharacterId) -> CoreResult<bool> {
        let mut index = self.index.write().await;
        let entry = index
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| CoreError::not_found("character", id))?;
        if entry.collected {
            return Ok(false);
        }
        entry.collected = true;
        Ok(true)
    }

    async fn unmark_collected(&self, id: CharacterId) -> CoreResult<bool> {
        let mut index = self.index.write().await;
        let Some(entry) = index.iter_mut().find(|e| e.id == id) else {
            return Ok(false);
        };
        Ok(std::mem::replace(&mut entry.collected, false))
    }

    async fn delete(&self, id: CharacterId) -> CoreResult<bool> {
        let mut index = self.index.write().await;
        let before = index.len();
        index.retain(|e| e.id != id);
        Ok(index.len() < before)
    }
}

#[async_trait]
impl GachaPoolStore for MemoryStore {
    async fn insert(&self, entry: &GachaPoolEntry) -> CoreResult<()> {
        self.check(FailPoint::PoolInsert)?;
        let mut pool = self.pool.write().await;
        if pool.iter().any(|e| e.character_id == entry.character_id) {
            return Err(CoreError::Conflict(format!(
                "character {} is already in the gacha pool",
                entry.character_id
            )));
        }
        pool.push(entry.clone());
        Ok(())
    }

    async fn find_by_id(&self, character_id: CharacterId) -> CoreResult<Option<GachaPoolEntry>> {
        Ok(self
            .pool
            .read()
            .await
            .iter()
            .find(|e| e.character_id == character_id)
            .cloned())
    }

    async fn list(&self) -> CoreResult<Vec<GachaPoolEntry>> {
        Ok(self.pool.read().await.clone())
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn insert(&self, account: &PlayerAccount) -> CoreResult<()> {
        let mut accounts = self.accounts.write().await;
        if accounts
            .values()
            .any(|a| a.username.eq_ignore_ascii_case(&account.username))
        {
            return Err(CoreError::Conflict(
                "There already exists a user with that username".into(),
            ));
        }
        if accounts
            .values()
            .any(|a| a.email.eq_ignore_ascii_case(&account.email))
        {
            return Err(CoreError::Conflict(
                "There already exists a user with that email".into(),
            ));
        }
        accounts.insert(account.id, account.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: PlayerId) -> CoreResult<Option<PlayerAccount>> {
        Ok(self.accounts.read().await.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> CoreResult<Option<PlayerAccount>> {
        Ok(self
            .accounts
            .read()
            .await
            .values()
            .find(|a| a.username.eq_ignore_ascii_case(username))
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> CoreResult<Option<PlayerAccount>> {
        Ok(self
            .accounts
            .read()
            .await
            .values()
            .find(|a| a.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn adjust_tickets(
        &self,
        id: PlayerId,
        ticket_type: TicketType,
        delta: i64,
    ) -> CoreResult<i64> {
        self.check(FailPoint::AdjustTickets)?;
        self.with_account(id, |a| {
            let tickets = &mut a.metadata.ticket_count;
            let slot = match ticket_type {
                TicketType::Normal => &mut tickets.normal,
                TicketType::Golden => &mut tickets.golden,
            };
            *slot = (*slot + delta).max(0);
            *slot
        })
        .await
    }

    async fn adjust_currency(&self, id: PlayerId, delta: i64) -> CoreResult<i64> {
        self.with_account(id, |a| {
            a.metadata.currency = (a.metadata.currency + delta).max(0);
            a.metadata.currency
        })
        .await
    }

    async fn adjust_food(&self, id: PlayerId, delta: i64) -> CoreResult<i64> {
        self.with_account(id, |a| {
            a.metadata.food_count = (a.metadata.food_count + delta).max(0);
            a.metadata.food_count
        })
        .await
    }

    async fn try_spend_currency(&self, id: PlayerId, amount: i64) -> CoreResult<Option<i64>> {
        self.with_account(id, |a| {
            if a.metadata.currency < amount {
                return None;
            }
            a.metadata.currency -= amount;
            Some(a.metadata.currency)
        })
        .await
    }

    async fn try_consume_food(&self, id: PlayerId, amount: i64) -> CoreResult<Option<i64>> {
        self.with_account(id, |a| {
            if a.metadata.food_count < amount {
                return None;
            }
            a.metadata.food_count -= amount;
            Some(a.metadata.food_count)
        })
        .await
    }

    async fn set_experience(&self, id: PlayerId, experience: Experience) -> CoreResult<()> {
        self.check(FailPoint::SetExperience)?;
        self.with_account(id, |a| a.metadata.experience = experience)
            .await
    }

    async fn set_obtained_count(&self, id: PlayerId, count: i64) -> CoreResult<()> {
        self.with_account(id, |a| a.metadata.obtained_count = count)
            .await
    }

    async fn set_ticket_cooldown(
        &self,
        id: PlayerId,
        cooldown: Option<Timestamp>,
    ) -> CoreResult<()> {
        self.with_account(id, |a| a.metadata.ticket_count.cooldown = cooldown)
            .await
    }

    async fn grant_free_ticket(
        &self,
        id: PlayerId,
        granted_at: Timestamp,
        next_cooldown: Timestamp,
    ) -> CoreResult<()> {
        self.with_account(id, |a| {
            let tickets = &mut a.metadata.ticket_count;
            tickets.normal += 1;
            tickets.cooldown = Some(next_cooldown);
            tickets.last_free_ticket_at = Some(granted_at);
        })
        .await
    }

    async fn set_last_passive_income(&self, id: PlayerId, at: Timestamp) -> CoreResult<()> {
        self.with_account(id, |a| a.metadata.last_passive_income_at = Some(at))
            .await
    }

    async fn push_pull_history(
        &self,
        id: PlayerId,
        entry: &PullHistoryEntry,
        limit: usize,
    ) -> CoreResult<()> {
        self.check(FailPoint::PushHistory)?;
        let entry = entry.clone();
        self.with_account(id, move |a| {
            a.pull_history.insert(0, entry);
            a.pull_history.truncate(limit);
        })
        .await
    }

    async fn delete(&self, id: PlayerId) -> CoreResult<bool> {
        self.check(FailPoint::AccountDelete)?;
        Ok(self.accounts.write().await.remove(&id).is_some())
    }
}

#[async_trait]
impl InventoryStore for MemoryStore {
    async fn create(&self, record: &InventoryRecord) -> CoreResult<()> {
        self.check(FailPoint::InventoryCreate)?;
        let mut inventories = self.inventories.write().await;
        if inventories.contains_key(&record.player_id) {
            return Err(CoreError::Conflict(format!(
                "player {} already has an inventory",
                record.player_id
            )));
        }
        inventories.insert(record.player_id, record.clone());
        Ok(())
    }

    async fn get(&self, player_id: PlayerId) -> CoreResult<Option<InventoryRecord>> {
        Ok(self.inventories.read().await.get(&player_id).cloned())
    }

    async fn add_character(
        &self,
        player_id: PlayerId,
        character: &ObtainedCharacter,
    ) -> CoreResult<bool> {
        self.check(FailPoint::InventoryAdd)?;
        let mut inventories = self.inventories.write().await;
        let record = inventories
            .get_mut(&player_id)
            .ok_or_else(|| CoreError::not_found("inventory", player_id))?;
        if record.contains(character.character_id) {
            return Ok(false);
        }
        record.obtained.push(character.clone());
        Ok(true)
    }

    async fn find_character(
        &self,
        player_id: PlayerId,
        character_id: CharacterId,
    ) -> CoreResult<Option<ObtainedCharacter>> {
        Ok(self
            .inventories
            .read()
            .await
            .get(&player_id)
            .and_then(|r| r.find(character_id))
            .cloned())
    }

    async fn remove_character(
        &self,
        player_id: PlayerId,
        character_id: CharacterId,
    ) -> CoreResult<bool> {
        let mut inventories = self.inventories.write().await;
        let Some(record) = inventories.get_mut(&player_id) else {
            return Ok(false);
        };
        let before = record.obtained.len();
        record.obtained.retain(|c| c.character_id != character_id);
        Ok(record.obtained.len() < before)
    }

    async fn set_nickname(
        &self,
        player_id: PlayerId,
        character_id: CharacterId,
        nickname: &str,
    ) -> CoreResult<bool> {
        let mut inventories = self.inventories.write().await;
        let Some(character) = inventories
            .get_mut(&player_id)
            .and_then(|r| r.obtained.iter_mut().find(|c| c.character_id == character_id))
        else {
            return Ok(false);
        };
        character.nickname = nickname.to_string();
        Ok(true)
    }

    async fn set_character_experience(
        &self,
        player_id: PlayerId,
        character_id: CharacterId,
        experience: CharacterExperience,
    ) -> CoreResult<bool> {
        let mut inventories = self.inventories.write().await;
        let Some(character) = inventories
            .get_mut(&player_id)
            .and_then(|r| r.obtained.iter_mut().find(|c| c.character_id == character_id))
        else {
            return Ok(false);
        };
        character.experience = experience;
        Ok(true)
    }

    async fn delete(&self, player_id: PlayerId) -> CoreResult<bool> {
        self.check(FailPoint::InventoryDelete)?;
        Ok(self.inventories.write().await.remove(&player_id).is_some())
    }
}

#[async_trait]
impl ShopStore for MemoryStore {
    async fn insert(&self, item: &ShopItem) -> CoreResult<()> {
        let mut shop = self.shop.write().await;
        if shop.iter().any(|i| i.name.eq_ignore_ascii_case(&item.name)) {
            return Err(CoreError::Conflict(format!(
                "{} is already in the shop",
                item.name
            )));
        }
        shop.push(item.clone());
        Ok(())
    }

    async fn find_by_name(&self, name: &str) -> CoreResult<Option<ShopItem>> {
        Ok(self
            .shop
            .read()
            .await
            .iter()
            .find(|i| i.name.eq_ignore_ascii_case(name.trim()))
            .cloned())
    }

    async fn list(&self) -> CoreResult<Vec<ShopItem>> {
        Ok(self.shop.read().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::Utc;

    use super::*;
    use crate::account::StartingGrants;
    use crate::rarity::Rarity;
    use crate::types::new_id;

    fn entry(name: &str) -> CharacterIndexEntry {
        CharacterIndexEntry {
            id: new_id(),
            name: name.into(),
            rarity: Rarity::Common,
            image: "img".into(),
            description: "desc".into(),
            collected: false,
        }
    }

    fn account(username: &str) -> PlayerAccount {
        PlayerAccount::new(
            new_id(),
            username.into(),
            format!("{username}@example.com"),
            "hash".into(),
            StartingGrants::default(),
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn mark_collected_flips_once() {
        let (_, stores) = MemoryStore::stores();
        let e = entry("koromon");
        stores.index.insert(&e).await.unwrap();
        assert!(stores.index.mark_collected(e.id).await.unwrap());
        assert!(!stores.index.mark_collected(e.id).await.unwrap());
    }

    #[tokio::test]
    async fn index_names_are_unique_ignoring_case() {
        let (_, stores) = MemoryStore::stores();
        stores.index.insert(&entry("koromon")).await.unwrap();
        assert_matches!(
            stores.index.insert(&entry("KOROMON")).await,
            Err(CoreError::Conflict(_))
        );
    }

    #[tokio::test]
    async fn counters_floor_at_zero() {
        let (_, stores) = MemoryStore::stores();
        let a = account("player1");
        stores.accounts.insert(&a).await.unwrap();
        let left = stores
            .accounts
            .adjust_tickets(a.id, TicketType::Normal, -10)
            .await
            .unwrap();
        assert_eq!(left, 0);
        assert_eq!(stores.accounts.adjust_currency(a.id, -1).await.unwrap(), 0);
        assert_eq!(stores.accounts.adjust_currency(a.id, 25).await.unwrap(), 25);
    }

    #[tokio::test]
    async fn conditional_spend_refuses_instead_of_flooring() {
        let (_, stores) = MemoryStore::stores();
        let a = account("player1");
        stores.accounts.insert(&a).await.unwrap();
        stores.accounts.adjust_currency(a.id, 5).await.unwrap();
        assert_eq!(stores.accounts.try_spend_currency(a.id, 6).await.unwrap(), None);
        assert_eq!(stores.accounts.try_spend_currency(a.id, 5).await.unwrap(), Some(0));
    }

    #[tokio::test]
    async fn inventory_never_holds_a_character_twice() {
        let (_, stores) = MemoryStore::stores();
        let player = new_id();
        stores
            .inventory
            .create(&InventoryRecord::empty(player))
            .await
            .unwrap();
        let e = entry("koromon");
        let obtained = ObtainedCharacter::from_index(&e, &Default::default());
        assert!(stores.inventory.add_character(player, &obtained).await.unwrap());
        assert!(!stores.inventory.add_character(player, &obtained).await.unwrap());
        let record = stores.inventory.get(player).await.unwrap().unwrap();
        assert_eq!(record.obtained.len(), 1);
    }

    #[tokio::test]
    async fn fail_point_surfaces_transient() {
        let (backend, stores) = MemoryStore::stores();
        backend.fail(FailPoint::PoolInsert);
        let pool_entry = GachaPoolEntry {
            character_id: new_id(),
            pull_rate: 0.5,
            duplicate_currency: 10,
        };
        assert_matches!(
            stores.pool.insert(&pool_entry).await,
            Err(CoreError::Transient(_))
        );
        backend.heal(FailPoint::PoolInsert);
        assert!(stores.pool.insert(&pool_entry).await.is_ok());
    }
}
