//! Store ports.
//!
//! The engine is written against these traits, one per logical store, and
//! receives them through [`Stores`]. Counter mutations are store-level atomic
//! operations so the non-negative floors hold without read-modify-write in
//! the caller.

pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;

use crate::account::{PlayerAccount, PullHistoryEntry, TicketType};
use crate::catalog::{CharacterIndexEntry, GachaPoolEntry};
use crate::error::CoreResult;
use crate::inventory::{CharacterExperience, InventoryRecord, ObtainedCharacter};
use crate::progression::Experience;
use crate::shop::ShopItem;
use crate::types::{CharacterId, PlayerId, Timestamp};

#[async_trait]
pub trait CharacterIndexStore: Send + Sync {
    /// Fails `Conflict` if the name is taken (case-insensitive).
    async fn insert(&self, entry: &CharacterIndexEntry) -> CoreResult<()>;

    async fn find_by_id(&self, id: CharacterId) -> CoreResult<Option<CharacterIndexEntry>>;

    /// Case-insensitive lookup.
    async fn find_by_name(&self, name: &str) -> CoreResult<Option<CharacterIndexEntry>>;

    async fn list(&self) -> CoreResult<Vec<CharacterIndexEntry>>;

    /// Flip `collected` only if it is currently false. Returns `true` iff this
    /// call performed the flip. Fails `NotFound` for an unknown id.
    async fn mark_collected(&self, id: CharacterId) -> CoreResult<bool>;

    /// Undo a [`CharacterIndexStore::mark_collected`] flip. Returns `true` if
    /// the flag was set.
    async fn unmark_collected(&self, id: CharacterId) -> CoreResult<bool>;

    /// Returns `true` if an entry was removed.
    async fn delete(&self, id: CharacterId) -> CoreResult<bool>;
}

#[async_trait]
pub trait GachaPoolStore: Send + Sync {
    /// Fails `Conflict` if the character already has a pool entry.
    async fn insert(&self, entry: &GachaPoolEntry) -> CoreResult<()>;

    async fn find_by_id(&self, character_id: CharacterId) -> CoreResult<Option<GachaPoolEntry>>;

    async fn list(&self) -> CoreResult<Vec<GachaPoolEntry>>;
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Fails `Conflict` on a taken username or email.
    async fn insert(&self, account: &PlayerAccount) -> CoreResult<()>;

    async fn find_by_id(&self, id: PlayerId) -> CoreResult<Option<PlayerAccount>>;

    async fn find_by_username(&self, username: &str) -> CoreResult<Option<PlayerAccount>>;

    async fn find_by_email(&self, email: &str) -> CoreResult<Option<PlayerAccount>>;

    /// Add `delta` (any sign), floored at 0. Returns the new balance.
    async fn adjust_tickets(
        &self,
        id: PlayerId,
        ticket_type: TicketType,
        delta: i64,
    ) -> CoreResult<i64>;

    /// Add `delta` (any sign), floored at 0. Returns the new balance.
    async fn adjust_currency(&self, id: PlayerId, delta: i64) -> CoreResult<i64>;

    /// Add `delta` (any sign), floored at 0. Returns the new balance.
    async fn adjust_food(&self, id: PlayerId, delta: i64) -> CoreResult<i64>;

    /// Deduct `amount` only if the balance covers it. Returns the new balance,
    /// or `None` (nothing changed) when it does not.
    async fn try_spend_currency(&self, id: PlayerId, amount: i64) -> CoreResult<Option<i64>>;

    /// Deduct `amount` food only if available. Same contract as
    /// [`AccountStore::try_spend_currency`].
    async fn try_consume_food(&self, id: PlayerId, amount: i64) -> CoreResult<Option<i64>>;

    async fn set_experience(&self, id: PlayerId, experience: Experience) -> CoreResult<()>;

    async fn set_obtained_count(&self, id: PlayerId, count: i64) -> CoreResult<()>;

    async fn set_ticket_cooldown(&self, id: PlayerId, cooldown: Option<Timestamp>)
        -> CoreResult<()>;

    /// Grant one normal ticket and move the cooldown, as one update.
    async fn grant_free_ticket(
        &self,
        id: PlayerId,
        granted_at: Timestamp,
        next_cooldown: Timestamp,
    ) -> CoreResult<()>;

    async fn set_last_passive_income(&self, id: PlayerId, at: Timestamp) -> CoreResult<()>;

    /// Prepend `entry` and keep only the `limit` most recent entries.
    async fn push_pull_history(
        &self,
        id: PlayerId,
        entry: &PullHistoryEntry,
        limit: usize,
    ) -> CoreResult<()>;

    /// Returns `true` if an account was removed.
    async fn delete(&self, id: PlayerId) -> CoreResult<bool>;
}

#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Insert a whole record. Fails `Conflict` if the player already has one.
    async fn create(&self, record: &InventoryRecord) -> CoreResult<()>;

    async fn get(&self, player_id: PlayerId) -> CoreResult<Option<InventoryRecord>>;

    /// Append a character. Returns `false` (nothing changed) if the player
    /// already owns it; fails `NotFound` if the player has no record.
    async fn add_character(
        &self,
        player_id: PlayerId,
        character: &ObtainedCharacter,
    ) -> CoreResult<bool>;

    async fn find_character(
        &self,
        player_id: PlayerId,
        character_id: CharacterId,
    ) -> CoreResult<Option<ObtainedCharacter>>;

    /// Returns `false` if the player does not own the character.
    async fn remove_character(
        &self,
        player_id: PlayerId,
        character_id: CharacterId,
    ) -> CoreResult<bool>;

    /// Returns `false` if the player does not own the character.
    async fn set_nickname(
        &self,
        player_id: PlayerId,
        character_id: CharacterId,
        nickname: &str,
    ) -> CoreResult<bool>;

    /// Returns `false` if the player does not own the character.
    async fn set_character_experience(
        &self,
        player_id: PlayerId,
        character_id: CharacterId,
        experience: CharacterExperience,
    ) -> CoreResult<bool>;

    /// Returns `true` if a record was removed.
    async fn delete(&self, player_id: PlayerId) -> CoreResult<bool>;
}

#[async_trait]
pub trait ShopStore: Send + Sync {
    /// Fails `Conflict` on a taken name.
    async fn insert(&self, item: &ShopItem) -> CoreResult<()>;

    /// Case-insensitive lookup.
    async fn find_by_name(&self, name: &str) -> CoreResult<Option<ShopItem>>;

    async fn list(&self) -> CoreResult<Vec<ShopItem>>;
}

/// One handle per store, threaded through the engine.
#[derive(Clone)]
pub struct Stores {
    pub index: Arc<dyn CharacterIndexStore>,
    pub pool: Arc<dyn GachaPoolStore>,
    pub accounts: Arc<dyn AccountStore>,
    pub inventory: Arc<dyn InventoryStore>,
    pub shop: Arc<dyn ShopStore>,
}

impl Stores {
    /// Use one backend value for every store.
    pub fn from_backend<S>(backend: Arc<S>) -> Self
    where
        S: CharacterIndexStore
            + GachaPoolStore
            + AccountStore
            + InventoryStore
            + ShopStore
            + 'static,
    {
        Self {
            index: backend.clone(),
            pool: backend.clone(),
            accounts: backend.clone(),
            inventory: backend.clone(),
            shop: backend,
        }
    }
}
