//! [`PgStore`]: the store ports backed by PostgreSQL.

use async_trait::async_trait;
use gacha_core::account::{PlayerAccount, PullHistoryEntry, TicketType};
use gacha_core::catalog::{CharacterIndexEntry, GachaPoolEntry};
use gacha_core::error::{CoreError, CoreResult};
use gacha_core::inventory::{CharacterExperience, InventoryRecord, ObtainedCharacter};
use gacha_core::progression::Experience;
use gacha_core::shop::ShopItem;
use gacha_core::store::{
    AccountStore, CharacterIndexStore, GachaPoolStore, InventoryStore, ShopStore,
};
use gacha_core::types::{CharacterId, PlayerId, Timestamp};

use crate::error::{is_foreign_key_violation, map_db_error};
use crate::models::player::PlayerRow;
use crate::repositories::{
    CharacterIndexRepo, GachaPoolRepo, InventoryRepo, PlayerRepo, PullHistoryRepo, ShopRepo,
};
use crate::DbPool;

#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    async fn load_account(&self, row: Option<PlayerRow>) -> CoreResult<Option<PlayerAccount>> {
        let Some(row) = row else {
            return Ok(None);
        };
        let history = PullHistoryRepo::list_for_player(&self.pool, row.id)
            .await
            .map_err(map_db_error)?;
        row.into_account(history).map(Some)
    }

    /// Turn a `false` row-count result into `NotFound` for the player.
    fn require_player(updated: bool, id: PlayerId) -> CoreResult<()> {
        if updated {
            Ok(())
        } else {
            Err(CoreError::not_found("player", id))
        }
    }
}

#[async_trait]
impl CharacterIndexStore for PgStore {
    async fn insert(&self, entry: &CharacterIndexEntry) -> CoreResult<()> {
        CharacterIndexRepo::create(&self.pool, entry)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }

    async fn find_by_id(&self, id: CharacterId) -> CoreResult<Option<CharacterIndexEntry>> {
        CharacterIndexRepo::find_by_id(&self.pool, id)
            .await
            .map_err(map_db_error)?
            .map(CharacterIndexEntry::try_from)
            .transpose()
    }

    async fn find_by_name(&self, name: &str) -> CoreResult<Option<CharacterIndexEntry>> {
        CharacterIndexRepo::find_by_name(&self.pool, name)
            .await
            .map_err(map_db_error)?
            .map(CharacterIndexEntry::try_from)
            .transpose()
    }

    async fn list(&self) -> CoreResult<Vec<CharacterIndexEntry>> {
        CharacterIndexRepo::list(&self.pool)
            .await
            .map_err(map_db_error)?
            .into_iter()
            .map(CharacterIndexEntry::try_from)
            .collect()
    }

    async fn mark_collected(&self, id: CharacterId) -> CoreResult<bool> {
        let flipped = CharacterIndexRepo::mark_collected(&self.pool, id)
            .await
            .map_err(map_db_error)?;
        if flipped {
            return Ok(true);
        }
        let exists = CharacterIndexRepo::exists(&self.pool, id)
            .await
            .map_err(map_db_error)?;
        if exists {
            Ok(false)
        } else {
            Err(CoreError::not_found("character", id))
        }
    }

    async fn unmark_collected(&self, id: CharacterId) -> CoreResult<bool> {
        CharacterIndexRepo::unmark_collected(&self.pool, id)
            .await
            .map_err(map_db_error)
    }

    async fn delete(&self, id: CharacterId) -> CoreResult<bool> {
        CharacterIndexRepo::delete(&self.pool, id)
            .await
            .map_err(map_db_error)
    }
}

#[async_trait]
impl GachaPoolStore for PgStore {
    async fn insert(&self, entry: &GachaPoolEntry) -> CoreResult<()> {
        match GachaPoolRepo::create(&self.pool, entry).await {
            Ok(_) => Ok(()),
            Err(e) if is_foreign_key_violation(&e) => {
                Err(CoreError::not_found("character", entry.character_id))
            }
            Err(e) => Err(map_db_error(e)),
        }
    }

    async fn find_by_id(&self, character_id: CharacterId) -> CoreResult<Option<GachaPoolEntry>> {
        Ok(GachaPoolRepo::find_by_id(&self.pool, character_id)
            .await
            .map_err(map_db_error)?
            .map(GachaPoolEntry::from))
    }

    async fn list(&self) -> CoreResult<Vec<GachaPoolEntry>> {
        Ok(GachaPoolRepo::list(&self.pool)
            .await
            .map_err(map_db_error)?
            .into_iter()
            .map(GachaPoolEntry::from)
            .collect())
    }
}

#[async_trait]
impl AccountStore for PgStore {
    async fn insert(&self, account: &PlayerAccount) -> CoreResult<()> {
        PlayerRepo::create(&self.pool, account)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }

    async fn find_by_id(&self, id: PlayerId) -> CoreResult<Option<PlayerAccount>> {
        let row = PlayerRepo::find_by_id(&self.pool, id)
            .await
            .map_err(map_db_error)?;
        self.load_account(row).await
    }

    async fn find_by_username(&self, username: &str) -> CoreResult<Option<PlayerAccount>> {
        let row = PlayerRepo::find_by_username(&self.pool, username)
            .await
            .map_err(map_db_error)?;
        self.load_account(row).await
    }

    async fn find_by_email(&self, email: &str) -> CoreResult<Option<PlayerAccount>> {
        let row = PlayerRepo::find_by_email(&self.pool, email)
            .await
            .map_err(map_db_error)?;
        self.load_account(row).await
    }

    async fn adjust_tickets(
        &self,
        id: PlayerId,
        ticket_type: TicketType,
        delta: i64,
    ) -> CoreResult<i64> {
        PlayerRepo::adjust_tickets(&self.pool, id, ticket_type, delta)
            .await
            .map_err(map_db_error)?
            .ok_or_else(|| CoreError::not_found("player", id))
    }

    async fn adjust_currency(&self, id: PlayerId, delta: i64) -> CoreResult<i64> {
        PlayerRepo::adjust_currency(&self.pool, id, delta)
            .await
            .map_err(map_db_error)?
            .ok_or_else(|| CoreError::not_found("player", id))
    }

    async fn adjust_food(&self, id: PlayerId, delta: i64) -> CoreResult<i64> {
        PlayerRepo::adjust_food(&self.pool, id, delta)
            .await
            .map_err(map_db_error)?
            .ok_or_else(|| CoreError::not_found("player", id))
    }

    async fn try_spend_currency(&self, id: PlayerId, amount: i64) -> CoreResult<Option<i64>> {
        let spent = PlayerRepo::try_spend_currency(&self.pool, id, amount)
            .await
            .map_err(map_db_error)?;
        if spent.is_none() && !PlayerRepo::exists(&self.pool, id).await.map_err(map_db_error)? {
            return Err(CoreError::not_found("player", id));
        }
        Ok(spent)
    }

    async fn try_consume_food(&self, id: PlayerId, amount: i64) -> CoreResult<Option<i64>> {
        let consumed = PlayerRepo::try_consume_food(&self.pool, id, amount)
            .await
            .map_err(map_db_error)?;
        if consumed.is_none() && !PlayerRepo::exists(&self.pool, id).await.map_err(map_db_error)?
        {
            return Err(CoreError::not_found("player", id));
        }
        Ok(consumed)
    }

    async fn set_experience(&self, id: PlayerId, experience: Experience) -> CoreResult<()> {
        let updated = PlayerRepo::set_experience(&self.pool, id, experience)
            .await
            .map_err(map_db_error)?;
        Self::require_player(updated, id)
    }

    async fn set_obtained_count(&self, id: PlayerId, count: i64) -> CoreResult<()> {
        let updated = PlayerRepo::set_obtained_count(&self.pool, id, count)
            .await
            .map_err(map_db_error)?;
        Self::require_player(updated, id)
    }

    async fn set_ticket_cooldown(
        &self,
        id: PlayerId,
        cooldown: Option<Timestamp>,
    ) -> CoreResult<()> {
        let updated = PlayerRepo::set_ticket_cooldown(&self.pool, id, cooldown)
            .await
            .map_err(map_db_error)?;
        Self::require_player(updated, id)
    }

    async fn grant_free_ticket(
        &self,
        id: PlayerId,
        granted_at: Timestamp,
        next_cooldown: Timestamp,
    ) -> CoreResult<()> {
        let updated = PlayerRepo::grant_free_ticket(&self.pool, id, granted_at, next_cooldown)
            .await
            .map_err(map_db_error)?;
        Self::require_player(updated, id)
    }

    async fn set_last_passive_income(&self, id: PlayerId, at: Timestamp) -> CoreResult<()> {
        let updated = PlayerRepo::set_last_passive_income(&self.pool, id, at)
            .await
            .map_err(map_db_error)?;
        Self::require_player(updated, id)
    }

    async fn push_pull_history(
        &self,
        id: PlayerId,
        entry: &PullHistoryEntry,
        limit: usize,
    ) -> CoreResult<()> {
        match PullHistoryRepo::push(&self.pool, id, entry, limit).await {
            Ok(()) => Ok(()),
            Err(e) if is_foreign_key_violation(&e) => Err(CoreError::not_found("player", id)),
            Err(e) => Err(map_db_error(e)),
        }
    }

    async fn delete(&self, id: PlayerId) -> CoreResult<bool> {
        PlayerRepo::delete(&self.pool, id)
            .await
            .map_err(map_db_error)
    }
}

#[async_trait]
impl InventoryStore for PgStore {
    async fn create(&self, record: &InventoryRecord) -> CoreResult<()> {
        InventoryRepo::create(&self.pool, record.player_id, &record.obtained)
            .await
            .map_err(map_db_error)
    }

    async fn get(&self, player_id: PlayerId) -> CoreResult<Option<InventoryRecord>> {
        let exists = InventoryRepo::exists(&self.pool, player_id)
            .await
            .map_err(map_db_error)?;
        if !exists {
            return Ok(None);
        }
        let obtained = InventoryRepo::list_characters(&self.pool, player_id)
            .await
            .map_err(map_db_error)?
            .into_iter()
            .map(ObtainedCharacter::try_from)
            .collect::<CoreResult<Vec<_>>>()?;
        Ok(Some(InventoryRecord {
            player_id,
            obtained,
        }))
    }

    async fn add_character(
        &self,
        player_id: PlayerId,
        character: &ObtainedCharacter,
    ) -> CoreResult<bool> {
        match InventoryRepo::add_character(&self.pool, player_id, character).await {
            Ok(added) => Ok(added),
            Err(e) if is_foreign_key_violation(&e) => {
                Err(CoreError::not_found("inventory", player_id))
            }
            Err(e) => Err(map_db_error(e)),
        }
    }

    async fn find_character(
        &self,
        player_id: PlayerId,
        character_id: CharacterId,
    ) -> CoreResult<Option<ObtainedCharacter>> {
        InventoryRepo::find_character(&self.pool, player_id, character_id)
            .await
            .map_err(map_db_error)?
            .map(ObtainedCharacter::try_from)
            .transpose()
    }

    async fn remove_character(
        &self,
        player_id: PlayerId,
        character_id: CharacterId,
    ) -> CoreResult<bool> {
        InventoryRepo::remove_character(&self.pool, player_id, character_id)
            .await
            .map_err(map_db_error)
    }

    async fn set_nickname(
        &self,
        player_id: PlayerId,
        character_id: CharacterId,
        nickname: &str,
    ) -> CoreResult<bool> {
        InventoryRepo::set_nickname(&self.pool, player_id, character_id, nickname)
            .await
            .map_err(map_db_error)
    }

    async fn set_character_experience(
        &self,
        player_id: PlayerId,
        character_id: CharacterId,
        experience: CharacterExperience,
    ) -> CoreResult<bool> {
        InventoryRepo::set_experience(&self.pool, player_id, character_id, experience)
            .await
            .map_err(map_db_error)
    }

    async fn delete(&self, player_id: PlayerId) -> CoreResult<bool> {
        InventoryRepo::delete(&self.pool, player_id)
            .await
            .map_err(map_db_error)
    }
}

#[async_trait]
impl ShopStore for PgStore {
    async fn insert(&self, item: &ShopItem) -> CoreResult<()> {
        ShopRepo::create(&self.pool, item)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }

    async fn find_by_name(&self, name: &str) -> CoreResult<Option<ShopItem>> {
        ShopRepo::find_by_name(&self.pool, name)
            .await
            .map_err(map_db_error)?
            .map(ShopItem::try_from)
            .transpose()
    }

    async fn list(&self) -> CoreResult<Vec<ShopItem>> {
        ShopRepo::list(&self.pool)
            .await
            .map_err(map_db_error)?
            .into_iter()
            .map(ShopItem::try_from)
            .collect()
    }
}
