//! Inventory operations: lookup, nicknames, feeding and character leveling.

use gacha_core::account::PlayerAccount;
use gacha_core::catalog::CharacterIndexEntry;
use gacha_core::error::{CoreError, CoreResult};
use gacha_core::inventory::{CharacterExperience, InventoryRecord, ObtainedCharacter};
use gacha_core::progression::apply_experience;
use gacha_core::types::{CharacterId, PlayerId};
use gacha_core::validation::{validate_id, validate_nickname, validate_positive_integer};
use serde::Serialize;

use crate::{parse_player_id, report_undo, GachaEngine};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeedResult {
    pub player_leveled_up: bool,
    pub character_leveled_up: bool,
    pub normal_tickets_granted: i64,
    pub golden_tickets_granted: i64,
}

fn parse_character_id(raw: &str) -> CoreResult<CharacterId> {
    validate_id(raw, "Character id")
}

impl GachaEngine {
    pub async fn get_inventory(&self, player_id: &str) -> CoreResult<InventoryRecord> {
        let player_id = parse_player_id(player_id)?;
        self.stores
            .inventory
            .get(player_id)
            .await?
            .ok_or_else(|| CoreError::not_found("inventory", player_id))
    }

    pub async fn get_character(
        &self,
        player_id: &str,
        character_id: &str,
    ) -> CoreResult<ObtainedCharacter> {
        let player_id = parse_player_id(player_id)?;
        let character_id = parse_character_id(character_id)?;
        self.require_owned(player_id, character_id).await
    }

    /// Rename an owned character. Returns the updated entry.
    pub async fn set_nickname(
        &self,
        player_id: &str,
        character_id: &str,
        nickname: &str,
    ) -> CoreResult<ObtainedCharacter> {
        let player_id = parse_player_id(player_id)?;
        let character_id = parse_character_id(character_id)?;
        let nickname = validate_nickname(nickname)?;
        let _guard = self.locks.lock(player_id).await;

        let updated = self
            .stores
            .inventory
            .set_nickname(player_id, character_id, &nickname)
            .await?;
        if !updated {
            return Err(CoreError::not_found("inventory character", character_id));
        }
        self.require_owned(player_id, character_id).await
    }

    /// Spend one food on an owned character.
    ///
    /// The character and the player both gain experience; nothing changes if
    /// the player has no food or does not own the character.
    pub async fn feed(&self, player_id: &str, character_id: &str) -> CoreResult<FeedResult> {
        let player_id = parse_player_id(player_id)?;
        let character_id = parse_character_id(character_id)?;
        let _guard = self.locks.lock(player_id).await;

        let account = self.require_account(player_id).await?;
        if account.metadata.food_count < 1 {
            return Err(CoreError::InsufficientResource {
                resource: "food".into(),
                required: 1,
                available: account.metadata.food_count,
            });
        }
        let character = self.require_owned(player_id, character_id).await?;

        if self
            .stores
            .accounts
            .try_consume_food(player_id, 1)
            .await?
            .is_none()
        {
            return Err(CoreError::InsufficientResource {
                resource: "food".into(),
                required: 1,
                available: 0,
            });
        }

        let granted = match self
            .grant_character_exp(player_id, &character, self.tuning.feed_character_exp)
            .await
        {
            Ok(leveled_up) => self
                .grant_player_exp(player_id, self.tuning.feed_player_exp)
                .await
                .map(|player| (leveled_up, player)),
            Err(e) => Err(e),
        };
        let (character_leveled_up, player) = match granted {
            Ok(granted) => granted,
            Err(e) => {
                tracing::warn!(
                    player_id = %player_id,
                    character_id = %character_id,
                    error = %e,
                    "Feeding failed, returning the food",
                );
                self.roll_back_feed(&account, &character).await;
                return Err(e);
            }
        };

        tracing::info!(
            player_id = %player_id,
            character_id = %character_id,
            character_leveled_up,
            player_leveled_up = player.leveled_up(),
            "Character fed",
        );

        Ok(FeedResult {
            player_leveled_up: player.leveled_up(),
            character_leveled_up,
            normal_tickets_granted: player.normal_tickets,
            golden_tickets_granted: player.golden_tickets,
        })
    }

    /// Give a player a character from the index. Returns `false` if they
    /// already own it.
    pub async fn add_character_to_inventory(
        &self,
        player_id: &str,
        character_id: &str,
    ) -> CoreResult<bool> {
        let player_id = parse_player_id(player_id)?;
        let character_id = parse_character_id(character_id)?;
        let _guard = self.locks.lock(player_id).await;

        self.require_account(player_id).await?;
        let entry = self
            .stores
            .index
            .find_by_id(character_id)
            .await?
            .ok_or_else(|| CoreError::not_found("character", character_id))?;
        self.insert_obtained(player_id, &entry).await
    }

    /// Grant experience to an owned character. Returns whether it leveled up.
    pub async fn level_up_character(
        &self,
        player_id: &str,
        character_id: &str,
        gained_exp: i64,
    ) -> CoreResult<bool> {
        let player_id = parse_player_id(player_id)?;
        let character_id = parse_character_id(character_id)?;
        let gained_exp = validate_positive_integer(gained_exp, "Experience")?;
        let _guard = self.locks.lock(player_id).await;

        let character = self.require_owned(player_id, character_id).await?;
        self.grant_character_exp(player_id, &character, gained_exp)
            .await
    }

    /// Restore the character's experience, then the food and player
    /// experience from `before`.
    async fn roll_back_feed(&self, before: &PlayerAccount, character: &ObtainedCharacter) {
        report_undo(
            before.id,
            "restore character experience",
            self.stores
                .inventory
                .set_character_experience(before.id, character.character_id, character.experience)
                .await,
        );
        self.restore_balances(before).await;
    }

    async fn require_owned(
        &self,
        player_id: PlayerId,
        character_id: CharacterId,
    ) -> CoreResult<ObtainedCharacter> {
        self.stores
            .inventory
            .find_character(player_id, character_id)
            .await?
            .ok_or_else(|| CoreError::not_found("inventory character", character_id))
    }

    /// Insert a fresh copy of `entry` and resync `obtained_count`. Caller
    /// holds the player lock.
    pub(crate) async fn insert_obtained(
        &self,
        player_id: PlayerId,
        entry: &CharacterIndexEntry,
    ) -> CoreResult<bool> {
        let obtained = ObtainedCharacter::from_index(entry, &self.tuning.rarity);
        let added = self
            .stores
            .inventory
            .add_character(player_id, &obtained)
            .await?;
        if !added {
            return Ok(false);
        }
        self.sync_obtained_count(player_id).await?;

        tracing::debug!(player_id = %player_id, character_id = %entry.id, "Character obtained");
        Ok(true)
    }

    /// Copy the inventory size into `obtained_count`. Caller holds the
    /// player lock.
    pub(crate) async fn sync_obtained_count(&self, player_id: PlayerId) -> CoreResult<()> {
        let owned = self
            .stores
            .inventory
            .get(player_id)
            .await?
            .map_or(0, |record| record.obtained.len());
        self.stores
            .accounts
            .set_obtained_count(player_id, owned as i64)
            .await
    }

    /// Run the leveling loop for one character and recompute its income.
    /// Caller holds the player lock.
    async fn grant_character_exp(
        &self,
        player_id: PlayerId,
        character: &ObtainedCharacter,
        gained_exp: i64,
    ) -> CoreResult<bool> {
        let outcome = apply_experience(character.experience.as_experience(), gained_exp);
        let experience = CharacterExperience::from_experience(
            outcome.experience,
            &self.tuning.rarity,
            character.rarity,
        );

        let updated = self
            .stores
            .inventory
            .set_character_experience(player_id, character.character_id, experience)
            .await?;
        if !updated {
            return Err(CoreError::not_found(
                "inventory character",
                character.character_id,
            ));
        }
        Ok(outcome.leveled_up())
    }
}
