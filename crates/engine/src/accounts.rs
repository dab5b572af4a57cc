//! Player accounts: registration, login, removal, balances, leveling,
//! free-ticket cooldown and pull history.

use gacha_core::account::{
    AccountProfile, PlayerAccount, PlayerMetadata, PullHistoryEntry, PullType, PulledCharacter,
    TicketCount, TicketType,
};
use gacha_core::error::{CoreError, CoreResult};
use gacha_core::inventory::InventoryRecord;
use gacha_core::progression::{apply_experience, LevelUpOutcome};
use gacha_core::types::{new_id, CharacterId, PlayerId, Timestamp};
use gacha_core::validation::{
    validate_email, validate_password, validate_positive_integer, validate_string,
    validate_username,
};
use serde::Serialize;

use crate::password::{hash_password, verify_password};
use crate::{parse_player_id, report_undo, GachaEngine};

const LOGIN_FAILED: &str = "Either the email or password is invalid";

/// Result of a free-ticket check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FreeTicketStatus {
    pub granted: bool,
    /// Time until the next free ticket. Zero or negative (overdue) when this
    /// call granted one.
    pub remaining_millis: i64,
}

impl GachaEngine {
    /// Create an account and its empty inventory.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> CoreResult<AccountProfile> {
        let username = validate_username(username)?;
        let email = validate_email(email)?;
        let password = validate_password(password)?;

        if self
            .stores
            .accounts
            .find_by_username(&username)
            .await?
            .is_some()
        {
            return Err(CoreError::Conflict(
                "There already exists a user with that username".into(),
            ));
        }
        if self.stores.accounts.find_by_email(&email).await?.is_some() {
            return Err(CoreError::Conflict(
                "There already exists a user with that email".into(),
            ));
        }

        let password_hash = hash_password(&password)
            .map_err(|e| CoreError::Internal(format!("Password hashing error: {e}")))?;

        let account = PlayerAccount::new(
            new_id(),
            username,
            email,
            password_hash,
            self.tuning.starting,
            self.now(),
        );
        self.stores.accounts.insert(&account).await?;

        if let Err(e) = self
            .stores
            .inventory
            .create(&InventoryRecord::empty(account.id))
            .await
        {
            tracing::error!(
                player_id = %account.id,
                error = %e,
                "Inventory creation failed, removing new account",
            );
            if let Err(undo) = self.stores.accounts.delete(account.id).await {
                tracing::error!(player_id = %account.id, error = %undo, "Account rollback failed");
            }
            return Err(e);
        }

        tracing::info!(player_id = %account.id, username = %account.username, "Player registered");
        Ok(account.profile())
    }

    /// Check credentials. Every failure looks the same to the caller.
    pub async fn login(&self, email: &str, password: &str) -> CoreResult<AccountProfile> {
        let email = validate_string(email, "Email")?.to_lowercase();
        let password = validate_string(password, "Password")?;

        let Some(account) = self.stores.accounts.find_by_email(&email).await? else {
            tracing::info!("Login failed: unknown email");
            return Err(CoreError::Unauthorized(LOGIN_FAILED.into()));
        };

        let valid = verify_password(&password, &account.password_hash)
            .map_err(|e| CoreError::Internal(format!("Password verification error: {e}")))?;
        if !valid {
            tracing::info!(player_id = %account.id, "Login failed: wrong password");
            return Err(CoreError::Unauthorized(LOGIN_FAILED.into()));
        }

        Ok(account.profile())
    }

    /// Delete the account and its inventory.
    ///
    /// Both records must exist. The inventory goes first; if the account
    /// delete then fails, the inventory is written back from its snapshot.
    pub async fn remove_account(&self, player_id: &str) -> CoreResult<()> {
        let player_id = parse_player_id(player_id)?;
        let _guard = self.locks.lock(player_id).await;

        self.require_account(player_id).await?;
        let snapshot = self
            .stores
            .inventory
            .get(player_id)
            .await?
            .ok_or_else(|| CoreError::not_found("inventory", player_id))?;

        self.stores.inventory.delete(player_id).await?;

        let removed = match self.stores.accounts.delete(player_id).await {
            Ok(removed) => removed,
            Err(e) => {
                tracing::error!(
                    player_id = %player_id,
                    error = %e,
                    "Account delete failed, restoring inventory",
                );
                if let Err(undo) = self.stores.inventory.create(&snapshot).await {
                    tracing::error!(player_id = %player_id, error = %undo, "Inventory restore failed");
                }
                return Err(e);
            }
        };

        if !removed {
            return Err(CoreError::not_found("player", player_id));
        }
        tracing::info!(player_id = %player_id, "Player removed");
        Ok(())
    }

    pub async fn get_metadata(&self, player_id: &str) -> CoreResult<PlayerMetadata> {
        let player_id = parse_player_id(player_id)?;
        Ok(self.require_account(player_id).await?.metadata)
    }

    /// Most recent first.
    pub async fn get_pull_history(&self, player_id: &str) -> CoreResult<Vec<PullHistoryEntry>> {
        let player_id = parse_player_id(player_id)?;
        Ok(self.require_account(player_id).await?.pull_history)
    }

    pub async fn get_ticket_balance(&self, player_id: &str, ticket_type: &str) -> CoreResult<i64> {
        let player_id = parse_player_id(player_id)?;
        let ticket_type: TicketType = ticket_type.parse()?;
        let account = self.require_account(player_id).await?;
        Ok(account.metadata.ticket_count.get(ticket_type))
    }

    pub async fn get_ticket_balances(&self, player_id: &str) -> CoreResult<TicketCount> {
        let player_id = parse_player_id(player_id)?;
        Ok(self.require_account(player_id).await?.metadata.ticket_count)
    }

    /// Add `delta` tickets, floored at zero. A zero delta is a no-op.
    pub async fn update_ticket_count(
        &self,
        player_id: &str,
        ticket_type: &str,
        delta: i64,
    ) -> CoreResult<i64> {
        let player_id = parse_player_id(player_id)?;
        let ticket_type: TicketType = ticket_type.parse()?;
        let _guard = self.locks.lock(player_id).await;
        self.stores
            .accounts
            .adjust_tickets(player_id, ticket_type, delta)
            .await
    }

    /// Add `delta` currency, floored at zero. Unlike tickets, a zero delta is
    /// rejected.
    pub async fn update_currency(&self, player_id: &str, delta: i64) -> CoreResult<i64> {
        let player_id = parse_player_id(player_id)?;
        if delta == 0 {
            return Err(CoreError::invalid("Currency change", "must not be zero"));
        }
        let _guard = self.locks.lock(player_id).await;
        self.stores.accounts.adjust_currency(player_id, delta).await
    }

    /// Grant experience, leveling up as many times as it covers.
    pub async fn level_up_player(
        &self,
        player_id: &str,
        gained_exp: i64,
    ) -> CoreResult<LevelUpOutcome> {
        let player_id = parse_player_id(player_id)?;
        let gained_exp = validate_positive_integer(gained_exp, "Experience")?;
        let _guard = self.locks.lock(player_id).await;
        self.grant_player_exp(player_id, gained_exp).await
    }

    /// Set the free-ticket cooldown to `hours` from now.
    pub async fn set_ticket_cooldown(&self, player_id: &str, hours: i64) -> CoreResult<Timestamp> {
        let player_id = parse_player_id(player_id)?;
        if hours < 0 {
            return Err(CoreError::invalid("Cooldown hours", "must not be negative"));
        }
        let _guard = self.locks.lock(player_id).await;
        let cooldown = self.now() + chrono::Duration::hours(hours);
        self.stores
            .accounts
            .set_ticket_cooldown(player_id, Some(cooldown))
            .await?;
        Ok(cooldown)
    }

    /// Grant the free normal ticket if the cooldown has passed, and restart it.
    pub async fn check_free_ticket(&self, player_id: &str) -> CoreResult<FreeTicketStatus> {
        let player_id = parse_player_id(player_id)?;
        let _guard = self.locks.lock(player_id).await;

        let account = self.require_account(player_id).await?;
        let now = self.now();
        let remaining_millis = account
            .metadata
            .ticket_count
            .cooldown
            .map_or(0, |cooldown| (cooldown - now).num_milliseconds());

        if remaining_millis > 0 {
            return Ok(FreeTicketStatus {
                granted: false,
                remaining_millis,
            });
        }

        self.stores
            .accounts
            .grant_free_ticket(player_id, now, now + self.tuning.free_ticket_cooldown)
            .await?;
        tracing::info!(player_id = %player_id, "Free ticket granted");

        Ok(FreeTicketStatus {
            granted: true,
            remaining_millis,
        })
    }

    /// Resolve `character_ids` from the index and prepend them to the history
    /// as one entry.
    pub async fn record_pull(
        &self,
        player_id: &str,
        character_ids: &[CharacterId],
    ) -> CoreResult<PullHistoryEntry> {
        let player_id = parse_player_id(player_id)?;
        if character_ids.is_empty() {
            return Err(CoreError::invalid("Pulled characters", "can not be empty"));
        }
        let _guard = self.locks.lock(player_id).await;
        self.require_account(player_id).await?;

        let now = self.now();
        let mut pulled = Vec::with_capacity(character_ids.len());
        for id in character_ids {
            let entry = self
                .stores
                .index
                .find_by_id(*id)
                .await?
                .ok_or_else(|| CoreError::not_found("character", id))?;
            pulled.push(PulledCharacter {
                character_id: entry.id,
                name: entry.name,
                rarity: entry.rarity,
                timestamp: now,
                image: entry.image,
            });
        }
        self.push_history(player_id, pulled).await
    }

    /// Caller holds the player lock.
    pub(crate) async fn push_history(
        &self,
        player_id: PlayerId,
        pulled: Vec<PulledCharacter>,
    ) -> CoreResult<PullHistoryEntry> {
        let entry = PullHistoryEntry {
            pull_type: PullType::for_count(pulled.len()),
            pulled,
        };
        self.stores
            .accounts
            .push_pull_history(player_id, &entry, self.tuning.pull_history_limit)
            .await?;
        Ok(entry)
    }

    /// Apply experience and mint the level-up tickets. Caller holds the
    /// player lock.
    pub(crate) async fn grant_player_exp(
        &self,
        player_id: PlayerId,
        gained_exp: i64,
    ) -> CoreResult<LevelUpOutcome> {
        let account = self.require_account(player_id).await?;
        let outcome = apply_experience(account.metadata.experience, gained_exp);

        self.stores
            .accounts
            .set_experience(player_id, outcome.experience)
            .await?;
        if outcome.normal_tickets > 0 {
            self.stores
                .accounts
                .adjust_tickets(player_id, TicketType::Normal, outcome.normal_tickets)
                .await?;
        }
        if outcome.golden_tickets > 0 {
            self.stores
                .accounts
                .adjust_tickets(player_id, TicketType::Golden, outcome.golden_tickets)
                .await?;
        }

        if outcome.leveled_up() {
            tracing::info!(
                player_id = %player_id,
                level = outcome.experience.level,
                normal_tickets = outcome.normal_tickets,
                golden_tickets = outcome.golden_tickets,
                "Player leveled up",
            );
        }
        Ok(outcome)
    }

    /// Put experience and every balance back to `before`. Only fields that
    /// moved are written. Caller holds the player lock.
    pub(crate) async fn restore_balances(&self, before: &PlayerAccount) {
        let player_id = before.id;
        let accounts = &self.stores.accounts;
        let current = match accounts.find_by_id(player_id).await {
            Ok(Some(current)) => current.metadata,
            Ok(None) => return,
            Err(e) => {
                report_undo::<()>(player_id, "reload account", Err(e));
                return;
            }
        };
        let before = &before.metadata;

        if current.experience != before.experience {
            report_undo(
                player_id,
                "restore experience",
                accounts.set_experience(player_id, before.experience).await,
            );
        }
        let currency = before.currency - current.currency;
        if currency != 0 {
            report_undo(
                player_id,
                "restore currency",
                accounts.adjust_currency(player_id, currency).await,
            );
        }
        let food = before.food_count - current.food_count;
        if food != 0 {
            report_undo(
                player_id,
                "restore food",
                accounts.adjust_food(player_id, food).await,
            );
        }
        for ticket_type in [TicketType::Normal, TicketType::Golden] {
            let delta = before.ticket_count.get(ticket_type) - current.ticket_count.get(ticket_type);
            if delta != 0 {
                report_undo(
                    player_id,
                    "restore tickets",
                    accounts.adjust_tickets(player_id, ticket_type, delta).await,
                );
            }
        }
    }
}
