//! The pull engine.

use std::collections::HashMap;

use gacha_core::account::{PlayerAccount, PulledCharacter, TicketType};
use gacha_core::catalog::{CharacterIndexEntry, GachaPoolEntry};
use gacha_core::draw::WeightTable;
use gacha_core::error::{CoreError, CoreResult};
use gacha_core::inventory::ObtainedCharacter;
use gacha_core::rarity::Rarity;
use gacha_core::types::{CharacterId, PlayerId};
use gacha_core::validation::validate_positive_integer;
use serde::Serialize;

use crate::tuning::DuplicatePolicy;
use crate::{parse_player_id, report_undo, GachaEngine};

/// What happened to one drawn character.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PullOutcome {
    /// Added to the player's inventory.
    New,
    /// Already collected; paid out in currency instead.
    Duplicate { currency: i64 },
    /// Should have been added, but the inventory insert failed. The pull
    /// still counts.
    InsertFailed { reason: String },
}

impl PullOutcome {
    /// Currency credited for this draw; zero unless a duplicate.
    pub fn currency(&self) -> i64 {
        match self {
            PullOutcome::Duplicate { currency } => *currency,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PulledItem {
    pub character_id: CharacterId,
    pub name: String,
    pub rarity: Rarity,
    pub image: String,
    pub outcome: PullOutcome,
}

/// Aggregated result of one pull batch. `pulled`, `duplicates` and `items`
/// are parallel, in draw order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PullResult {
    pub pulled: Vec<CharacterId>,
    pub duplicates: Vec<i64>,
    pub normal_tickets_granted: i64,
    pub golden_tickets_granted: i64,
    pub items: Vec<PulledItem>,
}

/// Writes a batch has made so far, undone if a later step fails.
#[derive(Debug, Default)]
struct PullJournal {
    flipped: Vec<CharacterId>,
    inserted: Vec<CharacterId>,
}

impl GachaEngine {
    /// Spend `count` tickets of `ticket_type` on `count` independent draws.
    ///
    /// Nothing is charged unless every precondition holds. Per-character
    /// inventory failures are reported in the result instead of aborting the
    /// batch. Any other store failure rolls the batch back (inventory,
    /// collected flags, currency, experience and tickets) before the error is
    /// returned, so the call can be retried. Tickets are deducted last.
    pub async fn gacha_pull(
        &self,
        player_id: &str,
        count: i64,
        ticket_type: &str,
    ) -> CoreResult<PullResult> {
        // 1. Validate input in order.
        let player_id = parse_player_id(player_id)?;
        let count = validate_positive_integer(count, "Count")?;
        let ticket_type: TicketType = ticket_type.parse()?;

        let _guard = self.locks.lock(player_id).await;

        // 2. Account and ticket balance.
        let account = self.require_account(player_id).await?;
        let available = account.metadata.ticket_count.get(ticket_type);
        if available < count {
            return Err(CoreError::InsufficientResource {
                resource: format!("{ticket_type} tickets"),
                required: count,
                available,
            });
        }

        // 3. Weight table and draw.
        let pool = self.stores.pool.list().await?;
        let table = WeightTable::build(&pool, ticket_type, self.tuning.golden_boost)?;
        let drawn = {
            let mut rng = rand::rng();
            table.draw(count as usize, &mut rng)
        };

        let mut journal = PullJournal::default();
        match self
            .apply_pull(player_id, ticket_type, &pool, &drawn, &mut journal)
            .await
        {
            Ok(result) => {
                tracing::info!(
                    player_id = %player_id,
                    count,
                    ticket_type = %ticket_type,
                    new = journal.inserted.len(),
                    normal_tickets_granted = result.normal_tickets_granted,
                    golden_tickets_granted = result.golden_tickets_granted,
                    "Gacha pull completed",
                );
                Ok(result)
            }
            Err(e) => {
                tracing::warn!(player_id = %player_id, error = %e, "Gacha pull failed, rolling back");
                self.roll_back_pull(&account, &journal).await;
                Err(e)
            }
        }
    }

    /// Steps 4 to 7 of a pull. Every write is recorded in `journal` or is
    /// restorable from the account snapshot taken before the draw.
    async fn apply_pull(
        &self,
        player_id: PlayerId,
        ticket_type: TicketType,
        pool: &[GachaPoolEntry],
        drawn: &[CharacterId],
        journal: &mut PullJournal,
    ) -> CoreResult<PullResult> {
        let count = drawn.len() as i64;
        let pool_by_id: HashMap<CharacterId, &GachaPoolEntry> =
            pool.iter().map(|e| (e.character_id, e)).collect();

        // 4. Resolve each draw.
        let mut items = Vec::with_capacity(drawn.len());
        for character_id in drawn {
            let entry = self
                .stores
                .index
                .find_by_id(*character_id)
                .await?
                .ok_or_else(|| CoreError::not_found("character", character_id))?;
            let duplicate_currency = pool_by_id
                .get(character_id)
                .map_or(0, |e| e.duplicate_currency);
            let outcome = self
                .resolve_draw(player_id, &entry, duplicate_currency, journal)
                .await?;
            items.push(PulledItem {
                character_id: entry.id,
                name: entry.name,
                rarity: entry.rarity,
                image: entry.image,
                outcome,
            });
        }
        if !journal.inserted.is_empty() {
            self.sync_obtained_count(player_id).await?;
        }

        // 5. Experience and level-up tickets.
        let exp = self.tuning.exp_per_pull * count;
        let (normal_granted, golden_granted) = if exp > 0 {
            let outcome = self.grant_player_exp(player_id, exp).await?;
            (outcome.normal_tickets, outcome.golden_tickets)
        } else {
            (0, 0)
        };

        // 6. History.
        let now = self.now();
        let history = items
            .iter()
            .map(|item| PulledCharacter {
                character_id: item.character_id,
                name: item.name.clone(),
                rarity: item.rarity,
                timestamp: now,
                image: item.image.clone(),
            })
            .collect();
        self.push_history(player_id, history).await?;

        // 7. Charge the tickets.
        self.stores
            .accounts
            .adjust_tickets(player_id, ticket_type, -count)
            .await?;

        Ok(PullResult {
            pulled: items.iter().map(|i| i.character_id).collect(),
            duplicates: items.iter().map(|i| i.outcome.currency()).collect(),
            normal_tickets_granted: normal_granted,
            golden_tickets_granted: golden_granted,
            items,
        })
    }

    /// Decide new vs duplicate for one draw and apply its side effect.
    ///
    /// The global collected flag is flipped on every draw. Under
    /// [`DuplicatePolicy::Global`] the flip decides the outcome; under
    /// [`DuplicatePolicy::PerPlayer`] ownership does.
    async fn resolve_draw(
        &self,
        player_id: PlayerId,
        entry: &CharacterIndexEntry,
        duplicate_currency: i64,
        journal: &mut PullJournal,
    ) -> CoreResult<PullOutcome> {
        let first_collector = match self.stores.index.mark_collected(entry.id).await {
            Ok(flipped) => flipped,
            Err(e) => {
                tracing::warn!(character_id = %entry.id, error = %e, "mark_collected failed");
                return Ok(PullOutcome::InsertFailed {
                    reason: e.to_string(),
                });
            }
        };
        if first_collector {
            journal.flipped.push(entry.id);
        }

        let is_new = match self.tuning.duplicate_policy {
            DuplicatePolicy::Global => first_collector,
            DuplicatePolicy::PerPlayer => self
                .stores
                .inventory
                .find_character(player_id, entry.id)
                .await?
                .is_none(),
        };

        if !is_new {
            self.stores
                .accounts
                .adjust_currency(player_id, duplicate_currency)
                .await?;
            return Ok(PullOutcome::Duplicate {
                currency: duplicate_currency,
            });
        }

        let obtained = ObtainedCharacter::from_index(entry, &self.tuning.rarity);
        match self.stores.inventory.add_character(player_id, &obtained).await {
            Ok(true) => {
                journal.inserted.push(entry.id);
                Ok(PullOutcome::New)
            }
            Ok(false) => {
                tracing::warn!(
                    player_id = %player_id,
                    character_id = %entry.id,
                    "Drawn character already in inventory",
                );
                Ok(PullOutcome::InsertFailed {
                    reason: "already in inventory".into(),
                })
            }
            Err(e) => {
                tracing::warn!(
                    player_id = %player_id,
                    character_id = %entry.id,
                    error = %e,
                    "Inventory insert failed",
                );
                Ok(PullOutcome::InsertFailed {
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Put the player back where `before` left them. Each undo step runs
    /// even if an earlier one fails; failures are logged.
    async fn roll_back_pull(&self, before: &PlayerAccount, journal: &PullJournal) {
        let player_id = before.id;

        for character_id in &journal.inserted {
            report_undo(
                player_id,
                "remove character",
                self.stores
                    .inventory
                    .remove_character(player_id, *character_id)
                    .await,
            );
        }
        for character_id in &journal.flipped {
            report_undo(
                player_id,
                "unmark collected",
                self.stores.index.unmark_collected(*character_id).await,
            );
        }
        if !journal.inserted.is_empty() {
            report_undo(
                player_id,
                "restore obtained count",
                self.stores
                    .accounts
                    .set_obtained_count(player_id, before.metadata.obtained_count)
                    .await,
            );
        }
        self.restore_balances(before).await;
    }
}

