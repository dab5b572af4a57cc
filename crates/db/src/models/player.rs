//! Player account and pull history rows.

use gacha_core::account::{
    PlayerAccount, PlayerMetadata, PullHistoryEntry, PulledCharacter, TicketCount,
};
use gacha_core::error::CoreError;
use gacha_core::progression::Experience;
use gacha_core::types::{PlayerId, Timestamp};
use sqlx::FromRow;

/// A row from the `players` table. Metadata is flattened into columns.
#[derive(Debug, Clone, FromRow)]
pub struct PlayerRow {
    pub id: PlayerId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub image: Option<String>,
    pub currency: i64,
    pub food_count: i64,
    pub normal_tickets: i64,
    pub golden_tickets: i64,
    pub ticket_cooldown: Option<Timestamp>,
    pub last_free_ticket_at: Option<Timestamp>,
    pub curr_exp: i64,
    pub exp_capacity: i64,
    pub level: i64,
    pub obtained_count: i64,
    pub last_passive_income_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl PlayerRow {
    /// Assemble the domain account from this row plus its history rows
    /// (already ordered most recent first).
    pub fn into_account(self, history: Vec<PullHistoryRow>) -> Result<PlayerAccount, CoreError> {
        let pull_history = history
            .into_iter()
            .map(PullHistoryEntry::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PlayerAccount {
            id: self.id,
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
            image: self.image,
            metadata: PlayerMetadata {
                currency: self.currency,
                food_count: self.food_count,
                ticket_count: TicketCount {
                    normal: self.normal_tickets,
                    golden: self.golden_tickets,
                    cooldown: self.ticket_cooldown,
                    last_free_ticket_at: self.last_free_ticket_at,
                },
                experience: Experience {
                    curr_exp: self.curr_exp,
                    exp_capacity: self.exp_capacity,
                    level: self.level,
                },
                obtained_count: self.obtained_count,
                last_passive_income_at: self.last_passive_income_at,
            },
            pull_history,
            created_at: self.created_at,
        })
    }
}

/// A row from the `pull_history` table. `pulled` is a JSONB array of
/// [`PulledCharacter`].
#[derive(Debug, Clone, FromRow)]
pub struct PullHistoryRow {
    pub id: i64,
    pub player_id: PlayerId,
    pub pull_type: String,
    pub pulled: serde_json::Value,
    pub created_at: Timestamp,
}

impl TryFrom<PullHistoryRow> for PullHistoryEntry {
    type Error = CoreError;

    fn try_from(row: PullHistoryRow) -> Result<Self, Self::Error> {
        let pull_type = row
            .pull_type
            .parse()
            .map_err(|e| CoreError::Internal(format!("pull history {}: {e}", row.id)))?;
        let pulled: Vec<PulledCharacter> = serde_json::from_value(row.pulled)
            .map_err(|e| CoreError::Internal(format!("pull history {}: {e}", row.id)))?;
        Ok(PullHistoryEntry { pull_type, pulled })
    }
}
