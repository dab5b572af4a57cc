//! Player account and progression records.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::progression::Experience;
use crate::rarity::Rarity;
use crate::types::{CharacterId, PlayerId, Timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketType {
    Normal,
    Golden,
}

impl TicketType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketType::Normal => "normal",
            TicketType::Golden => "golden",
        }
    }
}

impl fmt::Display for TicketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive; surrounding whitespace is ignored.
impl FromStr for TicketType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(TicketType::Normal),
            "golden" => Ok(TicketType::Golden),
            _ => Err(CoreError::invalid(
                "Ticket type",
                format!("'{s}' is not one of normal, golden"),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketCount {
    pub normal: i64,
    pub golden: i64,
    /// When the next free ticket becomes claimable. `None` means claimable now.
    pub cooldown: Option<Timestamp>,
    pub last_free_ticket_at: Option<Timestamp>,
}

impl TicketCount {
    pub fn get(&self, ticket_type: TicketType) -> i64 {
        match ticket_type {
            TicketType::Normal => self.normal,
            TicketType::Golden => self.golden,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerMetadata {
    pub currency: i64,
    pub food_count: i64,
    pub ticket_count: TicketCount,
    pub experience: Experience,
    /// Always equal to the size of the player's inventory.
    pub obtained_count: i64,
    pub last_passive_income_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PullType {
    Single,
    Bulk,
}

impl PullType {
    pub fn for_count(count: usize) -> Self {
        if count > 1 {
            PullType::Bulk
        } else {
            PullType::Single
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PullType::Single => "single",
            PullType::Bulk => "bulk",
        }
    }
}

impl FromStr for PullType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single" => Ok(PullType::Single),
            "bulk" => Ok(PullType::Bulk),
            _ => Err(CoreError::invalid("Pull type", format!("'{s}' is unknown"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PulledCharacter {
    pub character_id: CharacterId,
    pub name: String,
    pub rarity: Rarity,
    pub timestamp: Timestamp,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullHistoryEntry {
    pub pull_type: PullType,
    pub pulled: Vec<PulledCharacter>,
}

/// Starting grants for a freshly registered account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartingGrants {
    pub normal_tickets: i64,
    pub currency: i64,
    pub food: i64,
}

impl Default for StartingGrants {
    fn default() -> Self {
        Self {
            normal_tickets: 3,
            currency: 0,
            food: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerAccount {
    pub id: PlayerId,
    pub username: String,
    pub email: String,
    /// Argon2id PHC string. Never serialized.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub image: Option<String>,
    pub metadata: PlayerMetadata,
    /// Most recent first, bounded by the engine's history limit.
    pub pull_history: Vec<PullHistoryEntry>,
    pub created_at: Timestamp,
}

impl PlayerAccount {
    pub fn new(
        id: PlayerId,
        username: String,
        email: String,
        password_hash: String,
        grants: StartingGrants,
        now: Timestamp,
    ) -> Self {
        Self {
            id,
            username,
            email,
            password_hash,
            image: None,
            metadata: PlayerMetadata {
                currency: grants.currency,
                food_count: grants.food,
                ticket_count: TicketCount {
                    normal: grants.normal_tickets,
                    golden: 0,
                    cooldown: None,
                    last_free_ticket_at: None,
                },
                experience: Experience::default(),
                obtained_count: 0,
                last_passive_income_at: None,
            },
            pull_history: Vec::new(),
            created_at: now,
        }
    }

    /// The public projection returned by login.
    pub fn profile(&self) -> AccountProfile {
        AccountProfile {
            player_id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            image: self.image.clone(),
            metadata: self.metadata.clone(),
            pull_history: self.pull_history.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountProfile {
    pub player_id: PlayerId,
    pub username: String,
    pub email: String,
    pub image: Option<String>,
    pub metadata: PlayerMetadata,
    pub pull_history: Vec<PullHistoryEntry>,
}
