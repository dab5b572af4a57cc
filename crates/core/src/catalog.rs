//! Character index and gacha pool records.
//!
//! Both stores are keyed by the same [`CharacterId`]: a pool entry never
//! exists without its index entry.

use serde::{Deserialize, Serialize};

use crate::rarity::Rarity;
use crate::types::CharacterId;

/// Canonical definition of a character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterIndexEntry {
    pub id: CharacterId,
    /// Stored lower-cased; unique across the index.
    pub name: String,
    pub rarity: Rarity,
    pub image: String,
    pub description: String,
    /// Global flag, flipped false -> true the first time any player obtains
    /// this character. Never flips back.
    pub collected: bool,
}

/// Pull weight and duplicate payout of one character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GachaPoolEntry {
    pub character_id: CharacterId,
    /// In `(0, 1]`.
    pub pull_rate: f64,
    /// At least 1.
    pub duplicate_currency: i64,
}
