//! Per-player inventory of obtained characters.

use serde::{Deserialize, Serialize};

use crate::catalog::CharacterIndexEntry;
use crate::progression::{display_income, Experience, STARTING_EXP_CAPACITY};
use crate::rarity::{Rarity, RarityTable};
use crate::types::{CharacterId, PlayerId};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CharacterExperience {
    pub curr_exp: i64,
    pub exp_capacity: i64,
    pub level: i64,
    /// Derived from rarity and level; recomputed on every level change.
    pub income: f64,
}

impl CharacterExperience {
    pub fn as_experience(&self) -> Experience {
        Experience {
            curr_exp: self.curr_exp,
            exp_capacity: self.exp_capacity,
            level: self.level,
        }
    }

    pub fn from_experience(exp: Experience, table: &RarityTable, rarity: Rarity) -> Self {
        Self {
            curr_exp: exp.curr_exp,
            exp_capacity: exp.exp_capacity,
            level: exp.level,
            income: display_income(table, rarity, exp.level),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObtainedCharacter {
    pub character_id: CharacterId,
    pub name: String,
    pub nickname: String,
    pub rarity: Rarity,
    pub image: String,
    pub experience: CharacterExperience,
}

impl ObtainedCharacter {
    /// A freshly obtained copy: level 1, nickname defaults to the name.
    pub fn from_index(entry: &CharacterIndexEntry, table: &RarityTable) -> Self {
        Self {
            character_id: entry.id,
            name: entry.name.clone(),
            nickname: entry.name.clone(),
            rarity: entry.rarity,
            image: entry.image.clone(),
            experience: CharacterExperience {
                curr_exp: 0,
                exp_capacity: STARTING_EXP_CAPACITY,
                level: 1,
                income: display_income(table, entry.rarity, 1),
            },
        }
    }
}

/// One per player, created at registration. A character appears at most once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub player_id: PlayerId,
    pub obtained: Vec<ObtainedCharacter>,
}

impl InventoryRecord {
    pub fn empty(player_id: PlayerId) -> Self {
        Self {
            player_id,
            obtained: Vec::new(),
        }
    }

    pub fn find(&self, character_id: CharacterId) -> Option<&ObtainedCharacter> {
        self.obtained
            .iter()
            .find(|c| c.character_id == character_id)
    }

    pub fn contains(&self, character_id: CharacterId) -> bool {
        self.find(character_id).is_some()
    }
}
