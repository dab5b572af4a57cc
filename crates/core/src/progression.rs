//! Leveling curves and income math shared by players and characters.
//!
//! Pure logic. Both curves use the same loop: while accumulated experience
//! reaches the capacity, subtract it, gain a level, and grow the capacity by
//! `floor(capacity * 1.1)`. Players additionally earn one ticket per level.

use serde::{Deserialize, Serialize};

use crate::rarity::{Rarity, RarityTable};

/// Experience capacity of a fresh player or character at level 1.
pub const STARTING_EXP_CAPACITY: i64 = 100;

/// Every tenth level grants a golden ticket instead of a normal one.
pub const GOLDEN_TICKET_LEVEL_INTERVAL: i64 = 10;

/// Experience block carried by player accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
    pub curr_exp: i64,
    pub exp_capacity: i64,
    pub level: i64,
}

impl Default for Experience {
    fn default() -> Self {
        Self {
            curr_exp: 0,
            exp_capacity: STARTING_EXP_CAPACITY,
            level: 1,
        }
    }
}

/// Result of feeding experience through the leveling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LevelUpOutcome {
    pub experience: Experience,
    pub levels_gained: i64,
    pub normal_tickets: i64,
    pub golden_tickets: i64,
}

impl LevelUpOutcome {
    pub fn leveled_up(&self) -> bool {
        self.levels_gained > 0
    }
}

/// `floor(capacity * 1.1)`, computed in integers.
pub fn next_capacity(capacity: i64) -> i64 {
    capacity * 11 / 10
}

/// Add `gained` experience and resolve every level crossed, counting the
/// ticket each crossing earns.
pub fn apply_experience(current: Experience, gained: i64) -> LevelUpOutcome {
    let mut exp = current;
    exp.curr_exp += gained;

    let mut outcome = LevelUpOutcome::default();
    // A capacity of zero would never terminate; stored capacities are > 0.
    while exp.exp_capacity > 0 && exp.curr_exp >= exp.exp_capacity {
        exp.curr_exp -= exp.exp_capacity;
        exp.level += 1;
        exp.exp_capacity = next_capacity(exp.exp_capacity);
        outcome.levels_gained += 1;
        if exp.level % GOLDEN_TICKET_LEVEL_INTERVAL == 0 {
            outcome.golden_tickets += 1;
        } else {
            outcome.normal_tickets += 1;
        }
    }

    outcome.experience = exp;
    outcome
}

/// Passive income per minute for a character of `rarity` at `level`:
/// the tier's base value compounded by 10% per level above 1.
pub fn income_rate(table: &RarityTable, rarity: Rarity, level: i64) -> f64 {
    let base = table.band(rarity).base_income;
    let exponent = i32::try_from((level - 1).max(0)).unwrap_or(i32::MAX);
    base * 1.1_f64.powi(exponent)
}

/// Income as shown on an inventory entry, rounded to two decimals.
pub fn display_income(table: &RarityTable, rarity: Rarity, level: i64) -> f64 {
    (income_rate(table, rarity, level) * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn below_capacity_does_not_level() {
        let out = apply_experience(Experience::default(), 99);
        assert!(!out.leveled_up());
        assert_eq!(out.experience.curr_exp, 99);
        assert_eq!(out.experience.level, 1);
        assert_eq!(out.normal_tickets + out.golden_tickets, 0);
    }

    #[test]
    fn exact_capacity_levels_once() {
        let out = apply_experience(Experience::default(), 100);
        assert_eq!(out.levels_gained, 1);
        assert_eq!(out.experience.curr_exp, 0);
        assert_eq!(out.experience.level, 2);
        assert_eq!(out.experience.exp_capacity, 110);
        assert_eq!(out.normal_tickets, 1);
    }

    #[test]
    fn multiple_thresholds_in_one_call() {
        // 100 + 110 + 121 = 331
        let out = apply_experience(Experience::default(), 335);
        assert_eq!(out.levels_gained, 3);
        assert_eq!(out.experience.level, 4);
        assert_eq!(out.experience.curr_exp, 4);
        assert_eq!(out.experience.exp_capacity, 133);
        assert_eq!(out.normal_tickets, 3);
        assert_eq!(out.golden_tickets, 0);
    }

    #[test]
    fn capacity_follows_floor_of_ten_percent() {
        let mut capacity = STARTING_EXP_CAPACITY;
        let mut exp = Experience::default();
        for _ in 0..15 {
            let out = apply_experience(exp, exp.exp_capacity);
            assert_eq!(out.levels_gained, 1);
            assert_eq!(out.experience.exp_capacity, (capacity as f64 * 1.1).floor() as i64);
            capacity = out.experience.exp_capacity;
            exp = out.experience;
        }
    }

    #[test]
    fn tenth_level_grants_golden_ticket() {
        let start = Experience {
            curr_exp: 0,
            exp_capacity: 50,
            level: 9,
        };
        let out = apply_experience(start, 50);
        assert_eq!(out.experience.level, 10);
        assert_eq!(out.golden_tickets, 1);
        assert_eq!(out.normal_tickets, 0);
    }

    #[test]
    fn crossing_level_ten_mixes_ticket_kinds() {
        let start = Experience {
            curr_exp: 0,
            exp_capacity: 10,
            level: 8,
        };
        // 10 (-> 9), 11 (-> 10), 12 (-> 11)
        let out = apply_experience(start, 33);
        assert_eq!(out.experience.level, 11);
        assert_eq!(out.normal_tickets, 2);
        assert_eq!(out.golden_tickets, 1);
    }

    #[test]
    fn income_compounds_per_level() {
        let table = RarityTable::default();
        assert_eq!(income_rate(&table, Rarity::Rare, 1), 5.0);
        assert!((income_rate(&table, Rarity::Rare, 3) - 6.05).abs() < 1e-9);
        assert_eq!(display_income(&table, Rarity::Common, 2), 1.1);
    }
}
