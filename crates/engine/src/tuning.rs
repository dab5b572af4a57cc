//! Game tuning values, overridable from the environment.

use std::fmt;
use std::str::FromStr;

use gacha_core::account::StartingGrants;
use gacha_core::draw::GoldenBoost;
use gacha_core::error::CoreError;
use gacha_core::rarity::RarityTable;

/// How a drawn character is classified as new or duplicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Duplicate means "already collected by any player". The first player to
    /// draw a character gets it; everyone after that receives currency.
    #[default]
    Global,
    /// Duplicate means "this player already owns it".
    PerPlayer,
}

impl fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DuplicatePolicy::Global => f.write_str("global"),
            DuplicatePolicy::PerPlayer => f.write_str("per_player"),
        }
    }
}

impl FromStr for DuplicatePolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "global" => Ok(DuplicatePolicy::Global),
            "per_player" => Ok(DuplicatePolicy::PerPlayer),
            _ => Err(CoreError::invalid(
                "Duplicate policy",
                format!("'{s}' is not one of global, per_player"),
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GameTuning {
    pub starting: StartingGrants,
    /// Player exp granted per unit of pull count.
    pub exp_per_pull: i64,
    /// Character exp granted per food.
    pub feed_character_exp: i64,
    /// Player exp granted per food.
    pub feed_player_exp: i64,
    pub free_ticket_cooldown: chrono::Duration,
    pub golden_boost: GoldenBoost,
    pub pull_history_limit: usize,
    pub duplicate_policy: DuplicatePolicy,
    pub rarity: RarityTable,
}

impl Default for GameTuning {
    fn default() -> Self {
        Self {
            starting: StartingGrants::default(),
            exp_per_pull: 20,
            feed_character_exp: 30,
            feed_player_exp: 10,
            free_ticket_cooldown: chrono::Duration::hours(24),
            golden_boost: GoldenBoost::default(),
            pull_history_limit: 10,
            duplicate_policy: DuplicatePolicy::Global,
            rarity: RarityTable::default(),
        }
    }
}

impl GameTuning {
    /// Load tuning from environment variables, falling back to [`Default`].
    ///
    /// | Env Var                      | Default  |
    /// |------------------------------|----------|
    /// | `STARTING_NORMAL_TICKETS`    | `3`      |
    /// | `STARTING_CURRENCY`          | `0`      |
    /// | `STARTING_FOOD`              | `0`      |
    /// | `EXP_PER_PULL`               | `20`     |
    /// | `FEED_CHARACTER_EXP`         | `30`     |
    /// | `FEED_PLAYER_EXP`            | `10`     |
    /// | `FREE_TICKET_COOLDOWN_HOURS` | `24`     |
    /// | `GOLDEN_BOOST_THRESHOLD`     | `0.2`    |
    /// | `GOLDEN_BOOST_FACTOR`        | `3.0`    |
    /// | `PULL_HISTORY_LIMIT`         | `10`     |
    /// | `DUPLICATE_POLICY`           | `global` |
    ///
    /// Panics on an unparsable value; this runs once at start-up.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let starting = StartingGrants {
            normal_tickets: env_or("STARTING_NORMAL_TICKETS", defaults.starting.normal_tickets),
            currency: env_or("STARTING_CURRENCY", defaults.starting.currency),
            food: env_or("STARTING_FOOD", defaults.starting.food),
        };

        let cooldown_hours: i64 = env_or("FREE_TICKET_COOLDOWN_HOURS", 24);

        let golden_boost = GoldenBoost {
            threshold: env_or("GOLDEN_BOOST_THRESHOLD", defaults.golden_boost.threshold),
            factor: env_or("GOLDEN_BOOST_FACTOR", defaults.golden_boost.factor),
        };

        Self {
            starting,
            exp_per_pull: env_or("EXP_PER_PULL", defaults.exp_per_pull),
            feed_character_exp: env_or("FEED_CHARACTER_EXP", defaults.feed_character_exp),
            feed_player_exp: env_or("FEED_PLAYER_EXP", defaults.feed_player_exp),
            free_ticket_cooldown: chrono::Duration::hours(cooldown_hours),
            golden_boost,
            pull_history_limit: env_or("PULL_HISTORY_LIMIT", defaults.pull_history_limit),
            duplicate_policy: env_or("DUPLICATE_POLICY", defaults.duplicate_policy),
            rarity: defaults.rarity,
        }
    }
}

fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|e| panic!("{key} must be a valid value: {e}")),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_table() {
        let tuning = GameTuning::default();
        assert_eq!(tuning.starting.normal_tickets, 3);
        assert_eq!(tuning.exp_per_pull, 20);
        assert_eq!(tuning.free_ticket_cooldown, chrono::Duration::hours(24));
        assert_eq!(tuning.pull_history_limit, 10);
        assert_eq!(tuning.duplicate_policy, DuplicatePolicy::Global);
    }

    #[test]
    fn duplicate_policy_parse() {
        assert_eq!(
            "PER_PLAYER".parse::<DuplicatePolicy>().unwrap(),
            DuplicatePolicy::PerPlayer
        );
        assert!("sometimes".parse::<DuplicatePolicy>().is_err());
    }
}
