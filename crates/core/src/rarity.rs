//! Rarity tiers and the tables that map a tier to pull-rate and
//! duplicate-currency bands.
//!
//! The numeric bands are tuning, not contract: [`RarityTable::default`] holds
//! the production values and callers may construct their own.

use std::fmt;
use std::ops::{Range, RangeInclusive};
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Legendary,
}

impl Rarity {
    pub const ALL: [Rarity; 4] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Legendary,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Uncommon => "uncommon",
            Rarity::Rare => "rare",
            Rarity::Legendary => "legendary",
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive; surrounding whitespace is ignored.
impl FromStr for Rarity {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "common" => Ok(Rarity::Common),
            "uncommon" => Ok(Rarity::Uncommon),
            "rare" => Ok(Rarity::Rare),
            "legendary" => Ok(Rarity::Legendary),
            _ => Err(CoreError::invalid(
                "Rarity",
                format!("'{s}' is not one of common, uncommon, rare, legendary"),
            )),
        }
    }
}

/// Per-tier bands for one rarity.
#[derive(Debug, Clone)]
pub struct RarityBand {
    /// Half-open range the pull rate is drawn from.
    pub pull_rate: Range<f64>,
    pub duplicate_currency: RangeInclusive<i64>,
    /// Passive income per minute at level 1.
    pub base_income: f64,
}

#[derive(Debug, Clone)]
pub struct RarityTable {
    pub common: RarityBand,
    pub uncommon: RarityBand,
    pub rare: RarityBand,
    pub legendary: RarityBand,
}

impl Default for RarityTable {
    fn default() -> Self {
        Self {
            common: RarityBand {
                pull_rate: 0.70..0.90,
                duplicate_currency: 5..=15,
                base_income: 1.0,
            },
            uncommon: RarityBand {
                pull_rate: 0.40..0.60,
                duplicate_currency: 15..=30,
                base_income: 2.0,
            },
            rare: RarityBand {
                pull_rate: 0.15..0.30,
                duplicate_currency: 40..=75,
                base_income: 5.0,
            },
            legendary: RarityBand {
                pull_rate: 0.02..0.08,
                duplicate_currency: 100..=200,
                base_income: 10.0,
            },
        }
    }
}

impl RarityTable {
    pub fn band(&self, rarity: Rarity) -> &RarityBand {
        match rarity {
            Rarity::Common => &self.common,
            Rarity::Uncommon => &self.uncommon,
            Rarity::Rare => &self.rare,
            Rarity::Legendary => &self.legendary,
        }
    }

    /// Draw a pull rate uniformly from the tier's band.
    pub fn pull_rate<R: Rng>(&self, rarity: Rarity, rng: &mut R) -> f64 {
        rng.random_range(self.band(rarity).pull_rate.clone())
    }

    /// Draw a duplicate-currency amount uniformly from the tier's band.
    pub fn duplicate_currency<R: Rng>(&self, rarity: Rarity, rng: &mut R) -> i64 {
        rng.random_range(self.band(rarity).duplicate_currency.clone())
    }

    /// String entry point: parses `rarity` case-insensitively first.
    pub fn rarity_to_pull_rate<R: Rng>(&self, rarity: &str, rng: &mut R) -> CoreResult<f64> {
        Ok(self.pull_rate(rarity.parse()?, rng))
    }

    /// String entry point: parses `rarity` case-insensitively first.
    pub fn rarity_to_dup_currency<R: Rng>(
        &self,
        rarity: &str,
        rng: &mut R,
    ) -> CoreResult<i64> {
        Ok(self.duplicate_currency(rarity.parse()?, rng))
    }
}
