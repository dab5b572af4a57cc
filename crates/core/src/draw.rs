//! Weighted random selection over the gacha pool.
//!
//! Pure computation: build a weight table once per batch, then draw each pull
//! independently with replacement from that same table.

use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::Rng;

use crate::account::TicketType;
use crate::catalog::GachaPoolEntry;
use crate::error::{CoreError, CoreResult};
use crate::types::CharacterId;

/// Golden-ticket bias applied to low pull-rate entries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoldenBoost {
    /// Entries whose pull rate is at or below this value are boosted.
    pub threshold: f64,
    pub factor: f64,
}

impl Default for GoldenBoost {
    fn default() -> Self {
        Self {
            threshold: 0.2,
            factor: 3.0,
        }
    }
}

/// Normalization-free weight table; `WeightedIndex` handles the scaling.
#[derive(Debug, Clone)]
pub struct WeightTable {
    ids: Vec<CharacterId>,
    weights: Vec<f64>,
    index: WeightedIndex<f64>,
}

impl WeightTable {
    /// Build the table for `ticket_type`. Normal pulls use the raw pull rate;
    /// golden pulls multiply rare entries by the boost factor.
    pub fn build(
        entries: &[GachaPoolEntry],
        ticket_type: TicketType,
        boost: GoldenBoost,
    ) -> CoreResult<Self> {
        if entries.is_empty() {
            return Err(CoreError::NotFound {
                entity: "gacha pool entry",
                id: "any".into(),
            });
        }

        let ids = entries.iter().map(|e| e.character_id).collect();
        let weights: Vec<f64> = entries
            .iter()
            .map(|e| match ticket_type {
                TicketType::Golden if e.pull_rate <= boost.threshold => {
                    e.pull_rate * boost.factor
                }
                _ => e.pull_rate,
            })
            .collect();

        let index = WeightedIndex::new(&weights)
            .map_err(|e| CoreError::Internal(format!("Invalid gacha pool weights: {e}")))?;

        Ok(Self {
            ids,
            weights,
            index,
        })
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Weight assigned to `character_id`, if present.
    pub fn weight_of(&self, character_id: CharacterId) -> Option<f64> {
        self.ids
            .iter()
            .position(|id| *id == character_id)
            .map(|i| self.weights[i])
    }

    /// Probability of `character_id` on a single draw.
    pub fn probability_of(&self, character_id: CharacterId) -> Option<f64> {
        let total: f64 = self.weights.iter().sum();
        self.weight_of(character_id).map(|w| w / total)
    }

    /// Draw `count` characters independently, with replacement.
    pub fn draw<R: Rng>(&self, count: usize, rng: &mut R) -> Vec<CharacterId> {
        (0..count)
            .map(|_| self.ids[self.index.sample(rng)])
            .collect()
    }
}
