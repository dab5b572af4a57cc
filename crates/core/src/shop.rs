//! Shop catalog items.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// What one unit of a shop item credits to the buyer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShopEffect {
    NormalTicket,
    GoldenTicket,
    Food,
}

impl ShopEffect {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShopEffect::NormalTicket => "normal_ticket",
            ShopEffect::GoldenTicket => "golden_ticket",
            ShopEffect::Food => "food",
        }
    }
}

impl fmt::Display for ShopEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShopEffect {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal_ticket" => Ok(ShopEffect::NormalTicket),
            "golden_ticket" => Ok(ShopEffect::GoldenTicket),
            "food" => Ok(ShopEffect::Food),
            _ => Err(CoreError::invalid(
                "Shop effect",
                format!("'{s}' is not one of normal_ticket, golden_ticket, food"),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopItem {
    /// Stored lower-cased; unique.
    pub name: String,
    pub cost: i64,
    pub description: String,
    pub image: String,
    pub effect: ShopEffect,
}
