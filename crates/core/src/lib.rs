//! Domain logic for the gacha collection game.
//!
//! Everything in this crate is storage-agnostic: pure rules (validation,
//! rarity bands, leveling curves, weighted draws), the domain records the
//! stores hold, and the store port traits the engine is written against.

pub mod account;
pub mod catalog;
pub mod clock;
pub mod draw;
pub mod error;
pub mod inventory;
pub mod progression;
pub mod rarity;
pub mod shop;
pub mod store;
pub mod types;
pub mod validation;
