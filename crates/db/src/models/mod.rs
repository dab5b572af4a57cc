//! Row structs matching the database tables.
//!
//! Each submodule holds a `FromRow` struct per table and the conversion into
//! the matching `gacha_core` record. Conversions fail with
//! `CoreError::Internal` when a stored enum value is unrecognized.

pub mod character;
pub mod inventory;
pub mod player;
pub mod shop;
