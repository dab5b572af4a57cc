//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument and return raw `sqlx` results.
//! Counter updates are single conditional `UPDATE` statements so concurrent
//! requests never read-modify-write in application code.

pub mod character_index_repo;
pub mod gacha_pool_repo;
pub mod inventory_repo;
pub mod player_repo;
pub mod pull_history_repo;
pub mod shop_repo;

pub use character_index_repo::CharacterIndexRepo;
pub use gacha_pool_repo::GachaPoolRepo;
pub use inventory_repo::InventoryRepo;
pub use player_repo::PlayerRepo;
pub use pull_history_repo::PullHistoryRepo;
pub use shop_repo::ShopRepo;
