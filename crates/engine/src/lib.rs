//! Gacha game engine.
//!
//! [`GachaEngine`] owns the store handles, tuning, clock and per-player
//! locks, and exposes every player-facing operation. Operations are split by
//! area into the submodules below, each adding an `impl GachaEngine` block.
//!
//! Every public operation takes raw identifiers and validates them itself, so
//! callers can forward path and body values unchanged.

pub mod accounts;
pub mod catalog;
pub mod income;
pub mod inventory;
pub mod locks;
pub mod password;
pub mod pull;
pub mod seed;
pub mod shop;
pub mod tuning;

use std::sync::Arc;

use gacha_core::account::PlayerAccount;
use gacha_core::clock::{Clock, SystemClock};
use gacha_core::error::{CoreError, CoreResult};
use gacha_core::store::Stores;
use gacha_core::types::{PlayerId, Timestamp};
use gacha_core::validation::validate_id;

pub use locks::{PlayerGuard, PlayerLocks};
pub use tuning::{DuplicatePolicy, GameTuning};

pub struct GachaEngine {
    stores: Stores,
    tuning: GameTuning,
    locks: PlayerLocks,
    clock: Arc<dyn Clock>,
}

impl GachaEngine {
    pub fn new(stores: Stores, tuning: GameTuning) -> Self {
        Self::with_clock(stores, tuning, Arc::new(SystemClock))
    }

    pub fn with_clock(stores: Stores, tuning: GameTuning, clock: Arc<dyn Clock>) -> Self {
        Self {
            stores,
            tuning,
            locks: PlayerLocks::new(),
            clock,
        }
    }

    pub fn stores(&self) -> &Stores {
        &self.stores
    }

    pub fn tuning(&self) -> &GameTuning {
        &self.tuning
    }

    pub fn locks(&self) -> &PlayerLocks {
        &self.locks
    }

    fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Load an account or fail `NotFound`.
    async fn require_account(&self, player_id: PlayerId) -> CoreResult<PlayerAccount> {
        self.stores
            .accounts
            .find_by_id(player_id)
            .await?
            .ok_or_else(|| CoreError::not_found("player", player_id))
    }
}

fn parse_player_id(raw: &str) -> CoreResult<PlayerId> {
    validate_id(raw, "Player id")
}

/// Log a failed compensation step. The original error is what the caller
/// sees.
fn report_undo<T>(player_id: PlayerId, step: &'static str, result: CoreResult<T>) {
    if let Err(e) = result {
        tracing::error!(player_id = %player_id, step, error = %e, "Rollback step failed");
    }
}
