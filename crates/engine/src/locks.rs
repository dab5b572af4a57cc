//! Per-player serialization of mutating operations.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use gacha_core::types::PlayerId;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// One async mutex per player, created on first use and dropped when the
/// last holder or waiter lets go.
///
/// Operations for the same player queue behind each other; different players
/// never contend. The guard must be held across every store call of the
/// operation it protects.
#[derive(Debug, Default)]
pub struct PlayerLocks {
    inner: Mutex<HashMap<PlayerId, Arc<AsyncMutex<()>>>>,
}

/// Exclusive access to one player. Releasing it prunes the slot if nobody
/// else is queued.
#[derive(Debug)]
pub struct PlayerGuard<'a> {
    locks: &'a PlayerLocks,
    player_id: PlayerId,
    slot: Arc<AsyncMutex<()>>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl PlayerLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `player_id`.
    pub async fn lock(&self, player_id: PlayerId) -> PlayerGuard<'_> {
        let slot = {
            let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            map.entry(player_id).or_default().clone()
        };
        let guard = slot.clone().lock_owned().await;
        PlayerGuard {
            locks: self,
            player_id,
            slot,
            guard: Some(guard),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Drop for PlayerGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        let mut map = self.locks.inner.lock().unwrap_or_else(|e| e.into_inner());
        // Map entry plus ours: no one else holds or waits for the slot.
        let idle = map
            .get(&self.player_id)
            .is_some_and(|slot| Arc::ptr_eq(slot, &self.slot) && Arc::strong_count(slot) == 2);
        if idle {
            map.remove(&self.player_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use gacha_core::types::new_id;

    use super::*;

    #[tokio::test]
    async fn same_player_is_serialized() {
        let locks = Arc::new(PlayerLocks::new());
        let player = new_id();

        let guard = locks.lock(player).await;
        let contender = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.lock(player).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(guard);
        contender.await.unwrap();
    }

    #[tokio::test]
    async fn different_players_do_not_contend() {
        let locks = PlayerLocks::new();
        let _a = locks.lock(new_id()).await;
        let _b = locks.lock(new_id()).await;
        assert_eq!(locks.len(), 2);
    }

    #[tokio::test]
    async fn released_slots_are_pruned() {
        let locks = PlayerLocks::new();
        for _ in 0..100 {
            drop(locks.lock(new_id()).await);
        }
        assert!(locks.is_empty());
    }

    #[tokio::test]
    async fn slot_survives_while_someone_waits() {
        let locks = Arc::new(PlayerLocks::new());
        let player = new_id();

        let guard = locks.lock(player).await;
        let waiter = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.lock(player).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        drop(guard);
        assert_eq!(locks.len(), 1);
        waiter.await.unwrap();
        assert!(locks.is_empty());
    }
}
