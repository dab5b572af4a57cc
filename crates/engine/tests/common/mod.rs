//! Shared helpers for engine integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use gacha_core::account::{PlayerAccount, StartingGrants};
use gacha_core::catalog::{CharacterIndexEntry, GachaPoolEntry};
use gacha_core::clock::ManualClock;
use gacha_core::inventory::InventoryRecord;
use gacha_core::rarity::Rarity;
use gacha_core::store::memory::MemoryStore;
use gacha_core::types::{new_id, CharacterId};
use gacha_engine::{GachaEngine, GameTuning};

pub struct TestGame {
    pub engine: Arc<GachaEngine>,
    pub backend: Arc<MemoryStore>,
    pub clock: Arc<ManualClock>,
}

pub fn game() -> TestGame {
    game_with(GameTuning::default())
}

pub fn game_with(tuning: GameTuning) -> TestGame {
    let (backend, stores) = MemoryStore::stores();
    let start = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
    let clock = Arc::new(ManualClock::new(start));
    let engine = Arc::new(GachaEngine::with_clock(stores, tuning, clock.clone()));
    TestGame {
        engine,
        backend,
        clock,
    }
}

impl TestGame {
    /// Insert a player with the default starting grants straight into the
    /// stores, skipping password hashing. Returns the id as a string.
    pub async fn player(&self, username: &str) -> String {
        let account = PlayerAccount::new(
            new_id(),
            username.to_string(),
            format!("{username}@example.com"),
            "unused".to_string(),
            StartingGrants::default(),
            Utc::now(),
        );
        let stores = self.engine.stores();
        stores.accounts.insert(&account).await.unwrap();
        stores
            .inventory
            .create(&InventoryRecord::empty(account.id))
            .await
            .unwrap();
        account.id.to_string()
    }

    /// Insert an index entry and its pool entry with a fixed pull rate.
    pub async fn character(
        &self,
        name: &str,
        rarity: Rarity,
        pull_rate: f64,
        duplicate_currency: i64,
    ) -> CharacterId {
        let entry = CharacterIndexEntry {
            id: new_id(),
            name: name.to_string(),
            rarity,
            image: format!("https://img.example/{name}.png"),
            description: format!("{name} description"),
            collected: false,
        };
        let stores = self.engine.stores();
        stores.index.insert(&entry).await.unwrap();
        stores
            .pool
            .insert(&GachaPoolEntry {
                character_id: entry.id,
                pull_rate,
                duplicate_currency,
            })
            .await
            .unwrap();
        entry.id
    }

    pub async fn give_tickets(&self, player: &str, ticket_type: &str, amount: i64) {
        self.engine
            .update_ticket_count(player, ticket_type, amount)
            .await
            .unwrap();
    }
}
