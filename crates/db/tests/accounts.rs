//! Integration tests for player accounts and pull history.

use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use gacha_core::account::{
    PlayerAccount, PullHistoryEntry, PullType, PulledCharacter, StartingGrants, TicketType,
};
use gacha_core::error::CoreError;
use gacha_core::progression::Experience;
use gacha_core::rarity::Rarity;
use gacha_core::store::AccountStore;
use gacha_core::types::new_id;
use gacha_db::PgStore;
use sqlx::PgPool;

fn account(username: &str) -> PlayerAccount {
    PlayerAccount::new(
        new_id(),
        username.to_string(),
        format!("{username}@example.com"),
        "$argon2id$placeholder".to_string(),
        StartingGrants::default(),
        Utc::now(),
    )
}

fn history(name: &str) -> PullHistoryEntry {
    PullHistoryEntry {
        pull_type: PullType::Single,
        pulled: vec![PulledCharacter {
            character_id: new_id(),
            name: name.to_string(),
            rarity: Rarity::Common,
            timestamp: Utc::now(),
            image: "img".to_string(),
        }],
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_and_find_account(pool: PgPool) {
    let store = PgStore::new(pool);
    let player = account("player1");
    store.insert(&player).await.unwrap();

    let found = store.find_by_id(player.id).await.unwrap().unwrap();
    assert_eq!(found.username, "player1");
    assert_eq!(found.metadata.ticket_count.normal, 3);
    assert_eq!(found.metadata.experience, Experience::default());
    assert!(found.pull_history.is_empty());

    assert!(store.find_by_username("PLAYER1").await.unwrap().is_some());
    assert!(store
        .find_by_email("Player1@Example.com")
        .await
        .unwrap()
        .is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_username_and_email(pool: PgPool) {
    let store = PgStore::new(pool);
    store.insert(&account("player1")).await.unwrap();

    let mut same_name = account("player1");
    same_name.email = "other@example.com".to_string();
    let err = store.insert(&same_name).await.unwrap_err();
    assert_matches!(&err, CoreError::Conflict(msg) if msg.contains("username"));

    let mut same_email = account("player2");
    same_email.email = "player1@example.com".to_string();
    let err = store.insert(&same_email).await.unwrap_err();
    assert_matches!(&err, CoreError::Conflict(msg) if msg.contains("email"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_counters_floor_at_zero(pool: PgPool) {
    let store = PgStore::new(pool);
    let player = account("player1");
    store.insert(&player).await.unwrap();

    let normal = store
        .adjust_tickets(player.id, TicketType::Normal, -10)
        .await
        .unwrap();
    assert_eq!(normal, 0);
    let golden = store
        .adjust_tickets(player.id, TicketType::Golden, 2)
        .await
        .unwrap();
    assert_eq!(golden, 2);
    assert_eq!(store.adjust_currency(player.id, 40).await.unwrap(), 40);
    assert_eq!(store.adjust_food(player.id, -1).await.unwrap(), 0);

    assert_matches!(
        store.adjust_currency(new_id(), 1).await,
        Err(CoreError::NotFound { .. })
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_conditional_spend(pool: PgPool) {
    let store = PgStore::new(pool);
    let player = account("player1");
    store.insert(&player).await.unwrap();
    store.adjust_currency(player.id, 30).await.unwrap();

    assert_eq!(store.try_spend_currency(player.id, 31).await.unwrap(), None);
    assert_eq!(
        store.try_spend_currency(player.id, 30).await.unwrap(),
        Some(0)
    );
    assert_eq!(store.try_consume_food(player.id, 1).await.unwrap(), None);
    assert_matches!(
        store.try_spend_currency(new_id(), 1).await,
        Err(CoreError::NotFound { .. })
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_free_ticket_grant_and_cooldown(pool: PgPool) {
    let store = PgStore::new(pool);
    let player = account("player1");
    store.insert(&player).await.unwrap();

    let now = Utc::now();
    store
        .grant_free_ticket(player.id, now, now + Duration::hours(24))
        .await
        .unwrap();

    let found = store.find_by_id(player.id).await.unwrap().unwrap();
    assert_eq!(found.metadata.ticket_count.normal, 4);
    assert!(found.metadata.ticket_count.cooldown.is_some());
    assert!(found.metadata.ticket_count.last_free_ticket_at.is_some());

    store.set_ticket_cooldown(player.id, None).await.unwrap();
    let found = store.find_by_id(player.id).await.unwrap().unwrap();
    assert!(found.metadata.ticket_count.cooldown.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_pull_history_is_bounded_and_newest_first(pool: PgPool) {
    let store = PgStore::new(pool);
    let player = account("player1");
    store.insert(&player).await.unwrap();

    for name in ["a", "b", "c", "d"] {
        store
            .push_pull_history(player.id, &history(name), 3)
            .await
            .unwrap();
    }

    let found = store.find_by_id(player.id).await.unwrap().unwrap();
    let names: Vec<_> = found
        .pull_history
        .iter()
        .map(|h| h.pulled[0].name.as_str())
        .collect();
    assert_eq!(names, vec!["d", "c", "b"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_set_experience_and_delete(pool: PgPool) {
    let store = PgStore::new(pool);
    let player = account("player1");
    store.insert(&player).await.unwrap();

    let exp = Experience {
        curr_exp: 20,
        exp_capacity: 110,
        level: 2,
    };
    store.set_experience(player.id, exp).await.unwrap();
    store.set_obtained_count(player.id, 5).await.unwrap();
    let found = store.find_by_id(player.id).await.unwrap().unwrap();
    assert_eq!(found.metadata.experience, exp);
    assert_eq!(found.metadata.obtained_count, 5);

    assert!(store.delete(player.id).await.unwrap());
    assert!(!store.delete(player.id).await.unwrap());
    assert_matches!(
        store.set_experience(player.id, exp).await,
        Err(CoreError::NotFound { .. })
    );
}
