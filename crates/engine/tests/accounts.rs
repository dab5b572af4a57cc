//! Integration tests for registration, login, balances and progression.

mod common;

use assert_matches::assert_matches;
use chrono::Duration;
use gacha_core::clock::Clock;
use gacha_core::error::CoreError;
use gacha_core::progression::Experience;
use gacha_core::rarity::Rarity;
use gacha_core::store::memory::FailPoint;
use gacha_core::types::new_id;
use uuid::Uuid;

use common::game;

const PASSWORD: &str = "Secret#123";

// ---------------------------------------------------------------------------
// Registration and login
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_register_and_login() {
    let game = game();
    let profile = game
        .engine
        .register("Player1", "Player1@Example.com", PASSWORD)
        .await
        .unwrap();
    assert_eq!(profile.username, "player1");
    assert_eq!(profile.email, "player1@example.com");
    assert_eq!(profile.metadata.ticket_count.normal, 3);
    assert_eq!(profile.metadata.ticket_count.golden, 0);

    let inventory = game
        .engine
        .get_inventory(&profile.player_id.to_string())
        .await
        .unwrap();
    assert!(inventory.obtained.is_empty());

    let logged_in = game
        .engine
        .login("player1@example.com", PASSWORD)
        .await
        .unwrap();
    assert_eq!(logged_in.player_id, profile.player_id);
}

#[tokio::test]
async fn test_register_rejects_taken_username_and_email() {
    let game = game();
    game.engine
        .register("player1", "one@example.com", PASSWORD)
        .await
        .unwrap();

    assert_matches!(
        game.engine.register("PLAYER1", "two@example.com", PASSWORD).await,
        Err(CoreError::Conflict(msg)) if msg.contains("username")
    );
    assert_matches!(
        game.engine.register("player2", "ONE@example.com", PASSWORD).await,
        Err(CoreError::Conflict(msg)) if msg.contains("email")
    );
}

#[tokio::test]
async fn test_register_validates_credentials() {
    let game = game();
    assert_matches!(
        game.engine.register("abc", "a@example.com", PASSWORD).await,
        Err(CoreError::InvalidInput(_))
    );
    assert_matches!(
        game.engine.register("player1", "not-an-email", PASSWORD).await,
        Err(CoreError::InvalidInput(_))
    );
    assert_matches!(
        game.engine.register("player1", "a@example.com", "weakpass").await,
        Err(CoreError::InvalidInput(_))
    );
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let game = game();
    game.engine
        .register("player1", "one@example.com", PASSWORD)
        .await
        .unwrap();

    let wrong_password = game
        .engine
        .login("one@example.com", "Secret#999")
        .await
        .unwrap_err();
    let unknown_email = game
        .engine
        .login("nobody@example.com", PASSWORD)
        .await
        .unwrap_err();

    assert_matches!(&wrong_password, CoreError::Unauthorized(_));
    assert_eq!(wrong_password.to_string(), unknown_email.to_string());
}

#[tokio::test]
async fn test_inventory_failure_rolls_back_registration() {
    let game = game();
    game.backend.fail(FailPoint::InventoryCreate);

    assert_matches!(
        game.engine
            .register("player1", "one@example.com", PASSWORD)
            .await,
        Err(CoreError::Transient(_))
    );
    assert!(game
        .engine
        .stores()
        .accounts
        .find_by_username("player1")
        .await
        .unwrap()
        .is_none());

    game.backend.heal(FailPoint::InventoryCreate);
    assert!(game
        .engine
        .register("player1", "one@example.com", PASSWORD)
        .await
        .is_ok());
}

// ---------------------------------------------------------------------------
// Removal
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_remove_account_deletes_both_records() {
    let game = game();
    let player = game.player("player1").await;

    game.engine.remove_account(&player).await.unwrap();

    assert_matches!(
        game.engine.get_metadata(&player).await,
        Err(CoreError::NotFound { .. })
    );
    assert_matches!(
        game.engine.get_inventory(&player).await,
        Err(CoreError::NotFound { .. })
    );
    assert_matches!(
        game.engine.remove_account(&player).await,
        Err(CoreError::NotFound { .. })
    );
}

#[tokio::test]
async fn test_remove_account_requires_inventory() {
    let game = game();
    let player = game.player("player1").await;
    let id: Uuid = player.parse().unwrap();
    game.engine.stores().inventory.delete(id).await.unwrap();

    assert_matches!(
        game.engine.remove_account(&player).await,
        Err(CoreError::NotFound { entity: "inventory", .. })
    );
    assert!(game.engine.get_metadata(&player).await.is_ok());
}

#[tokio::test]
async fn test_failed_account_delete_restores_inventory() {
    let game = game();
    let player = game.player("player1").await;
    let koromon = game.character("koromon", Rarity::Common, 0.9, 10).await;
    game.engine
        .add_character_to_inventory(&player, &koromon.to_string())
        .await
        .unwrap();
    game.backend.fail(FailPoint::AccountDelete);

    assert_matches!(
        game.engine.remove_account(&player).await,
        Err(CoreError::Transient(_))
    );

    let inventory = game.engine.get_inventory(&player).await.unwrap();
    assert!(inventory.contains(koromon));
    assert!(game.engine.get_metadata(&player).await.is_ok());
}

// ---------------------------------------------------------------------------
// Balances
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_ticket_updates_floor_at_zero() {
    let game = game();
    let player = game.player("player1").await;

    assert_eq!(
        game.engine
            .update_ticket_count(&player, "normal", -10)
            .await
            .unwrap(),
        0
    );
    assert_eq!(
        game.engine
            .update_ticket_count(&player, "golden", 0)
            .await
            .unwrap(),
        0
    );
    assert_eq!(
        game.engine
            .update_ticket_count(&player, "Golden", 7)
            .await
            .unwrap(),
        7
    );
    assert_matches!(
        game.engine.update_ticket_count(&player, "bronze", 1).await,
        Err(CoreError::InvalidInput(_))
    );
    assert_matches!(
        game.engine
            .update_ticket_count(&new_id().to_string(), "normal", 1)
            .await,
        Err(CoreError::NotFound { .. })
    );
}

#[tokio::test]
async fn test_currency_rejects_zero_delta() {
    let game = game();
    let player = game.player("player1").await;

    assert_matches!(
        game.engine.update_currency(&player, 0).await,
        Err(CoreError::InvalidInput(_))
    );
    assert_eq!(game.engine.update_currency(&player, 25).await.unwrap(), 25);
    assert_eq!(game.engine.update_currency(&player, -100).await.unwrap(), 0);
}

#[tokio::test]
async fn test_ticket_balances() {
    let game = game();
    let player = game.player("player1").await;
    game.give_tickets(&player, "golden", 2).await;

    let balances = game.engine.get_ticket_balances(&player).await.unwrap();
    assert_eq!(balances.normal, 3);
    assert_eq!(balances.golden, 2);
    assert_eq!(
        game.engine.get_ticket_balance(&player, "golden").await.unwrap(),
        2
    );
}

// ---------------------------------------------------------------------------
// Leveling
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_level_up_crosses_several_thresholds() {
    let game = game();
    let player = game.player("player1").await;

    // 100 + 110 + 121 = 331 crosses three thresholds with 5 left over.
    let outcome = game.engine.level_up_player(&player, 336).await.unwrap();
    assert_eq!(outcome.levels_gained, 3);
    assert_eq!(outcome.normal_tickets, 3);
    assert_eq!(outcome.golden_tickets, 0);
    assert_eq!(
        outcome.experience,
        Experience {
            curr_exp: 5,
            exp_capacity: 133,
            level: 4,
        }
    );

    let metadata = game.engine.get_metadata(&player).await.unwrap();
    assert_eq!(metadata.experience, outcome.experience);
    assert_eq!(metadata.ticket_count.normal, 6);
}

#[tokio::test]
async fn test_tenth_level_grants_golden_ticket() {
    let game = game();
    let player = game.player("player1").await;
    let id: Uuid = player.parse().unwrap();
    game.engine
        .stores()
        .accounts
        .set_experience(
            id,
            Experience {
                curr_exp: 0,
                exp_capacity: 200,
                level: 9,
            },
        )
        .await
        .unwrap();

    let outcome = game.engine.level_up_player(&player, 200).await.unwrap();
    assert_eq!(outcome.experience.level, 10);
    assert_eq!(outcome.golden_tickets, 1);
    assert_eq!(outcome.normal_tickets, 0);
    assert_eq!(
        game.engine.get_ticket_balance(&player, "golden").await.unwrap(),
        1
    );
}

#[tokio::test]
async fn test_level_up_below_capacity_reports_false() {
    let game = game();
    let player = game.player("player1").await;
    let outcome = game.engine.level_up_player(&player, 99).await.unwrap();
    assert!(!outcome.leveled_up());
    assert_matches!(
        game.engine.level_up_player(&player, 0).await,
        Err(CoreError::InvalidInput(_))
    );
}

// ---------------------------------------------------------------------------
// Free ticket cooldown
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_free_ticket_cycle() {
    let game = game();
    let player = game.player("player1").await;

    let first = game.engine.check_free_ticket(&player).await.unwrap();
    assert!(first.granted);
    assert_eq!(first.remaining_millis, 0);
    assert_eq!(
        game.engine.get_ticket_balance(&player, "normal").await.unwrap(),
        4
    );

    game.clock.advance(Duration::hours(1));
    let pending = game.engine.check_free_ticket(&player).await.unwrap();
    assert!(!pending.granted);
    assert_eq!(pending.remaining_millis, Duration::hours(23).num_milliseconds());
    assert_eq!(
        game.engine.get_ticket_balance(&player, "normal").await.unwrap(),
        4
    );

    game.clock.advance(Duration::hours(24));
    let overdue = game.engine.check_free_ticket(&player).await.unwrap();
    assert!(overdue.granted);
    assert_eq!(overdue.remaining_millis, -Duration::hours(1).num_milliseconds());

    let metadata = game.engine.get_metadata(&player).await.unwrap();
    assert_eq!(metadata.ticket_count.normal, 5);
    assert_eq!(
        metadata.ticket_count.last_free_ticket_at,
        Some(game.clock.now())
    );
}

#[tokio::test]
async fn test_set_ticket_cooldown() {
    let game = game();
    let player = game.player("player1").await;

    let cooldown = game.engine.set_ticket_cooldown(&player, 2).await.unwrap();
    assert_eq!(cooldown, game.clock.now() + Duration::hours(2));

    let status = game.engine.check_free_ticket(&player).await.unwrap();
    assert!(!status.granted);
    assert_eq!(status.remaining_millis, Duration::hours(2).num_milliseconds());
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_record_pull_tags_single_and_bulk() {
    let game = game();
    let player = game.player("player1").await;
    let koromon = game.character("koromon", Rarity::Common, 0.9, 10).await;
    let tokomon = game.character("tokomon", Rarity::Uncommon, 0.5, 20).await;

    let single = game.engine.record_pull(&player, &[koromon]).await.unwrap();
    assert_eq!(single.pull_type.as_str(), "single");

    let bulk = game
        .engine
        .record_pull(&player, &[koromon, tokomon, koromon])
        .await
        .unwrap();
    assert_eq!(bulk.pull_type.as_str(), "bulk");
    assert_eq!(bulk.pulled[1].name, "tokomon");
    assert_eq!(bulk.pulled[1].rarity, Rarity::Uncommon);

    let history = game.engine.get_pull_history(&player).await.unwrap();
    assert_eq!(history, vec![bulk, single]);

    assert_matches!(
        game.engine.record_pull(&player, &[new_id()]).await,
        Err(CoreError::NotFound { .. })
    );
}
