//! Integration tests for the character index, gacha pool, and shop repos.

use assert_matches::assert_matches;
use gacha_core::catalog::{CharacterIndexEntry, GachaPoolEntry};
use gacha_core::error::CoreError;
use gacha_core::rarity::Rarity;
use gacha_core::shop::{ShopEffect, ShopItem};
use gacha_core::store::{CharacterIndexStore, GachaPoolStore, ShopStore};
use gacha_core::types::new_id;
use gacha_db::PgStore;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn entry(name: &str, rarity: Rarity) -> CharacterIndexEntry {
    CharacterIndexEntry {
        id: new_id(),
        name: name.to_string(),
        rarity,
        image: format!("https://img.example/{name}.png"),
        description: format!("{name} description"),
        collected: false,
    }
}

// ---------------------------------------------------------------------------
// Character index
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_insert_and_find_index_entry(pool: PgPool) {
    let store = PgStore::new(pool);
    let koromon = entry("koromon", Rarity::Common);
    CharacterIndexStore::insert(&store, &koromon).await.unwrap();

    let by_id = CharacterIndexStore::find_by_id(&store, koromon.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_id, koromon);

    let by_name = CharacterIndexStore::find_by_name(&store, "KOROMON")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_name.id, koromon.id);

    assert!(CharacterIndexStore::find_by_name(&store, "tsunomon")
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_index_name_unique_ignoring_case(pool: PgPool) {
    let store = PgStore::new(pool);
    CharacterIndexStore::insert(&store, &entry("koromon", Rarity::Common))
        .await
        .unwrap();
    let result = CharacterIndexStore::insert(&store, &entry("Koromon", Rarity::Rare)).await;
    assert_matches!(result, Err(CoreError::Conflict(_)));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_mark_collected_is_compare_and_set(pool: PgPool) {
    let store = PgStore::new(pool);
    let koromon = entry("koromon", Rarity::Common);
    CharacterIndexStore::insert(&store, &koromon).await.unwrap();

    assert!(store.mark_collected(koromon.id).await.unwrap());
    assert!(!store.mark_collected(koromon.id).await.unwrap());
    assert_matches!(
        store.mark_collected(new_id()).await,
        Err(CoreError::NotFound { .. })
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unmark_collected_reopens_first_collection(pool: PgPool) {
    let store = PgStore::new(pool);
    let koromon = entry("koromon", Rarity::Common);
    CharacterIndexStore::insert(&store, &koromon).await.unwrap();

    assert!(!store.unmark_collected(koromon.id).await.unwrap());
    store.mark_collected(koromon.id).await.unwrap();
    assert!(store.unmark_collected(koromon.id).await.unwrap());
    assert!(store.mark_collected(koromon.id).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_index_entry_cascades_to_pool(pool: PgPool) {
    let store = PgStore::new(pool);
    let koromon = entry("koromon", Rarity::Common);
    CharacterIndexStore::insert(&store, &koromon).await.unwrap();
    GachaPoolStore::insert(
        &store,
        &GachaPoolEntry {
            character_id: koromon.id,
            pull_rate: 0.8,
            duplicate_currency: 10,
        },
    )
    .await
    .unwrap();

    assert!(CharacterIndexStore::delete(&store, koromon.id).await.unwrap());
    assert!(GachaPoolStore::find_by_id(&store, koromon.id)
        .await
        .unwrap()
        .is_none());
}

// ---------------------------------------------------------------------------
// Gacha pool
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_pool_entry_requires_index_entry(pool: PgPool) {
    let store = PgStore::new(pool);
    let orphan = GachaPoolEntry {
        character_id: new_id(),
        pull_rate: 0.5,
        duplicate_currency: 10,
    };
    assert_matches!(
        GachaPoolStore::insert(&store, &orphan).await,
        Err(CoreError::NotFound { .. })
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_pool_entry_conflict_and_list(pool: PgPool) {
    let store = PgStore::new(pool);
    let koromon = entry("koromon", Rarity::Common);
    CharacterIndexStore::insert(&store, &koromon).await.unwrap();
    let pool_entry = GachaPoolEntry {
        character_id: koromon.id,
        pull_rate: 0.8,
        duplicate_currency: 10,
    };
    GachaPoolStore::insert(&store, &pool_entry).await.unwrap();

    assert_matches!(
        GachaPoolStore::insert(&store, &pool_entry).await,
        Err(CoreError::Conflict(_))
    );

    let listed = GachaPoolStore::list(&store).await.unwrap();
    assert_eq!(listed, vec![pool_entry]);
}

// ---------------------------------------------------------------------------
// Shop
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_shop_items_round_trip(pool: PgPool) {
    let store = PgStore::new(pool);
    let food = ShopItem {
        name: "food".to_string(),
        cost: 50,
        description: "Feed a character".to_string(),
        image: "food.png".to_string(),
        effect: ShopEffect::Food,
    };
    ShopStore::insert(&store, &food).await.unwrap();

    assert_eq!(
        ShopStore::find_by_name(&store, "FOOD").await.unwrap(),
        Some(food.clone())
    );
    assert_matches!(
        ShopStore::insert(&store, &food).await,
        Err(CoreError::Conflict(_))
    );
    assert_eq!(ShopStore::list(&store).await.unwrap().len(), 1);
}
