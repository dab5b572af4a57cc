//! Character index and gacha pool operations.

use gacha_core::catalog::{CharacterIndexEntry, GachaPoolEntry};
use gacha_core::error::{CoreError, CoreResult};
use gacha_core::rarity::Rarity;
use gacha_core::types::new_id;
use gacha_core::validation::{
    validate_id, validate_positive_integer, validate_positive_number, validate_string,
};

use crate::GachaEngine;

impl GachaEngine {
    /// Add a character to the index, then create its pool entry with a pull
    /// rate and duplicate payout drawn from its rarity band.
    ///
    /// If the pool insert fails, the index entry is deleted again so the two
    /// stores never disagree.
    pub async fn add_index_entry(
        &self,
        name: &str,
        rarity: &str,
        image: &str,
        description: &str,
    ) -> CoreResult<CharacterIndexEntry> {
        let name = validate_string(name, "Name")?.to_lowercase();
        let rarity: Rarity = validate_string(rarity, "Rarity")?.parse()?;
        let image = validate_string(image, "Image URL")?;
        let description = validate_string(description, "Description")?;

        if self.stores.index.find_by_name(&name).await?.is_some() {
            return Err(CoreError::Conflict(format!(
                "{name} is already in the character index"
            )));
        }

        let entry = CharacterIndexEntry {
            id: new_id(),
            name,
            rarity,
            image,
            description,
            collected: false,
        };
        self.stores.index.insert(&entry).await?;

        let (pull_rate, duplicate_currency) = {
            let mut rng = rand::rng();
            (
                self.tuning.rarity.pull_rate(rarity, &mut rng),
                self.tuning.rarity.duplicate_currency(rarity, &mut rng),
            )
        };

        if let Err(e) = self
            .add_character_to_gacha(&entry.name, pull_rate, duplicate_currency)
            .await
        {
            tracing::error!(
                character_id = %entry.id,
                error = %e,
                "Gacha pool insert failed, removing index entry",
            );
            if let Err(undo) = self.stores.index.delete(entry.id).await {
                tracing::error!(character_id = %entry.id, error = %undo, "Index rollback failed");
            }
            return Err(e);
        }

        tracing::info!(
            character_id = %entry.id,
            name = %entry.name,
            rarity = %entry.rarity,
            pull_rate,
            duplicate_currency,
            "Character added to catalog",
        );
        Ok(entry)
    }

    pub async fn list_index_entries(&self) -> CoreResult<Vec<CharacterIndexEntry>> {
        self.stores.index.list().await
    }

    pub async fn get_index_entry(&self, character_id: &str) -> CoreResult<CharacterIndexEntry> {
        let character_id = validate_id(character_id, "Character id")?;
        self.stores
            .index
            .find_by_id(character_id)
            .await?
            .ok_or_else(|| CoreError::not_found("character", character_id))
    }

    /// Create the pool entry for an indexed character, looked up by name.
    ///
    /// Fails `NotFound` if the index entry does not exist yet and `Conflict`
    /// if the character is already in the pool.
    pub async fn add_character_to_gacha(
        &self,
        name: &str,
        pull_rate: f64,
        duplicate_currency: i64,
    ) -> CoreResult<GachaPoolEntry> {
        let name = validate_string(name, "Name")?;
        let pull_rate = validate_positive_number(pull_rate, "Pull rate")?;
        if pull_rate > 1.0 {
            return Err(CoreError::invalid("Pull rate", "must be at most 1"));
        }
        let duplicate_currency =
            validate_positive_integer(duplicate_currency, "Duplicate currency")?;

        let character = self
            .stores
            .index
            .find_by_name(&name)
            .await?
            .ok_or_else(|| CoreError::not_found("character", &name))?;

        let entry = GachaPoolEntry {
            character_id: character.id,
            pull_rate,
            duplicate_currency,
        };
        self.stores.pool.insert(&entry).await?;
        Ok(entry)
    }

    pub async fn list_pool_entries(&self) -> CoreResult<Vec<GachaPoolEntry>> {
        self.stores.pool.list().await
    }

    pub async fn get_pool_entry(&self, character_id: &str) -> CoreResult<GachaPoolEntry> {
        let character_id = validate_id(character_id, "Character id")?;
        self.stores
            .pool
            .find_by_id(character_id)
            .await?
            .ok_or_else(|| CoreError::not_found("gacha pool entry", character_id))
    }
}
