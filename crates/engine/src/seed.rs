//! Default catalog: the starter roster and shop items.

use gacha_core::error::{CoreError, CoreResult};

use crate::GachaEngine;

const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com";

/// `(name, rarity, description)`
const ROSTER: &[(&str, &str, &str)] = &[
    ("Koromon", "rare", "Blows bubbles at anything that gets too close."),
    ("Tsunomon", "rare", "Playful, with one hardened horn on its head."),
    ("Tokomon", "uncommon", "Looks harmless until it opens its mouth."),
    ("Tanemon", "common", "Digs in and hides at the first sign of trouble."),
    ("Pagumon", "uncommon", "A mischief-maker that loves to tease."),
    ("Motimon", "common", "Soft as a rice cake and just as sticky."),
    ("Bukamon", "common", "Swims better than it walks."),
    ("Peti Meramon", "uncommon", "A tiny flame that never stops flickering."),
    ("Pyocomon", "common", "Hops around in search of sunny spots."),
    ("Kapurimon", "common", "Its helmet is harder than its head."),
    ("Nyaromon", "common", "Curious and fickle, with a lonely side."),
    ("DemiVeemon", "legendary", "Small, fearless and always hungry."),
    ("Poromon", "common", "Keeps the feather on its head perfectly groomed."),
    ("Upamon", "common", "Takes being bullied as being played with."),
    ("Minomon", "common", "Only peeks out of its shell on good days."),
    ("Gummymon", "uncommon", "Squishy all over except for its horn."),
];

/// `(name, cost, description, effect)`
const SHOP: &[(&str, i64, &str, &str)] = &[
    ("normal ticket", 10, "A basic ticket good for one pull.", "normal_ticket"),
    (
        "golden ticket",
        100,
        "A golden ticket with higher odds for rare characters.",
        "golden_ticket",
    ),
    ("food", 50, "Feed a character to boost its experience.", "food"),
];

/// Counts of what [`seed_catalog`] inserted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub characters: usize,
    pub shop_items: usize,
}

/// Insert the default roster and shop. Entries that already exist are
/// skipped, so seeding an already seeded store is a no-op.
pub async fn seed_catalog(engine: &GachaEngine) -> CoreResult<SeedReport> {
    let mut report = SeedReport::default();

    for (name, rarity, description) in ROSTER {
        match engine
            .add_index_entry(name, rarity, PLACEHOLDER_IMAGE, description)
            .await
        {
            Ok(_) => report.characters += 1,
            Err(CoreError::Conflict(_)) => {
                tracing::debug!(name, "Character already seeded");
            }
            Err(e) => return Err(e),
        }
    }

    for (name, cost, description, effect) in SHOP {
        match engine
            .add_shop_item(name, *cost, description, PLACEHOLDER_IMAGE, effect)
            .await
        {
            Ok(_) => report.shop_items += 1,
            Err(CoreError::Conflict(_)) => {
                tracing::debug!(name, "Shop item already seeded");
            }
            Err(e) => return Err(e),
        }
    }

    tracing::info!(
        characters = report.characters,
        shop_items = report.shop_items,
        "Catalog seeded",
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roster_names_are_unique_ignoring_case() {
        let mut names: Vec<String> = ROSTER
            .iter()
            .map(|(name, _, _)| name.to_lowercase())
            .collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), ROSTER.len());
    }

    #[test]
    fn roster_rarities_parse() {
        for (_, rarity, _) in ROSTER {
            assert!(rarity.parse::<gacha_core::rarity::Rarity>().is_ok());
        }
    }
}
