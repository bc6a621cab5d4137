//! Pins the balance numbers of the standard ruleset.
//!
//! A failure here means a tuning value moved. Update the expectation only
//! when the change is intended.

#![allow(clippy::unwrap_used, clippy::float_cmp, clippy::indexing_slicing)]

use growop_catalog::Catalog;
use growop_core::shop::upgrade_price;
use growop_core::state::{STARTING_BUDS, STARTING_NUGS, STARTING_SLOTS};
use growop_core::{GameState, SNAPSHOT_VERSION};
use growop_grow::care::{
    BASE_PERFECT_WINDOW_MS, FERTILIZER_COOLDOWN_MS, FERTILIZER_COST, WATER_COOLDOWN_MS, WATER_COST,
    WATER_STACK_CAP,
};
use growop_grow::curing::BASE_CURING_MS;
use growop_types::{QuestKind, Reward, SoilType};

#[test]
fn phase_table() {
    let catalog = Catalog::standard();
    let durations: Vec<u64> = catalog.phases.iter().map(|p| p.base_duration_ms).collect();
    assert_eq!(durations, vec![10_000, 20_000, 30_000, 30_000, 25_000, 5_000]);

    let water: Vec<bool> = catalog.phases.iter().map(|p| p.water_recommended).collect();
    assert_eq!(water, vec![false, true, true, false, true, false]);
    let feed: Vec<bool> = catalog.phases.iter().map(|p| p.fertilizer_recommended).collect();
    assert_eq!(feed, vec![false, false, true, true, true, false]);
}

#[test]
fn soils() {
    assert_eq!(SoilType::Basic.cost(), 0);
    assert_eq!(SoilType::LightMix.cost(), 15);
    assert_eq!(SoilType::AllMix.cost(), 35);
    assert_eq!(SoilType::LightMix.time_multiplier(), 0.9);
    assert_eq!(SoilType::AllMix.time_multiplier(), 1.0);
}

#[test]
fn care_and_curing() {
    assert_eq!(WATER_COST, 5);
    assert_eq!(WATER_COOLDOWN_MS, 15_000);
    assert_eq!(WATER_STACK_CAP, 5);
    assert_eq!(BASE_PERFECT_WINDOW_MS, 2_500);
    assert_eq!(FERTILIZER_COST, 15);
    assert_eq!(FERTILIZER_COOLDOWN_MS, 20_000);
    assert_eq!(BASE_CURING_MS, 60_000);
}

#[test]
fn starting_kit() {
    let catalog = Catalog::standard();
    let state = GameState::initial(&catalog);
    assert_eq!(STARTING_NUGS, 1_000);
    assert_eq!(STARTING_BUDS, 500);
    assert_eq!(STARTING_SLOTS, 2);
    assert_eq!(state.nugs, STARTING_NUGS);
    assert_eq!(state.inventory.buds, STARTING_BUDS);
    assert_eq!(state.slots.len(), STARTING_SLOTS);
    assert_eq!(state.market.data.len(), catalog.market.len());
    assert_eq!(SNAPSHOT_VERSION, 2);
}

#[test]
fn quest_log() {
    let catalog = Catalog::standard();
    let quests: Vec<(QuestKind, u64, Reward)> = catalog
        .quests
        .iter()
        .map(|q| (q.kind, q.target, q.reward))
        .collect();
    assert_eq!(
        quests,
        vec![
            (QuestKind::Harvest, 3, Reward::Nugs(75)),
            (QuestKind::Sell, 100, Reward::Nugs(150)),
            (QuestKind::Water, 10, Reward::Buds(20)),
        ]
    );
}

#[test]
fn upgrade_prices_compound() {
    let catalog = Catalog::standard();
    let tent = catalog
        .upgrades
        .iter()
        .find(|u| u.id.as_str() == "tent-slot")
        .unwrap();
    let prices: Vec<u64> = (0..tent.max_level)
        .map(|level| upgrade_price(tent.base_price, level))
        .collect();
    assert_eq!(prices, vec![400, 600, 900, 1_350]);
}
