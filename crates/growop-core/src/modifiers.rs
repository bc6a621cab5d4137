//! Turns owned upgrades, finished research and the active event into the
//! numbers the grow crate works with.

use growop_catalog::Catalog;
use growop_grow::care::{BASE_PERFECT_WINDOW_MS, FERTILIZER_COST, WATER_COST};
use growop_grow::{GrowModifiers, Stabilization, pests};
use growop_types::{CostTarget, EnvParam, UpgradeEffect};

use crate::research::{self, ResearchBonuses};
use crate::state::GameState;

/// Highest combined fertilizer safety.
pub const MAX_FERTILIZER_SAFETY: f64 = 1.0;

/// Sum an upgrade effect over every owned level.
fn upgrade_total(state: &GameState, catalog: &Catalog, pick: impl Fn(UpgradeEffect) -> Option<f64>) -> f64 {
    catalog
        .upgrades
        .iter()
        .filter_map(|u| pick(u.effect).map(|v| v * f64::from(state.upgrade_level(&u.id))))
        .sum()
}

/// Price after a fractional discount, rounded to whole nugs.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn discounted(price: u64, reduction: f64) -> u64 {
    (price as f64 * (1.0 - reduction.clamp(0.0, research::MAX_COST_REDUCTION))).round() as u64
}

/// Bonuses of the research finished so far.
pub fn research_bonuses(state: &GameState, catalog: &Catalog) -> ResearchBonuses {
    research::bonuses(catalog, &state.research.completed)
}

/// Growth, care and yield modifiers in force.
pub fn grow_modifiers(state: &GameState, catalog: &Catalog, bonuses: &ResearchBonuses) -> GrowModifiers {
    let event = state.event_kind();
    let growth_speed = upgrade_total(state, catalog, |e| match e {
        UpgradeEffect::GrowthSpeed(v) => Some(v),
        _ => None,
    });
    let water_bonus = upgrade_total(state, catalog, |e| match e {
        UpgradeEffect::WaterBonus(v) => Some(v),
        _ => None,
    });
    let safety = upgrade_total(state, catalog, |e| match e {
        UpgradeEffect::FertilizerSafety(v) => Some(v),
        _ => None,
    });
    GrowModifiers {
        time_reduction: growth_speed + bonuses.time_reduction,
        event_growth: event.map_or(1.0, |k| k.growth_multiplier()),
        water_bonus,
        fertilizer_safety: safety.min(MAX_FERTILIZER_SAFETY),
        quality_boost: bonuses.quality_boost,
        yield_multiplier: bonuses.yield_multiplier,
        perfect_window_ms: event.map_or(BASE_PERFECT_WINDOW_MS, |k| k.perfect_window_ms()),
        water_cost: discounted(WATER_COST, bonuses.cost_reduction(CostTarget::Water)),
        fertilizer_cost: discounted(FERTILIZER_COST, bonuses.cost_reduction(CostTarget::Nutrients)),
    }
}

/// Pest protection from upgrades, already capped.
pub fn pest_protection(state: &GameState, catalog: &Catalog) -> f64 {
    let raw = upgrade_total(state, catalog, |e| match e {
        UpgradeEffect::PestProtection(v) => Some(v),
        _ => None,
    });
    pests::protection(raw)
}

/// Combined level of climate-control upgrades.
pub fn climate_level(state: &GameState, catalog: &Catalog) -> u32 {
    catalog
        .upgrades
        .iter()
        .filter(|u| matches!(u.effect, UpgradeEffect::ClimateControl(_)))
        .map(|u| state.upgrade_level(&u.id))
        .fold(0_u32, u32::saturating_add)
}

/// Drift damping from owned environment upgrades.
pub fn stabilization(state: &GameState, catalog: &Catalog) -> Stabilization {
    let mut stab = Stabilization::default();
    for upgrade in state.env_upgrades.iter().filter_map(|id| catalog.env_upgrade(id)) {
        let slot = match upgrade.param {
            EnvParam::Ph => &mut stab.ph,
            EnvParam::Ec => &mut stab.ec,
            EnvParam::Humidity => &mut stab.humidity,
            EnvParam::Temperature => &mut stab.temperature,
            EnvParam::Co2 => continue,
        };
        *slot = slot.max(upgrade.stabilization.clamp(0.0, 1.0));
    }
    stab
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::float_cmp)]

    use growop_types::{EnvUpgradeId, GlobalEvent, GlobalEventKind, ResearchNodeId, UpgradeId};

    use super::*;

    fn state_with(upgrades: &[(&str, u32)]) -> (Catalog, GameState) {
        let catalog = Catalog::standard();
        let mut state = GameState::initial(&catalog);
        for (id, level) in upgrades {
            state.upgrades.insert(UpgradeId::new(*id), *level);
        }
        (catalog, state)
    }

    #[test]
    fn water_bonus_sums_levels() {
        let (catalog, state) = state_with(&[("precision-water", 2), ("auto-drip", 1), ("watering-can-pro", 2)]);
        let grow = grow_modifiers(&state, &catalog, &ResearchBonuses::default());
        assert!((grow.water_bonus - 0.18).abs() < 1e-9);
        assert_eq!(grow.water_cost, 5);
        assert_eq!(grow.perfect_window_ms, 2_500);
    }

    #[test]
    fn fertilizer_safety_caps_at_one() {
        let (catalog, state) = state_with(&[("premium-nutrients", 2), ("smart-nutrients", 2)]);
        let grow = grow_modifiers(&state, &catalog, &ResearchBonuses::default());
        assert_eq!(grow.fertilizer_safety, 1.0);
    }

    #[test]
    fn research_and_event_feed_growth() {
        let (catalog, mut state) = state_with(&[("led-panel", 1)]);
        state.research.completed.insert(ResearchNodeId::new("custom-feeding"));
        state.research.completed.insert(ResearchNodeId::new("living-soil"));
        state.event = Some(GlobalEvent {
            kind: GlobalEventKind::Festival,
            started_at: 0,
            ends_at: 60_000,
        });
        let bonuses = research_bonuses(&state, &catalog);
        let grow = grow_modifiers(&state, &catalog, &bonuses);
        assert!((grow.time_reduction - 0.15).abs() < 1e-9);
        assert_eq!(grow.perfect_window_ms, 4_000);
        assert_eq!(grow.event_growth, 1.0);
        assert_eq!(grow.fertilizer_cost, 11);
        assert!((grow.yield_multiplier - 1.2 * 1.3).abs() < 1e-9);
    }

    #[test]
    fn pest_protection_is_capped() {
        let (catalog, state) = state_with(&[("sticky-traps", 1), ("bio-shield", 2)]);
        assert!((pest_protection(&state, &catalog) - 0.8).abs() < 1e-9);
        let (catalog, state) = state_with(&[("sticky-traps", 3), ("bio-shield", 2)]);
        assert_eq!(pest_protection(&state, &catalog), 0.9);
    }

    #[test]
    fn env_upgrades_damp_their_parameter() {
        let (catalog, mut state) = state_with(&[("climate-control", 2)]);
        state.env_upgrades.insert(EnvUpgradeId::new("ph-controller"));
        state.env_upgrades.insert(EnvUpgradeId::new("co2-generator"));
        let stab = stabilization(&state, &catalog);
        assert_eq!(stab.ph, 0.8);
        assert_eq!(stab.ec, 0.0);
        assert_eq!(climate_level(&state, &catalog), 2);
    }

    #[test]
    fn discounts_round_to_whole_nugs() {
        assert_eq!(discounted(5, 0.2), 4);
        assert_eq!(discounted(15, 0.25), 11);
        assert_eq!(discounted(200, 0.3), 140);
        assert_eq!(discounted(200, 5.0), 20);
    }
}
