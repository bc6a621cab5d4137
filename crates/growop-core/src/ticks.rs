//! Tick entry points.
//!
//! The core owns no timers. A scheduler (the engine binary, or a test)
//! calls each of these at its own cadence with the current time. Every
//! function is a plain state transform; none of them can fail.

use growop_genetics::find_strain;
use growop_grow::{Advance, PestReport, environment, pests};
use growop_market::{MarketTick, inventory, pricing};
use growop_types::{GlobalEventKind, ResearchNodeId};
use rand::Rng;
use tracing::{debug, info};

use crate::actions;
use crate::automation::{self, AutomationReport};
use crate::events;
use crate::modifiers::{grow_modifiers, pest_protection, research_bonuses, stabilization};
use crate::research;
use crate::state::{Context, GameState, Strains};

/// Phase changes from one growth tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhaseTick {
    /// Slots whose plant moved into a new phase, with that phase.
    pub entered: Vec<(usize, u8)>,
    /// Slots whose plant is ready to harvest.
    pub ready: Vec<usize>,
}

/// Grow every plant by `tick_ms` and let infestations do their damage.
pub fn advance_plant_phases<R>(state: &mut GameState, ctx: &Context<'_, R>, tick_ms: u64) -> PhaseTick {
    let catalog = ctx.catalog;
    let grow = grow_modifiers(state, catalog, &research_bonuses(state, catalog));
    let mut report = PhaseTick::default();

    for (index, slot) in state.slots.iter_mut().enumerate() {
        let Some(plant) = slot.plant.as_mut() else {
            continue;
        };
        let Some(strain) = find_strain(catalog, &state.breeding, &plant.strain) else {
            continue;
        };
        let phenotype = plant
            .modifiers
            .phenotype
            .as_ref()
            .and_then(|p| catalog.phenotype(p));
        let multiplier = growop_grow::time_multiplier(strain, phenotype, &grow);
        match growop_grow::advance(plant, &catalog.phases, tick_ms, multiplier) {
            Advance::Growing => {}
            Advance::EnteredPhase(phase) => {
                info!(slot = index, plant = %plant.id, phase, "plant entered phase");
                report.entered.push((index, phase));
            }
            Advance::Ready => report.ready.push(index),
        }
    }
    pests::progress_infestations(&mut state.slots, &mut state.infestations, catalog, tick_ms);
    report
}

/// Move finished curing batches into inventory. Returns how many finished.
pub fn process_curing_tick(state: &mut GameState, ctx: &mut Context<'_, impl Rng>) -> usize {
    let finished = growop_grow::curing::complete_due(&mut state.curing, ctx.now_ms, ctx.rng);
    let count = finished.len();
    for batch in finished {
        inventory::add_batch(&mut state.inventory, batch);
    }
    if count > 0 {
        info!(count, buds = state.inventory.buds, "curing finished");
    }
    count
}

/// Recompute supply, demand, trends, conditions and prices.
pub fn update_market_data(state: &mut GameState, ctx: &mut Context<'_, impl Rng>) -> MarketTick {
    let boost = research_bonuses(state, ctx.catalog).terpene_boost;
    let strains = Strains::new(ctx.catalog, &state.breeding);
    let tick = pricing::tick(&mut state.market, ctx.catalog, &strains, boost, ctx.now_ms, ctx.rng);
    debug!(strains = state.market.data.len(), conditions = state.market.conditions.len(), "market updated");
    tick
}

/// Roll for new infestations and let old ones clear on their own.
pub fn check_for_pests(state: &mut GameState, ctx: &mut Context<'_, impl Rng>) -> PestReport {
    let protection = pest_protection(state, ctx.catalog);
    let frequency = state.settings.pest_frequency;
    pests::check_for_pests(
        &mut state.slots,
        &mut state.infestations,
        ctx.catalog,
        protection,
        frequency,
        ctx.now_ms,
        ctx.rng,
    )
}

/// Random-walk every plant's micro-environment, then re-derive terpenes.
pub fn drift_environment_values(state: &mut GameState, ctx: &mut Context<'_, impl Rng>) {
    let stab = stabilization(state, ctx.catalog);
    for plant in state.slots.iter_mut().filter_map(|s| s.plant.as_mut()) {
        environment::drift(&mut plant.environment, stab, ctx.rng);
    }
    actions::refresh_terpenes(state, ctx);
}

/// Progress per second of the running research, 0 when idle.
pub fn research_rate<R>(state: &GameState, ctx: &Context<'_, R>) -> f64 {
    state
        .research
        .active
        .as_ref()
        .and_then(|a| ctx.catalog.research_node(&a.node))
        .map_or(0.0, research::progress_per_second)
}

/// Add `amount` progress to the running research. Returns the node when
/// it finishes.
pub fn progress_research(state: &mut GameState, amount: f64) -> Option<ResearchNodeId> {
    research::progress(&mut state.research, amount)
}

/// Expire the global event once its time is up.
pub fn tick_event(state: &mut GameState, now_ms: u64) -> Option<GlobalEventKind> {
    events::tick_event(state, now_ms)
}

/// Maybe start a global event.
pub fn roll_event(state: &mut GameState, ctx: &mut Context<'_, impl Rng>) -> Option<GlobalEventKind> {
    events::roll_event(state, ctx)
}

/// One automation pass.
pub fn run_automation(state: &mut GameState, ctx: &mut Context<'_, impl Rng>) -> AutomationReport {
    automation::run(state, ctx)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::float_cmp)]

    use growop_catalog::Catalog;
    use growop_types::{ScriptedRng, SoilType, StrainId};

    use super::*;

    fn planted(catalog: &Catalog, rng: &mut ScriptedRng) -> GameState {
        let mut state = GameState::initial(catalog);
        let mut ctx = Context::new(catalog, 0, rng);
        actions::plant_seed(&mut state, &mut ctx, 0, &StrainId::new("green-gelato"), SoilType::Basic).unwrap();
        state
    }

    #[test]
    fn phases_advance_one_at_a_time() {
        let catalog = Catalog::standard();
        let mut rng = ScriptedRng::constant(0.5);
        let mut state = planted(&catalog, &mut rng);
        let ctx = Context::new(&catalog, 0, &mut rng);

        for _ in 0..9 {
            assert_eq!(advance_plant_phases(&mut state, &ctx, 1_000), PhaseTick::default());
        }
        let tick = advance_plant_phases(&mut state, &ctx, 1_000);
        assert_eq!(tick.entered, vec![(0, 1)]);
        // overshoot is discarded
        let tick = advance_plant_phases(&mut state, &ctx, 60_000);
        assert_eq!(tick.entered, vec![(0, 2)]);
        assert_eq!(state.slots[0].plant.as_ref().unwrap().elapsed_ms, 0);
    }

    #[test]
    fn cured_batches_reach_inventory() {
        let catalog = Catalog::standard();
        let mut rng = ScriptedRng::constant(0.5);
        let mut state = planted(&catalog, &mut rng);
        if let Some(plant) = state.slots[0].plant.as_mut() {
            plant.phase = 5;
            plant.elapsed_ms = 5_000;
        }
        let mut ctx = Context::new(&catalog, 0, &mut rng);
        actions::harvest(&mut state, &mut ctx, 0).unwrap();

        ctx.now_ms = 59_999;
        assert_eq!(process_curing_tick(&mut state, &mut ctx), 0);
        ctx.now_ms = 60_000;
        assert_eq!(process_curing_tick(&mut state, &mut ctx), 1);
        assert!(state.curing.is_empty());
        assert_eq!(state.inventory.buds, 580);
        assert_eq!(state.inventory.batches[0].strain, Some(StrainId::new("green-gelato")));
    }

    #[test]
    fn research_runs_at_listed_speed() {
        let catalog = Catalog::standard();
        let mut state = GameState::initial(&catalog);
        state.research.points = 100;
        let mut rng = ScriptedRng::constant(0.5);
        let ctx = Context::new(&catalog, 0, &mut rng);
        assert_eq!(research_rate(&state, &ctx), 0.0);

        research::start(&mut state.research, &catalog, &ResearchNodeId::new("basic-led"), 0).unwrap();
        let rate = research_rate(&state, &ctx);
        assert_eq!(rate, 5.0);
        for _ in 0..19 {
            assert_eq!(progress_research(&mut state, rate), None);
        }
        assert_eq!(progress_research(&mut state, rate), Some(ResearchNodeId::new("basic-led")));
    }

    #[test]
    fn market_tick_records_history() {
        let catalog = Catalog::standard();
        let mut state = GameState::initial(&catalog);
        let mut rng = ScriptedRng::constant(0.5);
        let mut ctx = Context::new(&catalog, 30_000, &mut rng);
        update_market_data(&mut state, &mut ctx);
        assert!(state.market.data.values().all(|d| d.history.len() == 1));
        assert!(state.market.data.values().all(|d| d.history[0].at == 30_000));
    }

    #[test]
    fn drift_keeps_terpenes_in_sync() {
        let catalog = Catalog::standard();
        let mut rng = ScriptedRng::constant(0.9);
        let mut state = planted(&catalog, &mut rng);
        let mut ctx = Context::new(&catalog, 0, &mut rng);
        let before = state.slots[0].plant.as_ref().unwrap().environment;
        drift_environment_values(&mut state, &mut ctx);
        let plant = state.slots[0].plant.as_ref().unwrap();
        assert_ne!(plant.environment, before);
        let baseline = &catalog.strain(&StrainId::new("green-gelato")).unwrap().terpenes;
        let expected = environment::derive_terpenes(baseline, &plant.environment, state.environment.light_cycle);
        assert_eq!(plant.modifiers.terpenes, expected);
    }
}
