//! Employee-driven plant care.
//!
//! Each enabled slot with a hired employee gets one pass per tick: water,
//! then fertilize, then harvest and replant. An action only runs when the
//! employee covers it and every gate of the manual action would pass, so
//! a pass never reports errors for ordinary waiting.

use growop_catalog::Catalog;
use growop_genetics::find_strain;
use growop_grow::care::{WATER_STACK_CAP, fertilizer_cooldown_remaining, water_cooldown_remaining};
use growop_grow::{GrowModifiers, allow_refeed, is_harvest_ready, time_multiplier};
use growop_types::{CareTask, Employee, SoilType, StrainId};
use rand::Rng;
use tracing::debug;

use crate::actions;
use crate::modifiers::{grow_modifiers, research_bonuses};
use crate::state::{Context, GameState};

/// Skill added per point of efficiency above average.
pub const SKILL_PER_EFFICIENCY: f64 = 0.1;

/// Phases in which automation feeds plants.
pub const FERTILIZE_PHASES: [u8; 2] = [2, 4];

/// Soil used when replanting after an automated harvest.
pub const REPLANT_SOIL: SoilType = SoilType::LightMix;

/// What one automation pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AutomationReport {
    /// Plants watered.
    pub watered: u32,
    /// Plants fertilized.
    pub fertilized: u32,
    /// Plants harvested.
    pub harvested: u32,
    /// Slots replanted.
    pub replanted: u32,
}

/// Timing skill an employee adds to their work.
pub const fn skill_bonus(employee: &Employee) -> f64 {
    (employee.efficiency - 1.0) * SKILL_PER_EFFICIENCY
}

fn assigned<'c>(state: &GameState, catalog: &'c Catalog, index: usize) -> Option<(&'c Employee, Option<StrainId>)> {
    let slot = state.slots.get(index)?;
    if !slot.automation.enabled {
        return None;
    }
    let id = slot.automation.employee.as_ref()?;
    if !state.employees.contains(id) {
        return None;
    }
    let employee = catalog.employee(id)?;
    Some((employee, slot.automation.replant.clone()))
}

fn water_due(state: &GameState, index: usize, grow: &GrowModifiers, now_ms: u64) -> bool {
    state.nugs >= grow.water_cost
        && state
            .slots
            .get(index)
            .and_then(|s| s.plant.as_ref())
            .is_some_and(|p| {
                water_cooldown_remaining(p, now_ms) == 0 && p.modifiers.water_stacks < WATER_STACK_CAP
            })
}

fn fertilize_due(state: &mut GameState, catalog: &Catalog, index: usize, grow: &GrowModifiers, now_ms: u64) -> bool {
    let funded = state.nugs >= grow.fertilizer_cost;
    let Some(plant) = state.slots.get_mut(index).and_then(|s| s.plant.as_mut()) else {
        return false;
    };
    if allow_refeed(plant, &catalog.phases) {
        debug!(slot = index, phase = plant.phase, "fertilizer re-armed");
    }
    funded
        && FERTILIZE_PHASES.contains(&plant.phase)
        && !plant.modifiers.fertilizer_applied
        && fertilizer_cooldown_remaining(plant, now_ms) == 0
}

fn harvest_due(state: &GameState, catalog: &Catalog, index: usize, grow: &GrowModifiers) -> bool {
    let Some(plant) = state.slots.get(index).and_then(|s| s.plant.as_ref()) else {
        return false;
    };
    let Some(strain) = find_strain(catalog, &state.breeding, &plant.strain) else {
        return false;
    };
    let phenotype = plant
        .modifiers
        .phenotype
        .as_ref()
        .and_then(|p| catalog.phenotype(p));
    is_harvest_ready(plant, &catalog.phases, time_multiplier(strain, phenotype, grow))
}

/// Run one automation pass over every slot.
pub fn run(state: &mut GameState, ctx: &mut Context<'_, impl Rng>) -> AutomationReport {
    let catalog = ctx.catalog;
    let grow = grow_modifiers(state, catalog, &research_bonuses(state, catalog));
    let mut report = AutomationReport::default();

    for index in 0..state.slots.len() {
        let Some((employee, replant)) = assigned(state, catalog, index) else {
            continue;
        };
        let spec = employee.specialization;

        if spec.covers(CareTask::Water) && water_due(state, index, &grow, ctx.now_ms) {
            match actions::water(state, ctx, index, skill_bonus(employee)) {
                Ok(_) => report.watered = report.watered.saturating_add(1),
                Err(err) => debug!(slot = index, error = %err, "automated watering skipped"),
            }
        }

        if spec.covers(CareTask::Fertilize) && fertilize_due(state, catalog, index, &grow, ctx.now_ms) {
            match actions::fertilize(state, ctx, index) {
                Ok(_) => report.fertilized = report.fertilized.saturating_add(1),
                Err(err) => debug!(slot = index, error = %err, "automated feeding skipped"),
            }
        }

        if spec.covers(CareTask::Harvest) && harvest_due(state, catalog, index, &grow) {
            match actions::harvest(state, ctx, index) {
                Ok(_) => report.harvested = report.harvested.saturating_add(1),
                Err(err) => {
                    debug!(slot = index, error = %err, "automated harvest skipped");
                    continue;
                }
            }
            if let Some(strain) = replant {
                match actions::plant_seed(state, ctx, index, &strain, REPLANT_SOIL) {
                    Ok(_) => report.replanted = report.replanted.saturating_add(1),
                    Err(err) => debug!(slot = index, error = %err, "automated replant skipped"),
                }
            }
        }
    }
    if report != AutomationReport::default() {
        debug!(?report, "automation pass");
    }
    report
}
