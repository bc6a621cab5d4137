//! Player actions on grow slots and the room climate.
//!
//! These are the building blocks behind the slot commands and the
//! automation pass. Each one checks its gates before it changes anything,
//! then does the bookkeeping (stats, quests, research points) on success.

use growop_genetics::find_strain;
use growop_grow::curing::curing_duration_ms;
use growop_grow::environment::{self, derive_terpenes};
use growop_grow::{GrowError, Watered, pests};
use growop_market::inventory;
use growop_types::{
    CuringBatchId, EnhancerId, EnvParam, InfestationId, InventoryBatch, LightCycle, Plant, PlantId,
    QuestKind, Slot, SoilType, StrainId, TechniqueId, TreatmentId,
};
use rand::Rng;
use tracing::info;

use crate::error::{CoreError, charge};
use crate::modifiers::{climate_level, grow_modifiers, research_bonuses};
use crate::quests;
use crate::research;
use crate::state::{Context, GameState};

/// What a harvest produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Harvested {
    /// Curing batch created.
    pub batch: CuringBatchId,
    /// Buds harvested.
    pub quantity: u64,
    /// Plant quality at harvest.
    pub quality: f64,
    /// Research points earned.
    pub research_points: u64,
}

pub(crate) fn plant_mut(slots: &mut [Slot], index: usize) -> Result<&mut Plant, CoreError> {
    slots
        .get_mut(index)
        .ok_or(CoreError::SlotNotFound(index))?
        .plant
        .as_mut()
        .ok_or(CoreError::EmptySlot(index))
}

fn plant_ref(slots: &[Slot], index: usize) -> Result<&Plant, CoreError> {
    slots
        .get(index)
        .ok_or(CoreError::SlotNotFound(index))?
        .plant
        .as_ref()
        .ok_or(CoreError::EmptySlot(index))
}

/// Buy a seed and soil and plant them in an empty slot.
pub fn plant_seed(
    state: &mut GameState,
    ctx: &mut Context<'_, impl Rng>,
    index: usize,
    strain_id: &StrainId,
    soil: SoilType,
) -> Result<PlantId, CoreError> {
    let slot = state
        .slots
        .get_mut(index)
        .ok_or(CoreError::SlotNotFound(index))?;
    if slot.plant.is_some() {
        return Err(CoreError::SlotOccupied(index));
    }
    let strain = find_strain(ctx.catalog, &state.breeding, strain_id)
        .ok_or_else(|| CoreError::UnknownStrain(strain_id.clone()))?;
    if !state.breeding.discovered.contains(strain_id) {
        return Err(CoreError::NotDiscovered(strain_id.clone()));
    }
    charge(&mut state.nugs, strain.seed_price.saturating_add(soil.cost()))?;

    let plant = growop_grow::new_plant(strain, soil, None, ctx.now_ms, ctx.rng);
    let id = plant.id;
    info!(slot = index, plant = %id, strain = %strain_id, soil = ?soil, "seed planted");
    slot.plant = Some(plant);
    Ok(id)
}

/// Water the plant in a slot.
pub fn water(
    state: &mut GameState,
    ctx: &Context<'_, impl Rng>,
    index: usize,
    skill: f64,
) -> Result<Watered, CoreError> {
    let catalog = ctx.catalog;
    let grow = grow_modifiers(state, catalog, &research_bonuses(state, catalog));
    let chain = state.stats.water_chain;
    let plant = plant_mut(&mut state.slots, index)?;
    let phase = catalog
        .phase(plant.phase)
        .ok_or(GrowError::UnknownPhase(plant.phase))?;
    let strain = find_strain(catalog, &state.breeding, &plant.strain)
        .ok_or_else(|| CoreError::UnknownStrain(plant.strain.clone()))?;
    let watered = growop_grow::water(
        plant,
        phase,
        strain,
        &grow,
        &mut state.nugs,
        skill,
        chain,
        ctx.now_ms,
    )?;

    let stats = &mut state.stats;
    stats.total_waters = stats.total_waters.saturating_add(1);
    if watered.perfect {
        stats.perfect_waters = stats.perfect_waters.saturating_add(1);
        stats.water_chain = stats.water_chain.saturating_add(1);
        stats.best_water_chain = stats.best_water_chain.max(stats.water_chain);
    } else {
        stats.water_chain = 0;
    }
    quests::advance(&mut state.quests, QuestKind::Water, 1);
    Ok(watered)
}

/// Fertilize the plant in a slot. Returns the quality change.
pub fn fertilize(
    state: &mut GameState,
    ctx: &mut Context<'_, impl Rng>,
    index: usize,
) -> Result<f64, CoreError> {
    let catalog = ctx.catalog;
    let grow = grow_modifiers(state, catalog, &research_bonuses(state, catalog));
    let plant = plant_mut(&mut state.slots, index)?;
    let phase = catalog
        .phase(plant.phase)
        .ok_or(GrowError::UnknownPhase(plant.phase))?;
    let strain = find_strain(catalog, &state.breeding, &plant.strain)
        .ok_or_else(|| CoreError::UnknownStrain(plant.strain.clone()))?;
    let delta = growop_grow::fertilize(
        plant,
        phase,
        strain,
        &grow,
        &mut state.nugs,
        ctx.now_ms,
        ctx.rng,
    )?;
    Ok(delta)
}

/// Harvest a ready plant into the curing queue and empty its slot.
pub fn harvest(
    state: &mut GameState,
    ctx: &mut Context<'_, impl Rng>,
    index: usize,
) -> Result<Harvested, CoreError> {
    let catalog = ctx.catalog;
    let grow = grow_modifiers(state, catalog, &research_bonuses(state, catalog));
    let curing_ms = curing_duration_ms(climate_level(state, catalog), state.event_kind());
    let plant = plant_ref(&state.slots, index)?;
    let strain = find_strain(catalog, &state.breeding, &plant.strain)
        .ok_or_else(|| CoreError::UnknownStrain(plant.strain.clone()))?;
    let phenotype = plant
        .modifiers
        .phenotype
        .as_ref()
        .and_then(|p| catalog.phenotype(p));
    let time_multiplier = growop_grow::time_multiplier(strain, phenotype, &grow);
    let harvest = growop_grow::harvest::harvest(
        plant,
        strain,
        catalog,
        &catalog.phases,
        time_multiplier,
        &grow,
        curing_ms,
        ctx.now_ms,
        ctx.rng,
    )?;
    let research_points = research::harvest_points(harvest.quality, strain.rarity);

    if let Some(slot) = state.slots.get_mut(index) {
        slot.plant = None;
    }
    state.infestations.retain(|i| i.slot != index);
    let batch = harvest.batch.id;
    state.curing.push(harvest.batch);
    state.stats.total_harvests = state.stats.total_harvests.saturating_add(1);
    state.stats.total_buds_harvested = state
        .stats
        .total_buds_harvested
        .saturating_add(harvest.yield_amount);
    state.research.points = state.research.points.saturating_add(research_points);
    quests::advance(&mut state.quests, QuestKind::Harvest, 1);

    Ok(Harvested {
        batch,
        quantity: harvest.yield_amount,
        quality: harvest.quality,
        research_points,
    })
}

/// Apply a training technique. `success` comes from the minigame.
pub fn apply_training(
    state: &mut GameState,
    ctx: &mut Context<'_, impl Rng>,
    index: usize,
    technique: &TechniqueId,
    success: f64,
) -> Result<f64, CoreError> {
    let catalog = ctx.catalog;
    let spec = catalog
        .technique(technique)
        .ok_or_else(|| CoreError::UnknownTechnique(technique.clone()))?;
    let grow = grow_modifiers(state, catalog, &research_bonuses(state, catalog));
    let plant = plant_mut(&mut state.slots, index)?;
    let strain = find_strain(catalog, &state.breeding, &plant.strain)
        .ok_or_else(|| CoreError::UnknownStrain(plant.strain.clone()))?;
    let delta = growop_grow::apply_training(
        plant,
        spec,
        strain,
        &grow,
        &mut state.nugs,
        success,
        ctx.now_ms,
        ctx.rng,
    )?;
    Ok(delta)
}

/// Apply a yield enhancer.
pub fn apply_enhancer(
    state: &mut GameState,
    ctx: &Context<'_, impl Rng>,
    index: usize,
    enhancer: &EnhancerId,
) -> Result<f64, CoreError> {
    let spec = ctx
        .catalog
        .enhancer(enhancer)
        .ok_or_else(|| CoreError::UnknownEnhancer(enhancer.clone()))?;
    let plant = plant_mut(&mut state.slots, index)?;
    Ok(growop_grow::apply_enhancer(plant, spec, &mut state.nugs)?)
}

/// Treat an infestation. Returns whether it cleared.
pub fn treat(
    state: &mut GameState,
    ctx: &mut Context<'_, impl Rng>,
    infestation: InfestationId,
    treatment: &TreatmentId,
) -> Result<bool, CoreError> {
    let spec = ctx
        .catalog
        .treatment(treatment)
        .ok_or_else(|| CoreError::UnknownTreatment(treatment.clone()))?;
    let cleared = pests::treat(
        &mut state.slots,
        &mut state.infestations,
        infestation,
        spec,
        &mut state.nugs,
        ctx.rng,
    )?;
    Ok(cleared)
}

/// Pull a batch out of curing early at the rush penalty.
pub fn rush_curing(
    state: &mut GameState,
    ctx: &mut Context<'_, impl Rng>,
    batch: CuringBatchId,
) -> Result<InventoryBatch, CoreError> {
    let stock = growop_grow::curing::rush(&mut state.curing, batch, ctx.now_ms, ctx.rng)?;
    inventory::add_batch(&mut state.inventory, stock.clone());
    Ok(stock)
}

/// Re-derive every plant's terpene profile from its strain and climate.
pub fn refresh_terpenes(state: &mut GameState, ctx: &Context<'_, impl Rng>) {
    let light = state.environment.light_cycle;
    for plant in state.slots.iter_mut().filter_map(|s| s.plant.as_mut()) {
        if let Some(strain) = find_strain(ctx.catalog, &state.breeding, &plant.strain) {
            plant.modifiers.terpenes = derive_terpenes(&strain.terpenes, &plant.environment, light);
        }
    }
}

/// Set a room climate target and pull every plant towards it.
pub fn adjust_environment(
    state: &mut GameState,
    ctx: &mut Context<'_, impl Rng>,
    param: EnvParam,
    target: f64,
) {
    let plants = state.slots.iter_mut().filter_map(|s| s.plant.as_mut());
    environment::adjust(&mut state.environment, plants, param, target, ctx.rng);
    refresh_terpenes(state, ctx);
}

/// Switch between vegetative and flowering light.
pub fn toggle_light_cycle(state: &mut GameState, ctx: &Context<'_, impl Rng>) -> LightCycle {
    let cycle = environment::toggle_light_cycle(&mut state.environment);
    info!(cycle = ?cycle, "light cycle toggled");
    refresh_terpenes(state, ctx);
    cycle
}
