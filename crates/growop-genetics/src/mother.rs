//! Mother plants and clones.
//!
//! A mother plant keeps a discovered strain (optionally with a selected
//! phenotype) and gives up to ten cheap clones. Clones start in phase 0
//! and carry the mother's phenotype.

use growop_catalog::Catalog;
use growop_types::{
    BreedingState, MotherPlant, MotherPlantId, PhenotypeId, PlantId, Slot, SoilType, StrainId,
};
use rand::Rng;
use tracing::info;

use crate::breeding::find_strain;
use crate::error::{GeneticsError, charge};

/// Base price of a mother plant.
pub const MOTHER_PLANT_COST: u64 = 200;

/// Price of one clone.
pub const CLONE_COST: u64 = 30;

/// Clone budget of a new mother.
pub const MAX_CLONES: u32 = 10;

/// Mother plant price after a fractional research reduction.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn mother_plant_cost(reduction: f64) -> u64 {
    let factor = 1.0 - reduction.clamp(0.0, 0.9);
    (MOTHER_PLANT_COST as f64 * factor).round() as u64
}

/// Buy a mother plant of a discovered strain.
///
/// # Errors
///
/// [`GeneticsError::UnknownStrain`], [`GeneticsError::NotDiscovered`],
/// [`GeneticsError::UnknownPhenotype`] or
/// [`GeneticsError::InsufficientFunds`].
#[allow(clippy::too_many_arguments)]
pub fn create_mother_plant(
    breeding: &mut BreedingState,
    catalog: &Catalog,
    strain: &StrainId,
    phenotype: Option<&PhenotypeId>,
    cost: u64,
    wallet: &mut u64,
    now_ms: u64,
    rng: &mut impl Rng,
) -> Result<MotherPlantId, GeneticsError> {
    if find_strain(catalog, breeding, strain).is_none() {
        return Err(GeneticsError::UnknownStrain(strain.clone()));
    }
    if !breeding.discovered.contains(strain) {
        return Err(GeneticsError::NotDiscovered(strain.clone()));
    }
    if let Some(id) = phenotype.filter(|id| catalog.phenotype(id).is_none()) {
        return Err(GeneticsError::UnknownPhenotype(id.clone()));
    }
    charge(wallet, cost)?;

    let mother = MotherPlant {
        id: MotherPlantId::generate(rng),
        strain: strain.clone(),
        phenotype: phenotype.cloned(),
        clones_taken: 0,
        max_clones: MAX_CLONES,
        acquired_at: now_ms,
    };
    let id = mother.id;
    info!(mother = %id, strain = %strain, cost, "mother plant acquired");
    breeding.mother_plants.push(mother);
    Ok(id)
}

/// Take a clone from a mother and plant it in an empty slot.
///
/// # Errors
///
/// [`GeneticsError::MotherNotFound`], [`GeneticsError::ClonesExhausted`],
/// [`GeneticsError::SlotNotFound`], [`GeneticsError::SlotOccupied`],
/// [`GeneticsError::UnknownStrain`] or
/// [`GeneticsError::InsufficientFunds`].
#[allow(clippy::too_many_arguments)]
pub fn take_clone(
    breeding: &mut BreedingState,
    catalog: &Catalog,
    slots: &mut [Slot],
    mother_id: MotherPlantId,
    slot_index: usize,
    wallet: &mut u64,
    now_ms: u64,
    rng: &mut impl Rng,
) -> Result<PlantId, GeneticsError> {
    let mother = breeding
        .mother_plants
        .iter()
        .find(|m| m.id == mother_id)
        .ok_or(GeneticsError::MotherNotFound(mother_id))?;
    if mother.clones_taken >= mother.max_clones {
        return Err(GeneticsError::ClonesExhausted {
            mother: mother_id,
            max: mother.max_clones,
        });
    }
    let slot = slots
        .get_mut(slot_index)
        .ok_or(GeneticsError::SlotNotFound(slot_index))?;
    if slot.plant.is_some() {
        return Err(GeneticsError::SlotOccupied(slot_index));
    }
    let strain = find_strain(catalog, breeding, &mother.strain)
        .ok_or_else(|| GeneticsError::UnknownStrain(mother.strain.clone()))?;
    let phenotype = mother.phenotype.as_ref().and_then(|p| catalog.phenotype(p));
    charge(wallet, CLONE_COST)?;

    let plant = growop_grow::new_plant(strain, SoilType::Basic, phenotype, now_ms, rng);
    let plant_id = plant.id;
    slot.plant = Some(plant);
    if let Some(mother) = breeding.mother_plants.iter_mut().find(|m| m.id == mother_id) {
        mother.clones_taken = mother.clones_taken.saturating_add(1);
    }
    info!(mother = %mother_id, slot = slot_index, plant = %plant_id, "clone taken");
    Ok(plant_id)
}
