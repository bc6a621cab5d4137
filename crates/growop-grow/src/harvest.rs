//! Harvest yield.
//!
//! ```text
//! yield = floor(base × rarity × mutation × quality × soil × water
//!               × Π training × Π enhancers × phenotype × research × variance)
//! ```
//!
//! Water contributes `1 + min(0.25, stacks × 0.05)`; each training
//! application contributes `1 + (bonus − 1) × success`; variance is a
//! uniform draw in `0.9..1.1`.

use growop_catalog::Catalog;
use growop_types::random::roll;
use growop_types::{CuringBatch, CuringBatchId, PhaseSpec, Plant, Strain};
use rand::Rng;
use tracing::info;

use crate::error::GrowError;
use crate::growth::{GrowModifiers, is_harvest_ready};

/// Yield gained per water stack.
const WATER_STACK_BONUS: f64 = 0.05;

/// Cap on the total water yield bonus.
const WATER_BONUS_CAP: f64 = 0.25;

/// Everything a harvest produces.
#[derive(Debug, Clone, PartialEq)]
pub struct Harvest {
    /// The batch that enters the curing queue.
    pub batch: CuringBatch,
    /// Buds harvested.
    pub yield_amount: u64,
    /// Quality multiplier at harvest time.
    pub quality: f64,
}

/// Deterministic part of the yield, before variance and flooring.
pub fn yield_factors(plant: &Plant, strain: &Strain, catalog: &Catalog, grow: &GrowModifiers) -> f64 {
    let modifiers = &plant.modifiers;
    let water = 1.0 + (f64::from(modifiers.water_stacks) * WATER_STACK_BONUS).min(WATER_BONUS_CAP);
    let training: f64 = modifiers
        .training
        .iter()
        .filter_map(|t| {
            catalog
                .technique(&t.technique)
                .map(|tech| (tech.yield_bonus - 1.0).mul_add(t.success_level, 1.0))
        })
        .product();
    let enhancers: f64 = modifiers
        .enhancers
        .iter()
        .filter_map(|id| catalog.enhancer(id).map(|e| e.yield_multiplier))
        .product();
    let phenotype = 1.0
        + modifiers
            .phenotype
            .as_ref()
            .and_then(|id| catalog.phenotype(id))
            .map_or(0.0, |p| p.yield_bonus);

    f64::from(strain.base_yield)
        * strain.rarity.yield_multiplier()
        * strain.mutation_yield_factor()
        * modifiers.quality
        * modifiers.soil.yield_bonus()
        * water
        * training
        * enhancers
        * phenotype
        * grow.yield_multiplier.max(0.0)
}

/// Roll the final yield of `plant`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn roll_yield(
    plant: &Plant,
    strain: &Strain,
    catalog: &Catalog,
    grow: &GrowModifiers,
    rng: &mut impl Rng,
) -> u64 {
    let variance = roll(rng).mul_add(0.2, 0.9);
    let raw = yield_factors(plant, strain, catalog, grow) * variance;
    if raw.is_nan() || raw <= 0.0 {
        return 0;
    }
    raw.floor() as u64
}

/// Harvest a ready plant into a curing batch.
///
/// The caller empties the slot and drops the plant's infestations once
/// this returns `Ok`.
#[allow(clippy::too_many_arguments)]
pub fn harvest(
    plant: &Plant,
    strain: &Strain,
    catalog: &Catalog,
    phases: &[PhaseSpec],
    time_multiplier: f64,
    grow: &GrowModifiers,
    curing_ms: u64,
    now_ms: u64,
    rng: &mut impl Rng,
) -> Result<Harvest, GrowError> {
    if !is_harvest_ready(plant, phases, time_multiplier) {
        return Err(GrowError::NotReady { phase: plant.phase });
    }
    let yield_amount = roll_yield(plant, strain, catalog, grow, rng);
    let quality = plant.modifiers.quality;
    let batch = CuringBatch {
        id: CuringBatchId::generate(rng),
        strain: strain.id.clone(),
        quantity: yield_amount,
        started_at: now_ms,
        duration_ms: curing_ms,
        quality_score: quality,
    };
    info!(plant = %plant.id, strain = %strain.id, yield_amount, quality, "harvested");
    Ok(Harvest {
        batch,
        yield_amount,
        quality,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::float_cmp)]

    use growop_types::{
        EnhancerId, PhenotypeId, ScriptedRng, SoilType, StrainId, TechniqueId,
        TrainingApplication,
    };

    use super::*;
    use crate::growth::new_plant;

    fn ready_plant(catalog: &Catalog, strain: &Strain) -> Plant {
        let mut rng = ScriptedRng::constant(0.5);
        let mut plant = new_plant(strain, SoilType::Basic, None, 0, &mut rng);
        plant.phase = 5;
        plant.elapsed_ms = catalog.phases[5].base_duration_ms;
        plant
    }

    #[test]
    fn plain_plant_yields_base() {
        let catalog = Catalog::standard();
        let strain = catalog.strain(&StrainId::new("green-gelato")).unwrap();
        let plant = ready_plant(&catalog, strain);
        let mut rng = ScriptedRng::constant(0.5);
        assert_eq!(
            roll_yield(&plant, strain, &catalog, &GrowModifiers::default(), &mut rng),
            80
        );
    }

    #[test]
    fn all_factors_multiply() {
        let catalog = Catalog::standard();
        let strain = catalog.strain(&StrainId::new("green-gelato")).unwrap();
        let mut plant = ready_plant(&catalog, strain);
        plant.modifiers.soil = SoilType::AllMix;
        plant.modifiers.water_stacks = 5;
        plant.modifiers.quality = 1.2;
        plant.modifiers.training.push(TrainingApplication {
            technique: TechniqueId::new("topping"),
            success_level: 0.8,
            applied_at: 0,
        });
        plant.modifiers.enhancers.push(EnhancerId::new("sugar-water"));
        plant.modifiers.phenotype = Some(PhenotypeId::new("beast-mode"));
        let grow = GrowModifiers {
            yield_multiplier: 1.1,
            ..GrowModifiers::default()
        };
        let expected = 80.0 * 1.2 * 1.15 * 1.25 * 1.2 * 1.15 * 1.25 * 1.1;
        let got = yield_factors(&plant, strain, &catalog, &grow);
        assert!((got - expected).abs() < 1e-9);
    }

    #[test]
    fn variance_spans_ten_percent() {
        let catalog = Catalog::standard();
        let strain = catalog.strain(&StrainId::new("green-gelato")).unwrap();
        let plant = ready_plant(&catalog, strain);
        let grow = GrowModifiers::default();
        let low = roll_yield(&plant, strain, &catalog, &grow, &mut ScriptedRng::constant(0.0));
        let high = roll_yield(&plant, strain, &catalog, &grow, &mut ScriptedRng::constant(0.999_999));
        assert_eq!(low, 72);
        assert_eq!(high, 87);
    }

    #[test]
    fn unready_plant_cannot_be_harvested() {
        let catalog = Catalog::standard();
        let strain = catalog.strain(&StrainId::new("green-gelato")).unwrap();
        let mut plant = ready_plant(&catalog, strain);
        plant.phase = 4;
        let err = harvest(
            &plant,
            strain,
            &catalog,
            &catalog.phases,
            1.0,
            &GrowModifiers::default(),
            60_000,
            0,
            &mut ScriptedRng::constant(0.5),
        )
        .unwrap_err();
        assert_eq!(err, GrowError::NotReady { phase: 4 });
    }

    #[test]
    fn harvest_creates_one_batch() {
        let catalog = Catalog::standard();
        let strain = catalog.strain(&StrainId::new("green-gelato")).unwrap();
        let mut plant = ready_plant(&catalog, strain);
        plant.modifiers.quality = 1.3;
        let out = harvest(
            &plant,
            strain,
            &catalog,
            &catalog.phases,
            1.0,
            &GrowModifiers::default(),
            60_000,
            5_000,
            &mut ScriptedRng::constant(0.5),
        )
        .unwrap();
        assert_eq!(out.batch.quantity, out.yield_amount);
        assert_eq!(out.yield_amount, 104);
        assert_eq!(out.batch.quality_score, 1.3);
        assert_eq!(out.batch.due_at(), 65_000);
    }
}
