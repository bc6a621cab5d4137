//! Resource-costed care actions: water, fertilize, training, enhancers.
//!
//! Each action checks its gates in a fixed order and returns the first
//! failure without touching the plant or the wallet. The price is taken
//! last, after every other precondition has passed.

use growop_types::random::roll;
use growop_types::{Enhancer, PhaseSpec, Plant, Strain, TrainingApplication, TrainingTechnique};
use rand::Rng;
use tracing::debug;

use crate::error::{CareAction, GrowError, charge, ensure_funds};
use crate::growth::GrowModifiers;
use crate::quality;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Base price of one watering.
pub const WATER_COST: u64 = 5;

/// Time between waterings of the same plant.
pub const WATER_COOLDOWN_MS: u64 = 15_000;

/// Maximum water stacks a plant can hold.
pub const WATER_STACK_CAP: u8 = 5;

/// Base price of one fertilizing.
pub const FERTILIZER_COST: u64 = 15;

/// Time between fertilizings of the same plant.
pub const FERTILIZER_COOLDOWN_MS: u64 = 20_000;

/// Perfect-timing window with no event active.
pub const BASE_PERFECT_WINDOW_MS: u64 = 2_500;

/// Largest skill contribution accepted from the timing minigame.
pub const SKILL_CEILING: f64 = 0.25;

/// Most negative skill contribution accepted from the timing minigame.
pub const SKILL_FLOOR: f64 = -0.1;

const RECOMMENDED_WATER_DELTA: f64 = 0.1;
const PERFECT_WATER_BONUS: f64 = 0.05;
const OFF_PHASE_WATER_DELTA: f64 = -0.05;
const OFF_PHASE_PERFECT_BONUS: f64 = 0.02;
const CHAIN_BONUS_CAP: f64 = 0.03;

const FERTILIZER_GAIN: f64 = 0.15;
const FERTILIZER_BURN: f64 = 0.1;
const OFF_PHASE_FERTILIZER_DELTA: f64 = -0.05;

/// Training success below this counts as a botched attempt.
const TRAINING_SUCCESS_THRESHOLD: f64 = 0.5;

// ---------------------------------------------------------------------------
// Cooldown queries
// ---------------------------------------------------------------------------

fn remaining(last: Option<u64>, cooldown_ms: u64, now_ms: u64) -> u64 {
    last.map_or(0, |at| at.saturating_add(cooldown_ms).saturating_sub(now_ms))
}

/// Milliseconds until `plant` can be watered again.
pub fn water_cooldown_remaining(plant: &Plant, now_ms: u64) -> u64 {
    remaining(plant.modifiers.last_water_at, WATER_COOLDOWN_MS, now_ms)
}

/// Milliseconds until `plant` can be fertilized again.
pub fn fertilizer_cooldown_remaining(plant: &Plant, now_ms: u64) -> u64 {
    remaining(plant.modifiers.last_fertilize_at, FERTILIZER_COOLDOWN_MS, now_ms)
}

/// Milliseconds until `technique` can be repeated on `plant`.
pub fn training_cooldown_remaining(plant: &Plant, technique: &TrainingTechnique, now_ms: u64) -> u64 {
    let last = plant
        .modifiers
        .training
        .iter()
        .filter(|t| t.technique == technique.id)
        .map(|t| t.applied_at)
        .max();
    remaining(last, technique.cooldown_ms, now_ms)
}

/// Whether a watering at `now_ms` lands in the perfect-timing window.
///
/// The window opens the moment the cooldown ends. A plant that has never
/// been watered has no window.
pub fn is_perfect_timing(plant: &Plant, now_ms: u64, window_ms: u64) -> bool {
    plant.modifiers.last_water_at.is_some_and(|last| {
        let ready_at = last.saturating_add(WATER_COOLDOWN_MS);
        now_ms >= ready_at && now_ms.saturating_sub(ready_at) <= window_ms
    })
}

/// Clamp a minigame skill scalar into its accepted range.
pub fn clamp_skill(skill: f64) -> f64 {
    if skill.is_nan() {
        return 0.0;
    }
    skill.clamp(SKILL_FLOOR, SKILL_CEILING)
}

// ---------------------------------------------------------------------------
// Water
// ---------------------------------------------------------------------------

/// Result of a successful watering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Watered {
    /// Quality change actually applied.
    pub delta: f64,
    /// Whether the watering hit the perfect-timing window.
    pub perfect: bool,
    /// Nugs charged.
    pub cost: u64,
}

/// Bonus for a running streak of perfect waterings.
pub fn chain_bonus(chain: u32) -> f64 {
    (f64::from(chain / 3) * 0.01).min(CHAIN_BONUS_CAP)
}

/// Water `plant`.
///
/// Gates in order: cooldown, stack cap, funds. `chain` is the current
/// perfect-water streak before this watering.
#[allow(clippy::too_many_arguments)]
pub fn water(
    plant: &mut Plant,
    phase: &PhaseSpec,
    strain: &Strain,
    grow: &GrowModifiers,
    wallet: &mut u64,
    skill: f64,
    chain: u32,
    now_ms: u64,
) -> Result<Watered, GrowError> {
    let remaining_ms = water_cooldown_remaining(plant, now_ms);
    if remaining_ms > 0 {
        return Err(GrowError::Cooldown {
            action: CareAction::Water,
            remaining_ms,
        });
    }
    if plant.modifiers.water_stacks >= WATER_STACK_CAP {
        return Err(GrowError::WaterStackCap {
            cap: WATER_STACK_CAP,
        });
    }
    let cost = grow.water_cost;
    ensure_funds(*wallet, cost)?;

    let perfect = is_perfect_timing(plant, now_ms, grow.perfect_window_ms);
    let skill = clamp_skill(skill);
    let raw = if phase.water_recommended {
        let mut delta = RECOMMENDED_WATER_DELTA.mul_add(1.0 + grow.water_bonus.max(0.0), skill);
        if perfect {
            delta += PERFECT_WATER_BONUS;
        }
        delta + chain_bonus(chain)
    } else {
        let perfect_bonus = if perfect { OFF_PHASE_PERFECT_BONUS } else { 0.0 };
        skill.mul_add(0.5, OFF_PHASE_WATER_DELTA + perfect_bonus)
    };

    charge(wallet, cost)?;
    let delta = quality::apply_delta(&mut plant.modifiers, raw, strain, grow);
    plant.modifiers.water_stacks = plant.modifiers.water_stacks.saturating_add(1);
    plant.modifiers.last_water_at = Some(now_ms);

    debug!(plant = %plant.id, delta, perfect, "watered");
    Ok(Watered {
        delta,
        perfect,
        cost,
    })
}

// ---------------------------------------------------------------------------
// Fertilize
// ---------------------------------------------------------------------------

/// Fertilize `plant` once.
///
/// Gates in order: one-shot flag, cooldown, funds. In a recommended phase
/// the strain's nutrient sensitivity, reduced by upgrade safety, is the
/// chance of a burn instead of a gain.
pub fn fertilize(
    plant: &mut Plant,
    phase: &PhaseSpec,
    strain: &Strain,
    grow: &GrowModifiers,
    wallet: &mut u64,
    now_ms: u64,
    rng: &mut impl Rng,
) -> Result<f64, GrowError> {
    if plant.modifiers.fertilizer_applied {
        return Err(GrowError::AlreadyFertilized);
    }
    let remaining_ms = fertilizer_cooldown_remaining(plant, now_ms);
    if remaining_ms > 0 {
        return Err(GrowError::Cooldown {
            action: CareAction::Fertilize,
            remaining_ms,
        });
    }
    let cost = grow.fertilizer_cost;
    ensure_funds(*wallet, cost)?;

    let raw = if phase.fertilizer_recommended {
        let safety = grow.fertilizer_safety.clamp(0.0, 1.0);
        let burn_chance = (strain.nutrient_sensitivity * (1.0 - safety)).clamp(0.0, 1.0);
        if roll(rng) < burn_chance {
            -FERTILIZER_BURN
        } else {
            FERTILIZER_GAIN
        }
    } else {
        OFF_PHASE_FERTILIZER_DELTA
    };

    charge(wallet, cost)?;
    let delta = quality::apply_delta(&mut plant.modifiers, raw, strain, grow);
    plant.modifiers.fertilizer_applied = true;
    plant.modifiers.fertilized_phase = Some(plant.phase);
    plant.modifiers.last_fertilize_at = Some(now_ms);

    debug!(plant = %plant.id, delta, "fertilized");
    Ok(delta)
}

/// Re-arm the one-shot fertilizer when the plant has entered a new
/// fertilizer-recommended phase. Returns whether the flag was cleared.
pub fn allow_refeed(plant: &mut Plant, phases: &[PhaseSpec]) -> bool {
    let recommended = phases
        .get(usize::from(plant.phase))
        .is_some_and(|p| p.fertilizer_recommended);
    let stale = plant.modifiers.fertilized_phase != Some(plant.phase);
    if plant.modifiers.fertilizer_applied && recommended && stale {
        plant.modifiers.fertilizer_applied = false;
        return true;
    }
    false
}

// ---------------------------------------------------------------------------
// Training & enhancers
// ---------------------------------------------------------------------------

/// Apply a training technique with a minigame `success` level.
///
/// A clean attempt (success ≥ 0.5) adds `quality_impact × success`. A
/// botched one risks a stress hit of `quality_impact` with the
/// technique's stress chance. Returns the quality change.
#[allow(clippy::too_many_arguments)]
pub fn apply_training(
    plant: &mut Plant,
    technique: &TrainingTechnique,
    strain: &Strain,
    grow: &GrowModifiers,
    wallet: &mut u64,
    success: f64,
    now_ms: u64,
    rng: &mut impl Rng,
) -> Result<f64, GrowError> {
    if !technique.phases.contains(&plant.phase) {
        return Err(GrowError::WrongPhase {
            technique: technique.id.clone(),
            phase: plant.phase,
        });
    }
    let applied_before = plant
        .modifiers
        .training
        .iter()
        .any(|t| t.technique == technique.id);
    if technique.one_time && applied_before {
        return Err(GrowError::TechniqueAlreadyApplied(technique.id.clone()));
    }
    let remaining_ms = training_cooldown_remaining(plant, technique, now_ms);
    if remaining_ms > 0 {
        return Err(GrowError::Cooldown {
            action: CareAction::Training,
            remaining_ms,
        });
    }
    ensure_funds(*wallet, technique.cost)?;

    let success = if success.is_nan() { 0.0 } else { success.clamp(0.0, 1.0) };
    let raw = if success >= TRAINING_SUCCESS_THRESHOLD {
        technique.quality_impact * success
    } else if roll(rng) < technique.stress_risk {
        -technique.quality_impact
    } else {
        0.0
    };

    charge(wallet, technique.cost)?;
    let delta = quality::apply_delta(&mut plant.modifiers, raw, strain, grow);
    plant.modifiers.training.push(TrainingApplication {
        technique: technique.id.clone(),
        success_level: success,
        applied_at: now_ms,
    });

    debug!(plant = %plant.id, technique = %technique.id, success, delta, "training applied");
    Ok(delta)
}

/// Apply a yield enhancer, paying its price and its quality penalty.
pub fn apply_enhancer(
    plant: &mut Plant,
    enhancer: &Enhancer,
    wallet: &mut u64,
) -> Result<f64, GrowError> {
    if plant.modifiers.enhancers.contains(&enhancer.id) {
        return Err(GrowError::EnhancerAlreadyApplied(enhancer.id.clone()));
    }
    charge(wallet, enhancer.price)?;
    plant.modifiers.enhancers.push(enhancer.id.clone());
    let delta = quality::scale(
        &mut plant.modifiers,
        1.0 - enhancer.quality_penalty.clamp(0.0, 1.0),
    );
    debug!(plant = %plant.id, enhancer = %enhancer.id, delta, "enhancer applied");
    Ok(delta)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::float_cmp, clippy::indexing_slicing)]

    use growop_catalog::Catalog;
    use growop_types::{EnhancerId, ScriptedRng, SoilType, StrainId, TechniqueId};

    use super::*;
    use crate::growth::new_plant;

    fn setup(phase: u8) -> (Catalog, Strain, Plant) {
        let catalog = Catalog::standard();
        let strain = catalog.strain(&StrainId::new("green-gelato")).unwrap().clone();
        let mut rng = ScriptedRng::constant(0.5);
        let mut plant = new_plant(&strain, SoilType::Basic, None, 0, &mut rng);
        plant.phase = phase;
        (catalog, strain, plant)
    }

    #[test]
    fn recommended_water_adds_base_delta() {
        let (catalog, strain, mut plant) = setup(1);
        let mut wallet = 100;
        let grow = GrowModifiers::default();
        let out = water(
            &mut plant,
            &catalog.phases[1],
            &strain,
            &grow,
            &mut wallet,
            0.0,
            0,
            1_000,
        )
        .unwrap();
        assert!((out.delta - 0.1).abs() < 1e-9);
        assert!(!out.perfect);
        assert_eq!(wallet, 95);
        assert_eq!(plant.modifiers.water_stacks, 1);
        assert_eq!(plant.modifiers.last_water_at, Some(1_000));
    }

    #[test]
    fn water_on_cooldown_changes_nothing() {
        let (catalog, strain, mut plant) = setup(1);
        plant.modifiers.last_water_at = Some(10_000);
        let before = plant.clone();
        let mut wallet = 100;
        let err = water(
            &mut plant,
            &catalog.phases[1],
            &strain,
            &GrowModifiers::default(),
            &mut wallet,
            0.0,
            0,
            20_000,
        )
        .unwrap_err();
        assert_eq!(
            err,
            GrowError::Cooldown {
                action: CareAction::Water,
                remaining_ms: 5_000
            }
        );
        assert_eq!(plant, before);
        assert_eq!(wallet, 100);
    }

    #[test]
    fn stack_cap_is_checked_before_funds() {
        let (catalog, strain, mut plant) = setup(1);
        plant.modifiers.water_stacks = WATER_STACK_CAP;
        let mut wallet = 0;
        let err = water(
            &mut plant,
            &catalog.phases[1],
            &strain,
            &GrowModifiers::default(),
            &mut wallet,
            0.0,
            0,
            0,
        )
        .unwrap_err();
        assert_eq!(err, GrowError::WaterStackCap { cap: 5 });
    }

    #[test]
    fn broke_player_cannot_water() {
        let (catalog, strain, mut plant) = setup(1);
        let mut wallet = 4;
        let err = water(
            &mut plant,
            &catalog.phases[1],
            &strain,
            &GrowModifiers::default(),
            &mut wallet,
            0.0,
            0,
            0,
        )
        .unwrap_err();
        assert_eq!(
            err,
            GrowError::InsufficientFunds {
                needed: 5,
                available: 4
            }
        );
        assert_eq!(plant.modifiers.quality, 1.0);
    }

    #[test]
    fn perfect_window_opens_when_cooldown_ends() {
        let (_, _, mut plant) = setup(1);
        assert!(!is_perfect_timing(&plant, 20_000, BASE_PERFECT_WINDOW_MS));
        plant.modifiers.last_water_at = Some(0);
        assert!(is_perfect_timing(&plant, 15_000, BASE_PERFECT_WINDOW_MS));
        assert!(is_perfect_timing(&plant, 17_500, BASE_PERFECT_WINDOW_MS));
        assert!(!is_perfect_timing(&plant, 17_501, BASE_PERFECT_WINDOW_MS));
        assert!(is_perfect_timing(&plant, 19_000, 4_000));
    }

    #[test]
    fn perfect_recommended_water_with_chain() {
        let (catalog, strain, mut plant) = setup(2);
        plant.modifiers.last_water_at = Some(0);
        let mut wallet = 10;
        let out = water(
            &mut plant,
            &catalog.phases[2],
            &strain,
            &GrowModifiers::default(),
            &mut wallet,
            0.1,
            6,
            15_500,
        )
        .unwrap();
        assert!(out.perfect);
        assert!((out.delta - (0.1 + 0.05 + 0.1 + 0.02)).abs() < 1e-9);
    }

    #[test]
    fn off_phase_water_hurts() {
        let (catalog, strain, mut plant) = setup(0);
        let mut wallet = 10;
        let out = water(
            &mut plant,
            &catalog.phases[0],
            &strain,
            &GrowModifiers::default(),
            &mut wallet,
            0.2,
            0,
            0,
        )
        .unwrap();
        assert!((out.delta - 0.05).abs() < 1e-9);
    }

    #[test]
    fn chain_bonus_caps() {
        assert_eq!(chain_bonus(2), 0.0);
        assert!((chain_bonus(3) - 0.01).abs() < 1e-12);
        assert!((chain_bonus(30) - 0.03).abs() < 1e-12);
    }

    #[test]
    fn fertilizer_is_one_shot() {
        let (catalog, strain, mut plant) = setup(2);
        let mut wallet = 100;
        let mut rng = ScriptedRng::constant(0.99);
        let grow = GrowModifiers::default();
        let delta = fertilize(
            &mut plant,
            &catalog.phases[2],
            &strain,
            &grow,
            &mut wallet,
            0,
            &mut rng,
        )
        .unwrap();
        assert!((delta - 0.15).abs() < 1e-9);
        assert_eq!(wallet, 85);
        let err = fertilize(
            &mut plant,
            &catalog.phases[2],
            &strain,
            &grow,
            &mut wallet,
            60_000,
            &mut rng,
        )
        .unwrap_err();
        assert_eq!(err, GrowError::AlreadyFertilized);
    }

    #[test]
    fn sensitive_strain_can_burn() {
        let (catalog, strain, mut plant) = setup(2);
        let mut wallet = 100;
        let mut rng = ScriptedRng::constant(0.0);
        let delta = fertilize(
            &mut plant,
            &catalog.phases[2],
            &strain,
            &GrowModifiers::default(),
            &mut wallet,
            0,
            &mut rng,
        )
        .unwrap();
        assert!((delta + 0.1).abs() < 1e-9);
    }

    #[test]
    fn full_safety_prevents_burn() {
        let (catalog, strain, mut plant) = setup(4);
        let mut wallet = 100;
        let mut rng = ScriptedRng::constant(0.0);
        let grow = GrowModifiers {
            fertilizer_safety: 1.0,
            ..GrowModifiers::default()
        };
        let delta = fertilize(
            &mut plant,
            &catalog.phases[4],
            &strain,
            &grow,
            &mut wallet,
            0,
            &mut rng,
        )
        .unwrap();
        assert!((delta - 0.15).abs() < 1e-9);
    }

    #[test]
    fn refeed_only_in_new_recommended_phase() {
        let (catalog, _, mut plant) = setup(2);
        plant.modifiers.fertilizer_applied = true;
        plant.modifiers.fertilized_phase = Some(2);
        assert!(!allow_refeed(&mut plant, &catalog.phases));
        plant.phase = 3;
        assert!(allow_refeed(&mut plant, &catalog.phases));
        assert!(!plant.modifiers.fertilizer_applied);
    }

    #[test]
    fn one_time_training_rejects_repeat() {
        let (catalog, strain, mut plant) = setup(2);
        let topping = catalog.technique(&TechniqueId::new("topping")).unwrap();
        let mut wallet = 100;
        let mut rng = ScriptedRng::constant(0.5);
        let grow = GrowModifiers::default();
        let delta = apply_training(
            &mut plant, topping, &strain, &grow, &mut wallet, 1.0, 0, &mut rng,
        )
        .unwrap();
        assert!((delta - 0.1).abs() < 1e-9);
        assert_eq!(wallet, 70);
        let err = apply_training(
            &mut plant, topping, &strain, &grow, &mut wallet, 1.0, 100_000, &mut rng,
        )
        .unwrap_err();
        assert_eq!(err, GrowError::TechniqueAlreadyApplied(topping.id.clone()));
    }

    #[test]
    fn training_outside_allowed_phase_fails() {
        let (catalog, strain, mut plant) = setup(0);
        let lst = catalog.technique(&TechniqueId::new("lst")).unwrap();
        let mut wallet = 100;
        let mut rng = ScriptedRng::constant(0.5);
        let err = apply_training(
            &mut plant,
            lst,
            &strain,
            &GrowModifiers::default(),
            &mut wallet,
            1.0,
            0,
            &mut rng,
        )
        .unwrap_err();
        assert!(matches!(err, GrowError::WrongPhase { phase: 0, .. }));
        assert_eq!(wallet, 100);
    }

    #[test]
    fn botched_training_may_stress() {
        let (catalog, strain, mut plant) = setup(2);
        let lst = catalog.technique(&TechniqueId::new("lst")).unwrap();
        let mut wallet = 100;
        let mut rng = ScriptedRng::constant(0.05);
        let delta = apply_training(
            &mut plant,
            lst,
            &strain,
            &GrowModifiers::default(),
            &mut wallet,
            0.2,
            0,
            &mut rng,
        )
        .unwrap();
        assert!((delta + 0.05).abs() < 1e-9);
        let err = apply_training(
            &mut plant,
            lst,
            &strain,
            &GrowModifiers::default(),
            &mut wallet,
            0.9,
            10_000,
            &mut rng,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            GrowError::Cooldown {
                action: CareAction::Training,
                remaining_ms: 15_000
            }
        ));
    }

    #[test]
    fn enhancer_scales_quality_down() {
        let (catalog, _, mut plant) = setup(3);
        let enhancer = catalog
            .enhancer(&EnhancerId::new("density-booster"))
            .unwrap();
        let mut wallet = 100;
        apply_enhancer(&mut plant, enhancer, &mut wallet).unwrap();
        assert_eq!(wallet, 0);
        assert!((plant.modifiers.quality - 0.75).abs() < 1e-9);
        let err = apply_enhancer(&mut plant, enhancer, &mut wallet).unwrap_err();
        assert_eq!(err, GrowError::EnhancerAlreadyApplied(enhancer.id.clone()));
    }
}
