//! Phase progression and the multipliers that drive it.
//!
//! A plant moves through six ordered phases. Each tick adds to the time
//! spent in the current phase; once that reaches the effective phase
//! duration the plant advances and the counter restarts from zero. The
//! last phase is terminal: time keeps accumulating up to its duration,
//! at which point the plant is ready to harvest.

use growop_types::{PhaseSpec, Phenotype, Plant, PlantId, PlantModifiers, SoilType, Strain};
use rand::Rng;

use crate::environment;
use crate::quality::clamp_quality;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Lowest composite time multiplier.
pub const TIME_MULTIPLIER_FLOOR: f64 = 0.5;

/// Highest composite time multiplier.
pub const TIME_MULTIPLIER_CEILING: f64 = 2.0;

/// Permanent time reductions never remove more than this fraction.
pub const MAX_TIME_REDUCTION: f64 = 0.9;

// ---------------------------------------------------------------------------
// Modifiers
// ---------------------------------------------------------------------------

/// Game-wide bonuses that feed growth, care and harvest formulas.
///
/// Assembled by the caller from upgrades, completed research and the
/// active global event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowModifiers {
    /// Sum of permanent phase-duration reductions (upgrades + research).
    pub time_reduction: f64,
    /// Phase-duration factor of the active global event.
    pub event_growth: f64,
    /// Extra recommended-phase water delta from upgrades.
    pub water_bonus: f64,
    /// Fertilizer burn protection from upgrades, `0..=1`.
    pub fertilizer_safety: f64,
    /// Research quality boost in percentage points.
    pub quality_boost: f64,
    /// Compound research yield multiplier.
    pub yield_multiplier: f64,
    /// Length of the perfect-timing window.
    pub perfect_window_ms: u64,
    /// Price of one watering.
    pub water_cost: u64,
    /// Price of one fertilizing.
    pub fertilizer_cost: u64,
}

impl Default for GrowModifiers {
    fn default() -> Self {
        Self {
            time_reduction: 0.0,
            event_growth: 1.0,
            water_bonus: 0.0,
            fertilizer_safety: 0.0,
            quality_boost: 0.0,
            yield_multiplier: 1.0,
            perfect_window_ms: crate::care::BASE_PERFECT_WINDOW_MS,
            water_cost: crate::care::WATER_COST,
            fertilizer_cost: crate::care::FERTILIZER_COST,
        }
    }
}

/// Composite phase-duration multiplier for a plant of `strain`.
///
/// Strain base × mutation speed factor × phenotype speed bonus ×
/// permanent reductions × event factor, clamped to
/// [`TIME_MULTIPLIER_FLOOR`]..=[`TIME_MULTIPLIER_CEILING`].
pub fn time_multiplier(
    strain: &Strain,
    phenotype: Option<&Phenotype>,
    modifiers: &GrowModifiers,
) -> f64 {
    let phenotype_factor = 1.0 - phenotype.map_or(0.0, |p| p.speed_bonus.clamp(0.0, 0.9));
    let reduction = 1.0 - modifiers.time_reduction.clamp(0.0, MAX_TIME_REDUCTION);
    let raw = strain.time_multiplier
        * strain.mutation_speed_factor()
        * phenotype_factor
        * reduction
        * modifiers.event_growth;
    if raw.is_nan() {
        return 1.0;
    }
    raw.clamp(TIME_MULTIPLIER_FLOOR, TIME_MULTIPLIER_CEILING)
}

/// Effective duration of `phase` under the given multipliers.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn phase_duration_ms(phase: &PhaseSpec, time_multiplier: f64, soil: SoilType) -> u64 {
    let scaled = phase.base_duration_ms as f64 * time_multiplier * soil.time_multiplier();
    scaled.round().max(1.0) as u64
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// Create a phase-0 plant of `strain`.
///
/// The starting quality includes the phenotype's quality bonus; the
/// micro-environment starts near the room defaults with a little noise.
pub fn new_plant(
    strain: &Strain,
    soil: SoilType,
    phenotype: Option<&Phenotype>,
    now_ms: u64,
    rng: &mut impl Rng,
) -> Plant {
    let quality = clamp_quality(1.0 + phenotype.map_or(0.0, |p| p.quality_bonus));
    Plant {
        id: PlantId::generate(rng),
        strain: strain.id.clone(),
        phase: 0,
        elapsed_ms: 0,
        planted_at: now_ms,
        modifiers: PlantModifiers {
            soil,
            quality,
            terpenes: strain.terpenes.clone(),
            phenotype: phenotype.map(|p| p.id.clone()),
            ..PlantModifiers::default()
        },
        environment: environment::seedling_environment(rng),
    }
}

/// Outcome of advancing one plant by one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Still inside the same phase.
    Growing,
    /// Moved into the given phase.
    EnteredPhase(u8),
    /// Sitting in the terminal phase, ready to harvest.
    Ready,
}

/// Advance `plant` by `tick_ms`.
///
/// At most one phase transition happens per call; any overshoot is
/// discarded when the counter resets.
pub fn advance(plant: &mut Plant, phases: &[PhaseSpec], tick_ms: u64, time_multiplier: f64) -> Advance {
    let terminal = terminal_index(phases);
    let Some(phase) = phases.get(usize::from(plant.phase)) else {
        return Advance::Growing;
    };
    let duration = phase_duration_ms(phase, time_multiplier, plant.modifiers.soil);
    let elapsed = plant.elapsed_ms.saturating_add(tick_ms);

    if plant.phase >= terminal {
        plant.elapsed_ms = elapsed.min(duration);
        return if plant.elapsed_ms >= duration {
            Advance::Ready
        } else {
            Advance::Growing
        };
    }

    if elapsed >= duration {
        plant.phase = plant.phase.saturating_add(1).min(terminal);
        plant.elapsed_ms = 0;
        Advance::EnteredPhase(plant.phase)
    } else {
        plant.elapsed_ms = elapsed;
        Advance::Growing
    }
}

/// Whether `plant` has finished its terminal phase.
pub fn is_harvest_ready(plant: &Plant, phases: &[PhaseSpec], time_multiplier: f64) -> bool {
    let terminal = terminal_index(phases);
    if plant.phase < terminal {
        return false;
    }
    phases.get(usize::from(plant.phase)).is_some_and(|phase| {
        plant.elapsed_ms >= phase_duration_ms(phase, time_multiplier, plant.modifiers.soil)
    })
}

/// Growth progress through the current phase in percent.
#[allow(clippy::cast_precision_loss)]
pub fn phase_progress(plant: &Plant, phases: &[PhaseSpec], time_multiplier: f64) -> f64 {
    phases
        .get(usize::from(plant.phase))
        .map_or(0.0, |phase| {
            let duration = phase_duration_ms(phase, time_multiplier, plant.modifiers.soil);
            (plant.elapsed_ms as f64 / duration as f64 * 100.0).min(100.0)
        })
}

fn terminal_index(phases: &[PhaseSpec]) -> u8 {
    u8::try_from(phases.len().saturating_sub(1)).unwrap_or(u8::MAX)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::float_cmp, clippy::indexing_slicing)]

    use growop_catalog::Catalog;
    use growop_types::{ScriptedRng, StrainId};

    use super::*;

    fn setup() -> (Catalog, Plant) {
        let catalog = Catalog::standard();
        let strain = catalog.strain(&StrainId::new("green-gelato")).unwrap().clone();
        let mut rng = ScriptedRng::constant(0.5);
        let plant = new_plant(&strain, SoilType::Basic, None, 0, &mut rng);
        (catalog, plant)
    }

    #[test]
    fn phase_advances_once_duration_is_reached() {
        let (catalog, mut plant) = setup();
        assert_eq!(advance(&mut plant, &catalog.phases, 9_000, 1.0), Advance::Growing);
        assert_eq!(plant.elapsed_ms, 9_000);
        assert_eq!(
            advance(&mut plant, &catalog.phases, 1_000, 1.0),
            Advance::EnteredPhase(1)
        );
        assert_eq!(plant.phase, 1);
        assert_eq!(plant.elapsed_ms, 0);
    }

    #[test]
    fn phase_never_passes_terminal() {
        let (catalog, mut plant) = setup();
        for _ in 0..200 {
            let before = plant.phase;
            advance(&mut plant, &catalog.phases, 5_000, 1.0);
            assert!(plant.phase >= before);
            assert!(plant.phase <= 5);
        }
        assert_eq!(plant.phase, 5);
        assert!(is_harvest_ready(&plant, &catalog.phases, 1.0));
        assert_eq!(plant.elapsed_ms, 5_000);
    }

    #[test]
    fn light_mix_shortens_phases() {
        let catalog = Catalog::standard();
        let phase = &catalog.phases[0];
        assert_eq!(phase_duration_ms(phase, 1.0, SoilType::Basic), 10_000);
        assert_eq!(phase_duration_ms(phase, 1.0, SoilType::LightMix), 9_000);
    }

    #[test]
    fn time_multiplier_is_floored() {
        let catalog = Catalog::standard();
        let strain = catalog.strain(&StrainId::new("gelato-auto")).unwrap();
        let modifiers = GrowModifiers {
            time_reduction: 5.0,
            event_growth: 0.8,
            ..GrowModifiers::default()
        };
        assert_eq!(time_multiplier(strain, None, &modifiers), TIME_MULTIPLIER_FLOOR);
    }

    #[test]
    fn time_multiplier_composes_factors() {
        let catalog = Catalog::standard();
        let strain = catalog.strain(&StrainId::new("blue-zushi")).unwrap();
        let modifiers = GrowModifiers {
            time_reduction: 0.1,
            event_growth: 1.2,
            ..GrowModifiers::default()
        };
        let expected = 1.1 * 0.9 * 1.2;
        assert!((time_multiplier(strain, None, &modifiers) - expected).abs() < 1e-9);
    }

    #[test]
    fn phenotype_quality_bonus_raises_starting_quality() {
        let catalog = Catalog::standard();
        let strain = catalog.strain(&StrainId::new("green-gelato")).unwrap();
        let pheno = catalog
            .phenotype(&growop_types::PhenotypeId::new("purple-pheno"))
            .unwrap();
        let mut rng = ScriptedRng::constant(0.5);
        let plant = new_plant(strain, SoilType::AllMix, Some(pheno), 42, &mut rng);
        assert!((plant.modifiers.quality - 1.15).abs() < 1e-9);
        assert_eq!(plant.planted_at, 42);
        assert_eq!(plant.modifiers.phenotype, Some(pheno.id.clone()));
    }
}
