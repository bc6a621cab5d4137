//! Pest infestations: detection rolls, damage over time, treatment.

use growop_catalog::Catalog;
use growop_types::random::roll;
use growop_types::{InfestationId, PestInfestation, Slot, Treatment};
use rand::Rng;
use tracing::{debug, info};

use crate::error::{GrowError, charge};
use crate::quality;

/// Highest protection upgrades can give.
pub const PROTECTION_CAP: f64 = 0.9;

/// Chance an untreated infestation clears on its own at each check.
pub const SELF_RESOLVE_CHANCE: f64 = 0.05;

/// Severity a treated infestation loses per second.
pub const RECOVERY_PER_SECOND: f64 = 5.0;

const MIN_NEW_SEVERITY: f64 = 10.0;
const NEW_SEVERITY_SPREAD: f64 = 30.0;

/// Clamp summed upgrade protection.
pub fn protection(raw: f64) -> f64 {
    if raw.is_nan() {
        return 0.0;
    }
    raw.clamp(0.0, PROTECTION_CAP)
}

/// Chance a pest lands on one plant at one check.
pub fn infestation_chance(base: f64, protection: f64, frequency: f64, resistance: f64) -> f64 {
    let chance = base
        * (1.0 - protection.clamp(0.0, PROTECTION_CAP))
        * frequency.clamp(0.0, 1.0)
        * (1.0 - resistance.clamp(0.0, 1.0));
    chance.clamp(0.0, 1.0)
}

/// What changed during one pest check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PestReport {
    /// Infestations that appeared.
    pub appeared: Vec<InfestationId>,
    /// Infestations that cleared on their own.
    pub resolved: Vec<InfestationId>,
}

fn unlink(slots: &mut [Slot], infestation: &PestInfestation) {
    if let Some(plant) = slots
        .get_mut(infestation.slot)
        .and_then(|slot| slot.plant.as_mut())
    {
        plant.modifiers.infestations.retain(|id| *id != infestation.id);
    }
}

/// Roll self-resolution for existing infestations, then roll every pest
/// against every occupied slot.
///
/// A plant already carrying a pest is not rolled for it again.
pub fn check_for_pests(
    slots: &mut [Slot],
    infestations: &mut Vec<PestInfestation>,
    catalog: &Catalog,
    protection: f64,
    frequency: f64,
    now_ms: u64,
    rng: &mut impl Rng,
) -> PestReport {
    let mut report = PestReport::default();

    let mut kept = Vec::with_capacity(infestations.len());
    for infestation in infestations.drain(..) {
        if !infestation.treated && roll(rng) < SELF_RESOLVE_CHANCE {
            unlink(slots, &infestation);
            debug!(infestation = %infestation.id, pest = %infestation.pest, "pest cleared on its own");
            report.resolved.push(infestation.id);
        } else {
            kept.push(infestation);
        }
    }
    *infestations = kept;

    for (index, slot) in slots.iter_mut().enumerate() {
        let Some(plant) = slot.plant.as_mut() else {
            continue;
        };
        let resistance = plant
            .modifiers
            .phenotype
            .as_ref()
            .and_then(|id| catalog.phenotype(id))
            .map_or(0.0, |p| p.resistance_bonus);

        for pest in &catalog.pests {
            let present = infestations
                .iter()
                .any(|i| i.slot == index && i.pest == pest.id);
            if present {
                continue;
            }
            let chance = infestation_chance(pest.base_chance, protection, frequency, resistance);
            if roll(rng) >= chance {
                continue;
            }
            let infestation = PestInfestation {
                id: InfestationId::generate(rng),
                pest: pest.id.clone(),
                slot: index,
                severity: roll(rng).mul_add(NEW_SEVERITY_SPREAD, MIN_NEW_SEVERITY),
                treated: false,
                detected_at: now_ms,
            };
            info!(slot = index, pest = %pest.id, severity = infestation.severity, "pest detected");
            plant.modifiers.infestations.push(infestation.id);
            report.appeared.push(infestation.id);
            infestations.push(infestation);
        }
    }
    report
}

/// Apply `tick_ms` of pest damage and recovery.
///
/// Untreated infestations drain their host's quality; treated ones lose
/// severity and are removed once it reaches zero. Infestations on empty
/// slots are dropped.
#[allow(clippy::cast_precision_loss)]
pub fn progress_infestations(
    slots: &mut [Slot],
    infestations: &mut Vec<PestInfestation>,
    catalog: &Catalog,
    tick_ms: u64,
) {
    let seconds = tick_ms as f64 / 1_000.0;
    let mut kept = Vec::with_capacity(infestations.len());
    for mut infestation in infestations.drain(..) {
        let Some(plant) = slots
            .get_mut(infestation.slot)
            .and_then(|slot| slot.plant.as_mut())
        else {
            continue;
        };
        if infestation.treated {
            infestation.severity = (infestation.severity - RECOVERY_PER_SECOND * seconds).max(0.0);
            if infestation.severity <= 0.0 {
                plant.modifiers.infestations.retain(|id| *id != infestation.id);
                debug!(infestation = %infestation.id, "infestation recovered");
                continue;
            }
        } else if let Some(pest) = catalog.pest(&infestation.pest) {
            let damage = pest.damage_per_tick * infestation.severity / 100.0 * seconds;
            quality::penalize(&mut plant.modifiers, damage);
        }
        kept.push(infestation);
    }
    *infestations = kept;
}

/// Treat one infestation. Returns `true` when it was cleared outright.
///
/// A failed treatment still marks the infestation treated and halves its
/// severity.
pub fn treat(
    slots: &mut [Slot],
    infestations: &mut Vec<PestInfestation>,
    id: InfestationId,
    treatment: &Treatment,
    wallet: &mut u64,
    rng: &mut impl Rng,
) -> Result<bool, GrowError> {
    let index = infestations
        .iter()
        .position(|i| i.id == id)
        .ok_or(GrowError::InfestationNotFound(id))?;
    let Some(infestation) = infestations.get_mut(index) else {
        return Err(GrowError::InfestationNotFound(id));
    };
    if !treatment.targets_pest(&infestation.pest) {
        return Err(GrowError::TreatmentMismatch {
            treatment: treatment.id.clone(),
            pest: infestation.pest.clone(),
        });
    }
    charge(wallet, treatment.price)?;

    if roll(rng) < treatment.effectiveness {
        let cleared = infestations.remove(index);
        unlink(slots, &cleared);
        info!(infestation = %id, treatment = %treatment.id, "infestation cleared");
        Ok(true)
    } else {
        infestation.treated = true;
        infestation.severity /= 2.0;
        info!(infestation = %id, treatment = %treatment.id, severity = infestation.severity, "treatment partially effective");
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::float_cmp, clippy::indexing_slicing)]

    use growop_types::{PestId, ScriptedRng, SoilType, StrainId, TreatmentId};

    use super::*;
    use crate::growth::new_plant;

    fn occupied_slot(catalog: &Catalog) -> Slot {
        let strain = catalog.strain(&StrainId::new("green-gelato")).unwrap();
        let mut rng = ScriptedRng::constant(0.5);
        Slot {
            plant: Some(new_plant(strain, SoilType::Basic, None, 0, &mut rng)),
            ..Slot::default()
        }
    }

    fn infest(slots: &mut [Slot], pest: &str, rng: &mut ScriptedRng) -> PestInfestation {
        let infestation = PestInfestation {
            id: InfestationId::generate(rng),
            pest: PestId::new(pest),
            slot: 0,
            severity: 40.0,
            treated: false,
            detected_at: 0,
        };
        slots[0]
            .plant
            .as_mut()
            .unwrap()
            .modifiers
            .infestations
            .push(infestation.id);
        infestation
    }

    #[test]
    fn protection_is_capped() {
        assert_eq!(protection(0.3 + 0.25 * 2.0), 0.8);
        assert_eq!(protection(1.5), PROTECTION_CAP);
    }

    #[test]
    fn chance_combines_all_factors() {
        let chance = infestation_chance(0.1, 0.5, 0.3, 0.3);
        assert!((chance - 0.1 * 0.5 * 0.3 * 0.7).abs() < 1e-12);
    }

    #[test]
    fn certain_rolls_infest_every_pest_once() {
        let catalog = Catalog::standard();
        let mut slots = vec![occupied_slot(&catalog), Slot::default()];
        let mut infestations = Vec::new();
        let mut rng = ScriptedRng::constant(0.0);
        let report = check_for_pests(&mut slots, &mut infestations, &catalog, 0.0, 1.0, 0, &mut rng);
        assert_eq!(report.appeared.len(), catalog.pests.len());
        assert_eq!(infestations.len(), catalog.pests.len());
        assert!(infestations.iter().all(|i| i.slot == 0 && i.severity == 10.0));

        // At roll 0.0 every untreated infestation self-resolves, then reappears.
        let again = check_for_pests(&mut slots, &mut infestations, &catalog, 0.0, 1.0, 1, &mut rng);
        assert_eq!(again.resolved.len(), catalog.pests.len());
        assert_eq!(
            slots[0].plant.as_ref().unwrap().modifiers.infestations.len(),
            catalog.pests.len()
        );
    }

    #[test]
    fn existing_pest_is_not_rerolled() {
        let catalog = Catalog::standard();
        let mut slots = vec![occupied_slot(&catalog)];
        let mut rng = ScriptedRng::constant(0.5);
        let mut existing = infest(&mut slots, "aphids", &mut rng);
        existing.treated = true;
        let mut infestations = vec![existing];
        let mut rng = ScriptedRng::constant(0.0);
        let report = check_for_pests(&mut slots, &mut infestations, &catalog, 0.0, 1.0, 0, &mut rng);
        assert_eq!(report.appeared.len(), catalog.pests.len() - 1);
        assert!(report.resolved.is_empty());
    }

    #[test]
    fn untreated_pest_drains_quality() {
        let catalog = Catalog::standard();
        let mut slots = vec![occupied_slot(&catalog)];
        let mut rng = ScriptedRng::constant(0.5);
        let mut infestations = vec![infest(&mut slots, "root-rot", &mut rng)];
        progress_infestations(&mut slots, &mut infestations, &catalog, 1_000);
        let quality = slots[0].plant.as_ref().unwrap().modifiers.quality;
        assert!((quality - (1.0 - 0.04 * 0.4)).abs() < 1e-9);
    }

    #[test]
    fn treated_pest_recovers_and_disappears() {
        let catalog = Catalog::standard();
        let mut slots = vec![occupied_slot(&catalog)];
        let mut rng = ScriptedRng::constant(0.5);
        let mut infestation = infest(&mut slots, "aphids", &mut rng);
        infestation.treated = true;
        infestation.severity = 8.0;
        let mut infestations = vec![infestation];
        progress_infestations(&mut slots, &mut infestations, &catalog, 1_000);
        assert_eq!(infestations[0].severity, 3.0);
        progress_infestations(&mut slots, &mut infestations, &catalog, 1_000);
        assert!(infestations.is_empty());
        assert!(slots[0].plant.as_ref().unwrap().modifiers.infestations.is_empty());
    }

    #[test]
    fn wrong_treatment_is_rejected_without_charge() {
        let catalog = Catalog::standard();
        let mut slots = vec![occupied_slot(&catalog)];
        let mut rng = ScriptedRng::constant(0.5);
        let infestation = infest(&mut slots, "root-rot", &mut rng);
        let id = infestation.id;
        let mut infestations = vec![infestation];
        let sulfur = catalog.treatment(&TreatmentId::new("sulfur-spray")).unwrap();
        let mut wallet = 500;
        let err = treat(&mut slots, &mut infestations, id, sulfur, &mut wallet, &mut rng).unwrap_err();
        assert!(matches!(err, GrowError::TreatmentMismatch { .. }));
        assert_eq!(wallet, 500);
    }

    #[test]
    fn universal_treatment_clears_or_halves() {
        let catalog = Catalog::standard();
        let universal = catalog
            .treatment(&TreatmentId::new("universal-treatment"))
            .unwrap();
        let mut slots = vec![occupied_slot(&catalog)];
        let mut rng = ScriptedRng::constant(0.5);
        let infestation = infest(&mut slots, "root-rot", &mut rng);
        let id = infestation.id;
        let mut infestations = vec![infestation];
        let mut wallet = 500;

        let cleared = treat(&mut slots, &mut infestations, id, universal, &mut wallet, &mut ScriptedRng::constant(0.9)).unwrap();
        assert!(!cleared);
        assert_eq!(infestations[0].severity, 20.0);
        assert!(infestations[0].treated);
        assert_eq!(wallet, 350);

        let cleared = treat(&mut slots, &mut infestations, id, universal, &mut wallet, &mut ScriptedRng::constant(0.1)).unwrap();
        assert!(cleared);
        assert!(infestations.is_empty());
        assert!(slots[0].plant.as_ref().unwrap().modifiers.infestations.is_empty());
    }
}
