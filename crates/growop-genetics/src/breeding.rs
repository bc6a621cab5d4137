//! Crossing two strains into a new one.

use growop_catalog::Catalog;
use growop_types::random::{jitter, random_uuid, roll};
use growop_types::{BreedingState, Mutation, Rarity, Strain, StrainId};
use rand::Rng;
use tracing::info;

use crate::error::GeneticsError;
use crate::{mutation, names, terpenes};

/// Relative jitter on the averaged base yield.
pub const YIELD_JITTER: f64 = 0.10;

/// Absolute jitter on the averaged time multiplier and tolerances.
pub const TRAIT_JITTER: f64 = 0.05;

/// Chance the offspring ends one rarity tier above its parents.
pub const PROMOTION_CHANCE: f64 = 0.10;

/// Chance the offspring ends one rarity tier below its parents.
pub const DEMOTION_CHANCE: f64 = 0.20;

/// Cheapest seed price of a bred strain.
pub const MIN_SEED_PRICE: u64 = 10;

const ID_ATTEMPTS: usize = 8;

/// Find a strain in the catalog or among the bred strains.
pub fn find_strain<'a>(
    catalog: &'a Catalog,
    breeding: &'a BreedingState,
    id: &StrainId,
) -> Option<&'a Strain> {
    catalog.strain(id).or_else(|| breeding.custom(id))
}

/// Rarity of an offspring.
///
/// Without a mutation the rarer parent's tier (at most epic) may move one
/// step up or down, so a plain cross never reaches legendary. A mutation
/// lifts the result to at least its own rarity.
pub fn offspring_rarity(
    first: Rarity,
    second: Rarity,
    mutation: Option<&Mutation>,
    r: f64,
) -> Rarity {
    let base = first.max(second).min(Rarity::Epic);
    let rolled = if r < PROMOTION_CHANCE {
        base.promoted()
    } else if r < PROMOTION_CHANCE + DEMOTION_CHANCE {
        base.demoted()
    } else {
        base
    };
    mutation.map_or(rolled, |m| rolled.max(m.rarity))
}

/// Seed price factor for a mutation of `rarity`, or for no mutation.
pub const fn seed_price_factor(mutation: Option<Rarity>) -> f64 {
    match mutation {
        None | Some(Rarity::Common) => 0.8,
        Some(Rarity::Rare) => 0.9,
        Some(Rarity::Epic) => 1.1,
        Some(Rarity::Legendary) => 1.5,
    }
}

/// Seed price of an offspring.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn seed_price(first: u64, second: u64, mutation: Option<Rarity>) -> u64 {
    let average = (first as f64 + second as f64) / 2.0;
    ((average * seed_price_factor(mutation)).floor() as u64).max(MIN_SEED_PRICE)
}

/// Cross two strains.
///
/// Rolls are drawn in a fixed order: base yield, time multiplier, water
/// tolerance, nutrient sensitivity, one per terpene, the mutation rolls,
/// the rarity roll and one per name word. The id comes from random bytes
/// and is retried while `taken` reports a collision.
///
/// # Errors
///
/// [`GeneticsError::IdCollision`] if no free id turns up.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn cross(
    first: &Strain,
    second: &Strain,
    catalog: &Catalog,
    taken: impl Fn(&StrainId) -> bool,
    rng: &mut impl Rng,
) -> Result<Strain, GeneticsError> {
    let generation = first.generation.max(second.generation).saturating_add(1);

    let base_yield = (f64::from(first.base_yield) + f64::from(second.base_yield)) / 2.0
        * (1.0 + jitter(rng, YIELD_JITTER));
    let time_multiplier = ((first.time_multiplier + second.time_multiplier) / 2.0
        + jitter(rng, TRAIT_JITTER))
    .clamp(0.5, 2.0);
    let water_tolerance = ((first.water_tolerance + second.water_tolerance) / 2.0
        + jitter(rng, TRAIT_JITTER))
    .clamp(0.0, 1.0);
    let nutrient_sensitivity = ((first.nutrient_sensitivity + second.nutrient_sensitivity) / 2.0
        + jitter(rng, TRAIT_JITTER))
    .clamp(0.0, 1.0);
    let terpenes = terpenes::mix(&first.terpenes, &second.terpenes, rng);

    let mutation = mutation::roll_mutation(&catalog.mutations, generation, [first, second], rng);
    let rarity = offspring_rarity(first.rarity, second.rarity, mutation.as_ref(), roll(rng));
    let name = names::generate(&catalog.names, generation, rng);

    let id = (0..ID_ATTEMPTS)
        .map(|_| StrainId::new(format!("hybrid-{}", random_uuid(rng))))
        .find(|id| !taken(id) && catalog.strain(id).is_none())
        .ok_or(GeneticsError::IdCollision)?;

    Ok(Strain {
        id,
        name,
        rarity,
        base_yield: base_yield.floor().max(1.0) as u32,
        time_multiplier,
        water_tolerance,
        nutrient_sensitivity,
        seed_price: seed_price(
            first.seed_price,
            second.seed_price,
            mutation.as_ref().map(|m| m.rarity),
        ),
        terpenes,
        generation,
        parents: Some((first.id.clone(), second.id.clone())),
        mutation,
    })
}

/// Breed two known strains and record the offspring as discovered.
///
/// Returns a copy of the new strain; listing it on the market is up to
/// the caller.
///
/// # Errors
///
/// [`GeneticsError::UnknownStrain`] if either parent does not resolve, or
/// [`GeneticsError::IdCollision`].
pub fn breed(
    breeding: &mut BreedingState,
    catalog: &Catalog,
    first: &StrainId,
    second: &StrainId,
    rng: &mut impl Rng,
) -> Result<Strain, GeneticsError> {
    let p1 = find_strain(catalog, breeding, first)
        .ok_or_else(|| GeneticsError::UnknownStrain(first.clone()))?;
    let p2 = find_strain(catalog, breeding, second)
        .ok_or_else(|| GeneticsError::UnknownStrain(second.clone()))?;
    let strain = cross(p1, p2, catalog, |id| breeding.custom(id).is_some(), rng)?;

    info!(
        strain = %strain.id,
        name = %strain.name,
        generation = strain.generation,
        rarity = ?strain.rarity,
        mutation = strain.mutation.as_ref().map(|m| m.name.as_str()),
        "new strain bred"
    );
    breeding.discovered.insert(strain.id.clone());
    breeding.custom_strains.push(strain.clone());
    Ok(strain)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::float_cmp)]

    use growop_types::ScriptedRng;

    use super::*;

    fn ids(a: &str, b: &str) -> (StrainId, StrainId) {
        (StrainId::new(a), StrainId::new(b))
    }

    #[test]
    fn plain_cross_never_legendary() {
        for r in [0.0, 0.05, 0.15, 0.5, 0.99] {
            let rarity = offspring_rarity(Rarity::Epic, Rarity::Legendary, None, r);
            assert!(rarity <= Rarity::Epic);
        }
        assert_eq!(offspring_rarity(Rarity::Common, Rarity::Rare, None, 0.05), Rarity::Epic);
        assert_eq!(offspring_rarity(Rarity::Common, Rarity::Rare, None, 0.2), Rarity::Common);
        assert_eq!(offspring_rarity(Rarity::Common, Rarity::Rare, None, 0.5), Rarity::Rare);
    }

    #[test]
    fn mutation_sets_rarity_floor() {
        let legendary = Mutation {
            name: "Titan Strain".into(),
            rarity: Rarity::Legendary,
            effect: growop_types::MutationEffect::Yield(2.8),
        };
        let rarity = offspring_rarity(Rarity::Common, Rarity::Common, Some(&legendary), 0.2);
        assert_eq!(rarity, Rarity::Legendary);
    }

    #[test]
    fn seed_price_tracks_mutation() {
        assert_eq!(seed_price(50, 70, None), 48);
        assert_eq!(seed_price(50, 70, Some(Rarity::Rare)), 54);
        assert_eq!(seed_price(50, 70, Some(Rarity::Epic)), 66);
        assert_eq!(seed_price(50, 70, Some(Rarity::Legendary)), 90);
        assert_eq!(seed_price(5, 5, None), MIN_SEED_PRICE);
    }

    #[test]
    fn first_generation_cross() {
        let catalog = Catalog::standard();
        let mut breeding = BreedingState::default();
        let (a, b) = ids("green-gelato", "honey-cream");
        let mut rng = ScriptedRng::constant(0.5);
        let child = breed(&mut breeding, &catalog, &a, &b, &mut rng).unwrap();

        let p1 = catalog.strain(&a).unwrap();
        let p2 = catalog.strain(&b).unwrap();
        assert_eq!(child.generation, 1);
        assert_eq!(child.parents, Some((a.clone(), b.clone())));
        assert!(child.mutation.is_none());
        assert!(child.rarity <= Rarity::Epic);
        assert_eq!(child.base_yield, (p1.base_yield + p2.base_yield) / 2);
        assert!((child.time_multiplier - (p1.time_multiplier + p2.time_multiplier) / 2.0).abs() < 1e-9);
        assert!(child.id.as_str().starts_with("hybrid-"));
        assert_eq!(child.name.split(' ').count(), 2);
        assert!(breeding.discovered.contains(&child.id));
        assert_eq!(breeding.custom_strains.len(), 1);
    }

    #[test]
    fn later_generations_stack_and_stay_unique() {
        let catalog = Catalog::standard();
        let mut breeding = BreedingState::default();
        let (a, b) = ids("green-gelato", "honey-cream");
        let mut rng = ScriptedRng::constant(0.5);
        let f1 = breed(&mut breeding, &catalog, &a, &b, &mut rng).unwrap();
        let f2 = breed(&mut breeding, &catalog, &f1.id, &a, &mut rng).unwrap();
        let f3 = breed(&mut breeding, &catalog, &f2.id, &f1.id, &mut rng).unwrap();
        assert_eq!(f2.generation, 2);
        assert_eq!(f3.generation, 3);
        assert_eq!(f3.name.split(' ').count(), 3);
        assert_ne!(f1.id, f2.id);
        assert_ne!(f2.id, f3.id);
        assert_eq!(breeding.custom_strains.len(), 3);
    }

    #[test]
    fn forced_mutation_attaches() {
        let catalog = Catalog::standard();
        let mut breeding = BreedingState::default();
        let (a, b) = ids("green-gelato", "honey-cream");
        let p1 = catalog.strain(&a).unwrap();
        let p2 = catalog.strain(&b).unwrap();
        let terpene_count = p1
            .terpenes
            .keys()
            .chain(p2.terpenes.keys())
            .collect::<std::collections::BTreeSet<_>>()
            .len();
        // four traits and the terpenes at the midpoint, then chance, tier, pick
        let mut rolls = vec![0.5; 4 + terpene_count];
        rolls.extend([0.0, 0.0, 0.0, 0.5]);
        let mut rng = ScriptedRng::new(rolls);
        let child = breed(&mut breeding, &catalog, &a, &b, &mut rng).unwrap();
        let mutation = child.mutation.unwrap();
        assert_eq!(mutation.rarity, Rarity::Legendary);
        assert_eq!(child.rarity, Rarity::Legendary);
        assert_eq!(
            child.seed_price,
            seed_price(p1.seed_price, p2.seed_price, Some(Rarity::Legendary))
        );
    }

    #[test]
    fn unknown_parent_is_rejected() {
        let catalog = Catalog::standard();
        let mut breeding = BreedingState::default();
        let (a, b) = ids("green-gelato", "ghost-kush");
        let mut rng = ScriptedRng::constant(0.5);
        let err = breed(&mut breeding, &catalog, &a, &b, &mut rng).unwrap_err();
        assert_eq!(err, GeneticsError::UnknownStrain(b));
        assert!(breeding.custom_strains.is_empty());
    }
}
