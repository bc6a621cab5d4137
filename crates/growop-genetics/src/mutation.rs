//! Mutation rolls.
//!
//! The chance of a mutation grows with the offspring's generation. A
//! successful roll picks a tier first (legendary, epic, or the common and
//! rare pool together) and then a mutation uniformly inside that tier.
//! When a parent already carries a mutation of the same kind, the new
//! effect compounds with it. Every effect is capped afterwards.

use growop_types::random::{pick_index, roll};
use growop_types::{Mutation, MutationEffect, Rarity, Strain};
use rand::Rng;

/// Mutation chance of a generation-0 cross.
pub const BASE_MUTATION_CHANCE: f64 = 0.05;

/// Added mutation chance per generation.
pub const MUTATION_CHANCE_PER_GENERATION: f64 = 0.02;

/// Highest mutation chance.
pub const MAX_MUTATION_CHANCE: f64 = 0.35;

/// Legendary tier chance at generation 0.
pub const BASE_LEGENDARY_CHANCE: f64 = 0.02;

/// Added legendary chance per generation.
pub const LEGENDARY_CHANCE_PER_GENERATION: f64 = 0.005;

/// Highest legendary tier chance.
pub const MAX_LEGENDARY_CHANCE: f64 = 0.10;

/// Epic tier chance.
pub const EPIC_CHANCE: f64 = 0.18;

/// Highest yield factor of a yield mutation.
pub const YIELD_CAP: f64 = 3.0;

/// Highest quality factor.
pub const QUALITY_CAP: f64 = 2.5;

/// Lowest phase-duration factor.
pub const SPEED_FLOOR: f64 = 0.3;

/// Highest yield factor of a super mutation.
pub const SUPER_YIELD_CAP: f64 = 2.0;

/// Chance that an offspring of `generation` mutates.
pub fn mutation_chance(generation: u32) -> f64 {
    MUTATION_CHANCE_PER_GENERATION
        .mul_add(f64::from(generation), BASE_MUTATION_CHANCE)
        .min(MAX_MUTATION_CHANCE)
}

/// Chance that a mutation of `generation` comes from the legendary tier.
pub fn legendary_chance(generation: u32) -> f64 {
    LEGENDARY_CHANCE_PER_GENERATION
        .mul_add(f64::from(generation), BASE_LEGENDARY_CHANCE)
        .min(MAX_LEGENDARY_CHANCE)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tier {
    Legendary,
    Epic,
    Lesser,
}

impl Tier {
    fn from_roll(generation: u32, r: f64) -> Self {
        let legendary = legendary_chance(generation);
        if r < legendary {
            Self::Legendary
        } else if r < legendary + EPIC_CHANCE {
            Self::Epic
        } else {
            Self::Lesser
        }
    }

    const fn contains(self, rarity: Rarity) -> bool {
        match self {
            Self::Legendary => matches!(rarity, Rarity::Legendary),
            Self::Epic => matches!(rarity, Rarity::Epic),
            Self::Lesser => matches!(rarity, Rarity::Common | Rarity::Rare),
        }
    }
}

/// Clamp an effect into its allowed range.
pub fn cap(effect: MutationEffect) -> MutationEffect {
    match effect {
        MutationEffect::Yield(bonus) => MutationEffect::Yield(bonus.clamp(1.0, YIELD_CAP)),
        MutationEffect::Quality(bonus) => MutationEffect::Quality(bonus.clamp(1.0, QUALITY_CAP)),
        MutationEffect::Speed(factor) => MutationEffect::Speed(factor.clamp(SPEED_FLOOR, 1.0)),
        MutationEffect::Super {
            yield_bonus,
            speed_factor,
        } => MutationEffect::Super {
            yield_bonus: yield_bonus.clamp(1.0, SUPER_YIELD_CAP),
            speed_factor: speed_factor.clamp(SPEED_FLOOR, 1.0),
        },
    }
}

/// Multiply two effects of the same kind. `None` for different kinds.
pub fn compound(effect: MutationEffect, inherited: MutationEffect) -> Option<MutationEffect> {
    match (effect, inherited) {
        (MutationEffect::Yield(a), MutationEffect::Yield(b)) => Some(MutationEffect::Yield(a * b)),
        (MutationEffect::Quality(a), MutationEffect::Quality(b)) => {
            Some(MutationEffect::Quality(a * b))
        }
        (MutationEffect::Speed(a), MutationEffect::Speed(b)) => Some(MutationEffect::Speed(a * b)),
        (
            MutationEffect::Super {
                yield_bonus: ya,
                speed_factor: sa,
            },
            MutationEffect::Super {
                yield_bonus: yb,
                speed_factor: sb,
            },
        ) => Some(MutationEffect::Super {
            yield_bonus: ya * yb,
            speed_factor: sa * sb,
        }),
        _ => None,
    }
}

/// Roll for a mutation on an offspring of `generation`.
///
/// Draws one roll for the chance and, on success, one for the tier and
/// one for the pick.
pub fn roll_mutation(
    pool: &[Mutation],
    generation: u32,
    parents: [&Strain; 2],
    rng: &mut impl Rng,
) -> Option<Mutation> {
    if roll(rng) >= mutation_chance(generation) {
        return None;
    }
    let tier = Tier::from_roll(generation, roll(rng));
    let mut candidates: Vec<&Mutation> = pool.iter().filter(|m| tier.contains(m.rarity)).collect();
    if candidates.is_empty() {
        candidates = pool.iter().collect();
    }
    let picked = pick_index(rng, candidates.len()).and_then(|i| candidates.get(i))?;

    let effect = parents
        .iter()
        .filter_map(|p| p.mutation.as_ref())
        .fold(picked.effect, |effect, inherited| {
            compound(effect, inherited.effect).unwrap_or(effect)
        });
    Some(Mutation {
        name: picked.name.clone(),
        rarity: picked.rarity,
        effect: cap(effect),
    })
}
