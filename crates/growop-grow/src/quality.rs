//! Quality-multiplier bookkeeping.
//!
//! Every change to a plant's quality goes through [`apply_delta`] or
//! [`scale`], both of which clamp the result into
//! [`QUALITY_FLOOR`]..=[`QUALITY_CEILING`].

use growop_types::{PlantModifiers, Strain};

use crate::growth::GrowModifiers;

/// Lowest quality multiplier a plant can fall to.
pub const QUALITY_FLOOR: f64 = 0.5;

/// Highest quality multiplier a plant can reach.
pub const QUALITY_CEILING: f64 = 3.0;

/// Clamp a quality multiplier into its bounds. NaN collapses to the floor.
pub fn clamp_quality(value: f64) -> f64 {
    if value.is_nan() {
        return QUALITY_FLOOR;
    }
    value.clamp(QUALITY_FLOOR, QUALITY_CEILING)
}

/// Apply a care-action delta and return the change actually made.
///
/// Positive deltas are amplified by the strain's quality mutation and the
/// research quality boost; negative deltas apply as-is.
pub fn apply_delta(
    modifiers: &mut PlantModifiers,
    delta: f64,
    strain: &Strain,
    grow: &GrowModifiers,
) -> f64 {
    let scaled = if delta > 0.0 {
        delta * strain.mutation_quality_factor() * (1.0 + grow.quality_boost.max(0.0) / 100.0)
    } else {
        delta
    };
    let before = modifiers.quality;
    modifiers.quality = clamp_quality(before + scaled);
    modifiers.quality - before
}

/// Subtract `amount` without any amplification.
pub fn penalize(modifiers: &mut PlantModifiers, amount: f64) -> f64 {
    let before = modifiers.quality;
    modifiers.quality = clamp_quality(before - amount.max(0.0));
    modifiers.quality - before
}

/// Multiply quality by `factor` and return the change actually made.
pub fn scale(modifiers: &mut PlantModifiers, factor: f64) -> f64 {
    let before = modifiers.quality;
    modifiers.quality = clamp_quality(before * factor);
    modifiers.quality - before
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::float_cmp)]

    use growop_catalog::Catalog;
    use growop_types::{Mutation, MutationEffect, Rarity, StrainId};

    use super::*;

    fn strain() -> Strain {
        Catalog::standard()
            .strain(&StrainId::new("green-gelato"))
            .unwrap()
            .clone()
    }

    #[test]
    fn quality_stays_in_bounds() {
        let strain = strain();
        let grow = GrowModifiers::default();
        let mut modifiers = PlantModifiers::default();
        apply_delta(&mut modifiers, 10.0, &strain, &grow);
        assert_eq!(modifiers.quality, QUALITY_CEILING);
        apply_delta(&mut modifiers, -10.0, &strain, &grow);
        assert_eq!(modifiers.quality, QUALITY_FLOOR);
        scale(&mut modifiers, f64::NAN);
        assert_eq!(modifiers.quality, QUALITY_FLOOR);
    }

    #[test]
    fn quality_mutation_amplifies_gains_only() {
        let mut strain = strain();
        strain.mutation = Some(Mutation {
            name: "Golden Trichomes".to_owned(),
            rarity: Rarity::Rare,
            effect: MutationEffect::Quality(2.0),
        });
        let grow = GrowModifiers::default();
        let mut modifiers = PlantModifiers::default();
        let gained = apply_delta(&mut modifiers, 0.1, &strain, &grow);
        assert!((gained - 0.2).abs() < 1e-9);
        let lost = apply_delta(&mut modifiers, -0.1, &strain, &grow);
        assert!((lost + 0.1).abs() < 1e-9);
    }
}
