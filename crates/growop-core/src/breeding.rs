//! Breeding, mother plants and clones, tied into research unlocks and the
//! market.

use growop_genetics::{GeneticsError, find_strain, mother_plant_cost};
use growop_market::pricing;
use growop_types::{CostTarget, MotherPlantId, PhenotypeId, PlantId, Strain, StrainId};
use rand::Rng;
use rust_decimal::Decimal;

use crate::error::CoreError;
use crate::modifiers::research_bonuses;
use crate::research::PHENO_SELECTION;
use crate::state::{Context, GameState};

/// Price noise of a bred strain whose parents have no market data.
pub const DEFAULT_VOLATILITY: f64 = 0.1;

fn require_discovered(state: &GameState, ctx: &Context<'_, impl Rng>, id: &StrainId) -> Result<(), CoreError> {
    if find_strain(ctx.catalog, &state.breeding, id).is_none() {
        return Err(CoreError::UnknownStrain(id.clone()));
    }
    if !state.breeding.discovered.contains(id) {
        return Err(CoreError::NotDiscovered(id.clone()));
    }
    Ok(())
}

fn parent_listing(state: &GameState, ctx: &Context<'_, impl Rng>, id: &StrainId) -> (Decimal, Option<f64>) {
    state.market.data.get(id).map_or_else(
        || {
            let seed_price = find_strain(ctx.catalog, &state.breeding, id).map_or(0, |s| s.seed_price);
            (Decimal::from(seed_price), None)
        },
        |data| (data.base_price, Some(data.volatility)),
    )
}

/// Cross two discovered strains. The offspring is discovered at once and
/// listed on the market at the parents' average base price.
pub fn breed(
    state: &mut GameState,
    ctx: &mut Context<'_, impl Rng>,
    first: &StrainId,
    second: &StrainId,
) -> Result<Strain, CoreError> {
    require_discovered(state, ctx, first)?;
    require_discovered(state, ctx, second)?;
    let (price_a, vol_a) = parent_listing(state, ctx, first);
    let (price_b, vol_b) = parent_listing(state, ctx, second);

    let strain = growop_genetics::breed(&mut state.breeding, ctx.catalog, first, second, ctx.rng)?;

    let base_price = (price_a + price_b) / Decimal::TWO;
    let volatility = match (vol_a, vol_b) {
        (Some(a), Some(b)) => (a + b) / 2.0,
        (Some(v), None) | (None, Some(v)) => v,
        (None, None) => DEFAULT_VOLATILITY,
    };
    pricing::list_strain(&mut state.market, strain.id.clone(), base_price, volatility);
    Ok(strain)
}

/// Buy a mother plant. Choosing a phenotype needs the pheno selection
/// unlock; research discounts the price.
pub fn create_mother_plant(
    state: &mut GameState,
    ctx: &mut Context<'_, impl Rng>,
    strain: &StrainId,
    phenotype: Option<&PhenotypeId>,
) -> Result<MotherPlantId, CoreError> {
    let bonuses = research_bonuses(state, ctx.catalog);
    if phenotype.is_some() && !bonuses.has_feature(PHENO_SELECTION) {
        return Err(CoreError::FeatureLocked(PHENO_SELECTION.to_owned()));
    }
    let cost = mother_plant_cost(bonuses.cost_reduction(CostTarget::MotherPlants));
    let id = growop_genetics::create_mother_plant(
        &mut state.breeding,
        ctx.catalog,
        strain,
        phenotype,
        cost,
        &mut state.nugs,
        ctx.now_ms,
        ctx.rng,
    )
    .map_err(translate)?;
    Ok(id)
}

/// Clone a mother into an empty slot.
pub fn take_clone(
    state: &mut GameState,
    ctx: &mut Context<'_, impl Rng>,
    mother: MotherPlantId,
    slot: usize,
) -> Result<PlantId, CoreError> {
    let id = growop_genetics::take_clone(
        &mut state.breeding,
        ctx.catalog,
        &mut state.slots,
        mother,
        slot,
        &mut state.nugs,
        ctx.now_ms,
        ctx.rng,
    )
    .map_err(translate)?;
    Ok(id)
}

/// Map genetics failures that have a core equivalent.
fn translate(err: GeneticsError) -> CoreError {
    match err {
        GeneticsError::SlotNotFound(i) => CoreError::SlotNotFound(i),
        GeneticsError::SlotOccupied(i) => CoreError::SlotOccupied(i),
        GeneticsError::InsufficientFunds { needed, available } => {
            CoreError::InsufficientFunds { needed, available }
        }
        GeneticsError::NotDiscovered(id) => CoreError::NotDiscovered(id),
        other => CoreError::Genetics(other),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::indexing_slicing)]

    use growop_catalog::Catalog;
    use growop_types::{ResearchNodeId, ScriptedRng};
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn bred_strain_is_discovered_and_listed() {
        let catalog = Catalog::standard();
        let mut state = GameState::initial(&catalog);
        let mut rng = ScriptedRng::constant(0.5);
        let mut ctx = Context::new(&catalog, 0, &mut rng);

        let strain = breed(
            &mut state,
            &mut ctx,
            &StrainId::new("green-gelato"),
            &StrainId::new("honey-cream"),
        )
        .unwrap();
        assert!(state.breeding.discovered.contains(&strain.id));
        let listing = &state.market.data[&strain.id];
        assert_eq!(listing.base_price, dec!(7.5));
        assert!((listing.volatility - 0.175).abs() < 1e-9);
        assert_eq!(state.nugs, 1_000);
    }

    #[test]
    fn breeding_needs_discovered_parents() {
        let catalog = Catalog::standard();
        let mut state = GameState::initial(&catalog);
        let mut rng = ScriptedRng::constant(0.5);
        let mut ctx = Context::new(&catalog, 0, &mut rng);
        let blue = StrainId::new("blue-zushi");
        let err = breed(&mut state, &mut ctx, &StrainId::new("green-gelato"), &blue).unwrap_err();
        assert_eq!(err, CoreError::NotDiscovered(blue));
        assert!(state.breeding.custom_strains.is_empty());
    }

    #[test]
    fn phenotype_choice_needs_research() {
        let catalog = Catalog::standard();
        let mut state = GameState::initial(&catalog);
        let mut rng = ScriptedRng::constant(0.5);
        let mut ctx = Context::new(&catalog, 0, &mut rng);
        let gelato = StrainId::new("green-gelato");
        let pheno = catalog.phenotypes[0].id.clone();

        let err = create_mother_plant(&mut state, &mut ctx, &gelato, Some(&pheno)).unwrap_err();
        assert_eq!(err, CoreError::FeatureLocked(PHENO_SELECTION.to_owned()));

        state.research.completed.insert(ResearchNodeId::new("pheno-hunting"));
        create_mother_plant(&mut state, &mut ctx, &gelato, Some(&pheno)).unwrap();
        assert_eq!(state.nugs, 800);

        state.research.completed.insert(ResearchNodeId::new("tissue-culture"));
        let mother = create_mother_plant(&mut state, &mut ctx, &gelato, None).unwrap();
        assert_eq!(state.nugs, 660);

        take_clone(&mut state, &mut ctx, mother, 1).unwrap();
        assert_eq!(state.nugs, 630);
        assert_eq!(
            take_clone(&mut state, &mut ctx, mother, 1).unwrap_err(),
            CoreError::SlotOccupied(1)
        );
    }
}
