//! Selling: dealer trades, anonymous offers and standing contracts.
//!
//! The market crate moves buds and nugs; this module adds the game-wide
//! bookkeeping every sale shares (lifetime stats, sell quests, market
//! supply and trade research points).

use growop_market::{Delivery, DealerTrade, Haggle, Portion, Sale, contracts, dealers, offers, pricing};
use growop_types::{ContractId, DealerId, OfferId, QuestKind};
use rand::Rng;

use crate::error::CoreError;
use crate::quests;
use crate::state::{Context, GameState, Strains};

fn record_sale(state: &mut GameState, quantity: u64, revenue: u64, portions: &[Portion], trade: bool) {
    let stats = &mut state.stats;
    stats.total_sold = stats.total_sold.saturating_add(quantity);
    stats.total_revenue = stats.total_revenue.saturating_add(revenue);
    if trade {
        stats.total_trades = stats.total_trades.saturating_add(1);
    }
    for portion in portions {
        if let Some(strain) = &portion.strain {
            pricing::record_sale(&mut state.market, strain, portion.quantity);
        }
    }
    quests::advance(&mut state.quests, QuestKind::Sell, quantity);
}

/// Sell buds to a dealer.
pub fn trade_with_dealer<R>(
    state: &mut GameState,
    ctx: &Context<'_, R>,
    dealer: &DealerId,
    quantity: u64,
) -> Result<DealerTrade, CoreError> {
    let strains = Strains::new(ctx.catalog, &state.breeding);
    let trade = dealers::trade(
        &mut state.trade,
        &mut state.inventory,
        &mut state.nugs,
        ctx.catalog,
        &strains,
        dealer,
        quantity,
        ctx.now_ms,
    )?;
    record_sale(state, trade.sale.quantity, trade.sale.revenue, &trade.sale.portions, true);
    state.research.points = state.research.points.saturating_add(trade.research_points);
    Ok(trade)
}

/// Sign a recurring delivery contract with a dealer.
pub fn create_contract(
    state: &mut GameState,
    ctx: &mut Context<'_, impl Rng>,
    dealer: &DealerId,
    quantity: u64,
    weeks: u32,
) -> Result<ContractId, CoreError> {
    Ok(contracts::create(
        &mut state.trade,
        ctx.catalog,
        dealer,
        quantity,
        weeks,
        ctx.now_ms,
        ctx.rng,
    )?)
}

/// Make a due contract delivery.
pub fn deliver_contract<R>(
    state: &mut GameState,
    ctx: &Context<'_, R>,
    id: ContractId,
) -> Result<Delivery, CoreError> {
    let delivery = contracts::deliver(
        &mut state.trade,
        &mut state.inventory,
        &mut state.nugs,
        ctx.catalog,
        id,
        ctx.now_ms,
    )?;
    record_sale(state, delivery.quantity, delivery.revenue, &delivery.portions, true);
    Ok(delivery)
}

/// Sell into an anonymous offer.
pub fn accept_offer(state: &mut GameState, id: OfferId) -> Result<Sale, CoreError> {
    let sale = offers::accept(&mut state.trade, &mut state.inventory, &mut state.nugs, id)?;
    record_sale(state, sale.quantity, sale.revenue, &sale.portions, false);
    Ok(sale)
}

/// Try to talk an offer up.
pub fn haggle_offer(
    state: &mut GameState,
    ctx: &mut Context<'_, impl Rng>,
    id: OfferId,
) -> Result<Haggle, CoreError> {
    Ok(offers::haggle(&mut state.trade, id, ctx.rng)?)
}

/// Replace the anonymous offers.
pub fn refresh_offers(state: &mut GameState, ctx: &mut Context<'_, impl Rng>) -> Result<(), CoreError> {
    let event = state.event_kind();
    offers::refresh(
        &mut state.trade,
        state.stats.total_harvests,
        event,
        ctx.now_ms,
        ctx.rng,
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::indexing_slicing)]

    use growop_catalog::Catalog;
    use growop_market::MarketError;
    use growop_market::inventory;
    use growop_types::{
        DealerRelationship, InventoryBatch, InventoryBatchId, QualityTier, ScriptedRng, StrainId,
    };

    use super::*;

    #[test]
    fn dealer_trade_updates_stats_and_quests() {
        let catalog = Catalog::standard();
        let mut state = GameState::initial(&catalog);
        let mut rng = ScriptedRng::constant(0.5);
        let ctx = Context::new(&catalog, 0, &mut rng);
        let mike = DealerId::new("mike");

        let trade = trade_with_dealer(&mut state, &ctx, &mike, 20).unwrap();
        assert_eq!(trade.sale.revenue, 54);
        assert_eq!(state.nugs, 1_054);
        assert_eq!(state.inventory.buds, 480);
        assert_eq!(state.stats.total_sold, 20);
        assert_eq!(state.stats.total_revenue, 54);
        assert_eq!(state.stats.total_trades, 1);
        assert_eq!(state.research.points, 1);
        assert_eq!(state.quests[1].progress, 20);
        assert_eq!(state.trade.reputation, 2);
    }

    #[test]
    fn rejected_trade_leaves_stats_alone() {
        let catalog = Catalog::standard();
        let mut state = GameState::initial(&catalog);
        let mut rng = ScriptedRng::constant(0.5);
        let ctx = Context::new(&catalog, 0, &mut rng);

        let err = trade_with_dealer(&mut state, &ctx, &DealerId::new("mike"), 5).unwrap_err();
        assert!(matches!(err, CoreError::Market(MarketError::QuantityOutOfRange { .. })));
        assert_eq!(state.stats.total_trades, 0);
        assert_eq!(state.nugs, 1_000);
    }

    #[test]
    fn strain_sales_raise_market_supply() {
        let catalog = Catalog::standard();
        let mut state = GameState::initial(&catalog);
        state.inventory = growop_types::Inventory::default();
        let gelato = StrainId::new("green-gelato");
        inventory::add_batch(
            &mut state.inventory,
            InventoryBatch {
                id: InventoryBatchId::generate(&mut ScriptedRng::constant(0.1)),
                strain: Some(gelato.clone()),
                quantity: 40,
                tier: QualityTier::B,
                price_multiplier: 1.2,
                created_at: 0,
            },
        );
        let mut rng = ScriptedRng::constant(0.5);
        let ctx = Context::new(&catalog, 0, &mut rng);

        trade_with_dealer(&mut state, &ctx, &DealerId::new("mike"), 30).unwrap();
        assert_eq!(state.market.data[&gelato].supply, 30);
        assert_eq!(state.inventory.buds, 10);
    }

    #[test]
    fn contract_deliveries_raise_market_supply() {
        let catalog = Catalog::standard();
        let mut state = GameState::initial(&catalog);
        state.inventory = growop_types::Inventory::default();
        let gelato = StrainId::new("green-gelato");
        inventory::add_batch(
            &mut state.inventory,
            InventoryBatch {
                id: InventoryBatchId::generate(&mut ScriptedRng::constant(0.1)),
                strain: Some(gelato.clone()),
                quantity: 40,
                tier: QualityTier::B,
                price_multiplier: 1.0,
                created_at: 0,
            },
        );
        let mike = DealerId::new("mike");
        state.trade.relationships.insert(
            mike.clone(),
            DealerRelationship {
                level: 3,
                total_deals: 9,
                loyalty_bonus: 0.09,
                last_deal_at: None,
            },
        );
        let mut rng = ScriptedRng::constant(0.5);
        let mut ctx = Context::new(&catalog, 0, &mut rng);

        let id = create_contract(&mut state, &mut ctx, &mike, 25, 1).unwrap();
        ctx.now_ms = contracts::DELIVERY_INTERVAL_MS;
        let delivery = deliver_contract(&mut state, &ctx, id).unwrap();
        assert!(delivery.finished);
        assert_eq!(state.market.data[&gelato].supply, 25);
        assert_eq!(state.inventory.buds, 15);
        assert_eq!(state.stats.total_sold, 25);
        assert_eq!(state.stats.total_trades, 1);
    }

    #[test]
    fn refresh_respects_cooldown() {
        let catalog = Catalog::standard();
        let mut state = GameState::initial(&catalog);
        let mut rng = ScriptedRng::constant(0.5);
        let mut ctx = Context::new(&catalog, 0, &mut rng);
        refresh_offers(&mut state, &mut ctx).unwrap();
        assert_eq!(state.trade.offers.len(), 3);
        ctx.now_ms = 10_000;
        let err = refresh_offers(&mut state, &mut ctx).unwrap_err();
        assert_eq!(
            err,
            CoreError::Market(MarketError::RefreshCooldown {
                remaining_ms: 20_000
            })
        );

        let offer = state.trade.offers[0].id;
        let sale = accept_offer(&mut state, offer).unwrap();
        assert_eq!(state.stats.total_sold, sale.quantity);
        assert_eq!(state.stats.total_trades, 0);
        assert_eq!(state.trade.offers.len(), 2);
    }
}
