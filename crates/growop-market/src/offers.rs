//! Anonymous buy offers: generation, refresh, acceptance, haggling.
//!
//! Offers scale with the player's stage (one stage per five harvests) and
//! with the active global event.

use growop_types::random::roll;
use growop_types::{GlobalEventKind, Inventory, OfferId, QualityTier, TradeBook, TradeOffer};
use rand::Rng;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::{debug, info};

use crate::error::MarketError;
use crate::inventory::{self, Portion};

/// Offers generated per refresh.
pub const OFFER_COUNT: usize = 3;

/// Time between refreshes.
pub const REFRESH_COOLDOWN_MS: u64 = 30_000;

/// Harvests per stage.
pub const HARVESTS_PER_STAGE: u64 = 5;

/// Chance a haggle succeeds.
pub const HAGGLE_CHANCE: f64 = 0.4;

const HAGGLE_RAISE: Decimal = Decimal::from_parts(12, 0, 0, false, 1);

/// Highest price haggling can reach.
pub const HAGGLE_PRICE_CAP: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

const MIN_OFFER_PRICE: f64 = 1.0;
const MAX_OFFER_PRICE: f64 = 4.0;

/// Round a per-bud price to one decimal place, halves away from zero.
pub fn round_tenth(value: f64) -> Decimal {
    Decimal::from_f64(value)
        .unwrap_or(Decimal::ZERO)
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

/// Stage reached after `total_harvests`.
pub const fn stage(total_harvests: u64) -> u64 {
    total_harvests / HARVESTS_PER_STAGE
}

/// Quantity band of offers at `stage`, before the event multiplier.
pub fn quantity_band(stage: u64) -> (u64, u64) {
    let min = stage.saturating_mul(10).saturating_add(5).min(200);
    let max = stage.saturating_mul(20).saturating_add(20).min(400);
    (min, max)
}

/// Generate a fresh set of offers.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn generate(
    stage: u64,
    event: Option<GlobalEventKind>,
    now_ms: u64,
    rng: &mut impl Rng,
) -> Vec<TradeOffer> {
    let quantity_mult = event.map_or(1.0, GlobalEventKind::quantity_multiplier);
    let price_mult = event.map_or(1.0, GlobalEventKind::price_multiplier);
    let (min_base, max_base) = quantity_band(stage);
    let min = (min_base as f64 * quantity_mult).floor() as u64;
    let max = (max_base as f64 * quantity_mult).floor() as u64;
    let span = max.saturating_sub(min).saturating_add(1).max(1) as f64;

    (0..OFFER_COUNT)
        .map(|_| {
            let quantity = ((min as f64) + roll(rng) * span).floor() as u64;
            let raw = roll(rng).mul_add(2.0, 1.0) + stage as f64 * 0.1;
            let price = (raw * price_mult).clamp(MIN_OFFER_PRICE, MAX_OFFER_PRICE);
            TradeOffer {
                id: OfferId::generate(rng),
                quantity: quantity.max(min),
                price_per_bud: round_tenth(price),
                created_at: now_ms,
            }
        })
        .collect()
}

/// Replace the offers, respecting the refresh cooldown.
pub fn refresh(
    book: &mut TradeBook,
    total_harvests: u64,
    event: Option<GlobalEventKind>,
    now_ms: u64,
    rng: &mut impl Rng,
) -> Result<(), MarketError> {
    if now_ms < book.next_refresh_at {
        return Err(MarketError::RefreshCooldown {
            remaining_ms: book.next_refresh_at.saturating_sub(now_ms),
        });
    }
    book.offers = generate(stage(total_harvests), event, now_ms, rng);
    book.next_refresh_at = now_ms.saturating_add(REFRESH_COOLDOWN_MS);
    debug!(count = book.offers.len(), "offers refreshed");
    Ok(())
}

/// A completed sale.
#[derive(Debug, Clone, PartialEq)]
pub struct Sale {
    /// Buds sold.
    pub quantity: u64,
    /// Nugs earned.
    pub revenue: u64,
    /// Where the buds came from.
    pub portions: Vec<Portion>,
}

/// Sell into an offer. The offer is consumed.
pub fn accept(
    book: &mut TradeBook,
    stock: &mut Inventory,
    wallet: &mut u64,
    id: OfferId,
) -> Result<Sale, MarketError> {
    let index = book
        .offers
        .iter()
        .position(|o| o.id == id)
        .ok_or(MarketError::OfferNotFound(id))?;
    let Some(offer) = book.offers.get(index) else {
        return Err(MarketError::OfferNotFound(id));
    };
    let price = offer.price_per_bud;
    let portions = inventory::take(stock, offer.quantity, QualityTier::C)?;
    let revenue = inventory::revenue(&portions, price);
    let quantity = inventory::portion_total(&portions);

    book.offers.remove(index);
    *wallet = wallet.saturating_add(revenue);
    book.total_revenue = book.total_revenue.saturating_add(revenue);
    info!(offer = %id, quantity, revenue, "offer accepted");
    Ok(Sale {
        quantity,
        revenue,
        portions,
    })
}

/// Outcome of a haggle attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Haggle {
    /// The buyer agreed to the new price.
    Raised(Decimal),
    /// The buyer walked away and the offer is gone.
    WalkedAway,
}

/// Try to talk an offer up by 20 %.
pub fn haggle(book: &mut TradeBook, id: OfferId, rng: &mut impl Rng) -> Result<Haggle, MarketError> {
    let index = book
        .offers
        .iter()
        .position(|o| o.id == id)
        .ok_or(MarketError::OfferNotFound(id))?;
    if roll(rng) < HAGGLE_CHANCE {
        let Some(offer) = book.offers.get_mut(index) else {
            return Err(MarketError::OfferNotFound(id));
        };
        let raised = (offer.price_per_bud * HAGGLE_RAISE)
            .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
            .min(HAGGLE_PRICE_CAP);
        offer.price_per_bud = raised;
        debug!(offer = %id, price = %raised, "haggle succeeded");
        Ok(Haggle::Raised(raised))
    } else {
        book.offers.remove(index);
        debug!(offer = %id, "buyer walked away");
        Ok(Haggle::WalkedAway)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::indexing_slicing)]

    use growop_types::{InventoryBatch, InventoryBatchId, ScriptedRng};
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn stage_zero_band() {
        assert_eq!(quantity_band(0), (5, 20));
        assert_eq!(quantity_band(3), (35, 80));
        assert_eq!(quantity_band(100), (200, 400));
    }

    #[test]
    fn generated_offers_stay_in_band() {
        let mut rng = ScriptedRng::new(vec![0.0, 0.0, 0.999, 0.999, 0.5, 0.5]);
        let offers = generate(0, None, 0, &mut rng);
        assert_eq!(offers.len(), OFFER_COUNT);
        assert_eq!(offers[0].quantity, 5);
        assert_eq!(offers[0].price_per_bud, dec!(1.0));
        assert_eq!(offers[1].quantity, 20);
        assert_eq!(offers[1].price_per_bud, dec!(3.0));
        assert_eq!(offers[2].price_per_bud, dec!(2.0));
    }

    #[test]
    fn festival_raises_price_and_quantity() {
        let mut rng = ScriptedRng::constant(0.999);
        let offers = generate(2, Some(GlobalEventKind::Festival), 0, &mut rng);
        // (1 + 2 × 0.999 + 0.2) × 1.5 clamps to 4
        assert!(offers.iter().all(|o| o.price_per_bud == dec!(4.0)));
        assert!(offers.iter().all(|o| o.quantity <= 72));
    }

    #[test]
    fn refresh_respects_cooldown() {
        let mut book = TradeBook::default();
        let mut rng = ScriptedRng::constant(0.5);
        refresh(&mut book, 0, None, 1_000, &mut rng).unwrap();
        assert_eq!(book.next_refresh_at, 31_000);
        let err = refresh(&mut book, 0, None, 11_000, &mut rng).unwrap_err();
        assert_eq!(err, MarketError::RefreshCooldown { remaining_ms: 20_000 });
        refresh(&mut book, 0, None, 31_000, &mut rng).unwrap();
    }

    #[test]
    fn accepting_sells_and_removes_offer() {
        let mut rng = ScriptedRng::constant(0.5);
        let mut book = TradeBook::default();
        let offer = TradeOffer {
            id: OfferId::generate(&mut rng),
            quantity: 10,
            price_per_bud: dec!(2.5),
            created_at: 0,
        };
        let id = offer.id;
        book.offers.push(offer);
        let mut stock = Inventory::default();
        inventory::add_batch(
            &mut stock,
            InventoryBatch {
                id: InventoryBatchId::generate(&mut rng),
                strain: None,
                quantity: 12,
                tier: QualityTier::A,
                price_multiplier: 1.25,
                created_at: 0,
            },
        );
        let mut wallet = 0;
        let sale = accept(&mut book, &mut stock, &mut wallet, id).unwrap();
        assert_eq!(sale.revenue, 31);
        assert_eq!(wallet, 31);
        assert_eq!(stock.buds, 2);
        assert!(book.offers.is_empty());
    }

    #[test]
    fn accepting_without_stock_keeps_offer() {
        let mut rng = ScriptedRng::constant(0.5);
        let mut book = TradeBook {
            offers: generate(0, None, 0, &mut rng),
            ..TradeBook::default()
        };
        let id = book.offers[0].id;
        let mut stock = Inventory::default();
        let mut wallet = 7;
        assert!(matches!(
            accept(&mut book, &mut stock, &mut wallet, id),
            Err(MarketError::InsufficientStock { .. })
        ));
        assert_eq!(book.offers.len(), OFFER_COUNT);
        assert_eq!(wallet, 7);
    }

    #[test]
    fn haggle_raises_or_loses_offer() {
        let mut rng = ScriptedRng::constant(0.5);
        let mut book = TradeBook {
            offers: generate(0, None, 0, &mut rng),
            ..TradeBook::default()
        };
        book.offers[0].price_per_bud = dec!(2.3);
        book.offers[1].price_per_bud = dec!(4.5);
        let first = book.offers[0].id;
        let second = book.offers[1].id;
        let third = book.offers[2].id;

        let mut win = ScriptedRng::constant(0.1);
        assert_eq!(haggle(&mut book, first, &mut win).unwrap(), Haggle::Raised(dec!(2.8)));
        assert_eq!(haggle(&mut book, second, &mut win).unwrap(), Haggle::Raised(dec!(5)));

        let mut lose = ScriptedRng::constant(0.9);
        assert_eq!(haggle(&mut book, third, &mut lose).unwrap(), Haggle::WalkedAway);
        assert_eq!(book.offers.len(), 2);
        assert!(matches!(
            haggle(&mut book, third, &mut lose),
            Err(MarketError::OfferNotFound(_))
        ));
    }
}
