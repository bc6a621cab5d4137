//! Dealer network: availability, relationships and direct trades.
//!
//! A trade is checked in a fixed order (unlocked, open, quantity band,
//! qualifying stock) and nothing changes until every check passes.

use chrono::{DateTime, Timelike};
use growop_catalog::Catalog;
use growop_types::{Dealer, DealerId, DealerRelationship, Inventory, TerpeneProfile, TradeBook};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use tracing::info;

use crate::error::MarketError;
use crate::inventory::{self, Portion};
use crate::offers::Sale;
use crate::pricing::TerpeneSource;

/// Nugs per bud before any multiplier.
pub const BASE_PRICE_PER_BUD: u32 = 3;

/// Highest reputation a player can reach.
pub const MAX_REPUTATION: u64 = 1000;

/// Highest relationship level.
pub const MAX_RELATIONSHIP_LEVEL: u8 = 10;

/// Deals per relationship level.
pub const DEALS_PER_LEVEL: u32 = 3;

/// Loyalty gained per relationship level.
pub const LOYALTY_PER_LEVEL: f64 = 0.03;

/// Loyalty ceiling.
pub const MAX_LOYALTY: f64 = 0.3;

/// Intensity a terpene needs to count as dominant.
pub const DOMINANT_TERPENE: f64 = 15.0;

/// Affinity per preferred terpene a strain carries.
pub const AFFINITY_PER_TERPENE: f64 = 0.05;

/// Affinity ceiling.
pub const MAX_AFFINITY: f64 = 0.15;

/// Hour of day (UTC) of a millisecond timestamp.
pub fn hour_of_day(now_ms: u64) -> u8 {
    let millis = i64::try_from(now_ms).unwrap_or(i64::MAX);
    DateTime::from_timestamp_millis(millis)
        .and_then(|t| u8::try_from(t.hour()).ok())
        .unwrap_or(0)
}

/// Whether `dealer` trades at `hour`.
///
/// Both ends are inclusive. A window whose start is after its end wraps
/// past midnight.
pub const fn is_available(dealer: &Dealer, hour: u8) -> bool {
    let (from, until) = (dealer.available_from, dealer.available_until);
    if from <= until {
        hour >= from && hour <= until
    } else {
        hour >= from || hour <= until
    }
}

/// Price bonus a dealer pays for a strain whose dominant terpenes match
/// their taste.
#[allow(clippy::cast_precision_loss)]
pub fn affinity_bonus(dealer: &Dealer, terpenes: &TerpeneProfile) -> f64 {
    let matched = dealer
        .preferred_terpenes
        .iter()
        .filter(|name| terpenes.get(*name).is_some_and(|v| *v >= DOMINANT_TERPENE))
        .count();
    (matched as f64 * AFFINITY_PER_TERPENE).min(MAX_AFFINITY)
}

/// Relationship after one more completed deal.
pub fn record_deal(relationship: &DealerRelationship, now_ms: u64) -> DealerRelationship {
    let total_deals = relationship.total_deals.saturating_add(1);
    let level = u8::try_from(total_deals / DEALS_PER_LEVEL)
        .unwrap_or(MAX_RELATIONSHIP_LEVEL)
        .min(MAX_RELATIONSHIP_LEVEL);
    DealerRelationship {
        level,
        total_deals,
        loyalty_bonus: (f64::from(level) * LOYALTY_PER_LEVEL).min(MAX_LOYALTY),
        last_deal_at: Some(now_ms),
    }
}

/// Research points a trade of `quantity` buds earns.
pub fn trade_research_points(quantity: u64) -> u64 {
    (quantity / 50).max(1)
}

/// Reputation a trade earns.
pub const fn reputation_gain(quantity: u64, revenue: u64) -> u64 {
    (quantity / 10).saturating_add(revenue / 100)
}

/// A completed dealer trade.
#[derive(Debug, Clone, PartialEq)]
pub struct DealerTrade {
    /// Buds sold and nugs earned.
    pub sale: Sale,
    /// Reputation added (after the cap).
    pub reputation_gain: u64,
    /// Research points earned.
    pub research_points: u64,
}

/// Sell `quantity` buds to `dealer`.
///
/// Each portion is priced at `3 × (multiplier + loyalty + affinity)`
/// times its own tier multiplier. Affinity comes from the portion's strain
/// profile; legacy buds earn none.
///
/// # Errors
///
/// [`MarketError::UnknownDealer`], [`MarketError::DealerLocked`],
/// [`MarketError::DealerUnavailable`], [`MarketError::QuantityOutOfRange`]
/// or [`MarketError::TierTooLow`], checked in that order.
#[allow(clippy::too_many_arguments)]
pub fn trade(
    book: &mut TradeBook,
    stock: &mut Inventory,
    wallet: &mut u64,
    catalog: &Catalog,
    strains: &impl TerpeneSource,
    dealer_id: &DealerId,
    quantity: u64,
    now_ms: u64,
) -> Result<DealerTrade, MarketError> {
    let dealer = catalog
        .dealer(dealer_id)
        .ok_or_else(|| MarketError::UnknownDealer(dealer_id.clone()))?;
    if book.reputation < dealer.unlock_reputation {
        return Err(MarketError::DealerLocked {
            dealer: dealer_id.clone(),
            required: dealer.unlock_reputation,
            reputation: book.reputation,
        });
    }
    let hour = hour_of_day(now_ms);
    if !is_available(dealer, hour) {
        return Err(MarketError::DealerUnavailable {
            dealer: dealer_id.clone(),
            hour,
        });
    }
    if quantity < dealer.min_quantity || quantity > dealer.max_quantity {
        return Err(MarketError::QuantityOutOfRange {
            dealer: dealer_id.clone(),
            min: dealer.min_quantity,
            max: dealer.max_quantity,
            requested: quantity,
        });
    }
    let qualifying = inventory::available(stock, dealer.min_tier);
    if qualifying < quantity {
        return Err(MarketError::TierTooLow {
            dealer: dealer_id.clone(),
            min_tier: dealer.min_tier,
            requested: quantity,
            available: qualifying,
        });
    }

    let relationship = book.relationships.get(dealer_id).cloned().unwrap_or_default();
    let base = dealer.price_multiplier + relationship.loyalty_bonus;
    let portions = inventory::take(stock, quantity, dealer.min_tier)?;
    let revenue = inventory::revenue_with(&portions, |portion: &Portion| {
        let affinity = portion
            .strain
            .as_ref()
            .and_then(|s| strains.terpenes(s))
            .map_or(0.0, |t| affinity_bonus(dealer, t));
        Decimal::from(BASE_PRICE_PER_BUD) * Decimal::from_f64(base + affinity).unwrap_or(Decimal::ONE)
    });

    let before = book.reputation;
    book.reputation = before
        .saturating_add(reputation_gain(quantity, revenue))
        .min(MAX_REPUTATION);
    let updated = record_deal(&relationship, now_ms);
    let level = updated.level;
    book.relationships.insert(dealer_id.clone(), updated);
    book.total_revenue = book.total_revenue.saturating_add(revenue);
    *wallet = wallet.saturating_add(revenue);

    info!(dealer = %dealer_id, quantity, revenue, level, "dealer trade");
    Ok(DealerTrade {
        sale: Sale {
            quantity,
            revenue,
            portions,
        },
        reputation_gain: book.reputation.saturating_sub(before),
        research_points: trade_research_points(quantity),
    })
}
