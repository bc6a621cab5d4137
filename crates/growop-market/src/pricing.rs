//! Dynamic strain prices and the market tick.
//!
//! ```text
//! price = base × supply/demand × quality × terpenes × conditions × volatility
//! ```
//!
//! | Factor | Value |
//! |--------|-------|
//! | supply/demand | `clamp(ratio / 5, 0.5, 2.0)`, ratio = demand / supply (or demand / 10 with no supply) |
//! | quality | `0.5 + quality / 100` |
//! | terpenes | `1 + min(0.25, total × (1 + boost / 100) / 400)` |
//! | conditions | product of every active condition affecting the strain |
//! | volatility | `1 + (r − 0.5) × volatility` |

use growop_catalog::Catalog;
use growop_types::random::{pick_index, roll};
use growop_types::{
    ActiveCondition, ConditionId, MarketCondition, MarketData, MarketState, MarketTrend,
    PricePoint, StrainId, TerpeneProfile,
};
use rand::Rng;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use tracing::{debug, info};

/// Price history entries kept per strain.
pub const HISTORY_LEN: usize = 20;

/// Quality used when recomputing the listed price each tick.
pub const REFERENCE_QUALITY: f64 = 50.0;

/// Demand bounds.
pub const MIN_DEMAND: u32 = 20;
/// Demand bounds.
pub const MAX_DEMAND: u32 = 100;

/// Chance of a new market condition per tick.
pub const CONDITION_CHANCE: f64 = 0.05;

/// Most conditions in force at once.
pub const MAX_ACTIVE_CONDITIONS: usize = 2;

const TERPENE_BONUS_CAP: f64 = 0.25;

/// Looks up the baseline terpene profile of a strain.
///
/// Implemented by anything that can resolve strains, catalog or bred.
pub trait TerpeneSource {
    /// Baseline profile of `strain`, if it is known.
    fn terpenes(&self, strain: &StrainId) -> Option<&TerpeneProfile>;
}

impl TerpeneSource for Catalog {
    fn terpenes(&self, strain: &StrainId) -> Option<&TerpeneProfile> {
        self.strain(strain).map(|s| &s.terpenes)
    }
}

/// Market data for every catalog strain with a price seed.
pub fn seed_market(catalog: &Catalog) -> MarketState {
    let data = catalog
        .market
        .iter()
        .map(|seed| {
            let data = MarketData {
                strain: seed.strain.clone(),
                base_price: seed.base_price,
                current_price: seed.base_price,
                demand: seed.demand.clamp(MIN_DEMAND, MAX_DEMAND),
                supply: 0,
                trend: MarketTrend::Stable,
                volatility: seed.volatility,
                history: Vec::new(),
            };
            (seed.strain.clone(), data)
        })
        .collect();
    MarketState {
        data,
        ..MarketState::default()
    }
}

/// List a new strain on the market. Existing entries are left alone.
pub fn list_strain(market: &mut MarketState, strain: StrainId, base_price: Decimal, volatility: f64) {
    market.data.entry(strain.clone()).or_insert_with(|| MarketData {
        strain,
        base_price,
        current_price: base_price,
        demand: 50,
        supply: 0,
        trend: MarketTrend::Stable,
        volatility,
        history: Vec::new(),
    });
}

/// Record buds the player put on the market.
pub fn record_sale(market: &mut MarketState, strain: &StrainId, quantity: u64) {
    if let Some(data) = market.data.get_mut(strain) {
        data.supply = data.supply.saturating_add(quantity);
        if quantity > 50 {
            data.trend = MarketTrend::Falling;
        }
    }
}

/// Supply/demand factor.
#[allow(clippy::cast_precision_loss)]
pub fn supply_demand_factor(demand: u32, supply: u64) -> f64 {
    let ratio = if supply > 0 {
        f64::from(demand) / supply as f64
    } else {
        f64::from(demand) / 10.0
    };
    (ratio / 5.0).clamp(0.5, 2.0)
}

/// Terpene factor for a profile under a research boost in percent.
pub fn terpene_factor(terpenes: &TerpeneProfile, boost: f64) -> f64 {
    let total: f64 = terpenes.values().sum();
    let boosted = total * (1.0 + boost.max(0.0) / 100.0);
    1.0 + (boosted / 400.0).clamp(0.0, TERPENE_BONUS_CAP)
}

/// Dynamic price of `data` for stock of `quality` (0–100).
///
/// Rounded to cents and never negative.
pub fn dynamic_price(
    data: &MarketData,
    terpenes: &TerpeneProfile,
    quality: f64,
    terpene_boost: f64,
    conditions: &[&MarketCondition],
    rng: &mut impl Rng,
) -> Decimal {
    let condition_factor: f64 = conditions
        .iter()
        .filter(|c| c.affects(&data.strain))
        .map(|c| c.price_multiplier)
        .product();
    let volatility = (roll(rng) - 0.5).mul_add(data.volatility, 1.0);
    let factor = supply_demand_factor(data.demand, data.supply)
        * (0.5 + quality / 100.0)
        * terpene_factor(terpenes, terpene_boost)
        * condition_factor
        * volatility;
    let factor = Decimal::from_f64(factor).unwrap_or(Decimal::ZERO);
    (data.base_price * factor).round_dp(2).max(Decimal::ZERO)
}

fn shift_demand(demand: u32, shift: i32) -> u32 {
    let shifted = i64::from(demand).saturating_add(i64::from(shift));
    let clamped = shifted.clamp(i64::from(MIN_DEMAND), i64::from(MAX_DEMAND));
    u32::try_from(clamped).unwrap_or(MIN_DEMAND)
}

const fn trend_for(demand: u32, supply: u64) -> MarketTrend {
    if demand > 70 && supply < 50 {
        MarketTrend::Rising
    } else if demand < 40 || supply > 100 {
        MarketTrend::Falling
    } else {
        MarketTrend::Stable
    }
}

/// What a market tick changed besides prices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarketTick {
    /// Condition that broke out this tick.
    pub started: Option<ConditionId>,
    /// Conditions that ran out this tick.
    pub expired: Vec<ConditionId>,
}

/// Advance the market by one tick.
///
/// Supply decays by 10 %, demand drifts, competitors flood their
/// preferred strains, conditions count down and may break out, then every
/// listed price is recomputed at [`REFERENCE_QUALITY`] and appended to the
/// history.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn tick(
    market: &mut MarketState,
    catalog: &Catalog,
    strains: &impl TerpeneSource,
    terpene_boost: f64,
    now_ms: u64,
    rng: &mut impl Rng,
) -> MarketTick {
    let mut report = MarketTick::default();

    for data in market.data.values_mut() {
        data.supply = data.supply.saturating_mul(9) / 10;
        let change = ((roll(rng) - 0.5) * 5.0).floor() as i32;
        data.demand = shift_demand(data.demand, change);
        data.trend = trend_for(data.demand, data.supply);
    }

    for competitor in &catalog.competitors {
        for strain in &competitor.preferred_strains {
            let Some(data) = market.data.get_mut(strain) else {
                continue;
            };
            let added = (roll(rng) * competitor.aggressiveness.max(0.0) * 30.0).floor() as u64;
            data.supply = data.supply.saturating_add(added);
            if competitor.reputation > 70 {
                data.demand = data.demand.saturating_add(2).min(MAX_DEMAND);
            }
        }
    }

    for active in &mut market.conditions {
        active.remaining = active.remaining.saturating_sub(1);
    }
    market.conditions.retain(|active| {
        if active.remaining == 0 {
            report.expired.push(active.condition.clone());
            false
        } else {
            true
        }
    });

    if roll(rng) < CONDITION_CHANCE && market.conditions.len() < MAX_ACTIVE_CONDITIONS {
        let inactive: Vec<&MarketCondition> = catalog
            .conditions
            .iter()
            .filter(|c| !market.conditions.iter().any(|a| a.condition == c.id))
            .collect();
        if let Some(condition) = pick_index(rng, inactive.len()).and_then(|i| inactive.get(i)) {
            for data in market.data.values_mut() {
                if condition.affects(&data.strain) {
                    data.demand = shift_demand(data.demand, condition.demand_shift);
                }
            }
            market.conditions.push(ActiveCondition {
                condition: condition.id.clone(),
                remaining: condition.duration,
            });
            info!(condition = %condition.id, duration = condition.duration, "market condition started");
            report.started = Some(condition.id.clone());
        }
    }

    let active: Vec<&MarketCondition> = market
        .conditions
        .iter()
        .filter_map(|a| catalog.conditions.iter().find(|c| c.id == a.condition))
        .collect();
    let empty = TerpeneProfile::new();
    for data in market.data.values_mut() {
        let terpenes = strains.terpenes(&data.strain).unwrap_or(&empty);
        let price = dynamic_price(data, terpenes, REFERENCE_QUALITY, terpene_boost, &active, rng);
        data.current_price = price;
        data.history.push(PricePoint { at: now_ms, price });
        if data.history.len() > HISTORY_LEN {
            let excess = data.history.len().saturating_sub(HISTORY_LEN);
            data.history.drain(..excess);
        }
    }

    market.last_update_at = now_ms;
    debug!(strains = market.data.len(), conditions = market.conditions.len(), "market tick");
    report
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::float_cmp, clippy::indexing_slicing)]

    use growop_types::ScriptedRng;
    use rust_decimal_macros::dec;

    use super::*;

    fn data(demand: u32, supply: u64) -> MarketData {
        MarketData {
            strain: StrainId::new("green-gelato"),
            base_price: dec!(10),
            current_price: dec!(10),
            demand,
            supply,
            trend: MarketTrend::Stable,
            volatility: 0.2,
            history: Vec::new(),
        }
    }

    #[test]
    fn supply_demand_factor_is_clamped() {
        assert_eq!(supply_demand_factor(100, 0), 2.0);
        assert_eq!(supply_demand_factor(20, 100), 0.5);
        assert!((supply_demand_factor(50, 5) - 2.0).abs() < 1e-12);
        assert!((supply_demand_factor(60, 10) - 1.2).abs() < 1e-12);
    }

    #[test]
    fn terpene_bonus_caps_at_quarter() {
        let rich: TerpeneProfile = [("myrcene".to_owned(), 100.0), ("limonene".to_owned(), 100.0)]
            .into_iter()
            .collect();
        assert_eq!(terpene_factor(&rich, 0.0), 1.25);
        let light: TerpeneProfile = [("myrcene".to_owned(), 40.0)].into_iter().collect();
        assert!((terpene_factor(&light, 0.0) - 1.1).abs() < 1e-12);
        assert!((terpene_factor(&light, 50.0) - 1.15).abs() < 1e-12);
    }

    #[test]
    fn dynamic_price_rounds_to_cents() {
        let d = data(60, 10);
        let terpenes = TerpeneProfile::new();
        let mut rng = ScriptedRng::constant(0.5);
        // 10 × 1.2 × 1.0 × 1.0 × 1.0
        assert_eq!(dynamic_price(&d, &terpenes, 50.0, 0.0, &[], &mut rng), dec!(12.00));
    }

    #[test]
    fn conditions_only_hit_affected_strains() {
        let catalog = Catalog::standard();
        let cup = catalog
            .conditions
            .iter()
            .find(|c| c.id == ConditionId::new("cannabis-cup"))
            .unwrap();
        let crash = catalog
            .conditions
            .iter()
            .find(|c| c.id == ConditionId::new("market-crash"))
            .unwrap();
        let d = data(60, 10);
        let mut rng = ScriptedRng::constant(0.5);
        let price = dynamic_price(&d, &TerpeneProfile::new(), 50.0, 0.0, &[cup, crash], &mut rng);
        assert_eq!(price, dec!(7.20));
    }

    #[test]
    fn large_sale_pushes_trend_down() {
        let catalog = Catalog::standard();
        let mut market = seed_market(&catalog);
        let strain = StrainId::new("blue-zushi");
        record_sale(&mut market, &strain, 60);
        assert_eq!(market.data[&strain].supply, 60);
        assert_eq!(market.data[&strain].trend, MarketTrend::Falling);
    }

    #[test]
    fn tick_decays_supply_and_keeps_bounded_history() {
        let catalog = Catalog::standard();
        let mut market = seed_market(&catalog);
        let strain = StrainId::new("black-muffin");
        market.data.get_mut(&strain).unwrap().supply = 100;
        let mut rng = ScriptedRng::constant(0.5);
        for step in 0..25 {
            tick(&mut market, &catalog, &catalog, 0.0, step, &mut rng);
        }
        let d = &market.data[&strain];
        assert_eq!(d.history.len(), HISTORY_LEN);
        assert_eq!(d.history.last().unwrap().at, 24);
        assert!(d.current_price >= Decimal::ZERO);
        assert!((MIN_DEMAND..=MAX_DEMAND).contains(&d.demand));
        assert!(market.conditions.is_empty());
    }

    #[test]
    fn condition_breaks_out_and_expires() {
        let mut catalog = Catalog::standard();
        catalog.conditions.retain(|c| c.id == ConditionId::new("police-raid"));
        let mut market = seed_market(&catalog);
        let before = market.data[&StrainId::new("honey-cream")].demand;
        let mut rng = ScriptedRng::constant(0.0);
        let report = tick(&mut market, &catalog, &catalog, 0.0, 0, &mut rng);
        assert_eq!(report.started, Some(ConditionId::new("police-raid")));
        let after = market.data[&StrainId::new("honey-cream")].demand;
        assert!(after > before);
        assert_eq!(market.conditions[0].remaining, 10);

        let mut expired = Vec::new();
        let mut rng = ScriptedRng::constant(0.5);
        for step in 1..=10 {
            expired.extend(tick(&mut market, &catalog, &catalog, 0.0, step, &mut rng).expired);
        }
        assert_eq!(expired, vec![ConditionId::new("police-raid")]);
    }
}
