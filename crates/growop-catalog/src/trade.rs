//! Standard trade tables: dealers, market seeds, conditions, competitors.

use growop_types::{
    Competitor, CompetitorId, ConditionId, Dealer, DealerId, DealerType, MarketCondition,
    MarketSeed, QualityTier, StrainId,
};
use rust_decimal::Decimal;

#[allow(clippy::too_many_arguments)]
fn dealer(
    id: &str,
    name: &str,
    dealer_type: DealerType,
    unlock_reputation: u64,
    min_tier: QualityTier,
    price_multiplier: f64,
    quantity: (u64, u64),
    hours: (u8, u8),
    risk_level: u8,
) -> Dealer {
    Dealer {
        id: DealerId::new(id),
        name: name.to_owned(),
        dealer_type,
        unlock_reputation,
        min_tier,
        price_multiplier,
        min_quantity: quantity.0,
        max_quantity: quantity.1,
        available_from: hours.0,
        available_until: hours.1,
        risk_level,
        preferred_terpenes: preferred_terpenes(dealer_type)
            .iter()
            .map(|t| (*t).to_owned())
            .collect(),
    }
}

/// Terpenes each kind of buyer pays extra for.
const fn preferred_terpenes(dealer_type: DealerType) -> &'static [&'static str] {
    match dealer_type {
        DealerType::Street => &["myrcene"],
        DealerType::Middleman => &["myrcene", "pinene"],
        DealerType::Vip => &["limonene", "caryophyllene", "linalool", "terpinolene"],
        DealerType::Wholesale => &["pinene"],
        DealerType::Tourist => &["limonene", "linalool", "ocimene"],
        DealerType::Dispensary => &["limonene", "humulene", "ocimene"],
    }
}

/// The dealer network.
pub fn dealers() -> Vec<Dealer> {
    vec![
        dealer("mike", "Street Mike", DealerType::Street, 0, QualityTier::C, 0.9, (10, 50), (0, 23), 15),
        dealer("lisa", "Night Lisa", DealerType::Street, 50, QualityTier::B, 1.0, (20, 80), (20, 6), 25),
        dealer("carlos", "Carlos", DealerType::Middleman, 100, QualityTier::B, 1.2, (50, 200), (10, 22), 30),
        dealer("yasmin", "Yasmin", DealerType::Middleman, 200, QualityTier::A, 1.3, (80, 250), (14, 2), 20),
        dealer("dimitri", "Dimitri", DealerType::Vip, 400, QualityTier::A, 1.8, (100, 300), (18, 23), 5),
        dealer("sophia", "Sophia", DealerType::Vip, 600, QualityTier::S, 2.2, (50, 200), (19, 1), 2),
        dealer("johann", "Johann Wholesale", DealerType::Wholesale, 300, QualityTier::B, 1.1, (300, 1_000), (9, 18), 40),
        dealer("tourist", "Tourist Group", DealerType::Tourist, 250, QualityTier::A, 2.0, (20, 100), (10, 20), 10),
        dealer("green-valley", "Green Valley Dispensary", DealerType::Dispensary, 500, QualityTier::A, 1.4, (100, 500), (8, 20), 0),
    ]
}

fn seed(strain: &str, base_price: i64, demand: u32, volatility: f64) -> MarketSeed {
    MarketSeed {
        strain: StrainId::new(strain),
        base_price: Decimal::from(base_price),
        demand,
        volatility,
    }
}

/// Starting market data per catalog strain.
pub fn market_seeds() -> Vec<MarketSeed> {
    vec![
        seed("green-gelato", 8, 60, 0.2),
        seed("blue-zushi", 15, 75, 0.3),
        seed("honey-cream", 7, 50, 0.15),
        seed("black-muffin", 22, 90, 0.4),
        seed("gelato-auto", 9, 55, 0.25),
    ]
}

fn condition(
    id: &str,
    name: &str,
    duration: u32,
    price_multiplier: f64,
    demand_shift: i32,
    affected: &[&str],
) -> MarketCondition {
    MarketCondition {
        id: ConditionId::new(id),
        name: name.to_owned(),
        duration,
        price_multiplier,
        demand_shift,
        affected_strains: affected.iter().map(|s| StrainId::new(*s)).collect(),
    }
}

/// Market-wide conditions that can break out during a market tick.
pub fn conditions() -> Vec<MarketCondition> {
    vec![
        condition("cannabis-cup", "Cannabis Cup", 20, 1.5, 30, &["blue-zushi", "black-muffin"]),
        condition("420-festival", "4/20 Festival", 15, 1.3, 25, &[]),
        condition("tourist-season", "Tourist Season", 30, 1.4, 20, &[]),
        condition("market-crash", "Market Crash", 25, 0.6, -30, &[]),
        condition("police-raid", "Police Raid Wave", 10, 1.6, 40, &[]),
        condition("new-competition", "New Competition", 20, 0.8, -15, &[]),
    ]
}

fn competitor(id: &str, name: &str, reputation: u32, preferred: &[&str], aggressiveness: f64) -> Competitor {
    Competitor {
        id: CompetitorId::new(id),
        name: name.to_owned(),
        reputation,
        preferred_strains: preferred.iter().map(|s| StrainId::new(*s)).collect(),
        aggressiveness,
    }
}

/// AI growers.
pub fn competitors() -> Vec<Competitor> {
    vec![
        competitor("green-thumb-gang", "Green Thumb Gang", 65, &["green-gelato", "honey-cream"], 0.6),
        competitor("premium-cultivators", "Premium Cultivators", 85, &["blue-zushi", "black-muffin"], 0.4),
        competitor("bulk-growers-inc", "Bulk Growers Inc.", 50, &["honey-cream", "gelato-auto"], 0.8),
    ]
}
