//! Stock bookkeeping and greedy selling.
//!
//! Buds enter stock only through [`add_batch`] (cured harvests) or
//! [`add_legacy`] (quest rewards), so `buds` always covers the sum of the
//! tracked batches. Sales draw from the highest price multiplier first;
//! legacy buds sell at a flat 1.0 and count as tier C.

use std::cmp::Ordering;

use growop_types::{Inventory, InventoryBatch, QualityTier, StrainId};
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};

use crate::error::MarketError;

/// Price multiplier applied to legacy buds.
pub const LEGACY_MULTIPLIER: f64 = 1.0;

/// Tier legacy buds count as.
pub const LEGACY_TIER: QualityTier = QualityTier::C;

/// One slice of a sale, drawn from a single source.
#[derive(Debug, Clone, PartialEq)]
pub struct Portion {
    /// Strain of the source batch; `None` for legacy buds.
    pub strain: Option<StrainId>,
    /// Buds taken.
    pub quantity: u64,
    /// Price multiplier of the source.
    pub multiplier: f64,
}

/// Add a cured batch to stock.
pub fn add_batch(inventory: &mut Inventory, batch: InventoryBatch) {
    inventory.buds = inventory.buds.saturating_add(batch.quantity);
    if batch.quantity > 0 {
        inventory.batches.push(batch);
    }
}

/// Add buds that belong to no batch.
pub const fn add_legacy(inventory: &mut Inventory, quantity: u64) {
    inventory.buds = inventory.buds.saturating_add(quantity);
}

/// Buds available at or above `min_tier`.
pub fn available(inventory: &Inventory, min_tier: QualityTier) -> u64 {
    let tracked = inventory
        .batches
        .iter()
        .filter(|b| b.tier >= min_tier)
        .fold(0_u64, |acc, b| acc.saturating_add(b.quantity));
    let legacy = if LEGACY_TIER >= min_tier {
        inventory.legacy()
    } else {
        0
    };
    tracked.saturating_add(legacy)
}

/// Remove `quantity` buds at or above `min_tier`, best multiplier first.
///
/// Fails without touching stock when not enough qualifies.
pub fn take(
    inventory: &mut Inventory,
    quantity: u64,
    min_tier: QualityTier,
) -> Result<Vec<Portion>, MarketError> {
    if quantity == 0 {
        return Err(MarketError::ZeroQuantity);
    }
    let qualifying = available(inventory, min_tier);
    if qualifying < quantity {
        return Err(MarketError::InsufficientStock {
            requested: quantity,
            available: qualifying,
        });
    }

    let legacy = if LEGACY_TIER >= min_tier {
        inventory.legacy()
    } else {
        0
    };
    let mut order: Vec<usize> = (0..inventory.batches.len())
        .filter(|&i| inventory.batches.get(i).is_some_and(|b| b.tier >= min_tier))
        .collect();
    order.sort_by(|&a, &b| {
        let ma = inventory.batches.get(a).map_or(0.0, |x| x.price_multiplier);
        let mb = inventory.batches.get(b).map_or(0.0, |x| x.price_multiplier);
        mb.partial_cmp(&ma).unwrap_or(Ordering::Equal)
    });

    let mut remaining = quantity;
    let mut portions = Vec::new();
    let mut legacy_used = false;
    for index in order {
        if remaining == 0 {
            break;
        }
        let Some(batch) = inventory.batches.get_mut(index) else {
            continue;
        };
        if !legacy_used && legacy > 0 && LEGACY_MULTIPLIER > batch.price_multiplier {
            let taken = remaining.min(legacy);
            portions.push(Portion {
                strain: None,
                quantity: taken,
                multiplier: LEGACY_MULTIPLIER,
            });
            remaining = remaining.saturating_sub(taken);
            legacy_used = true;
            if remaining == 0 {
                break;
            }
        }
        let taken = remaining.min(batch.quantity);
        if taken == 0 {
            continue;
        }
        batch.quantity = batch.quantity.saturating_sub(taken);
        remaining = remaining.saturating_sub(taken);
        portions.push(Portion {
            strain: batch.strain.clone(),
            quantity: taken,
            multiplier: batch.price_multiplier,
        });
    }
    if !legacy_used && remaining > 0 && legacy > 0 {
        let taken = remaining.min(legacy);
        portions.push(Portion {
            strain: None,
            quantity: taken,
            multiplier: LEGACY_MULTIPLIER,
        });
        remaining = remaining.saturating_sub(taken);
    }

    inventory.batches.retain(|b| b.quantity > 0);
    inventory.buds = inventory
        .buds
        .saturating_sub(quantity.saturating_sub(remaining));
    Ok(portions)
}

/// Revenue of `portions` at `price_per_bud`, floored to whole nugs.
pub fn revenue(portions: &[Portion], price_per_bud: Decimal) -> u64 {
    revenue_with(portions, |_| price_per_bud)
}

/// Revenue where each portion may carry its own per-bud price.
pub fn revenue_with(portions: &[Portion], price: impl Fn(&Portion) -> Decimal) -> u64 {
    let total = portions.iter().fold(Decimal::ZERO, |acc, portion| {
        let multiplier = Decimal::from_f64(portion.multiplier).unwrap_or(Decimal::ONE);
        acc + Decimal::from(portion.quantity) * price(portion) * multiplier
    });
    total.floor().max(Decimal::ZERO).to_u64().unwrap_or(u64::MAX)
}

/// Total buds across portions.
pub fn portion_total(portions: &[Portion]) -> u64 {
    portions
        .iter()
        .fold(0_u64, |acc, p| acc.saturating_add(p.quantity))
}
