//! Recurring delivery contracts with established dealers.

use growop_catalog::Catalog;
use growop_types::{ContractId, DealerId, Inventory, TradeBook, TradeContract};
use rand::Rng;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::info;

use crate::dealers::BASE_PRICE_PER_BUD;
use crate::error::MarketError;
use crate::inventory::{self, Portion};

/// Relationship level needed to sign a contract.
pub const MIN_CONTRACT_LEVEL: u8 = 3;

/// Time between deliveries.
pub const DELIVERY_INTERVAL_MS: u64 = 7 * 24 * 60 * 60 * 1000;

const CONTRACT_PREMIUM: Decimal = Decimal::from_parts(11, 0, 0, false, 1);

/// Locked per-bud price for a dealer at the current loyalty.
pub fn contract_price(multiplier: f64, loyalty: f64) -> Decimal {
    let base = Decimal::from_f64(multiplier + loyalty).unwrap_or(Decimal::ONE);
    (base * Decimal::from(BASE_PRICE_PER_BUD) * CONTRACT_PREMIUM)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Sign a contract for `quantity` buds a week over `weeks` weeks.
///
/// The first delivery falls due one week after signing.
///
/// # Errors
///
/// [`MarketError::UnknownDealer`], [`MarketError::InvalidDuration`],
/// [`MarketError::RelationshipTooLow`] or
/// [`MarketError::QuantityOutOfRange`].
pub fn create(
    book: &mut TradeBook,
    catalog: &Catalog,
    dealer_id: &DealerId,
    quantity: u64,
    weeks: u32,
    now_ms: u64,
    rng: &mut impl Rng,
) -> Result<ContractId, MarketError> {
    let dealer = catalog
        .dealer(dealer_id)
        .ok_or_else(|| MarketError::UnknownDealer(dealer_id.clone()))?;
    if weeks == 0 {
        return Err(MarketError::InvalidDuration);
    }
    let relationship = book.relationships.get(dealer_id).cloned().unwrap_or_default();
    if relationship.level < MIN_CONTRACT_LEVEL {
        return Err(MarketError::RelationshipTooLow {
            dealer: dealer_id.clone(),
            level: relationship.level,
            required: MIN_CONTRACT_LEVEL,
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

    let contract = TradeContract {
        id: ContractId::generate(rng),
        dealer: dealer_id.clone(),
        quantity,
        price_per_bud: contract_price(dealer.price_multiplier, relationship.loyalty_bonus),
        total_deliveries: weeks,
        completed_deliveries: 0,
        next_delivery_at: now_ms.saturating_add(DELIVERY_INTERVAL_MS),
        created_at: now_ms,
        active: true,
    };
    let id = contract.id;
    info!(
        contract = %id,
        dealer = %dealer_id,
        quantity,
        weeks,
        price = %contract.price_per_bud,
        "contract signed"
    );
    book.contracts.push(contract);
    Ok(id)
}

/// A fulfilled delivery.
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    /// Buds delivered.
    pub quantity: u64,
    /// Nugs earned.
    pub revenue: u64,
    /// Whether that was the last delivery.
    pub finished: bool,
    /// Where the buds came from.
    pub portions: Vec<Portion>,
}

/// Fulfil the next due delivery of a contract.
///
/// Buds must meet the dealer's minimum tier and are paid at the locked
/// price without tier multipliers.
///
/// # Errors
///
/// [`MarketError::ContractNotFound`], [`MarketError::ContractInactive`],
/// [`MarketError::DeliveryNotDue`] or [`MarketError::TierTooLow`].
pub fn deliver(
    book: &mut TradeBook,
    stock: &mut Inventory,
    wallet: &mut u64,
    catalog: &Catalog,
    id: ContractId,
    now_ms: u64,
) -> Result<Delivery, MarketError> {
    let contract = book
        .contracts
        .iter_mut()
        .find(|c| c.id == id)
        .ok_or(MarketError::ContractNotFound(id))?;
    if !contract.active {
        return Err(MarketError::ContractInactive(id));
    }
    if now_ms < contract.next_delivery_at {
        return Err(MarketError::DeliveryNotDue {
            contract: id,
            due_at: contract.next_delivery_at,
        });
    }
    let dealer = catalog
        .dealer(&contract.dealer)
        .ok_or_else(|| MarketError::UnknownDealer(contract.dealer.clone()))?;
    let qualifying = inventory::available(stock, dealer.min_tier);
    if qualifying < contract.quantity {
        return Err(MarketError::TierTooLow {
            dealer: contract.dealer.clone(),
            min_tier: dealer.min_tier,
            requested: contract.quantity,
            available: qualifying,
        });
    }

    let portions = inventory::take(stock, contract.quantity, dealer.min_tier)?;
    let revenue = (Decimal::from(contract.quantity) * contract.price_per_bud)
        .floor()
        .to_u64()
        .unwrap_or(0);
    contract.completed_deliveries = contract.completed_deliveries.saturating_add(1);
    let finished = contract.completed_deliveries >= contract.total_deliveries;
    if finished {
        contract.active = false;
    } else {
        contract.next_delivery_at = contract.next_delivery_at.saturating_add(DELIVERY_INTERVAL_MS);
    }
    let quantity = contract.quantity;
    *wallet = wallet.saturating_add(revenue);
    book.total_revenue = book.total_revenue.saturating_add(revenue);
    info!(contract = %id, quantity, revenue, finished, "contract delivery");
    Ok(Delivery {
        quantity,
        revenue,
        finished,
        portions,
    })
}

/// Contracts with a delivery due at `now_ms`.
pub fn due(book: &TradeBook, now_ms: u64) -> Vec<ContractId> {
    book.contracts
        .iter()
        .filter(|c| c.active && c.next_delivery_at <= now_ms)
        .map(|c| c.id)
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::indexing_slicing)]

    use growop_types::{DealerRelationship, ScriptedRng};
    use rust_decimal_macros::dec;

    use super::*;
    use crate::inventory::portion_total;

    fn book_with(dealer: &str, level: u8) -> TradeBook {
        let mut book = TradeBook::default();
        book.relationships.insert(
            DealerId::new(dealer),
            DealerRelationship {
                level,
                total_deals: u32::from(level) * 3,
                loyalty_bonus: f64::from(level) * 0.03,
                last_deal_at: None,
            },
        );
        book
    }

    #[test]
    fn price_includes_premium() {
        // (0.9 + 0.09) × 3 × 1.1
        assert_eq!(contract_price(0.9, 0.09), dec!(3.27));
        assert_eq!(contract_price(1.0, 0.0), dec!(3.30));
    }

    #[test]
    fn signing_needs_level_three() {
        let catalog = Catalog::standard();
        let mut rng = ScriptedRng::constant(0.5);
        let mike = DealerId::new("mike");

        let mut book = book_with("mike", 2);
        let err = create(&mut book, &catalog, &mike, 20, 4, 0, &mut rng).unwrap_err();
        assert_eq!(
            err,
            MarketError::RelationshipTooLow {
                dealer: mike.clone(),
                level: 2,
                required: 3
            }
        );
        assert!(book.contracts.is_empty());

        let mut book = book_with("mike", 3);
        assert_eq!(
            create(&mut book, &catalog, &mike, 20, 0, 0, &mut rng).unwrap_err(),
            MarketError::InvalidDuration
        );
        assert!(matches!(
            create(&mut book, &catalog, &mike, 60, 2, 0, &mut rng).unwrap_err(),
            MarketError::QuantityOutOfRange { .. }
        ));
        let id = create(&mut book, &catalog, &mike, 20, 2, 1_000, &mut rng).unwrap();
        let contract = &book.contracts[0];
        assert_eq!(contract.id, id);
        assert_eq!(contract.total_deliveries, 2);
        assert_eq!(contract.next_delivery_at, 1_000 + DELIVERY_INTERVAL_MS);
        assert_eq!(contract.price_per_bud, dec!(3.27));
    }

    #[test]
    fn deliveries_run_until_done() {
        let catalog = Catalog::standard();
        let mut rng = ScriptedRng::constant(0.5);
        let mike = DealerId::new("mike");
        let mut book = book_with("mike", 3);
        let id = create(&mut book, &catalog, &mike, 20, 2, 0, &mut rng).unwrap();
        let mut stock = Inventory::default();
        inventory::add_legacy(&mut stock, 50);
        let mut wallet = 0;

        let err = deliver(&mut book, &mut stock, &mut wallet, &catalog, id, 10).unwrap_err();
        assert!(matches!(err, MarketError::DeliveryNotDue { .. }));
        assert!(due(&book, DELIVERY_INTERVAL_MS - 1).is_empty());
        assert_eq!(due(&book, DELIVERY_INTERVAL_MS), vec![id]);

        let first = deliver(&mut book, &mut stock, &mut wallet, &catalog, id, DELIVERY_INTERVAL_MS)
            .unwrap();
        // 20 × 3.27
        assert_eq!(first.revenue, 65);
        assert!(!first.finished);
        assert_eq!(book.contracts[0].next_delivery_at, 2 * DELIVERY_INTERVAL_MS);

        let second =
            deliver(&mut book, &mut stock, &mut wallet, &catalog, id, 2 * DELIVERY_INTERVAL_MS)
                .unwrap();
        assert!(second.finished);
        assert!(!book.contracts[0].active);
        assert_eq!(wallet, 130);
        assert_eq!(stock.buds, 10);
        assert_eq!(book.relationships[&mike].total_deals, 9);

        assert_eq!(portion_total(&second.portions), 20);
        assert!(second.portions.iter().all(|p| p.strain.is_none()));
        assert_eq!(
            deliver(&mut book, &mut stock, &mut wallet, &catalog, id, 3 * DELIVERY_INTERVAL_MS)
                .unwrap_err(),
            MarketError::ContractInactive(id)
        );
    }

    #[test]
    fn short_stock_blocks_delivery() {
        let catalog = Catalog::standard();
        let mut rng = ScriptedRng::constant(0.5);
        let mut book = book_with("mike", 5);
        let id = create(&mut book, &catalog, &DealerId::new("mike"), 30, 1, 0, &mut rng).unwrap();
        let mut stock = Inventory::default();
        inventory::add_legacy(&mut stock, 10);
        let mut wallet = 0;
        let err = deliver(&mut book, &mut stock, &mut wallet, &catalog, id, DELIVERY_INTERVAL_MS)
            .unwrap_err();
        assert!(matches!(err, MarketError::TierTooLow { available: 10, .. }));
        assert_eq!(book.contracts[0].completed_deliveries, 0);
        assert_eq!(stock.buds, 10);
    }
}
