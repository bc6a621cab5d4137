//! Error types for the `growop-market` crate.

use growop_types::{ContractId, DealerId, OfferId, QualityTier};

/// Errors that can occur while selling or trading.
///
/// Every variant is returned before any stock, currency or relationship
/// changes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MarketError {
    /// Not enough qualifying stock for the sale.
    #[error("insufficient stock: requested {requested}, available {available}")]
    InsufficientStock {
        /// Buds asked for.
        requested: u64,
        /// Buds that qualify.
        available: u64,
    },

    /// A sale of zero buds.
    #[error("quantity must be positive")]
    ZeroQuantity,

    /// No offer with this id.
    #[error("offer not found: {0}")]
    OfferNotFound(OfferId),

    /// Offers were refreshed too recently.
    #[error("offers refresh in {remaining_ms} ms")]
    RefreshCooldown {
        /// Time until the next refresh.
        remaining_ms: u64,
    },

    /// No dealer with this id.
    #[error("unknown dealer: {0}")]
    UnknownDealer(DealerId),

    /// The player's reputation is too low for this dealer.
    #[error("dealer {dealer} requires reputation {required}, have {reputation}")]
    DealerLocked {
        /// The dealer.
        dealer: DealerId,
        /// Reputation needed.
        required: u64,
        /// Current reputation.
        reputation: u64,
    },

    /// The dealer does not trade at this hour.
    #[error("dealer {dealer} is not available at {hour}:00")]
    DealerUnavailable {
        /// The dealer.
        dealer: DealerId,
        /// Hour of day of the attempt.
        hour: u8,
    },

    /// The quantity is outside the dealer's band.
    #[error("dealer {dealer} buys {min}..={max} buds, asked {requested}")]
    QuantityOutOfRange {
        /// The dealer.
        dealer: DealerId,
        /// Smallest accepted quantity.
        min: u64,
        /// Largest accepted quantity.
        max: u64,
        /// Quantity offered.
        requested: u64,
    },

    /// Not enough stock at or above the dealer's minimum tier.
    #[error("dealer {dealer} needs {requested} buds of tier {min_tier} or better, have {available}")]
    TierTooLow {
        /// The dealer.
        dealer: DealerId,
        /// Lowest accepted tier.
        min_tier: QualityTier,
        /// Buds asked for.
        requested: u64,
        /// Buds that qualify.
        available: u64,
    },

    /// The relationship is not deep enough for a contract.
    #[error("dealer {dealer} contracts need relationship level {required}, have {level}")]
    RelationshipTooLow {
        /// The dealer.
        dealer: DealerId,
        /// Current level.
        level: u8,
        /// Level needed.
        required: u8,
    },

    /// A contract must run for at least one week.
    #[error("contract duration must be at least one week")]
    InvalidDuration,

    /// No contract with this id.
    #[error("contract not found: {0}")]
    ContractNotFound(ContractId),

    /// The contract has already been fulfilled.
    #[error("contract {0} is no longer active")]
    ContractInactive(ContractId),

    /// The next delivery is not due yet.
    #[error("contract {contract} next delivery due at {due_at}")]
    DeliveryNotDue {
        /// The contract.
        contract: ContractId,
        /// When it becomes due.
        due_at: u64,
    },
}
