//! Selling side of the growop simulation.
//!
//! Stock lives in [`growop_types::Inventory`], buyer state in
//! [`growop_types::TradeBook`] and per-strain prices in
//! [`growop_types::MarketState`]. Every operation validates before it
//! mutates, so an `Err` leaves all three untouched.
//!
//! # Modules
//!
//! - [`inventory`] -- Tiered batches, legacy buds, greedy selling, revenue
//! - [`offers`] -- Anonymous offers, refresh cooldown, haggling
//! - [`dealers`] -- Dealer availability, relationships, direct trades
//! - [`contracts`] -- Weekly delivery contracts
//! - [`pricing`] -- Dynamic prices, competitors, market conditions, the market tick
//! - [`error`] -- Error types for all market operations ([`MarketError`])

pub mod contracts;
pub mod dealers;
pub mod error;
pub mod inventory;
pub mod offers;
pub mod pricing;

pub use contracts::Delivery;
pub use dealers::DealerTrade;
pub use error::MarketError;
pub use inventory::Portion;
pub use offers::{Haggle, Sale};
pub use pricing::{MarketTick, TerpeneSource};
