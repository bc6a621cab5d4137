//! Genetics for the growop simulation.
//!
//! Breeding crosses any two known strains (catalog or previously bred)
//! into a new strain one generation deeper, with averaged and jittered
//! traits, mixed terpenes, a chance of a mutation and a procedural name.
//! Mother plants turn a discovered strain into a source of cheap clones.
//!
//! # Modules
//!
//! - [`breeding`] -- Crossing, rarity, seed price, strain lookup
//! - [`mutation`] -- Mutation chance, tier roll, compounding and caps
//! - [`terpenes`] -- Terpene profile inheritance
//! - [`names`] -- Weighted procedural names
//! - [`mother`] -- Mother plants and clones
//! - [`error`] -- Error types for all genetics operations ([`GeneticsError`])

pub mod breeding;
pub mod error;
pub mod mother;
pub mod mutation;
pub mod names;
pub mod terpenes;

pub use breeding::{breed, cross, find_strain};
pub use error::GeneticsError;
pub use mother::{create_mother_plant, mother_plant_cost, take_clone};
