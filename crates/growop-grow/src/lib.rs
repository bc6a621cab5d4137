//! Plant lifecycle for the growop simulation.
//!
//! Pure state transforms over [`growop_types::Plant`] and friends: nothing
//! here owns a clock or a random source. Callers pass `now_ms`, the tick
//! length and an [`rand::Rng`], which keeps every operation replayable.
//!
//! # Modules
//!
//! - [`growth`] -- Phase durations, time multipliers, plant creation ([`GrowModifiers`])
//! - [`care`] -- Water, fertilize, training and enhancers with their gates
//! - [`quality`] -- Clamped quality-multiplier arithmetic
//! - [`harvest`] -- Yield formula and harvest into a curing batch
//! - [`curing`] -- Curing durations, completion, rush and quality tiers
//! - [`pests`] -- Infestation rolls, damage over time, treatment
//! - [`environment`] -- Micro-environment drift, adjustment, terpene derivation
//! - [`error`] -- Error types for all grow operations ([`GrowError`])

pub mod care;
pub mod curing;
pub mod environment;
pub mod error;
pub mod growth;
pub mod harvest;
pub mod pests;
pub mod quality;

pub use care::{Watered, allow_refeed, apply_enhancer, apply_training, fertilize, water};
pub use environment::Stabilization;
pub use error::{CareAction, GrowError};
pub use growth::{Advance, GrowModifiers, advance, is_harvest_ready, new_plant, time_multiplier};
pub use harvest::Harvest;
pub use pests::PestReport;
