//! Game state and rules for the growop simulation.
//!
//! [`GameState`] is the whole save. Player input arrives as a [`Command`]
//! and goes through [`dispatch`], which returns a new state or the old one
//! with a [`CoreError`]. Time moves only through the functions in
//! [`ticks`], called by whatever scheduler drives the game.
//!
//! # Modules
//!
//! - [`state`] -- [`GameState`], the fresh-save kit and the per-call [`Context`]
//! - [`commands`] -- The [`Command`] set and its dispatcher
//! - [`actions`] -- Plant care, harvest, treatment, climate and curing rush
//! - [`trading`] -- Dealers, contracts and anonymous offers against inventory
//! - [`breeding`] -- Crosses, mother plants and clones
//! - [`research`] -- Research tree, points and unlocked bonuses
//! - [`shop`] -- Upgrades, environment upgrades, employees and automation setup
//! - [`automation`] -- Employee-driven care passes
//! - [`events`] -- Global event roll and expiry
//! - [`quests`] -- Quest progress and rewards
//! - [`modifiers`] -- Research and upgrade effects folded into grow numbers
//! - [`ticks`] -- Tick entry points
//! - [`snapshot`] -- Versioned JSON save and load
//! - [`config`] -- Headless run configuration ([`SimulationConfig`])
//! - [`error`] -- [`CoreError`] and [`SnapshotError`]

pub mod actions;
pub mod automation;
pub mod breeding;
pub mod commands;
pub mod config;
pub mod error;
pub mod events;
pub mod modifiers;
pub mod quests;
pub mod research;
pub mod shop;
pub mod snapshot;
pub mod state;
pub mod ticks;
pub mod trading;

pub use commands::{Command, Outcome, apply, dispatch};
pub use config::{ConfigError, SimulationConfig};
pub use error::{CoreError, SnapshotError};
pub use snapshot::{SNAPSHOT_VERSION, load_snapshot, save_snapshot};
pub use state::{Context, GameState, ResearchState, Strains};
