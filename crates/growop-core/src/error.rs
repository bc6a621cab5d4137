//! Error types for the `growop-core` crate.
//!
//! A command that returns one of these left the game state untouched.

use growop_genetics::GeneticsError;
use growop_grow::GrowError;
use growop_market::MarketError;
use growop_types::{
    EmployeeId, EnhancerId, EnvUpgradeId, QuestId, ResearchNodeId, StrainId, TechniqueId,
    TreatmentId, UpgradeId,
};

/// Errors returned by commands and tick entry points.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoreError {
    /// A plant care, harvest, curing or pest operation failed.
    #[error(transparent)]
    Grow(#[from] GrowError),

    /// A sale, dealer trade, contract or offer operation failed.
    #[error(transparent)]
    Market(#[from] MarketError),

    /// A breeding or mother plant operation failed.
    #[error(transparent)]
    Genetics(#[from] GeneticsError),

    /// The slot index is past the end of the grow room.
    #[error("slot {0} does not exist")]
    SlotNotFound(usize),

    /// The slot has no plant.
    #[error("slot {0} is empty")]
    EmptySlot(usize),

    /// The slot already holds a plant.
    #[error("slot {0} is occupied")]
    SlotOccupied(usize),

    /// The strain is neither in the catalog nor bred.
    #[error("unknown strain: {0}")]
    UnknownStrain(StrainId),

    /// The strain exists but has not been discovered yet.
    #[error("strain {0} has not been discovered")]
    NotDiscovered(StrainId),

    /// No such training technique.
    #[error("unknown technique: {0}")]
    UnknownTechnique(TechniqueId),

    /// No such enhancer.
    #[error("unknown enhancer: {0}")]
    UnknownEnhancer(EnhancerId),

    /// No such treatment.
    #[error("unknown treatment: {0}")]
    UnknownTreatment(TreatmentId),

    /// No such upgrade.
    #[error("unknown upgrade: {0}")]
    UnknownUpgrade(UpgradeId),

    /// No such environment upgrade.
    #[error("unknown environment upgrade: {0}")]
    UnknownEnvUpgrade(EnvUpgradeId),

    /// No such employee.
    #[error("unknown employee: {0}")]
    UnknownEmployee(EmployeeId),

    /// No such research node.
    #[error("unknown research node: {0}")]
    UnknownResearchNode(ResearchNodeId),

    /// The upgrade is already at its highest level.
    #[error("upgrade {upgrade} is already at max level {max_level}")]
    MaxLevel {
        /// The upgrade.
        upgrade: UpgradeId,
        /// Its level cap.
        max_level: u32,
    },

    /// The one-time environment upgrade was already bought.
    #[error("environment upgrade {0} already owned")]
    EnvUpgradeOwned(EnvUpgradeId),

    /// The employee is already on the payroll.
    #[error("employee {0} already hired")]
    AlreadyHired(EmployeeId),

    /// Automation names an employee that was never hired.
    #[error("employee {0} has not been hired")]
    EmployeeNotHired(EmployeeId),

    /// A research project is already running.
    #[error("research {0} is already in progress")]
    ResearchActive(ResearchNodeId),

    /// Nothing is being researched.
    #[error("no research in progress")]
    NoActiveResearch,

    /// The node was researched before.
    #[error("research {0} already completed")]
    ResearchCompleted(ResearchNodeId),

    /// Not every prerequisite of the node is done.
    #[error("research {node} requires {missing}")]
    PrerequisitesMissing {
        /// The node asked for.
        node: ResearchNodeId,
        /// The first prerequisite still missing.
        missing: ResearchNodeId,
    },

    /// Not enough research points.
    #[error("insufficient research points: need {needed}, have {available}")]
    InsufficientPoints {
        /// Points the node costs.
        needed: u64,
        /// Points on hand.
        available: u64,
    },

    /// Not enough nugs.
    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds {
        /// Price of the purchase.
        needed: u64,
        /// Nugs on hand.
        available: u64,
    },

    /// The action needs a research unlock that has not been completed.
    #[error("feature {0} is not unlocked")]
    FeatureLocked(String),

    /// No quest with that id.
    #[error("quest not found: {0}")]
    QuestNotFound(QuestId),

    /// The quest target has not been reached.
    #[error("quest {0} is not complete")]
    QuestIncomplete(QuestId),

    /// The reward was already paid.
    #[error("quest {0} already claimed")]
    QuestClaimed(QuestId),
}

/// Errors from saving or loading a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// The snapshot is not valid JSON or does not fit any known layout.
    #[error("malformed snapshot: {source}")]
    Json {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },
}

/// Take `cost` nugs from `wallet`, or fail without touching it.
pub(crate) fn charge(wallet: &mut u64, cost: u64) -> Result<(), CoreError> {
    let remaining = wallet
        .checked_sub(cost)
        .ok_or(CoreError::InsufficientFunds {
            needed: cost,
            available: *wallet,
        })?;
    *wallet = remaining;
    Ok(())
}
