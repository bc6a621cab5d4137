//! Error types for the `growop-grow` crate.
//!
//! Every failing operation returns before touching the plant or the wallet,
//! so an `Err` always means "nothing changed".

use growop_types::{CuringBatchId, EnhancerId, InfestationId, PestId, TechniqueId, TreatmentId};

/// A care action with its own cooldown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CareAction {
    /// Watering.
    Water,
    /// Fertilizing.
    Fertilize,
    /// A repeatable training technique.
    Training,
}

impl core::fmt::Display for CareAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::Water => "water",
            Self::Fertilize => "fertilize",
            Self::Training => "training",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while growing, harvesting or curing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GrowError {
    /// The action is still cooling down.
    #[error("{action} on cooldown for another {remaining_ms} ms")]
    Cooldown {
        /// The action attempted.
        action: CareAction,
        /// Time until it is available again.
        remaining_ms: u64,
    },

    /// The plant already holds the maximum number of water stacks.
    #[error("water stacks already at cap ({cap})")]
    WaterStackCap {
        /// The cap.
        cap: u8,
    },

    /// The one-shot fertilizer was already used.
    #[error("fertilizer already applied")]
    AlreadyFertilized,

    /// Not enough currency for the action.
    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds {
        /// Price of the action.
        needed: u64,
        /// Balance available.
        available: u64,
    },

    /// The technique cannot be used in the plant's current phase.
    #[error("technique {technique} not allowed in phase {phase}")]
    WrongPhase {
        /// The technique.
        technique: TechniqueId,
        /// The plant's phase.
        phase: u8,
    },

    /// A one-time technique was already applied to this plant.
    #[error("technique {0} already applied")]
    TechniqueAlreadyApplied(TechniqueId),

    /// The enhancer was already applied to this plant.
    #[error("enhancer {0} already applied")]
    EnhancerAlreadyApplied(EnhancerId),

    /// The plant is not ready to harvest.
    #[error("plant not ready for harvest (phase {phase})")]
    NotReady {
        /// The plant's phase.
        phase: u8,
    },

    /// The plant's phase index is outside the phase table.
    #[error("phase {0} is not in the phase table")]
    UnknownPhase(u8),

    /// No curing batch with this id exists.
    #[error("curing batch not found: {0}")]
    BatchNotFound(CuringBatchId),

    /// No infestation with this id exists.
    #[error("infestation not found: {0}")]
    InfestationNotFound(InfestationId),

    /// The treatment does not work on the pest.
    #[error("treatment {treatment} does not target {pest}")]
    TreatmentMismatch {
        /// The treatment used.
        treatment: TreatmentId,
        /// The pest present.
        pest: PestId,
    },
}

/// Take `cost` from `wallet`, or report the shortfall.
///
/// Callers validate every other precondition first and charge last.
pub(crate) fn charge(wallet: &mut u64, cost: u64) -> Result<(), GrowError> {
    let remaining = wallet
        .checked_sub(cost)
        .ok_or(GrowError::InsufficientFunds {
            needed: cost,
            available: *wallet,
        })?;
    *wallet = remaining;
    Ok(())
}

/// Check `wallet` can cover `cost` without charging.
pub(crate) const fn ensure_funds(wallet: u64, cost: u64) -> Result<(), GrowError> {
    if wallet < cost {
        return Err(GrowError::InsufficientFunds {
            needed: cost,
            available: wallet,
        });
    }
    Ok(())
}
