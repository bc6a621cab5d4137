//! Error types for the `growop-genetics` crate.

use growop_types::{MotherPlantId, PhenotypeId, StrainId};

/// Errors that can occur during breeding and propagation.
///
/// Nothing is charged or recorded when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeneticsError {
    /// Neither the catalog nor the bred strains know this id.
    #[error("unknown strain: {0}")]
    UnknownStrain(StrainId),

    /// The strain exists but the player has not discovered it.
    #[error("strain not discovered: {0}")]
    NotDiscovered(StrainId),

    /// No phenotype with this id.
    #[error("unknown phenotype: {0}")]
    UnknownPhenotype(PhenotypeId),

    /// No mother plant with this id.
    #[error("mother plant not found: {0}")]
    MotherNotFound(MotherPlantId),

    /// Every clone this mother can give has been taken.
    #[error("mother plant {mother} has given all {max} clones")]
    ClonesExhausted {
        /// The mother.
        mother: MotherPlantId,
        /// Its clone budget.
        max: u32,
    },

    /// The slot index is out of range.
    #[error("slot {0} does not exist")]
    SlotNotFound(usize),

    /// The slot already holds a plant.
    #[error("slot {0} is occupied")]
    SlotOccupied(usize),

    /// The wallet cannot cover the cost.
    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds {
        /// Price of the action.
        needed: u64,
        /// Nugs on hand.
        available: u64,
    },

    /// The random source kept producing ids that are already taken.
    #[error("could not find a free strain id")]
    IdCollision,
}

/// Take `cost` from `wallet`, or fail without touching it.
pub(crate) fn charge(wallet: &mut u64, cost: u64) -> Result<(), GeneticsError> {
    let remaining = wallet
        .checked_sub(cost)
        .ok_or(GeneticsError::InsufficientFunds {
            needed: cost,
            available: *wallet,
        })?;
    *wallet = remaining;
    Ok(())
}
