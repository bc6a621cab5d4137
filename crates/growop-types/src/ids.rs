//! Type-safe identifier wrappers.
//!
//! Runtime entities (plants, batches, infestations, contracts, offers)
//! carry a [`Uuid`] wrapper. Their bytes are drawn from the injected
//! random source so that a seeded run replays with identical ids.
//!
//! Catalog entries (strains, dealers, pests, research nodes, ...) are keyed
//! by stable string slugs such as `"green-gelato"` or `"basic-led"`.

use rand::RngCore;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier from random bytes drawn from `rng`.
            pub fn generate(rng: &mut impl RngCore) -> Self {
                Self(crate::random::random_uuid(rng))
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

/// Generates a newtype wrapper around a catalog slug.
macro_rules! define_key {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub String);

        impl $name {
            /// Create a key from any string-like value.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Borrow the slug.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Runtime entities
// ---------------------------------------------------------------------------

define_id! {
    /// Unique identifier for a plant growing in a slot.
    PlantId
}

define_id! {
    /// Unique identifier for a batch that is curing.
    CuringBatchId
}

define_id! {
    /// Unique identifier for a sellable inventory batch.
    InventoryBatchId
}

define_id! {
    /// Unique identifier for a pest infestation.
    InfestationId
}

define_id! {
    /// Unique identifier for a mother plant.
    MotherPlantId
}

define_id! {
    /// Unique identifier for a recurring dealer contract.
    ContractId
}

define_id! {
    /// Unique identifier for an anonymous trade offer.
    OfferId
}

// ---------------------------------------------------------------------------
// Catalog keys
// ---------------------------------------------------------------------------

define_key! {
    /// Slug of a catalog or bred strain.
    StrainId
}

define_key! {
    /// Slug of a dealer.
    DealerId
}

define_key! {
    /// Slug of a pest type.
    PestId
}

define_key! {
    /// Slug of a pest treatment.
    TreatmentId
}

define_key! {
    /// Slug of a research tree node.
    ResearchNodeId
}

define_key! {
    /// Slug of a grow upgrade.
    UpgradeId
}

define_key! {
    /// Slug of an environment-control upgrade.
    EnvUpgradeId
}

define_key! {
    /// Slug of a yield enhancer.
    EnhancerId
}

define_key! {
    /// Slug of a plant training technique.
    TechniqueId
}

define_key! {
    /// Slug of a hireable employee.
    EmployeeId
}

define_key! {
    /// Slug of a phenotype.
    PhenotypeId
}

define_key! {
    /// Slug of a market condition.
    ConditionId
}

define_key! {
    /// Slug of an AI competitor.
    CompetitorId
}

define_key! {
    /// Slug of a quest.
    QuestId
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::random::ScriptedRng;

    #[test]
    fn generated_ids_are_distinct() {
        let mut rng = ScriptedRng::new(vec![0.5]);
        let a = PlantId::generate(&mut rng);
        let b = PlantId::generate(&mut rng);
        assert_ne!(a, b);
    }

    #[test]
    fn keys_serialize_as_plain_strings() {
        let key = StrainId::new("green-gelato");
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"green-gelato\"");
        assert_eq!(key.to_string(), "green-gelato");
    }
}
