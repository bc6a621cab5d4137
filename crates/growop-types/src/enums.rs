//! Enumeration types for the growop simulation.
//!
//! Every "type" or "specialization" tag in the game is a closed enum so that
//! dispatch sites match exhaustively.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Genetics
// ---------------------------------------------------------------------------

/// Rarity tier of a strain, mutation or phenotype.
///
/// Ordered from most to least common, so `max` picks the rarer tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Rarity {
    /// Everyday genetics.
    Common,
    /// Uncommon genetics.
    Rare,
    /// Elite genetics.
    Epic,
    /// Only reachable through a mutation.
    Legendary,
}

impl Rarity {
    /// Yield multiplier applied at harvest.
    pub const fn yield_multiplier(self) -> f64 {
        match self {
            Self::Common => 1.0,
            Self::Rare => 1.3,
            Self::Epic => 1.6,
            Self::Legendary => 2.5,
        }
    }

    /// Research-point weight, in halves (common counts as 2/2).
    pub const fn research_weight_halves(self) -> u64 {
        match self {
            Self::Common => 2,
            Self::Rare => 3,
            Self::Epic => 4,
            Self::Legendary => 6,
        }
    }

    /// One tier up, never past epic.
    pub const fn promoted(self) -> Self {
        match self {
            Self::Common => Self::Rare,
            Self::Rare | Self::Epic | Self::Legendary => Self::Epic,
        }
    }

    /// One tier down, never below common.
    pub const fn demoted(self) -> Self {
        match self {
            Self::Common | Self::Rare => Self::Common,
            Self::Epic => Self::Rare,
            Self::Legendary => Self::Epic,
        }
    }
}

// ---------------------------------------------------------------------------
// Growing
// ---------------------------------------------------------------------------

/// Soil a seed is planted into.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
pub enum SoilType {
    /// Plain potting soil.
    #[default]
    Basic,
    /// Airy mix that shortens phases slightly.
    LightMix,
    /// Pre-fertilized mix with the best yield bonus.
    AllMix,
}

impl SoilType {
    /// Multiplier on every phase duration.
    pub const fn time_multiplier(self) -> f64 {
        match self {
            Self::LightMix => 0.9,
            Self::Basic | Self::AllMix => 1.0,
        }
    }

    /// Multiplier on harvest yield.
    pub const fn yield_bonus(self) -> f64 {
        match self {
            Self::Basic => 1.0,
            Self::LightMix => 1.05,
            Self::AllMix => 1.15,
        }
    }

    /// Nugs charged for the soil on top of the seed price.
    pub const fn cost(self) -> u64 {
        match self {
            Self::Basic => 0,
            Self::LightMix => 15,
            Self::AllMix => 35,
        }
    }
}

/// Global light schedule.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
pub enum LightCycle {
    /// 18/6 vegetative schedule.
    #[default]
    Vegetative,
    /// 12/12 flowering schedule.
    Flowering,
}

impl LightCycle {
    /// Effective light intensity used by terpene derivation.
    pub const fn intensity(self) -> f64 {
        match self {
            Self::Vegetative => 70.0,
            Self::Flowering => 80.0,
        }
    }

    /// The other schedule.
    pub const fn toggled(self) -> Self {
        match self {
            Self::Vegetative => Self::Flowering,
            Self::Flowering => Self::Vegetative,
        }
    }
}

/// A controllable environment parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum EnvParam {
    /// Root-zone acidity.
    Ph,
    /// Electrical conductivity (nutrient strength).
    Ec,
    /// Relative humidity in percent.
    Humidity,
    /// Air temperature in degrees Celsius.
    Temperature,
    /// CO2 concentration in ppm (room-wide only).
    Co2,
}

// ---------------------------------------------------------------------------
// Trade
// ---------------------------------------------------------------------------

/// Quality tier of a sellable inventory batch.
///
/// Ordered from lowest to highest so comparisons read naturally
/// (`tier >= QualityTier::B`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum QualityTier {
    /// Below-average product.
    C,
    /// Standard product.
    B,
    /// Premium product.
    A,
    /// Top-shelf product.
    S,
}

impl QualityTier {
    /// Map a cured quality score to its tier.
    ///
    /// The score is clamped to `0.5..=1.5` first; thresholds are S at
    /// 1.25, A at 1.1 and B at 0.95.
    pub fn from_score(score: f64) -> Self {
        let score = if score.is_nan() {
            0.5
        } else {
            score.clamp(0.5, 1.5)
        };
        if score >= 1.25 {
            Self::S
        } else if score >= 1.1 {
            Self::A
        } else if score >= 0.95 {
            Self::B
        } else {
            Self::C
        }
    }

    /// Price multiplier carried by the tier.
    pub const fn price_multiplier(self) -> f64 {
        match self {
            Self::S => 1.5,
            Self::A => 1.25,
            Self::B => 1.0,
            Self::C => 0.85,
        }
    }
}

impl std::fmt::Display for QualityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::C => "C",
            Self::B => "B",
            Self::A => "A",
            Self::S => "S",
        };
        f.write_str(label)
    }
}

/// Kind of buyer a dealer represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum DealerType {
    /// Small street-level buyer.
    Street,
    /// Mid-volume reseller.
    Middleman,
    /// High-paying exclusive client.
    Vip,
    /// Bulk buyer.
    Wholesale,
    /// Seasonal visitor paying a premium.
    Tourist,
    /// Licensed storefront.
    Dispensary,
}

/// Direction of a strain's market price.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
pub enum MarketTrend {
    /// High demand and low supply.
    Rising,
    /// Low demand or glutted supply.
    Falling,
    /// Neither.
    #[default]
    Stable,
}

// ---------------------------------------------------------------------------
// Staff & progression
// ---------------------------------------------------------------------------

/// What an employee is trained to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Specialization {
    /// Waters plants.
    Watering,
    /// Feeds plants.
    Fertilizing,
    /// Harvests ripe plants.
    Harvesting,
    /// Handles every task.
    All,
}

/// A plant-care task an employee can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum CareTask {
    /// Water the plant.
    Water,
    /// Fertilize the plant.
    Fertilize,
    /// Harvest the plant.
    Harvest,
}

impl Specialization {
    /// Whether this specialization may perform `task`.
    pub const fn covers(self, task: CareTask) -> bool {
        matches!(
            (self, task),
            (Self::All, _)
                | (Self::Watering, CareTask::Water)
                | (Self::Fertilizing, CareTask::Fertilize)
                | (Self::Harvesting, CareTask::Harvest)
        )
    }
}

/// What a research cost reduction applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum CostTarget {
    /// Lighting power bill (registered, not charged by the core).
    Electricity,
    /// Fertilizer purchases.
    Nutrients,
    /// Mother plant purchases.
    MotherPlants,
    /// Water purchases.
    Water,
}

/// A world event that temporarily modifies growth and trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum GlobalEventKind {
    /// Buyers flock in: better prices and bigger offers.
    Festival,
    /// Damp haze: slower growth and curing, tighter timing.
    MysticFog,
    /// Stars align: faster growth, wider timing window.
    CosmicAlignment,
    /// Sudden demand spike on anonymous offers.
    MarketRush,
}

impl GlobalEventKind {
    /// Every event kind, in selection order.
    pub const ALL: [Self; 4] = [
        Self::Festival,
        Self::MysticFog,
        Self::CosmicAlignment,
        Self::MarketRush,
    ];

    /// Multiplier on phase durations while active.
    pub const fn growth_multiplier(self) -> f64 {
        match self {
            Self::MysticFog => 1.2,
            Self::CosmicAlignment => 0.8,
            Self::Festival | Self::MarketRush => 1.0,
        }
    }

    /// Multiplier on anonymous offer prices while active.
    pub const fn price_multiplier(self) -> f64 {
        match self {
            Self::Festival => 1.5,
            Self::MarketRush => 1.3,
            Self::MysticFog | Self::CosmicAlignment => 1.0,
        }
    }

    /// Multiplier on anonymous offer quantities while active.
    pub const fn quantity_multiplier(self) -> f64 {
        match self {
            Self::Festival => 1.2,
            Self::MysticFog | Self::CosmicAlignment | Self::MarketRush => 1.0,
        }
    }

    /// Perfect-timing window in milliseconds while active.
    pub const fn perfect_window_ms(self) -> u64 {
        match self {
            Self::Festival => 4_000,
            Self::CosmicAlignment => 3_500,
            Self::MysticFog => 1_500,
            Self::MarketRush => 2_500,
        }
    }

    /// Multiplier on curing duration while active.
    pub const fn curing_multiplier(self) -> f64 {
        match self {
            Self::MysticFog => 1.2,
            Self::Festival => 0.9,
            Self::CosmicAlignment | Self::MarketRush => 1.0,
        }
    }
}

/// What a quest counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum QuestKind {
    /// Completed harvests.
    Harvest,
    /// Buds sold through any channel.
    Sell,
    /// Water actions.
    Water,
}
