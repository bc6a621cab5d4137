//! Catalog entry types.
//!
//! These are the static reference records the core reads but never
//! computes: strains, growth phases, dealers, pests, treatments, the
//! research tree, upgrades and the other shop tables. The standard tables
//! live in `growop-catalog`; the shapes live here so that runtime state can
//! embed them (bred strains are stored as full [`Strain`] records).

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{CostTarget, DealerType, EnvParam, QualityTier, QuestKind, Rarity, Specialization};
use crate::ids::{
    CompetitorId, ConditionId, DealerId, EmployeeId, EnhancerId, EnvUpgradeId, PestId,
    PhenotypeId, QuestId, ResearchNodeId, StrainId, TechniqueId, TreatmentId, UpgradeId,
};

/// Aromatic compound id mapped to an intensity in `0..=100`.
pub type TerpeneProfile = BTreeMap<String, f64>;

// ---------------------------------------------------------------------------
// Genetics
// ---------------------------------------------------------------------------

/// A genetic template a seed is grown from.
///
/// Catalog strains have generation 0 and no lineage. Strains produced by
/// breeding carry their parent pair and, when rolled, a [`Mutation`].
/// Strains are immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Strain {
    /// Catalog slug.
    pub id: StrainId,
    /// Display name.
    pub name: String,
    /// Rarity tier.
    pub rarity: Rarity,
    /// Harvest yield before any multiplier.
    pub base_yield: u32,
    /// Multiplier on every phase duration.
    pub time_multiplier: f64,
    /// Forgiveness towards watering mistakes, `0..=1`.
    pub water_tolerance: f64,
    /// Chance driver for fertilizer burn, `0..=1`.
    pub nutrient_sensitivity: f64,
    /// Seed price in nugs.
    pub seed_price: u64,
    /// Baseline terpene composition.
    #[serde(default)]
    pub terpenes: TerpeneProfile,
    /// Breeding generation (0 for catalog strains).
    #[serde(default)]
    pub generation: u32,
    /// Parent strains for bred strains.
    #[serde(default)]
    pub parents: Option<(StrainId, StrainId)>,
    /// Mutation attached at breeding time.
    #[serde(default)]
    pub mutation: Option<Mutation>,
}

impl Strain {
    /// Yield factor contributed by the mutation, 1.0 when none applies.
    pub fn mutation_yield_factor(&self) -> f64 {
        self.mutation.as_ref().map_or(1.0, |m| m.effect.yield_factor())
    }

    /// Phase-duration factor contributed by the mutation.
    pub fn mutation_speed_factor(&self) -> f64 {
        self.mutation.as_ref().map_or(1.0, |m| m.effect.speed_factor())
    }

    /// Quality-delta factor contributed by the mutation.
    pub fn mutation_quality_factor(&self) -> f64 {
        self.mutation
            .as_ref()
            .map_or(1.0, |m| m.effect.quality_factor())
    }
}

/// A rare, strongly multiplicative trait bonus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Mutation {
    /// Display name.
    pub name: String,
    /// Rarity tier; the carrying strain is at least this rare.
    pub rarity: Rarity,
    /// What the mutation does.
    pub effect: MutationEffect,
}

/// The trait a mutation scales.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum MutationEffect {
    /// Multiplies harvest yield.
    Yield(f64),
    /// Multiplies positive quality deltas from care actions.
    Quality(f64),
    /// Multiplies phase durations; below 1.0 grows faster.
    Speed(f64),
    /// Multiplies both yield and growth speed.
    Super {
        /// Yield factor.
        yield_bonus: f64,
        /// Phase-duration factor.
        speed_factor: f64,
    },
}

impl MutationEffect {
    /// Yield factor of this effect.
    pub const fn yield_factor(self) -> f64 {
        match self {
            Self::Yield(bonus) | Self::Super {
                yield_bonus: bonus, ..
            } => bonus,
            Self::Quality(_) | Self::Speed(_) => 1.0,
        }
    }

    /// Phase-duration factor of this effect.
    pub const fn speed_factor(self) -> f64 {
        match self {
            Self::Speed(factor) | Self::Super {
                speed_factor: factor,
                ..
            } => factor,
            Self::Yield(_) | Self::Quality(_) => 1.0,
        }
    }

    /// Quality-delta factor of this effect.
    pub const fn quality_factor(self) -> f64 {
        match self {
            Self::Quality(bonus) => bonus,
            Self::Yield(_) | Self::Speed(_) | Self::Super { .. } => 1.0,
        }
    }
}

/// A selectable phenotype for mother plants and clones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Phenotype {
    /// Catalog slug.
    pub id: PhenotypeId,
    /// Display name.
    pub name: String,
    /// Rarity tier.
    pub rarity: Rarity,
    /// Additive yield bonus (0.25 = +25 %).
    #[serde(default)]
    pub yield_bonus: f64,
    /// Additive starting-quality bonus.
    #[serde(default)]
    pub quality_bonus: f64,
    /// Fractional phase-duration reduction.
    #[serde(default)]
    pub speed_bonus: f64,
    /// Fractional pest-chance reduction.
    #[serde(default)]
    pub resistance_bonus: f64,
}

/// A weighted entry in a name pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct NameWord {
    /// The word.
    pub word: String,
    /// Relative selection weight.
    pub weight: f64,
}

/// Word pools for procedural strain names, in component order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct NamePools {
    /// First component (always used).
    pub prefixes: Vec<NameWord>,
    /// Second component (always used).
    pub cores: Vec<NameWord>,
    /// Third component, unlocked at generation 3.
    pub suffixes: Vec<NameWord>,
    /// Fourth component, unlocked at generation 5.
    pub tags: Vec<NameWord>,
}

// ---------------------------------------------------------------------------
// Growing
// ---------------------------------------------------------------------------

/// One of the six growth phases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PhaseSpec {
    /// Display name.
    pub name: String,
    /// Duration before multipliers, in milliseconds.
    pub base_duration_ms: u64,
    /// Whether watering helps in this phase.
    pub water_recommended: bool,
    /// Whether fertilizing helps in this phase.
    pub fertilizer_recommended: bool,
}

/// A plant training technique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TrainingTechnique {
    /// Catalog slug.
    pub id: TechniqueId,
    /// Display name.
    pub name: String,
    /// Price in nugs.
    pub cost: u64,
    /// Yield factor at full success.
    pub yield_bonus: f64,
    /// Quality change on success (and loss on a stress roll).
    pub quality_impact: f64,
    /// Chance a failed application stresses the plant.
    pub stress_risk: f64,
    /// Phase indices the technique may be applied in.
    pub phases: Vec<u8>,
    /// Minimum spacing between repeat applications.
    pub cooldown_ms: u64,
    /// Whether the technique can be applied only once per plant.
    pub one_time: bool,
}

/// A yield enhancer that trades quality for bulk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Enhancer {
    /// Catalog slug.
    pub id: EnhancerId,
    /// Display name.
    pub name: String,
    /// Price in nugs.
    pub price: u64,
    /// Yield factor applied at harvest.
    pub yield_multiplier: f64,
    /// Fraction of quality lost on application.
    pub quality_penalty: f64,
    /// Flagged as a banned substance.
    #[serde(default)]
    pub banned: bool,
}

/// A pest type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Pest {
    /// Catalog slug.
    pub id: PestId,
    /// Display name.
    pub name: String,
    /// Base infestation chance per pest check.
    pub base_chance: f64,
    /// Quality lost per second at full severity.
    pub damage_per_tick: f64,
}

/// A pest treatment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Treatment {
    /// Catalog slug.
    pub id: TreatmentId,
    /// Display name.
    pub name: String,
    /// Price in nugs.
    pub price: u64,
    /// Chance a single application clears the infestation.
    pub effectiveness: f64,
    /// Pests this treatment works on.
    #[serde(default)]
    pub targets: Vec<PestId>,
    /// Works on every pest regardless of `targets`.
    #[serde(default)]
    pub universal: bool,
}

impl Treatment {
    /// Whether this treatment works on `pest`.
    pub fn targets_pest(&self, pest: &PestId) -> bool {
        self.universal || self.targets.contains(pest)
    }
}

/// A hireable employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Employee {
    /// Catalog slug.
    pub id: EmployeeId,
    /// Display name.
    pub name: String,
    /// Trained task.
    pub specialization: Specialization,
    /// Hiring price in nugs.
    pub price: u64,
    /// Work efficiency; 1.0 equals an average manual player.
    pub efficiency: f64,
}

// ---------------------------------------------------------------------------
// Upgrades & research
// ---------------------------------------------------------------------------

/// What a grow upgrade does per level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum UpgradeEffect {
    /// Adds to the recommended-phase water delta.
    WaterBonus(f64),
    /// Reduces the fertilizer burn chance.
    FertilizerSafety(f64),
    /// Reduces phase durations.
    GrowthSpeed(f64),
    /// Reduces phase durations and curing time.
    ClimateControl(f64),
    /// Unlocks one more grow slot.
    ExtraSlot,
    /// Reduces pest infestation chance.
    PestProtection(f64),
}

/// A levelled grow upgrade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Upgrade {
    /// Catalog slug.
    pub id: UpgradeId,
    /// Display name.
    pub name: String,
    /// Price of the first level.
    pub base_price: u64,
    /// Highest purchasable level.
    pub max_level: u32,
    /// Effect per level.
    pub effect: UpgradeEffect,
}

/// A one-time environment stabilizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EnvUpgrade {
    /// Catalog slug.
    pub id: EnvUpgradeId,
    /// Display name.
    pub name: String,
    /// Price in nugs.
    pub price: u64,
    /// Parameter it stabilizes.
    pub param: EnvParam,
    /// Fraction of drift removed.
    pub stabilization: f64,
}

/// A permanent effect granted by a completed research node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum ResearchEffect {
    /// Compounds multiplicatively into harvest yield.
    YieldMultiplier(f64),
    /// Adds to the fractional phase-duration reduction.
    TimeReduction(f64),
    /// Adds percentage points to positive quality deltas.
    QualityBoost(f64),
    /// Adds percentage points to terpene intensity for pricing.
    TerpeneBoost(f64),
    /// Reduces the price of a consumable.
    CostReduction {
        /// What gets cheaper.
        target: CostTarget,
        /// Fraction removed.
        amount: f64,
    },
    /// Registers an opaque capability name.
    UnlockFeature(String),
}

/// A node of the research tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ResearchNode {
    /// Catalog slug.
    pub id: ResearchNodeId,
    /// Display name.
    pub name: String,
    /// Points spent when research starts.
    pub cost: u64,
    /// Nominal duration in progress ticks.
    pub time_required: u32,
    /// Nodes that must be completed first.
    #[serde(default)]
    pub prerequisites: Vec<ResearchNodeId>,
    /// Effects granted on completion.
    pub effects: Vec<ResearchEffect>,
}

// ---------------------------------------------------------------------------
// Trade
// ---------------------------------------------------------------------------

/// A buyer in the dealer network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Dealer {
    /// Catalog slug.
    pub id: DealerId,
    /// Display name.
    pub name: String,
    /// Buyer kind.
    pub dealer_type: DealerType,
    /// Reputation needed before the dealer will trade.
    pub unlock_reputation: u64,
    /// Lowest quality tier accepted.
    pub min_tier: QualityTier,
    /// Base price multiplier.
    pub price_multiplier: f64,
    /// Smallest accepted order.
    pub min_quantity: u64,
    /// Largest accepted order.
    pub max_quantity: u64,
    /// First available hour (inclusive, 0-23).
    pub available_from: u8,
    /// Last available hour (inclusive, 0-23); may wrap past midnight.
    pub available_until: u8,
    /// Police-attention risk, 0-100.
    pub risk_level: u8,
    /// Terpenes this dealer favours.
    #[serde(default)]
    pub preferred_terpenes: Vec<String>,
}

/// Starting market parameters for a strain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct MarketSeed {
    /// Strain the data belongs to.
    pub strain: StrainId,
    /// Base price per bud.
    #[ts(as = "String")]
    pub base_price: Decimal,
    /// Starting demand, 20-100.
    pub demand: u32,
    /// Price noise amplitude.
    pub volatility: f64,
}

/// A temporary market-wide condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct MarketCondition {
    /// Catalog slug.
    pub id: ConditionId,
    /// Display name.
    pub name: String,
    /// Lifetime in market ticks.
    pub duration: u32,
    /// Price factor while active.
    pub price_multiplier: f64,
    /// Demand shift in points while active.
    pub demand_shift: i32,
    /// Strains affected; empty means every strain.
    #[serde(default)]
    pub affected_strains: Vec<StrainId>,
}

impl MarketCondition {
    /// Whether this condition touches `strain`.
    pub fn affects(&self, strain: &StrainId) -> bool {
        self.affected_strains.is_empty() || self.affected_strains.contains(strain)
    }
}

/// An AI grower competing for the same buyers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Competitor {
    /// Catalog slug.
    pub id: CompetitorId,
    /// Display name.
    pub name: String,
    /// Market reputation, 0-100.
    pub reputation: u32,
    /// Strains the competitor floods.
    pub preferred_strains: Vec<StrainId>,
    /// Supply pressure, 0-1.
    pub aggressiveness: f64,
}

// ---------------------------------------------------------------------------
// Quests
// ---------------------------------------------------------------------------

/// What a quest pays out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Reward {
    /// Currency.
    Nugs(u64),
    /// Sellable product (untiered).
    Buds(u64),
}

/// A starting quest definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct QuestTemplate {
    /// Catalog slug.
    pub id: QuestId,
    /// What is counted.
    pub kind: QuestKind,
    /// Count needed to complete.
    pub target: u64,
    /// Payout on claim.
    pub reward: Reward,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]

    use super::*;

    #[test]
    fn super_mutation_scales_yield_and_speed_only() {
        let effect = MutationEffect::Super {
            yield_bonus: 1.8,
            speed_factor: 0.7,
        };
        assert_eq!(effect.yield_factor(), 1.8);
        assert_eq!(effect.speed_factor(), 0.7);
        assert_eq!(effect.quality_factor(), 1.0);
    }

    #[test]
    fn universal_treatment_targets_everything() {
        let treatment = Treatment {
            id: TreatmentId::new("universal"),
            name: "Universal".to_owned(),
            price: 150,
            effectiveness: 0.65,
            targets: Vec::new(),
            universal: true,
        };
        assert!(treatment.targets_pest(&PestId::new("root-rot")));
    }
}
