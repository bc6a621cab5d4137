//! Mutable runtime records.
//!
//! Everything the simulation changes over time: plants and their slots,
//! batches moving from harvest to sale, pests, dealer progress, market
//! data, research and automation state. Timestamps are milliseconds on the
//! caller's clock.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::catalog::{Reward, Strain, TerpeneProfile};
use crate::enums::{GlobalEventKind, LightCycle, MarketTrend, QualityTier, QuestKind, SoilType};
use crate::ids::{
    ConditionId, ContractId, CuringBatchId, DealerId, EmployeeId, EnhancerId, InfestationId,
    InventoryBatchId, MotherPlantId, OfferId, PestId, PhenotypeId, PlantId, QuestId,
    ResearchNodeId, StrainId, TechniqueId,
};

// ---------------------------------------------------------------------------
// Plants
// ---------------------------------------------------------------------------

/// Per-plant micro-environment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(default)]
pub struct MicroEnvironment {
    /// Root-zone pH.
    pub ph: f64,
    /// Electrical conductivity in mS/cm.
    pub ec: f64,
    /// Relative humidity in percent.
    pub humidity: f64,
    /// Temperature in degrees Celsius.
    pub temperature: f64,
}

impl Default for MicroEnvironment {
    fn default() -> Self {
        Self {
            ph: 6.0,
            ec: 1.2,
            humidity: 60.0,
            temperature: 24.0,
        }
    }
}

/// Room-wide environment settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GlobalEnvironment {
    /// Target pH.
    pub ph: f64,
    /// Target EC.
    pub ec: f64,
    /// Target humidity.
    pub humidity: f64,
    /// Target temperature.
    pub temperature: f64,
    /// CO2 in ppm.
    pub co2: f64,
    /// Current light schedule.
    pub light_cycle: LightCycle,
}

impl Default for GlobalEnvironment {
    fn default() -> Self {
        Self {
            ph: 6.2,
            ec: 1.5,
            humidity: 60.0,
            temperature: 24.0,
            co2: 400.0,
            light_cycle: LightCycle::Vegetative,
        }
    }
}

/// A training technique applied to a plant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TrainingApplication {
    /// Technique applied.
    pub technique: TechniqueId,
    /// How well it went, `0..=1`.
    pub success_level: f64,
    /// When it was applied.
    pub applied_at: u64,
}

/// Care history and derived values of a plant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(default)]
pub struct PlantModifiers {
    /// Successful waterings, capped.
    pub water_stacks: u8,
    /// Whether the one-shot fertilizer was used.
    pub fertilizer_applied: bool,
    /// Phase the fertilizer was applied in.
    pub fertilized_phase: Option<u8>,
    /// Soil the plant sits in.
    pub soil: SoilType,
    /// Last watering time.
    pub last_water_at: Option<u64>,
    /// Last fertilizing time.
    pub last_fertilize_at: Option<u64>,
    /// Quality multiplier, clamped to the configured bounds.
    pub quality: f64,
    /// Training history.
    pub training: Vec<TrainingApplication>,
    /// Enhancers applied.
    pub enhancers: Vec<EnhancerId>,
    /// Active pest infestations on this plant.
    pub infestations: Vec<InfestationId>,
    /// Terpene profile derived from strain and environment.
    pub terpenes: TerpeneProfile,
    /// Phenotype inherited from a mother plant.
    pub phenotype: Option<PhenotypeId>,
}

impl Default for PlantModifiers {
    fn default() -> Self {
        Self {
            water_stacks: 0,
            fertilizer_applied: false,
            fertilized_phase: None,
            soil: SoilType::Basic,
            last_water_at: None,
            last_fertilize_at: None,
            quality: 1.0,
            training: Vec::new(),
            enhancers: Vec::new(),
            infestations: Vec::new(),
            terpenes: TerpeneProfile::new(),
            phenotype: None,
        }
    }
}

/// A plant growing in a slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Plant {
    /// Unique id.
    pub id: PlantId,
    /// Strain grown.
    pub strain: StrainId,
    /// Current phase, `0..=5`.
    #[serde(default)]
    pub phase: u8,
    /// Time spent in the current phase.
    #[serde(default)]
    pub elapsed_ms: u64,
    /// When the seed went in.
    #[serde(default)]
    pub planted_at: u64,
    /// Care history.
    #[serde(default)]
    pub modifiers: PlantModifiers,
    /// Local environment.
    #[serde(default)]
    pub environment: MicroEnvironment,
}

/// Per-slot automation settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct AutomationState {
    /// Master switch.
    pub enabled: bool,
    /// The single employee working this slot.
    #[serde(default)]
    pub employee: Option<EmployeeId>,
    /// Strain to replant after an automated harvest.
    #[serde(default)]
    pub replant: Option<StrainId>,
}

/// A grow slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Slot {
    /// The plant, if any.
    #[serde(default)]
    pub plant: Option<Plant>,
    /// Automation settings.
    #[serde(default)]
    pub automation: AutomationState,
}

// ---------------------------------------------------------------------------
// Harvest, curing & inventory
// ---------------------------------------------------------------------------

/// Harvested product waiting to cure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CuringBatch {
    /// Unique id.
    pub id: CuringBatchId,
    /// Strain harvested.
    pub strain: StrainId,
    /// Buds in the batch.
    pub quantity: u64,
    /// When curing started.
    pub started_at: u64,
    /// Configured curing time.
    pub duration_ms: u64,
    /// Quality carried in from the plant.
    pub quality_score: f64,
}

impl CuringBatch {
    /// When the batch is due.
    pub const fn due_at(&self) -> u64 {
        self.started_at.saturating_add(self.duration_ms)
    }
}

/// Sellable product of a single quality tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct InventoryBatch {
    /// Unique id.
    pub id: InventoryBatchId,
    /// Strain, when known.
    #[serde(default)]
    pub strain: Option<StrainId>,
    /// Buds remaining.
    pub quantity: u64,
    /// Quality tier.
    pub tier: QualityTier,
    /// Price multiplier of the tier.
    pub price_multiplier: f64,
    /// When the batch entered inventory.
    pub created_at: u64,
}

/// Sellable stock.
///
/// `buds` is the total on hand. Buds not covered by any batch (quest
/// rewards, pre-batch saves) are legacy stock.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(default)]
pub struct Inventory {
    /// Total buds on hand.
    pub buds: u64,
    /// Tiered batches, oldest first.
    pub batches: Vec<InventoryBatch>,
}

impl Inventory {
    /// Buds held in tracked batches.
    pub fn tracked(&self) -> u64 {
        self.batches
            .iter()
            .fold(0_u64, |acc, b| acc.saturating_add(b.quantity))
    }

    /// Buds not covered by any batch.
    pub fn legacy(&self) -> u64 {
        self.buds.saturating_sub(self.tracked())
    }
}

// ---------------------------------------------------------------------------
// Pests & propagation
// ---------------------------------------------------------------------------

/// A pest outbreak on one plant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PestInfestation {
    /// Unique id.
    pub id: InfestationId,
    /// Pest type.
    pub pest: PestId,
    /// Affected slot.
    pub slot: usize,
    /// Severity, `0..=100`.
    pub severity: f64,
    /// Whether a treatment has been applied.
    pub treated: bool,
    /// When it was detected.
    pub detected_at: u64,
}

/// A mother plant kept for cloning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct MotherPlant {
    /// Unique id.
    pub id: MotherPlantId,
    /// Strain kept.
    pub strain: StrainId,
    /// Selected phenotype.
    #[serde(default)]
    pub phenotype: Option<PhenotypeId>,
    /// Clones taken so far.
    pub clones_taken: u32,
    /// Clone budget.
    pub max_clones: u32,
    /// When the mother was acquired.
    pub acquired_at: u64,
}

/// Bred strains, what the player has discovered, and their mother plants.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(default)]
pub struct BreedingState {
    /// Every strain produced by breeding, oldest first.
    pub custom_strains: Vec<Strain>,
    /// Strains the player can plant.
    pub discovered: BTreeSet<StrainId>,
    /// Mother plants kept for cloning.
    pub mother_plants: Vec<MotherPlant>,
}

impl BreedingState {
    /// Look up a bred strain.
    pub fn custom(&self, id: &StrainId) -> Option<&Strain> {
        self.custom_strains.iter().find(|s| &s.id == id)
    }
}

// ---------------------------------------------------------------------------
// Trade
// ---------------------------------------------------------------------------

/// Mutable progress with one dealer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct DealerRelationship {
    /// Relationship level, `0..=10`.
    pub level: u8,
    /// Completed deals.
    pub total_deals: u32,
    /// Added to the dealer's price multiplier, `0..=0.3`.
    pub loyalty_bonus: f64,
    /// Last completed deal.
    #[serde(default)]
    pub last_deal_at: Option<u64>,
}

/// A recurring delivery agreement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TradeContract {
    /// Unique id.
    pub id: ContractId,
    /// Buyer.
    pub dealer: DealerId,
    /// Buds per delivery.
    pub quantity: u64,
    /// Locked price per bud.
    #[ts(as = "String")]
    pub price_per_bud: Decimal,
    /// Number of deliveries agreed.
    pub total_deliveries: u32,
    /// Deliveries made so far.
    pub completed_deliveries: u32,
    /// Next due delivery.
    pub next_delivery_at: u64,
    /// When the contract was signed.
    pub created_at: u64,
    /// Cleared after the last delivery.
    pub active: bool,
}

/// An anonymous buy offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TradeOffer {
    /// Unique id.
    pub id: OfferId,
    /// Buds wanted.
    pub quantity: u64,
    /// Offered price per bud.
    #[ts(as = "String")]
    pub price_per_bud: Decimal,
    /// When the offer was generated.
    pub created_at: u64,
}

/// A recorded market price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PricePoint {
    /// When the price was computed.
    pub at: u64,
    /// The price.
    #[ts(as = "String")]
    pub price: Decimal,
}

/// Dynamic market state of one strain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct MarketData {
    /// Strain tracked.
    pub strain: StrainId,
    /// Reference price.
    #[ts(as = "String")]
    pub base_price: Decimal,
    /// Latest computed price.
    #[ts(as = "String")]
    pub current_price: Decimal,
    /// Demand, `20..=100`.
    pub demand: u32,
    /// Supply on the market.
    pub supply: u64,
    /// Trend label.
    pub trend: MarketTrend,
    /// Price noise amplitude.
    pub volatility: f64,
    /// Recent prices, oldest first.
    #[serde(default)]
    pub history: Vec<PricePoint>,
}

/// A market condition currently in force.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ActiveCondition {
    /// Condition in force.
    pub condition: ConditionId,
    /// Market ticks left.
    pub remaining: u32,
}

/// Per-strain market data plus the conditions in force.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(default)]
pub struct MarketState {
    /// Market data keyed by strain.
    pub data: BTreeMap<StrainId, MarketData>,
    /// Active market conditions.
    pub conditions: Vec<ActiveCondition>,
    /// Time of the last market tick.
    pub last_update_at: u64,
}

/// Everything the player has going on with buyers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(default)]
pub struct TradeBook {
    /// Reputation, `0..=1000`.
    pub reputation: u64,
    /// Progress with each dealer traded with.
    pub relationships: BTreeMap<DealerId, DealerRelationship>,
    /// Current anonymous offers.
    pub offers: Vec<TradeOffer>,
    /// Earliest time the offers may be refreshed.
    pub next_refresh_at: u64,
    /// Signed contracts.
    pub contracts: Vec<TradeContract>,
    /// Lifetime nugs earned through dealers and offers.
    pub total_revenue: u64,
}

// ---------------------------------------------------------------------------
// Progression
// ---------------------------------------------------------------------------

/// The single in-progress research slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ActiveResearch {
    /// Node being researched.
    pub node: ResearchNodeId,
    /// Progress, `0..=100`.
    pub progress: f64,
    /// When research started.
    pub started_at: u64,
}

/// A global event in force.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GlobalEvent {
    /// Which event.
    pub kind: GlobalEventKind,
    /// Start time.
    pub started_at: u64,
    /// Expiry time.
    pub ends_at: u64,
}

/// A quest with progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Quest {
    /// Quest slug.
    pub id: QuestId,
    /// What is counted.
    pub kind: QuestKind,
    /// Count needed.
    pub target: u64,
    /// Count so far.
    pub progress: u64,
    /// Payout.
    pub reward: Reward,
    /// Whether the reward was paid.
    pub claimed: bool,
}

impl Quest {
    /// Whether the target has been reached.
    pub const fn is_complete(&self) -> bool {
        self.progress >= self.target
    }
}

/// Lifetime statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(default)]
pub struct Stats {
    /// Completed harvests.
    pub total_harvests: u64,
    /// Buds harvested.
    pub total_buds_harvested: u64,
    /// Buds sold.
    pub total_sold: u64,
    /// Nugs earned from sales.
    pub total_revenue: u64,
    /// Dealer trades and contract deliveries.
    pub total_trades: u64,
    /// Water actions.
    pub total_waters: u64,
    /// Water actions inside the perfect window.
    pub perfect_waters: u64,
    /// Current streak of perfect waters.
    pub water_chain: u32,
    /// Longest streak of perfect waters.
    pub best_water_chain: u32,
}

/// Player-adjustable settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(default)]
pub struct Settings {
    /// Scales pest infestation chance, `0..=1`.
    pub pest_frequency: f64,
    /// Whether global events may trigger.
    pub random_events: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pest_frequency: 0.3,
            random_events: true,
        }
    }
}
