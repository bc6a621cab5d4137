//! The owned game state and the context every operation runs in.

use std::collections::{BTreeMap, BTreeSet};

use growop_catalog::Catalog;
use growop_market::TerpeneSource;
use growop_market::pricing;
use growop_types::{
    ActiveResearch, BreedingState, CuringBatch, EmployeeId, EnvUpgradeId, GlobalEnvironment,
    GlobalEvent, GlobalEventKind, Inventory, MarketState, PestInfestation, Quest, ResearchNodeId,
    Settings, Slot, Stats, Strain, StrainId, TerpeneProfile, TradeBook, UpgradeId,
};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Nugs on a fresh save.
pub const STARTING_NUGS: u64 = 1_000;

/// Legacy buds on a fresh save.
pub const STARTING_BUDS: u64 = 500;

/// Grow slots on a fresh save.
pub const STARTING_SLOTS: usize = 2;

/// Research points, finished nodes and the single running project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(default)]
pub struct ResearchState {
    /// Unspent research points.
    pub points: u64,
    /// Finished nodes.
    pub completed: BTreeSet<ResearchNodeId>,
    /// Node in progress.
    pub active: Option<ActiveResearch>,
}

/// Everything one player owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GameState {
    /// Currency on hand.
    pub nugs: u64,
    /// Grow slots, in room order.
    pub slots: Vec<Slot>,
    /// Cured, sellable stock.
    pub inventory: Inventory,
    /// Harvests waiting to cure.
    pub curing: Vec<CuringBatch>,
    /// Reputation, dealers, offers and contracts.
    pub trade: TradeBook,
    /// Per-strain prices and active conditions.
    pub market: MarketState,
    /// Bred strains, discoveries and mother plants.
    pub breeding: BreedingState,
    /// Research progress.
    pub research: ResearchState,
    /// Level of every bought upgrade.
    pub upgrades: BTreeMap<UpgradeId, u32>,
    /// Environment upgrades owned.
    pub env_upgrades: BTreeSet<EnvUpgradeId>,
    /// Employees on the payroll.
    pub employees: BTreeSet<EmployeeId>,
    /// Pest outbreaks.
    pub infestations: Vec<PestInfestation>,
    /// Room-wide climate targets and light schedule.
    pub environment: GlobalEnvironment,
    /// Global event in force.
    pub event: Option<GlobalEvent>,
    /// Quest log.
    pub quests: Vec<Quest>,
    /// Lifetime statistics.
    pub stats: Stats,
    /// Player settings.
    pub settings: Settings,
}

impl GameState {
    /// A fresh save.
    pub fn initial(catalog: &Catalog) -> Self {
        let breeding = BreedingState {
            discovered: catalog.starter_strains.iter().cloned().collect(),
            ..BreedingState::default()
        };
        let quests = catalog
            .quests
            .iter()
            .map(|template| Quest {
                id: template.id.clone(),
                kind: template.kind,
                target: template.target,
                progress: 0,
                reward: template.reward,
                claimed: false,
            })
            .collect();
        Self {
            nugs: STARTING_NUGS,
            slots: vec![Slot::default(); STARTING_SLOTS],
            inventory: Inventory {
                buds: STARTING_BUDS,
                batches: Vec::new(),
            },
            curing: Vec::new(),
            trade: TradeBook::default(),
            market: pricing::seed_market(catalog),
            breeding,
            research: ResearchState::default(),
            upgrades: BTreeMap::new(),
            env_upgrades: BTreeSet::new(),
            employees: BTreeSet::new(),
            infestations: Vec::new(),
            environment: GlobalEnvironment::default(),
            event: None,
            quests,
            stats: Stats::default(),
            settings: Settings::default(),
        }
    }

    /// Current level of an upgrade, 0 if never bought.
    pub fn upgrade_level(&self, id: &UpgradeId) -> u32 {
        self.upgrades.get(id).copied().unwrap_or(0)
    }

    /// Kind of the global event in force.
    pub fn event_kind(&self) -> Option<GlobalEventKind> {
        self.event.map(|e| e.kind)
    }

    /// Catalog and bred strains seen together.
    pub const fn strains<'a>(&'a self, catalog: &'a Catalog) -> Strains<'a> {
        Strains::new(catalog, &self.breeding)
    }
}

/// Lookup over catalog strains and bred strains.
#[derive(Debug, Clone, Copy)]
pub struct Strains<'a> {
    catalog: &'a Catalog,
    breeding: &'a BreedingState,
}

impl<'a> Strains<'a> {
    /// View over `catalog` and the strains bred so far.
    pub const fn new(catalog: &'a Catalog, breeding: &'a BreedingState) -> Self {
        Self { catalog, breeding }
    }

    /// Resolve a strain id.
    pub fn get(&self, id: &StrainId) -> Option<&'a Strain> {
        growop_genetics::find_strain(self.catalog, self.breeding, id)
    }
}

impl TerpeneSource for Strains<'_> {
    fn terpenes(&self, strain: &StrainId) -> Option<&TerpeneProfile> {
        self.get(strain).map(|s| &s.terpenes)
    }
}

/// Clock, reference tables and random source for one operation.
#[derive(Debug)]
pub struct Context<'a, R> {
    /// Current time in milliseconds.
    pub now_ms: u64,
    /// Reference tables.
    pub catalog: &'a Catalog,
    /// Source of every random roll.
    pub rng: &'a mut R,
}

impl<'a, R> Context<'a, R> {
    /// Bundle a clock reading, the catalog and a random source.
    pub const fn new(catalog: &'a Catalog, now_ms: u64, rng: &'a mut R) -> Self {
        Self {
            now_ms,
            catalog,
            rng,
        }
    }
}
