//! Versioned JSON snapshots.
//!
//! The current layout is [`GameState`] with a `version` field alongside.
//! Older saves load through [`SnapshotDraft`], where every field is
//! optional:
//!
//! - version 0 had no `version` field, stored slots as bare plants (or
//!   `null`) and kept buds in a top-level `buds` count
//! - version 1 stored buds in `inventory` without tiered batches
//!
//! Anything missing is filled from a fresh save, and seed strains absent
//! from the saved market are listed again.

use std::collections::{BTreeMap, BTreeSet};

use growop_catalog::Catalog;
use growop_types::{
    BreedingState, CuringBatch, EmployeeId, EnvUpgradeId, GlobalEnvironment, GlobalEvent,
    Inventory, MarketState, PestInfestation, Plant, Quest, Settings, Slot, Stats, TradeBook,
    UpgradeId,
};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::error::SnapshotError;
use crate::state::{GameState, ResearchState};

/// Layout version written by [`save_snapshot`].
pub const SNAPSHOT_VERSION: u32 = 2;

#[derive(Serialize)]
struct Envelope<'a> {
    version: u32,
    #[serde(flatten)]
    state: &'a GameState,
}

/// A slot as any version stored it.
///
/// Version 0 stored the plant itself (or `null`) where later versions
/// store a slot object. An object carrying a plant's `id` or `strain` is
/// read as a bare plant; anything else as a slot.
#[derive(Debug)]
enum SlotDraft {
    Bare(Option<Plant>),
    Slot(Slot),
}

impl<'de> Deserialize<'de> for SlotDraft {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let bare = match &value {
            Value::Null => return Ok(Self::Bare(None)),
            Value::Object(fields) => fields.contains_key("id") || fields.contains_key("strain"),
            _ => false,
        };
        let draft = if bare {
            serde_json::from_value(value).map(|plant| Self::Bare(Some(plant)))
        } else {
            serde_json::from_value(value).map(Self::Slot)
        };
        draft.map_err(de::Error::custom)
    }
}

impl From<SlotDraft> for Slot {
    fn from(draft: SlotDraft) -> Self {
        match draft {
            SlotDraft::Bare(plant) => Self {
                plant,
                ..Self::default()
            },
            SlotDraft::Slot(slot) => slot,
        }
    }
}

/// A snapshot of any version, every field optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SnapshotDraft {
    version: u32,
    nugs: Option<u64>,
    buds: Option<u64>,
    slots: Option<Vec<SlotDraft>>,
    inventory: Option<Inventory>,
    curing: Option<Vec<CuringBatch>>,
    trade: Option<TradeBook>,
    market: Option<MarketState>,
    breeding: Option<BreedingState>,
    research: Option<ResearchState>,
    upgrades: Option<BTreeMap<UpgradeId, u32>>,
    env_upgrades: Option<BTreeSet<EnvUpgradeId>>,
    employees: Option<BTreeSet<EmployeeId>>,
    infestations: Option<Vec<PestInfestation>>,
    environment: Option<GlobalEnvironment>,
    event: Option<GlobalEvent>,
    quests: Option<Vec<Quest>>,
    stats: Option<Stats>,
    settings: Option<Settings>,
}

impl SnapshotDraft {
    fn into_state(self, catalog: &Catalog) -> GameState {
        let fresh = GameState::initial(catalog);

        let inventory = match (self.inventory, self.buds) {
            (Some(inventory), _) => inventory,
            (None, Some(buds)) => Inventory {
                buds,
                batches: Vec::new(),
            },
            (None, None) => fresh.inventory,
        };

        let mut market = self.market.unwrap_or_else(|| fresh.market.clone());
        for (strain, data) in fresh.market.data {
            market.data.entry(strain).or_insert(data);
        }

        let mut quests = self.quests.unwrap_or_default();
        for quest in fresh.quests {
            if !quests.iter().any(|q| q.id == quest.id) {
                quests.push(quest);
            }
        }

        GameState {
            nugs: self.nugs.unwrap_or(fresh.nugs),
            slots: self
                .slots
                .map_or(fresh.slots, |slots| slots.into_iter().map(Slot::from).collect()),
            inventory,
            curing: self.curing.unwrap_or(fresh.curing),
            trade: self.trade.unwrap_or(fresh.trade),
            market,
            breeding: self.breeding.unwrap_or(fresh.breeding),
            research: self.research.unwrap_or(fresh.research),
            upgrades: self.upgrades.unwrap_or(fresh.upgrades),
            env_upgrades: self.env_upgrades.unwrap_or(fresh.env_upgrades),
            employees: self.employees.unwrap_or(fresh.employees),
            infestations: self.infestations.unwrap_or(fresh.infestations),
            environment: self.environment.unwrap_or(fresh.environment),
            event: self.event,
            quests,
            stats: self.stats.unwrap_or(fresh.stats),
            settings: self.settings.unwrap_or(fresh.settings),
        }
    }
}

/// Serialize `state` as a current-version snapshot.
///
/// # Errors
///
/// [`SnapshotError::Json`] if serialization fails.
pub fn save_snapshot(state: &GameState) -> Result<String, SnapshotError> {
    let json = serde_json::to_string(&Envelope {
        version: SNAPSHOT_VERSION,
        state,
    })?;
    Ok(json)
}

/// Load a snapshot of any version, migrating and default-filling it.
///
/// # Errors
///
/// [`SnapshotError::Json`] if the text is not JSON or a field has the
/// wrong shape.
pub fn load_snapshot(json: &str, catalog: &Catalog) -> Result<GameState, SnapshotError> {
    let draft: SnapshotDraft = serde_json::from_str(json)?;
    if draft.version < SNAPSHOT_VERSION {
        info!(from = draft.version, to = SNAPSHOT_VERSION, "migrating snapshot");
    }
    Ok(draft.into_state(catalog))
}
