//! Research tree progression and the bonuses finished nodes grant.
//!
//! Points are earned from harvests and dealer trades and spent when a node
//! starts. Only one node runs at a time; it finishes once its progress
//! reaches 100. Cancelling forfeits the points spent.

use std::collections::{BTreeMap, BTreeSet};

use growop_catalog::Catalog;
use growop_types::{ActiveResearch, CostTarget, Rarity, ResearchEffect, ResearchNode, ResearchNodeId};
use tracing::info;

use crate::error::CoreError;
use crate::state::ResearchState;

/// Progress needed to finish a node.
pub const COMPLETE_AT: f64 = 100.0;

/// Highest combined cost reduction per target.
pub const MAX_COST_REDUCTION: f64 = 0.9;

/// Capability unlocked by pheno hunting; gates phenotype selection.
pub const PHENO_SELECTION: &str = "pheno_selection";

/// Sum of every finished node's effects.
#[derive(Debug, Clone, PartialEq)]
pub struct ResearchBonuses {
    /// Product of yield multipliers.
    pub yield_multiplier: f64,
    /// Sum of phase-duration reductions.
    pub time_reduction: f64,
    /// Sum of quality boosts, in percent.
    pub quality_boost: f64,
    /// Sum of terpene boosts, in percent.
    pub terpene_boost: f64,
    /// Summed reduction per cost target.
    pub cost_reductions: BTreeMap<CostTarget, f64>,
    /// Unlocked capability names.
    pub features: BTreeSet<String>,
}

impl Default for ResearchBonuses {
    fn default() -> Self {
        Self {
            yield_multiplier: 1.0,
            time_reduction: 0.0,
            quality_boost: 0.0,
            terpene_boost: 0.0,
            cost_reductions: BTreeMap::new(),
            features: BTreeSet::new(),
        }
    }
}

impl ResearchBonuses {
    /// Fractional discount on `target`, capped at [`MAX_COST_REDUCTION`].
    pub fn cost_reduction(&self, target: CostTarget) -> f64 {
        self.cost_reductions
            .get(&target)
            .copied()
            .unwrap_or(0.0)
            .clamp(0.0, MAX_COST_REDUCTION)
    }

    /// Whether a capability has been unlocked.
    pub fn has_feature(&self, feature: &str) -> bool {
        self.features.contains(feature)
    }

    fn absorb(&mut self, effect: &ResearchEffect) {
        match effect {
            ResearchEffect::YieldMultiplier(m) => self.yield_multiplier *= *m,
            ResearchEffect::TimeReduction(r) => self.time_reduction += *r,
            ResearchEffect::QualityBoost(b) => self.quality_boost += *b,
            ResearchEffect::TerpeneBoost(b) => self.terpene_boost += *b,
            ResearchEffect::CostReduction { target, amount } => {
                *self.cost_reductions.entry(*target).or_insert(0.0) += *amount;
            }
            ResearchEffect::UnlockFeature(name) => {
                self.features.insert(name.clone());
            }
        }
    }
}

/// Combine the effects of every completed node.
pub fn bonuses(catalog: &Catalog, completed: &BTreeSet<ResearchNodeId>) -> ResearchBonuses {
    let mut bonuses = ResearchBonuses::default();
    for node in completed.iter().filter_map(|id| catalog.research_node(id)) {
        for effect in &node.effects {
            bonuses.absorb(effect);
        }
    }
    bonuses
}

/// Research points for a harvest of `quality` from a strain of `rarity`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn harvest_points(quality: f64, rarity: Rarity) -> u64 {
    let percent = (quality.max(0.0) * 100.0).floor() as u64;
    (percent / 10)
        .saturating_mul(rarity.research_weight_halves())
        .checked_div(2)
        .unwrap_or(0)
}

/// Progress per second that finishes `node` in its listed time.
pub fn progress_per_second(node: &ResearchNode) -> f64 {
    if node.time_required == 0 {
        return COMPLETE_AT;
    }
    COMPLETE_AT / f64::from(node.time_required)
}

/// Spend points and start researching `node`.
///
/// # Errors
///
/// In gate order: [`CoreError::ResearchActive`],
/// [`CoreError::UnknownResearchNode`], [`CoreError::ResearchCompleted`],
/// [`CoreError::PrerequisitesMissing`], [`CoreError::InsufficientPoints`].
pub fn start(
    research: &mut ResearchState,
    catalog: &Catalog,
    node: &ResearchNodeId,
    now_ms: u64,
) -> Result<(), CoreError> {
    if let Some(active) = &research.active {
        return Err(CoreError::ResearchActive(active.node.clone()));
    }
    let spec = catalog
        .research_node(node)
        .ok_or_else(|| CoreError::UnknownResearchNode(node.clone()))?;
    if research.completed.contains(node) {
        return Err(CoreError::ResearchCompleted(node.clone()));
    }
    if let Some(missing) = spec
        .prerequisites
        .iter()
        .find(|p| !research.completed.contains(*p))
    {
        return Err(CoreError::PrerequisitesMissing {
            node: node.clone(),
            missing: missing.clone(),
        });
    }
    let remaining = research
        .points
        .checked_sub(spec.cost)
        .ok_or(CoreError::InsufficientPoints {
            needed: spec.cost,
            available: research.points,
        })?;

    research.points = remaining;
    research.active = Some(ActiveResearch {
        node: node.clone(),
        progress: 0.0,
        started_at: now_ms,
    });
    info!(node = %node, cost = spec.cost, "research started");
    Ok(())
}

/// Add `amount` progress to the running node. Returns the node if it
/// finished.
pub fn progress(research: &mut ResearchState, amount: f64) -> Option<ResearchNodeId> {
    let active = research.active.as_mut()?;
    if amount.is_finite() && amount > 0.0 {
        active.progress += amount;
    }
    if active.progress < COMPLETE_AT {
        return None;
    }
    let node = research.active.take()?.node;
    info!(node = %node, "research completed");
    research.completed.insert(node.clone());
    Some(node)
}

/// Abandon the running node. The points spent are lost.
///
/// # Errors
///
/// [`CoreError::NoActiveResearch`] when nothing is running.
pub fn cancel(research: &mut ResearchState) -> Result<ResearchNodeId, CoreError> {
    let active = research.active.take().ok_or(CoreError::NoActiveResearch)?;
    info!(node = %active.node, progress = active.progress, "research cancelled");
    Ok(active.node)
}
