//! The curing pipeline: harvested batches wait, then become sellable stock.
//!
//! A batch finishes once `now ≥ started_at + duration_ms`. Finishing on
//! time improves its score; leaving it more than 30 s past due degrades it
//! instead. Rushing finishes it immediately at a fixed penalty. Every batch
//! becomes exactly one [`InventoryBatch`] with the same quantity.

use growop_types::{
    CuringBatch, CuringBatchId, GlobalEventKind, InventoryBatch, InventoryBatchId, QualityTier,
};
use rand::RngCore;
use tracing::{debug, info};

use crate::error::GrowError;

/// Curing time with no climate control and no event.
pub const BASE_CURING_MS: u64 = 60_000;

/// Shortest possible curing time.
pub const MIN_CURING_MS: u64 = 20_000;

/// Curing time removed per climate-control level, in percent.
const CLIMATE_REDUCTION_PERCENT: u64 = 8;

/// How long past due a batch may sit before it degrades.
pub const OVERDUE_GRACE_MS: u64 = 30_000;

/// Score gained by a batch collected on time.
pub const CURING_BONUS: f64 = 0.06;

/// Highest score curing can raise a batch to.
pub const CURING_BONUS_CAP: f64 = 1.6;

/// Score lost by a batch collected late.
pub const OVERDUE_PENALTY: f64 = 0.05;

/// Lowest score an overdue batch degrades to.
pub const OVERDUE_FLOOR: f64 = 0.6;

/// Score lost by rushing.
pub const RUSH_PENALTY: f64 = 0.1;

/// Lowest score a rushed batch can fall to.
pub const RUSH_FLOOR: f64 = 0.5;

/// Curing duration for a batch started now.
///
/// Works in whole percent so the floor is exact.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn curing_duration_ms(climate_level: u32, event: Option<GlobalEventKind>) -> u64 {
    let kept = 100_u64.saturating_sub(u64::from(climate_level).saturating_mul(CLIMATE_REDUCTION_PERCENT));
    let event_percent = event.map_or(100.0, |e| (e.curing_multiplier() * 100.0).round()).max(0.0) as u64;
    let scaled = BASE_CURING_MS
        .saturating_mul(kept)
        .saturating_mul(event_percent)
        / 10_000;
    scaled.max(MIN_CURING_MS)
}

/// Score a batch finishes with when collected at `now_ms`.
pub fn cured_score(batch: &CuringBatch, now_ms: u64) -> f64 {
    let overdue = now_ms.saturating_sub(batch.due_at());
    if overdue > OVERDUE_GRACE_MS {
        (batch.quality_score - OVERDUE_PENALTY).max(OVERDUE_FLOOR)
    } else {
        (batch.quality_score + CURING_BONUS).min(CURING_BONUS_CAP)
    }
}

/// Score of a batch finished early by rushing.
pub fn rushed_score(batch: &CuringBatch) -> f64 {
    (batch.quality_score - RUSH_PENALTY).max(RUSH_FLOOR)
}

/// Turn a finished batch into sellable stock at `score`.
pub fn into_inventory(
    batch: &CuringBatch,
    score: f64,
    now_ms: u64,
    rng: &mut impl RngCore,
) -> InventoryBatch {
    let tier = QualityTier::from_score(score);
    InventoryBatch {
        id: InventoryBatchId::generate(rng),
        strain: Some(batch.strain.clone()),
        quantity: batch.quantity,
        tier,
        price_multiplier: tier.price_multiplier(),
        created_at: now_ms,
    }
}

/// Finish every due batch. Batches not yet due stay in `batches`.
pub fn complete_due(
    batches: &mut Vec<CuringBatch>,
    now_ms: u64,
    rng: &mut impl RngCore,
) -> Vec<InventoryBatch> {
    let (due, pending): (Vec<_>, Vec<_>) = batches
        .drain(..)
        .partition(|batch| now_ms >= batch.due_at());
    *batches = pending;

    due.iter()
        .map(|batch| {
            let score = cured_score(batch, now_ms);
            let stock = into_inventory(batch, score, now_ms, rng);
            debug!(batch = %batch.id, quantity = batch.quantity, score, tier = ?stock.tier, "curing complete");
            stock
        })
        .collect()
}

/// Finish one batch immediately at the rush penalty.
pub fn rush(
    batches: &mut Vec<CuringBatch>,
    id: CuringBatchId,
    now_ms: u64,
    rng: &mut impl RngCore,
) -> Result<InventoryBatch, GrowError> {
    let index = batches
        .iter()
        .position(|batch| batch.id == id)
        .ok_or(GrowError::BatchNotFound(id))?;
    let batch = batches.remove(index);
    let score = rushed_score(&batch);
    let stock = into_inventory(&batch, score, now_ms, rng);
    info!(batch = %batch.id, quantity = batch.quantity, score, "curing rushed");
    Ok(stock)
}
