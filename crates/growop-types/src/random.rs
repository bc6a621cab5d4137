//! Random-source helpers shared by every simulation crate.
//!
//! All nondeterminism in the core flows through a caller-supplied
//! [`rand::Rng`]. Simulation code only draws uniform `f64` rolls in
//! `[0, 1)` via [`roll`], which keeps outcomes forceable: the
//! [`ScriptedRng`] replays a fixed list of rolls so tests can pin a
//! mutation, a haggle or a pest outbreak exactly.

use rand::{Rng, RngCore};
use uuid::{Builder, Uuid};

/// Scale between a 53-bit mantissa and the unit interval.
const UNIT_SCALE: f64 = 9_007_199_254_740_992.0; // 2^53

/// Largest 53-bit mantissa.
const MAX_MANTISSA: u64 = 9_007_199_254_740_991; // 2^53 - 1

/// Draw a uniform roll in `[0, 1)`.
pub fn roll(rng: &mut (impl Rng + ?Sized)) -> f64 {
    rng.random::<f64>()
}

/// Draw a roll in `[-spread, spread)`.
pub fn jitter(rng: &mut (impl Rng + ?Sized), spread: f64) -> f64 {
    roll(rng).mul_add(2.0, -1.0) * spread
}

/// Pick an index in `0..len` from a single roll. Returns `None` when empty.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn pick_index(rng: &mut (impl Rng + ?Sized), len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let idx = (roll(rng) * len as f64).floor() as usize;
    Some(idx.min(len.saturating_sub(1)))
}

/// Pick an index by weight from a single roll.
///
/// Non-positive weights are never chosen. Returns `None` when no weight
/// is positive.
pub fn pick_weighted(rng: &mut (impl Rng + ?Sized), weights: &[f64]) -> Option<usize> {
    let total: f64 = weights.iter().filter(|w| **w > 0.0).sum();
    if total <= 0.0 {
        return None;
    }
    let mut target = roll(rng) * total;
    let mut last = None;
    for (idx, weight) in weights.iter().enumerate() {
        if *weight <= 0.0 {
            continue;
        }
        if target < *weight {
            return Some(idx);
        }
        target -= weight;
        last = Some(idx);
    }
    last
}

/// Build a random (v4-layout) UUID from bytes drawn from `rng`.
pub fn random_uuid(rng: &mut (impl RngCore + ?Sized)) -> Uuid {
    let mut bytes = [0_u8; 16];
    rng.fill_bytes(&mut bytes);
    Builder::from_random_bytes(bytes).into_uuid()
}

// ---------------------------------------------------------------------------
// Scripted source
// ---------------------------------------------------------------------------

/// A deterministic [`RngCore`] that replays a fixed cycle of unit rolls.
///
/// Every `f64` drawn through [`roll`] returns the next scripted value (the
/// list wraps around). Byte fills used for identifiers come from an
/// independent counter so that generating ids never consumes scripted rolls.
#[derive(Debug, Clone)]
pub struct ScriptedRng {
    rolls: Vec<f64>,
    cursor: usize,
    counter: u64,
}

impl ScriptedRng {
    /// Create a source that cycles through `rolls`.
    ///
    /// Values are clamped into `[0, 1)`. An empty list behaves as `[0.0]`.
    pub fn new(rolls: Vec<f64>) -> Self {
        let rolls = if rolls.is_empty() {
            vec![0.0]
        } else {
            rolls
                .into_iter()
                .map(|r| r.clamp(0.0, 1.0 - f64::EPSILON))
                .collect()
        };
        Self {
            rolls,
            cursor: 0,
            counter: 0,
        }
    }

    /// A source whose every roll is `value`.
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }

    fn next_roll(&mut self) -> f64 {
        let value = self.rolls.get(self.cursor).copied().unwrap_or(0.0);
        self.cursor = self.cursor.saturating_add(1);
        if self.cursor >= self.rolls.len() {
            self.cursor = 0;
        }
        value
    }
}

impl RngCore for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        let high = self.next_u64() >> 32;
        u32::try_from(high).unwrap_or(u32::MAX)
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn next_u64(&mut self) -> u64 {
        // `Rng::random::<f64>` keeps the top 53 bits of `next_u64`. Rounding
        // up keeps a scripted roll at or above its value, so a roll equal to
        // a threshold never lands below it.
        let mantissa = ((self.next_roll() * UNIT_SCALE).ceil() as u64).min(MAX_MANTISSA);
        mantissa << 11
    }

    #[allow(clippy::cast_possible_truncation, clippy::arithmetic_side_effects)]
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.counter = self.counter.wrapping_add(1);
        let stamp = self.counter.to_le_bytes();
        for (idx, byte) in dest.iter_mut().enumerate() {
            *byte = stamp.get(idx % stamp.len()).copied().unwrap_or(0) ^ (idx as u8);
        }
    }
}
