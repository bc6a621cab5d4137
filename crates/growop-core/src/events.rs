//! Global events: random roll and expiry.

use growop_types::random::{pick_index, roll};
use growop_types::{GlobalEvent, GlobalEventKind};
use rand::Rng;
use tracing::info;

use crate::state::{Context, GameState};

/// Chance per roll that an event starts.
pub const EVENT_CHANCE: f64 = 0.2;

/// How long an event lasts.
pub const EVENT_DURATION_MS: u64 = 60_000;

/// Maybe start an event. Nothing happens while one is active or when the
/// player turned events off.
pub fn roll_event(state: &mut GameState, ctx: &mut Context<'_, impl Rng>) -> Option<GlobalEventKind> {
    if !state.settings.random_events || state.event.is_some() {
        return None;
    }
    if roll(ctx.rng) >= EVENT_CHANCE {
        return None;
    }
    let kind = pick_index(ctx.rng, GlobalEventKind::ALL.len())
        .and_then(|i| GlobalEventKind::ALL.get(i).copied())?;
    state.event = Some(GlobalEvent {
        kind,
        started_at: ctx.now_ms,
        ends_at: ctx.now_ms.saturating_add(EVENT_DURATION_MS),
    });
    info!(event = ?kind, duration_ms = EVENT_DURATION_MS, "global event started");
    Some(kind)
}

/// End the active event once its time is up. Returns the expired kind.
pub fn tick_event(state: &mut GameState, now_ms: u64) -> Option<GlobalEventKind> {
    let event = state.event.filter(|e| now_ms >= e.ends_at)?;
    state.event = None;
    info!(event = ?event.kind, "global event ended");
    Some(event.kind)
}
