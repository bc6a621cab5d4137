//! Simulated-time scheduler.
//!
//! The core exposes one entry point per periodic concern and owns no
//! timers. The scheduler walks simulated time in fixed steps and fires
//! each entry point when its cadence comes due.

use growop_core::config::{CadenceConfig, RunConfig};
use growop_core::{Context, GameState, ticks};
use rand::Rng;
use tracing::{debug, info};

use crate::error::EngineError;

/// One periodic job: how often it fires and when it is next due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    every_ms: u64,
    next_at: u64,
}

impl Timer {
    /// A timer firing every `every_ms`, rounded up to a whole number of
    /// steps, first due one period after `start_ms`.
    pub fn new(every_ms: u64, step_ms: u64, start_ms: u64) -> Self {
        let step = step_ms.max(1);
        let every_ms = every_ms.div_ceil(step).max(1).saturating_mul(step);
        Self {
            every_ms,
            next_at: start_ms.saturating_add(every_ms),
        }
    }

    /// Period after rounding.
    pub const fn every_ms(&self) -> u64 {
        self.every_ms
    }

    /// Whether the job fires at `now_ms`. Rearms when it does.
    pub const fn due(&mut self, now_ms: u64) -> bool {
        if now_ms < self.next_at {
            return false;
        }
        self.next_at = now_ms.saturating_add(self.every_ms);
        true
    }
}

/// Every tick entry point with its timer.
#[derive(Debug, Clone)]
pub struct Scheduler {
    phases: Timer,
    curing: Timer,
    research: Timer,
    automation: Timer,
    market: Timer,
    drift: Timer,
    event_roll: Timer,
    pest_check: Timer,
}

/// What one scheduler step fired that a caller may want to react to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    /// Plants that became ready this step.
    pub ready: usize,
    /// Curing batches that finished.
    pub cured: usize,
    /// New infestations.
    pub infestations: usize,
    /// Plants harvested by employees.
    pub auto_harvested: u32,
}

impl Scheduler {
    /// Build the timers for a run.
    ///
    /// # Errors
    ///
    /// [`EngineError::ZeroStep`] when the step length is zero.
    pub fn new(run: &RunConfig, cadence: &CadenceConfig) -> Result<Self, EngineError> {
        if run.step_ms == 0 {
            return Err(EngineError::ZeroStep);
        }
        let timer = |every| Timer::new(every, run.step_ms, run.start_ms);
        Ok(Self {
            phases: timer(cadence.phases_ms),
            curing: timer(cadence.curing_ms),
            research: timer(cadence.research_ms),
            automation: timer(cadence.automation_ms),
            market: timer(cadence.market_ms),
            drift: timer(cadence.drift_ms),
            event_roll: timer(cadence.event_roll_ms),
            pest_check: timer(cadence.pest_check_ms),
        })
    }

    /// Fire everything due at `ctx.now_ms`.
    #[allow(clippy::cast_precision_loss)]
    pub fn step(&mut self, state: &mut GameState, ctx: &mut Context<'_, impl Rng>) -> StepReport {
        let now = ctx.now_ms;
        let mut report = StepReport::default();

        if self.phases.due(now) {
            let tick = ticks::advance_plant_phases(state, ctx, self.phases.every_ms());
            report.ready = tick.ready.len();
        }
        if self.curing.due(now) {
            report.cured = ticks::process_curing_tick(state, ctx);
            ticks::tick_event(state, now);
        }
        if self.research.due(now) {
            let seconds = self.research.every_ms() as f64 / 1_000.0;
            let amount = ticks::research_rate(state, ctx) * seconds;
            if let Some(node) = ticks::progress_research(state, amount) {
                info!(node = %node, "research unlocked");
            }
        }
        if self.automation.due(now) {
            report.auto_harvested = ticks::run_automation(state, ctx).harvested;
        }
        if self.market.due(now) {
            let tick = ticks::update_market_data(state, ctx);
            debug!(?tick, "market tick");
        }
        if self.drift.due(now) {
            ticks::drift_environment_values(state, ctx);
        }
        if self.event_roll.due(now) {
            ticks::roll_event(state, ctx);
        }
        if self.pest_check.due(now) {
            report.infestations = ticks::check_for_pests(state, ctx).appeared.len();
        }
        report
    }
}
