//! A scripted player for headless runs.
//!
//! Each turn it looks at the state and queues the obvious moves: claim
//! finished quests, start affordable research, harvest ready plants,
//! water plants off cooldown, sell surplus stock and fill empty slots.
//! Every move goes through [`growop_core::dispatch`] like real input.

use growop_catalog::Catalog;
use growop_core::modifiers::{grow_modifiers, research_bonuses};
use growop_core::{Command, Context, GameState, dispatch};
use growop_grow::care::{WATER_STACK_CAP, water_cooldown_remaining};
use growop_grow::{is_harvest_ready, time_multiplier};
use growop_types::{DealerId, SoilType, StrainId};
use rand::Rng;
use tracing::{debug, warn};

/// Buds kept back from sale.
pub const STOCK_RESERVE: u64 = 100;

/// Largest lot sold in one trade.
pub const LOT_SIZE: u64 = 50;

/// Turn behaviour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Autopilot {
    /// Strain planted into empty slots.
    pub strain: StrainId,
    /// Soil used when planting.
    pub soil: SoilType,
    /// Dealer that buys surplus.
    pub dealer: DealerId,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            strain: StrainId::new("green-gelato"),
            soil: SoilType::Basic,
            dealer: DealerId::new("mike"),
        }
    }
}

/// Tally of one turn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Turn {
    /// Commands applied.
    pub applied: u32,
    /// Commands rejected.
    pub rejected: u32,
}

impl Autopilot {
    /// Commands worth trying against `state` right now.
    pub fn plan(&self, state: &GameState, catalog: &Catalog, now_ms: u64) -> Vec<Command> {
        let mut commands = Vec::new();

        commands.extend(
            state
                .quests
                .iter()
                .filter(|q| q.is_complete() && !q.claimed)
                .map(|q| Command::ClaimQuest { quest: q.id.clone() }),
        );

        if state.research.active.is_none() {
            let next = catalog.research.iter().find(|node| {
                !state.research.completed.contains(&node.id)
                    && node.cost <= state.research.points
                    && node.prerequisites.iter().all(|p| state.research.completed.contains(p))
            });
            if let Some(node) = next {
                commands.push(Command::StartResearch { node: node.id.clone() });
            }
        }

        let grow = grow_modifiers(state, catalog, &research_bonuses(state, catalog));
        let strains = state.strains(catalog);
        for (slot, entry) in state.slots.iter().enumerate() {
            if entry.automation.enabled {
                continue;
            }
            let Some(plant) = entry.plant.as_ref() else {
                commands.push(Command::PlantSeed {
                    slot,
                    strain: self.strain.clone(),
                    soil: self.soil,
                });
                continue;
            };
            let ready = strains.get(&plant.strain).is_some_and(|strain| {
                let phenotype = plant
                    .modifiers
                    .phenotype
                    .as_ref()
                    .and_then(|p| catalog.phenotype(p));
                is_harvest_ready(plant, &catalog.phases, time_multiplier(strain, phenotype, &grow))
            });
            if ready {
                commands.push(Command::Harvest { slot });
            } else if water_cooldown_remaining(plant, now_ms) == 0
                && plant.modifiers.water_stacks < WATER_STACK_CAP
            {
                commands.push(Command::Water { slot, skill: 0.0 });
            }
        }

        let surplus = state.inventory.buds.saturating_sub(STOCK_RESERVE);
        if surplus >= LOT_SIZE {
            commands.push(Command::TradeWithDealer {
                dealer: self.dealer.clone(),
                quantity: LOT_SIZE,
            });
        }
        commands
    }

    /// Plan and apply one turn.
    pub fn play(&self, state: &mut GameState, ctx: &mut Context<'_, impl Rng>) -> Turn {
        let mut turn = Turn::default();
        for command in self.plan(state, ctx.catalog, ctx.now_ms) {
            let (next, result) = dispatch(state, ctx, &command);
            *state = next;
            match result {
                Ok(outcome) => {
                    debug!(command = command.name(), ?outcome, "player move");
                    turn.applied = turn.applied.saturating_add(1);
                }
                Err(err) => {
                    warn!(command = command.name(), error = %err, "player move rejected");
                    turn.rejected = turn.rejected.saturating_add(1);
                }
            }
        }
        turn
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::indexing_slicing)]

    use growop_types::ScriptedRng;

    use super::*;

    #[test]
    fn fresh_game_plants_every_slot_and_sells_surplus() {
        let catalog = Catalog::standard();
        let state = GameState::initial(&catalog);
        let plan = Autopilot::default().plan(&state, &catalog, 0);
        let planting = plan
            .iter()
            .filter(|c| matches!(c, Command::PlantSeed { .. }))
            .count();
        assert_eq!(planting, 2);
        assert!(plan.contains(&Command::TradeWithDealer {
            dealer: DealerId::new("mike"),
            quantity: LOT_SIZE,
        }));
    }

    #[test]
    fn a_turn_applies_through_dispatch() {
        let catalog = Catalog::standard();
        let mut state = GameState::initial(&catalog);
        let mut rng = ScriptedRng::constant(0.5);
        let mut ctx = Context::new(&catalog, 0, &mut rng);

        let turn = Autopilot::default().play(&mut state, &mut ctx);
        assert_eq!(turn.rejected, 0);
        assert_eq!(turn.applied, 3);
        assert!(state.slots.iter().all(|s| s.plant.is_some()));
        assert_eq!(state.inventory.buds, 450);

        // freshly planted: first water is free to go
        let plan = Autopilot::default().plan(&state, &catalog, 0);
        assert_eq!(plan, vec![
            Command::Water { slot: 0, skill: 0.0 },
            Command::Water { slot: 1, skill: 0.0 },
            Command::TradeWithDealer {
                dealer: DealerId::new("mike"),
                quantity: LOT_SIZE,
            },
        ]);
    }
}
