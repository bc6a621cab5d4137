//! Player commands and the dispatcher that applies them.
//!
//! [`dispatch`] works on a copy of the state: a command that fails hands
//! back the untouched original alongside the error, so callers can always
//! replace their state with whatever comes back.

use growop_grow::Watered;
use growop_market::{DealerTrade, Delivery, Haggle, Sale};
use growop_types::{
    AutomationState, ContractId, CuringBatchId, DealerId, EmployeeId, EnhancerId, EnvParam,
    EnvUpgradeId, InfestationId, InventoryBatch, LightCycle, MotherPlantId, OfferId, PhenotypeId,
    PlantId, QuestId, ResearchNodeId, Reward, SoilType, StrainId, TechniqueId, TreatmentId,
    UpgradeId,
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::actions::{self, Harvested};
use crate::error::CoreError;
use crate::state::{Context, GameState};
use crate::{breeding, quests, research, shop, trading};

/// Something the player asks the game to do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Command {
    /// Buy and plant a seed in an empty slot.
    PlantSeed {
        /// Target slot.
        slot: usize,
        /// Strain to plant.
        strain: StrainId,
        /// Soil to plant into.
        soil: SoilType,
    },
    /// Water a plant.
    Water {
        /// Target slot.
        slot: usize,
        /// Timing minigame result.
        #[serde(default)]
        skill: f64,
    },
    /// Fertilize a plant.
    Fertilize {
        /// Target slot.
        slot: usize,
    },
    /// Harvest a ready plant.
    Harvest {
        /// Target slot.
        slot: usize,
    },
    /// Apply a training technique.
    ApplyTraining {
        /// Target slot.
        slot: usize,
        /// Technique to apply.
        technique: TechniqueId,
        /// Minigame success, `0..=1`.
        success: f64,
    },
    /// Apply a yield enhancer.
    ApplyEnhancer {
        /// Target slot.
        slot: usize,
        /// Enhancer to apply.
        enhancer: EnhancerId,
    },
    /// Cross two discovered strains.
    Breed {
        /// First parent.
        first: StrainId,
        /// Second parent.
        second: StrainId,
    },
    /// Buy a mother plant.
    CreateMotherPlant {
        /// Strain of the mother.
        strain: StrainId,
        /// Phenotype to select, if unlocked.
        #[serde(default)]
        phenotype: Option<PhenotypeId>,
    },
    /// Clone a mother into an empty slot.
    TakeClone {
        /// The mother.
        mother: MotherPlantId,
        /// Target slot.
        slot: usize,
    },
    /// Sell buds to a dealer.
    TradeWithDealer {
        /// The buyer.
        dealer: DealerId,
        /// Buds to sell.
        quantity: u64,
    },
    /// Sign a weekly delivery contract.
    CreateContract {
        /// The buyer.
        dealer: DealerId,
        /// Buds per delivery.
        quantity: u64,
        /// Number of weekly deliveries.
        weeks: u32,
    },
    /// Make a due contract delivery.
    DeliverContract {
        /// The contract.
        contract: ContractId,
    },
    /// Sell into an anonymous offer.
    AcceptOffer {
        /// The offer.
        offer: OfferId,
    },
    /// Try to raise an offer's price.
    HaggleOffer {
        /// The offer.
        offer: OfferId,
    },
    /// Replace the anonymous offers.
    RefreshOffers,
    /// Spend points to start a research node.
    StartResearch {
        /// The node.
        node: ResearchNodeId,
    },
    /// Abandon the running research.
    CancelResearch,
    /// Buy the next level of an upgrade.
    BuyUpgrade {
        /// The upgrade.
        upgrade: UpgradeId,
    },
    /// Buy a one-time environment upgrade.
    BuyEnvUpgrade {
        /// The upgrade.
        upgrade: EnvUpgradeId,
    },
    /// Treat an infestation.
    TreatInfestation {
        /// The infestation.
        infestation: InfestationId,
        /// Treatment to use.
        treatment: TreatmentId,
    },
    /// Set a room climate target.
    AdjustEnvironment {
        /// Parameter to change.
        param: EnvParam,
        /// New target value.
        target: f64,
    },
    /// Switch the light schedule.
    ToggleLightCycle,
    /// Finish a curing batch early.
    RushCuring {
        /// The batch.
        batch: CuringBatchId,
    },
    /// Hire an employee.
    HireEmployee {
        /// The employee.
        employee: EmployeeId,
    },
    /// Replace a slot's automation settings.
    ConfigureAutomation {
        /// Target slot.
        slot: usize,
        /// New settings.
        automation: AutomationState,
    },
    /// Collect a finished quest's reward.
    ClaimQuest {
        /// The quest.
        quest: QuestId,
    },
}

impl Command {
    /// Short name for logs.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::PlantSeed { .. } => "plant_seed",
            Self::Water { .. } => "water",
            Self::Fertilize { .. } => "fertilize",
            Self::Harvest { .. } => "harvest",
            Self::ApplyTraining { .. } => "apply_training",
            Self::ApplyEnhancer { .. } => "apply_enhancer",
            Self::Breed { .. } => "breed",
            Self::CreateMotherPlant { .. } => "create_mother_plant",
            Self::TakeClone { .. } => "take_clone",
            Self::TradeWithDealer { .. } => "trade_with_dealer",
            Self::CreateContract { .. } => "create_contract",
            Self::DeliverContract { .. } => "deliver_contract",
            Self::AcceptOffer { .. } => "accept_offer",
            Self::HaggleOffer { .. } => "haggle_offer",
            Self::RefreshOffers => "refresh_offers",
            Self::StartResearch { .. } => "start_research",
            Self::CancelResearch => "cancel_research",
            Self::BuyUpgrade { .. } => "buy_upgrade",
            Self::BuyEnvUpgrade { .. } => "buy_env_upgrade",
            Self::TreatInfestation { .. } => "treat_infestation",
            Self::AdjustEnvironment { .. } => "adjust_environment",
            Self::ToggleLightCycle => "toggle_light_cycle",
            Self::RushCuring { .. } => "rush_curing",
            Self::HireEmployee { .. } => "hire_employee",
            Self::ConfigureAutomation { .. } => "configure_automation",
            Self::ClaimQuest { .. } => "claim_quest",
        }
    }
}

/// What a successful command produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A seed went into the ground.
    Planted(PlantId),
    /// A plant was watered.
    Watered(Watered),
    /// A plant was fertilized; quality change.
    Fertilized(f64),
    /// A plant was harvested into curing.
    Harvested(Harvested),
    /// A technique was applied; quality change.
    Trained(f64),
    /// An enhancer was applied; quality change.
    Enhanced(f64),
    /// A new strain was bred.
    Bred(StrainId),
    /// A mother plant was bought.
    MotherPlant(MotherPlantId),
    /// A clone was planted.
    Cloned(PlantId),
    /// Buds were sold to a dealer.
    Traded(DealerTrade),
    /// A contract was signed.
    ContractSigned(ContractId),
    /// A contract delivery was made.
    Delivered(Delivery),
    /// An offer was filled.
    OfferAccepted(Sale),
    /// A haggle attempt finished.
    Haggled(Haggle),
    /// New offers are up.
    OffersRefreshed,
    /// Research started.
    ResearchStarted(ResearchNodeId),
    /// Research was abandoned.
    ResearchCancelled(ResearchNodeId),
    /// An upgrade reached a new level.
    UpgradeBought {
        /// The upgrade.
        upgrade: UpgradeId,
        /// Its new level.
        level: u32,
    },
    /// An environment upgrade was bought.
    EnvUpgradeBought(EnvUpgradeId),
    /// A treatment was applied; whether the infestation cleared.
    Treated(bool),
    /// Climate target changed.
    EnvironmentAdjusted,
    /// The light schedule now in force.
    LightCycle(LightCycle),
    /// A batch was cured early.
    Rushed(InventoryBatch),
    /// An employee joined.
    Hired(EmployeeId),
    /// Automation settings changed.
    AutomationConfigured,
    /// A quest reward was paid.
    QuestClaimed(Reward),
}

/// Apply `command` to a copy of `state`.
///
/// Returns the updated copy on success and the original on failure.
pub fn dispatch<R: Rng>(
    state: &GameState,
    ctx: &mut Context<'_, R>,
    command: &Command,
) -> (GameState, Result<Outcome, CoreError>) {
    let mut next = state.clone();
    match apply(&mut next, ctx, command) {
        Ok(outcome) => {
            debug!(command = command.name(), "command applied");
            (next, Ok(outcome))
        }
        Err(err) => {
            debug!(command = command.name(), error = %err, "command rejected");
            (state.clone(), Err(err))
        }
    }
}

/// Apply `command` in place.
///
/// Every operation checks its gates before it mutates, so an error leaves
/// `state` as it was. [`dispatch`] is the copy-on-write wrapper.
pub fn apply<R: Rng>(
    state: &mut GameState,
    ctx: &mut Context<'_, R>,
    command: &Command,
) -> Result<Outcome, CoreError> {
    let outcome = match command {
        Command::PlantSeed { slot, strain, soil } => {
            Outcome::Planted(actions::plant_seed(state, ctx, *slot, strain, *soil)?)
        }
        Command::Water { slot, skill } => Outcome::Watered(actions::water(state, ctx, *slot, *skill)?),
        Command::Fertilize { slot } => Outcome::Fertilized(actions::fertilize(state, ctx, *slot)?),
        Command::Harvest { slot } => Outcome::Harvested(actions::harvest(state, ctx, *slot)?),
        Command::ApplyTraining {
            slot,
            technique,
            success,
        } => Outcome::Trained(actions::apply_training(state, ctx, *slot, technique, *success)?),
        Command::ApplyEnhancer { slot, enhancer } => {
            Outcome::Enhanced(actions::apply_enhancer(state, ctx, *slot, enhancer)?)
        }
        Command::Breed { first, second } => Outcome::Bred(breeding::breed(state, ctx, first, second)?.id),
        Command::CreateMotherPlant { strain, phenotype } => Outcome::MotherPlant(
            breeding::create_mother_plant(state, ctx, strain, phenotype.as_ref())?,
        ),
        Command::TakeClone { mother, slot } => {
            Outcome::Cloned(breeding::take_clone(state, ctx, *mother, *slot)?)
        }
        Command::TradeWithDealer { dealer, quantity } => {
            Outcome::Traded(trading::trade_with_dealer(state, ctx, dealer, *quantity)?)
        }
        Command::CreateContract {
            dealer,
            quantity,
            weeks,
        } => Outcome::ContractSigned(trading::create_contract(state, ctx, dealer, *quantity, *weeks)?),
        Command::DeliverContract { contract } => {
            Outcome::Delivered(trading::deliver_contract(state, ctx, *contract)?)
        }
        Command::AcceptOffer { offer } => Outcome::OfferAccepted(trading::accept_offer(state, *offer)?),
        Command::HaggleOffer { offer } => Outcome::Haggled(trading::haggle_offer(state, ctx, *offer)?),
        Command::RefreshOffers => {
            trading::refresh_offers(state, ctx)?;
            Outcome::OffersRefreshed
        }
        Command::StartResearch { node } => {
            research::start(&mut state.research, ctx.catalog, node, ctx.now_ms)?;
            Outcome::ResearchStarted(node.clone())
        }
        Command::CancelResearch => Outcome::ResearchCancelled(research::cancel(&mut state.research)?),
        Command::BuyUpgrade { upgrade } => Outcome::UpgradeBought {
            upgrade: upgrade.clone(),
            level: shop::buy_upgrade(state, ctx, upgrade)?,
        },
        Command::BuyEnvUpgrade { upgrade } => {
            shop::buy_env_upgrade(state, ctx, upgrade)?;
            Outcome::EnvUpgradeBought(upgrade.clone())
        }
        Command::TreatInfestation {
            infestation,
            treatment,
        } => Outcome::Treated(actions::treat(state, ctx, *infestation, treatment)?),
        Command::AdjustEnvironment { param, target } => {
            actions::adjust_environment(state, ctx, *param, *target);
            Outcome::EnvironmentAdjusted
        }
        Command::ToggleLightCycle => Outcome::LightCycle(actions::toggle_light_cycle(state, ctx)),
        Command::RushCuring { batch } => Outcome::Rushed(actions::rush_curing(state, ctx, *batch)?),
        Command::HireEmployee { employee } => {
            shop::hire_employee(state, ctx, employee)?;
            Outcome::Hired(employee.clone())
        }
        Command::ConfigureAutomation { slot, automation } => {
            shop::configure_automation(state, ctx, *slot, automation)?;
            Outcome::AutomationConfigured
        }
        Command::ClaimQuest { quest } => Outcome::QuestClaimed(quests::claim(
            &mut state.quests,
            &mut state.nugs,
            &mut state.inventory,
            quest,
        )?),
    };
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::indexing_slicing)]

    use growop_catalog::Catalog;
    use growop_types::ScriptedRng;

    use super::*;

    fn plant(slot: usize) -> Command {
        Command::PlantSeed {
            slot,
            strain: StrainId::new("green-gelato"),
            soil: SoilType::Basic,
        }
    }

    #[test]
    fn failure_returns_the_original_state() {
        let catalog = Catalog::standard();
        let state = GameState::initial(&catalog);
        let mut rng = ScriptedRng::constant(0.5);
        let mut ctx = Context::new(&catalog, 0, &mut rng);

        let (state, result) = dispatch(&state, &mut ctx, &plant(0));
        assert!(matches!(result, Ok(Outcome::Planted(_))));
        let before = state.clone();

        let (after, result) = dispatch(&state, &mut ctx, &plant(0));
        assert_eq!(result.unwrap_err(), CoreError::SlotOccupied(0));
        assert_eq!(after, before);
    }

    #[test]
    fn commands_round_trip_through_json() {
        let command = Command::ConfigureAutomation {
            slot: 1,
            automation: AutomationState {
                enabled: true,
                employee: Some(EmployeeId::new("gardener-tom")),
                replant: None,
            },
        };
        let json = serde_json::to_string(&command).unwrap();
        assert!(json.starts_with("{\"ConfigureAutomation\""));
        assert_eq!(serde_json::from_str::<Command>(&json).unwrap(), command);

        let water: Command = serde_json::from_str(r#"{"Water":{"slot":0}}"#).unwrap();
        assert_eq!(water, Command::Water { slot: 0, skill: 0.0 });
    }

    #[test]
    fn research_commands_spend_and_forfeit_points() {
        let catalog = Catalog::standard();
        let mut state = GameState::initial(&catalog);
        state.research.points = 120;
        let mut rng = ScriptedRng::constant(0.5);
        let mut ctx = Context::new(&catalog, 0, &mut rng);
        let node = ResearchNodeId::new("basic-led");

        let (state, result) = dispatch(&state, &mut ctx, &Command::StartResearch { node: node.clone() });
        assert_eq!(result.unwrap(), Outcome::ResearchStarted(node.clone()));
        assert_eq!(state.research.points, 20);
        let (state, result) = dispatch(&state, &mut ctx, &Command::CancelResearch);
        assert_eq!(result.unwrap(), Outcome::ResearchCancelled(node));
        assert_eq!(state.research.points, 20);
        let (_, result) = dispatch(&state, &mut ctx, &Command::CancelResearch);
        assert_eq!(result.unwrap_err(), CoreError::NoActiveResearch);
    }

    #[test]
    fn quest_reward_is_paid_through_dispatch() {
        let catalog = Catalog::standard();
        let mut state = GameState::initial(&catalog);
        state.quests[0].progress = 3;
        let mut rng = ScriptedRng::constant(0.5);
        let mut ctx = Context::new(&catalog, 0, &mut rng);
        let claim = Command::ClaimQuest {
            quest: QuestId::new("first-harvests"),
        };
        let (state, result) = dispatch(&state, &mut ctx, &claim);
        assert_eq!(result.unwrap(), Outcome::QuestClaimed(Reward::Nugs(75)));
        assert_eq!(state.nugs, 1_075);
    }
}
