//! Shared type definitions for the growop cultivation simulation.
//!
//! This crate is the single source of truth for all types used across the
//! workspace. Types defined here flow downstream to `TypeScript` via
//! `ts-rs` for the presentation layer.
//!
//! # Modules
//!
//! - [`ids`] -- Typed identifiers (UUID-backed runtime ids, slug-backed catalog keys)
//! - [`enums`] -- Closed enumerations (rarity, soil, tiers, dealer kinds, events)
//! - [`catalog`] -- Static reference record shapes (strains, dealers, research, shop)
//! - [`structs`] -- Mutable runtime records (plants, batches, market, research)
//! - [`random`] -- Roll helpers and the scripted random source used in tests

pub mod catalog;
pub mod enums;
pub mod ids;
pub mod random;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use catalog::{
    Competitor, Dealer, Employee, Enhancer, EnvUpgrade, MarketCondition, MarketSeed, Mutation,
    MutationEffect, NamePools, NameWord, Pest, PhaseSpec, Phenotype, QuestTemplate,
    ResearchEffect, ResearchNode, Reward, Strain, TerpeneProfile, TrainingTechnique, Treatment,
    Upgrade, UpgradeEffect,
};
pub use enums::{
    CareTask, CostTarget, DealerType, EnvParam, GlobalEventKind, LightCycle, MarketTrend,
    QualityTier, QuestKind, Rarity, SoilType, Specialization,
};
pub use ids::{
    CompetitorId, ConditionId, ContractId, CuringBatchId, DealerId, EmployeeId, EnhancerId,
    EnvUpgradeId, InfestationId, InventoryBatchId, MotherPlantId, OfferId, PestId, PhenotypeId,
    PlantId, QuestId, ResearchNodeId, StrainId, TechniqueId, TreatmentId, UpgradeId,
};
pub use random::ScriptedRng;
pub use structs::{
    ActiveCondition, ActiveResearch, AutomationState, BreedingState, CuringBatch, DealerRelationship,
    GlobalEnvironment, GlobalEvent, Inventory, InventoryBatch, MarketData, MarketState,
    MicroEnvironment, MotherPlant, PestInfestation, Plant, PlantModifiers, PricePoint, Quest,
    Settings, Slot, Stats, TradeBook, TradeContract, TradeOffer, TrainingApplication,
};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation for the presentation layer.

    #[test]
    fn export_bindings() {
        // The files are written to the `bindings/` directory relative to
        // the crate root.
        use ts_rs::TS;

        // IDs
        let _ = crate::ids::PlantId::export_all();
        let _ = crate::ids::CuringBatchId::export_all();
        let _ = crate::ids::InventoryBatchId::export_all();
        let _ = crate::ids::StrainId::export_all();
        let _ = crate::ids::DealerId::export_all();
        let _ = crate::ids::ResearchNodeId::export_all();

        // Enums
        let _ = crate::enums::Rarity::export_all();
        let _ = crate::enums::SoilType::export_all();
        let _ = crate::enums::QualityTier::export_all();
        let _ = crate::enums::DealerType::export_all();
        let _ = crate::enums::Specialization::export_all();
        let _ = crate::enums::GlobalEventKind::export_all();

        // Catalog
        let _ = crate::catalog::Strain::export_all();
        let _ = crate::catalog::Dealer::export_all();
        let _ = crate::catalog::ResearchNode::export_all();
        let _ = crate::catalog::Upgrade::export_all();

        // Runtime
        let _ = crate::structs::Plant::export_all();
        let _ = crate::structs::Slot::export_all();
        let _ = crate::structs::CuringBatch::export_all();
        let _ = crate::structs::InventoryBatch::export_all();
        let _ = crate::structs::MarketData::export_all();
        let _ = crate::structs::MarketState::export_all();
        let _ = crate::structs::TradeBook::export_all();
        let _ = crate::structs::BreedingState::export_all();
        let _ = crate::structs::Inventory::export_all();
        let _ = crate::structs::TradeContract::export_all();
        let _ = crate::structs::TradeOffer::export_all();
        let _ = crate::structs::ActiveResearch::export_all();
        let _ = crate::structs::Quest::export_all();
        let _ = crate::structs::Stats::export_all();
    }
}
