//! Static reference tables for the growop simulation.
//!
//! The catalog is immutable configuration: the core reads it, never
//! writes it. [`Catalog::standard`] builds the built-in tables; a catalog
//! can also be loaded from YAML so balancing can be tuned without a
//! rebuild. Either way the result goes through [`Catalog::validate`].
//!
//! # Modules
//!
//! - [`genetics`] -- Strains, phenotypes, mutation pool, name pools
//! - [`growing`] -- Phases, training, enhancers, pests, treatments, upgrades, staff, quests
//! - [`trade`] -- Dealers, market seeds, market conditions, competitors
//! - [`research`] -- The research tree
//! - [`error`] -- Catalog loading errors

pub mod error;
pub mod genetics;
pub mod growing;
pub mod research;
pub mod trade;

use std::collections::BTreeSet;
use std::path::Path;

use growop_types::{
    Competitor, Dealer, DealerId, Employee, EmployeeId, Enhancer, EnhancerId, EnvUpgrade,
    EnvUpgradeId, MarketCondition, MarketSeed, Mutation, NamePools, Pest, PestId, PhaseSpec,
    Phenotype, PhenotypeId, QuestTemplate, ResearchNode, ResearchNodeId, StrainId, Strain,
    TechniqueId, TrainingTechnique, Treatment, TreatmentId, Upgrade, UpgradeId,
};
use serde::{Deserialize, Serialize};

pub use error::CatalogError;

/// Number of growth phases every plant passes through.
pub const PHASE_COUNT: usize = 6;

/// Every static table the simulation reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Growth phases in order.
    pub phases: Vec<PhaseSpec>,
    /// Catalog strains (bred strains live in game state).
    pub strains: Vec<Strain>,
    /// Strains available at the start of a new game.
    #[serde(default)]
    pub starter_strains: Vec<StrainId>,
    /// Mother-plant phenotypes.
    #[serde(default)]
    pub phenotypes: Vec<Phenotype>,
    /// Mutation pool for breeding.
    #[serde(default)]
    pub mutations: Vec<Mutation>,
    /// Name pools for bred strains.
    #[serde(default)]
    pub names: NamePools,
    /// Dealer network.
    #[serde(default)]
    pub dealers: Vec<Dealer>,
    /// Starting market data.
    #[serde(default)]
    pub market: Vec<MarketSeed>,
    /// Market conditions.
    #[serde(default)]
    pub conditions: Vec<MarketCondition>,
    /// AI competitors.
    #[serde(default)]
    pub competitors: Vec<Competitor>,
    /// Pest types.
    #[serde(default)]
    pub pests: Vec<Pest>,
    /// Pest treatments.
    #[serde(default)]
    pub treatments: Vec<Treatment>,
    /// Training techniques.
    #[serde(default)]
    pub techniques: Vec<TrainingTechnique>,
    /// Yield enhancers.
    #[serde(default)]
    pub enhancers: Vec<Enhancer>,
    /// Grow upgrades.
    #[serde(default)]
    pub upgrades: Vec<Upgrade>,
    /// Environment upgrades.
    #[serde(default)]
    pub env_upgrades: Vec<EnvUpgrade>,
    /// Hireable staff.
    #[serde(default)]
    pub employees: Vec<Employee>,
    /// Research tree.
    #[serde(default)]
    pub research: Vec<ResearchNode>,
    /// Starting quests.
    #[serde(default)]
    pub quests: Vec<QuestTemplate>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl Catalog {
    /// The built-in tables.
    pub fn standard() -> Self {
        Self {
            phases: growing::phases(),
            strains: genetics::strains(),
            starter_strains: genetics::STARTER_STRAINS
                .iter()
                .map(|s| StrainId::new(*s))
                .collect(),
            phenotypes: genetics::phenotypes(),
            mutations: genetics::mutations(),
            names: genetics::name_pools(),
            dealers: trade::dealers(),
            market: trade::market_seeds(),
            conditions: trade::conditions(),
            competitors: trade::competitors(),
            pests: growing::pests(),
            treatments: growing::treatments(),
            techniques: growing::techniques(),
            enhancers: growing::enhancers(),
            upgrades: growing::upgrades(),
            env_upgrades: growing::env_upgrades(),
            employees: growing::employees(),
            research: research::research_tree(),
            quests: growing::quests(),
        }
    }

    /// Load and validate a catalog from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Io`] if the file cannot be read,
    /// [`CatalogError::Yaml`] if it does not parse, or a validation error.
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate a catalog from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Yaml`] if the string does not parse, or a
    /// validation error.
    pub fn parse(yaml: &str) -> Result<Self, CatalogError> {
        let catalog: Self = serde_yml::from_str(yaml)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Check the structural rules the simulation relies on.
    ///
    /// # Errors
    ///
    /// Returns the first rule violated.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.phases.len() != PHASE_COUNT {
            return Err(CatalogError::PhaseCount {
                found: self.phases.len(),
            });
        }

        unique("strains", self.strains.iter().map(|s| s.id.as_str()))?;
        unique("dealers", self.dealers.iter().map(|d| d.id.as_str()))?;
        unique("research", self.research.iter().map(|n| n.id.as_str()))?;
        unique("upgrades", self.upgrades.iter().map(|u| u.id.as_str()))?;

        for starter in &self.starter_strains {
            if self.strain(starter).is_none() {
                return Err(CatalogError::UnknownStarter {
                    strain: starter.to_string(),
                });
            }
        }

        for node in &self.research {
            for prerequisite in &node.prerequisites {
                if self.research_node(prerequisite).is_none() {
                    return Err(CatalogError::UnknownPrerequisite {
                        node: node.id.to_string(),
                        missing: prerequisite.to_string(),
                    });
                }
            }
        }

        for dealer in &self.dealers {
            let reason = if dealer.min_quantity > dealer.max_quantity {
                Some("minimum quantity exceeds maximum")
            } else if dealer.available_from > 23 || dealer.available_until > 23 {
                Some("availability hours must be 0-23")
            } else {
                None
            };
            if let Some(reason) = reason {
                return Err(CatalogError::InvalidDealer {
                    dealer: dealer.id.to_string(),
                    reason: reason.to_owned(),
                });
            }
        }

        Ok(())
    }

    // -----------------------------------------------------------------------
    // Lookups
    // -----------------------------------------------------------------------

    /// Growth phase by index.
    pub fn phase(&self, index: u8) -> Option<&PhaseSpec> {
        self.phases.get(usize::from(index))
    }

    /// Index of the terminal (harvest) phase.
    pub fn terminal_phase(&self) -> u8 {
        u8::try_from(self.phases.len().saturating_sub(1)).unwrap_or(u8::MAX)
    }

    /// Catalog strain by id.
    pub fn strain(&self, id: &StrainId) -> Option<&Strain> {
        self.strains.iter().find(|s| &s.id == id)
    }

    /// Starting market data for a strain.
    pub fn market_seed(&self, id: &StrainId) -> Option<&MarketSeed> {
        self.market.iter().find(|m| &m.strain == id)
    }

    /// Phenotype by id.
    pub fn phenotype(&self, id: &PhenotypeId) -> Option<&Phenotype> {
        self.phenotypes.iter().find(|p| &p.id == id)
    }

    /// Dealer by id.
    pub fn dealer(&self, id: &DealerId) -> Option<&Dealer> {
        self.dealers.iter().find(|d| &d.id == id)
    }

    /// Pest by id.
    pub fn pest(&self, id: &PestId) -> Option<&Pest> {
        self.pests.iter().find(|p| &p.id == id)
    }

    /// Treatment by id.
    pub fn treatment(&self, id: &TreatmentId) -> Option<&Treatment> {
        self.treatments.iter().find(|t| &t.id == id)
    }

    /// Training technique by id.
    pub fn technique(&self, id: &TechniqueId) -> Option<&TrainingTechnique> {
        self.techniques.iter().find(|t| &t.id == id)
    }

    /// Enhancer by id.
    pub fn enhancer(&self, id: &EnhancerId) -> Option<&Enhancer> {
        self.enhancers.iter().find(|e| &e.id == id)
    }

    /// Upgrade by id.
    pub fn upgrade(&self, id: &UpgradeId) -> Option<&Upgrade> {
        self.upgrades.iter().find(|u| &u.id == id)
    }

    /// Environment upgrade by id.
    pub fn env_upgrade(&self, id: &EnvUpgradeId) -> Option<&EnvUpgrade> {
        self.env_upgrades.iter().find(|u| &u.id == id)
    }

    /// Employee by id.
    pub fn employee(&self, id: &EmployeeId) -> Option<&Employee> {
        self.employees.iter().find(|e| &e.id == id)
    }

    /// Research node by id.
    pub fn research_node(&self, id: &ResearchNodeId) -> Option<&ResearchNode> {
        self.research.iter().find(|n| &n.id == id)
    }
}

fn unique<'a>(table: &'static str, ids: impl Iterator<Item = &'a str>) -> Result<(), CatalogError> {
    let mut seen = BTreeSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(CatalogError::DuplicateId {
                table,
                id: id.to_owned(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn standard_catalog_is_valid() {
        let catalog = Catalog::standard();
        assert!(catalog.validate().is_ok());
        assert_eq!(catalog.terminal_phase(), 5);
        assert_eq!(catalog.strains.len(), 5);
        assert_eq!(catalog.dealers.len(), 9);
        assert_eq!(catalog.research.len(), 20);
    }

    #[test]
    fn every_strain_has_market_data() {
        let catalog = Catalog::standard();
        for strain in &catalog.strains {
            assert!(catalog.market_seed(&strain.id).is_some(), "{}", strain.id);
        }
    }

    #[test]
    fn dangling_prerequisite_is_rejected() {
        let mut catalog = Catalog::standard();
        if let Some(node) = catalog.research.first_mut() {
            node.prerequisites.push(ResearchNodeId::new("time-travel"));
        }
        assert!(matches!(
            catalog.validate(),
            Err(CatalogError::UnknownPrerequisite { .. })
        ));
    }

    #[test]
    fn wrong_phase_count_is_rejected() {
        let mut catalog = Catalog::standard();
        catalog.phases.pop();
        assert!(matches!(
            catalog.validate(),
            Err(CatalogError::PhaseCount { found: 5 })
        ));
    }

    #[test]
    fn yaml_round_trip_preserves_tables() {
        let catalog = Catalog::standard();
        let yaml = serde_yml::to_string(&catalog).unwrap();
        let parsed = Catalog::parse(&yaml).unwrap();
        assert_eq!(parsed.dealers, catalog.dealers);
        assert_eq!(parsed.research, catalog.research);
    }
}
