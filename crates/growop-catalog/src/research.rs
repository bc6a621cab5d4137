//! The standard research tree.
//!
//! Five branches (lighting, nutrients, climate, genetics, automation). Each
//! has one root, two mid-tier nodes, and a capstone needing both of them.

use growop_types::{CostTarget, ResearchEffect, ResearchNode, ResearchNodeId};

use growop_types::ResearchEffect::{QualityBoost, TerpeneBoost, TimeReduction, YieldMultiplier};

fn node(
    id: &str,
    name: &str,
    cost: u64,
    time_required: u32,
    prerequisites: &[&str],
    effects: Vec<ResearchEffect>,
) -> ResearchNode {
    ResearchNode {
        id: ResearchNodeId::new(id),
        name: name.to_owned(),
        cost,
        time_required,
        prerequisites: prerequisites.iter().map(|p| ResearchNodeId::new(*p)).collect(),
        effects,
    }
}

const fn cheaper(target: CostTarget, amount: f64) -> ResearchEffect {
    ResearchEffect::CostReduction { target, amount }
}

fn unlock(feature: &str) -> ResearchEffect {
    ResearchEffect::UnlockFeature(feature.to_owned())
}

/// Every research node.
#[allow(clippy::too_many_lines)]
pub fn research_tree() -> Vec<ResearchNode> {
    vec![
        // Lighting
        node(
            "basic-led",
            "Basic LED",
            100,
            20,
            &[],
            vec![YieldMultiplier(1.1), cheaper(CostTarget::Electricity, 0.15)],
        ),
        node(
            "advanced-spectrum",
            "Advanced Spectrum",
            250,
            35,
            &["basic-led"],
            vec![YieldMultiplier(1.2), TerpeneBoost(15.0)],
        ),
        node(
            "uv-supplementation",
            "UV Supplementation",
            200,
            30,
            &["basic-led"],
            vec![TerpeneBoost(25.0), QualityBoost(10.0)],
        ),
        node(
            "full-spectrum-control",
            "Full Spectrum Control",
            400,
            50,
            &["advanced-spectrum", "uv-supplementation"],
            vec![YieldMultiplier(1.35), TerpeneBoost(30.0), QualityBoost(15.0)],
        ),
        // Nutrients
        node(
            "organic-nutrients",
            "Organic Nutrients",
            150,
            25,
            &[],
            vec![QualityBoost(12.0), TerpeneBoost(20.0)],
        ),
        node(
            "microbial-inoculants",
            "Microbial Inoculants",
            200,
            30,
            &["organic-nutrients"],
            vec![YieldMultiplier(1.15), QualityBoost(8.0)],
        ),
        node(
            "custom-feeding",
            "Custom Feeding",
            250,
            35,
            &["organic-nutrients"],
            vec![YieldMultiplier(1.2), TimeReduction(0.05)],
        ),
        node(
            "living-soil",
            "Living Soil",
            450,
            55,
            &["microbial-inoculants", "custom-feeding"],
            vec![
                YieldMultiplier(1.3),
                QualityBoost(20.0),
                cheaper(CostTarget::Nutrients, 0.25),
            ],
        ),
        // Climate
        node(
            "climate-control",
            "Climate Control",
            175,
            28,
            &[],
            vec![QualityBoost(10.0), YieldMultiplier(1.1)],
        ),
        node(
            "co2-injection",
            "CO2 Injection",
            300,
            40,
            &["climate-control"],
            vec![YieldMultiplier(1.25), TimeReduction(0.1)],
        ),
        node(
            "vpd-optimization",
            "VPD Optimization",
            280,
            38,
            &["climate-control"],
            vec![YieldMultiplier(1.2), QualityBoost(15.0)],
        ),
        node(
            "sealed-environment",
            "Sealed Environment",
            500,
            60,
            &["co2-injection", "vpd-optimization"],
            vec![YieldMultiplier(1.4), QualityBoost(25.0), TerpeneBoost(20.0)],
        ),
        // Genetics
        node(
            "pheno-hunting",
            "Pheno Hunting",
            200,
            30,
            &[],
            vec![unlock("pheno_selection"), QualityBoost(10.0)],
        ),
        node(
            "tissue-culture",
            "Tissue Culture",
            350,
            45,
            &["pheno-hunting"],
            vec![unlock("tissue_culture"), cheaper(CostTarget::MotherPlants, 0.3)],
        ),
        node(
            "selective-breeding",
            "Selective Breeding",
            300,
            40,
            &["pheno-hunting"],
            vec![unlock("advanced_breeding"), YieldMultiplier(1.15)],
        ),
        node(
            "genetic-modification",
            "Genetic Modification",
            600,
            70,
            &["tissue-culture", "selective-breeding"],
            vec![
                unlock("gene_editing"),
                YieldMultiplier(1.5),
                QualityBoost(30.0),
            ],
        ),
        // Automation
        node(
            "auto-watering",
            "Auto Watering",
            150,
            25,
            &[],
            vec![unlock("auto_water")],
        ),
        node(
            "smart-monitoring",
            "Smart Monitoring",
            250,
            35,
            &["auto-watering"],
            vec![unlock("smart_alerts"), QualityBoost(12.0)],
        ),
        node(
            "drip-irrigation",
            "Drip Irrigation",
            200,
            30,
            &["auto-watering"],
            vec![YieldMultiplier(1.15), cheaper(CostTarget::Water, 0.2)],
        ),
        node(
            "full-automation",
            "Full Automation",
            500,
            60,
            &["smart-monitoring", "drip-irrigation"],
            vec![unlock("full_auto"), TimeReduction(0.15)],
        ),
    ]
}
