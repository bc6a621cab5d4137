//! Standard grow-room tables: phases, care items, pests, upgrades, staff.

use growop_types::{
    Employee, EmployeeId, Enhancer, EnhancerId, EnvParam, EnvUpgrade, EnvUpgradeId, Pest, PestId,
    PhaseSpec, QuestId, QuestKind, QuestTemplate, Reward, Specialization, TechniqueId,
    TrainingTechnique, Treatment, TreatmentId, Upgrade, UpgradeEffect, UpgradeId,
};

fn phase(name: &str, seconds: u64, water: bool, fertilizer: bool) -> PhaseSpec {
    PhaseSpec {
        name: name.to_owned(),
        base_duration_ms: seconds.saturating_mul(1_000),
        water_recommended: water,
        fertilizer_recommended: fertilizer,
    }
}

/// The six growth phases, in order.
pub fn phases() -> Vec<PhaseSpec> {
    vec![
        phase("Germination", 10, false, false),
        phase("Seedling", 20, true, false),
        phase("Vegetative", 30, true, true),
        phase("Pre-Flower", 30, false, true),
        phase("Flowering", 25, true, true),
        phase("Harvest", 5, false, false),
    ]
}

#[allow(clippy::too_many_arguments)]
fn technique(
    id: &str,
    name: &str,
    cost: u64,
    yield_bonus: f64,
    quality_impact: f64,
    stress_risk: f64,
    phases: &[u8],
    cooldown_ms: u64,
    one_time: bool,
) -> TrainingTechnique {
    TrainingTechnique {
        id: TechniqueId::new(id),
        name: name.to_owned(),
        cost,
        yield_bonus,
        quality_impact,
        stress_risk,
        phases: phases.to_vec(),
        cooldown_ms,
        one_time,
    }
}

/// Plant training techniques.
pub fn techniques() -> Vec<TrainingTechnique> {
    vec![
        technique("lst", "Low Stress Training", 20, 1.2, 0.05, 0.1, &[2, 3], 25_000, false),
        technique("topping", "Topping", 30, 1.25, 0.1, 0.2, &[2], 0, true),
        technique("fim", "FIM", 25, 1.2, 0.08, 0.15, &[2], 0, true),
        technique("defoliation", "Defoliation", 15, 1.12, 0.03, 0.25, &[2, 3, 4], 30_000, false),
    ]
}

fn enhancer(
    id: &str,
    name: &str,
    price: u64,
    yield_multiplier: f64,
    quality_penalty: f64,
    banned: bool,
) -> Enhancer {
    Enhancer {
        id: EnhancerId::new(id),
        name: name.to_owned(),
        price,
        yield_multiplier,
        quality_penalty,
        banned,
    }
}

/// Yield enhancers.
pub fn enhancers() -> Vec<Enhancer> {
    vec![
        enhancer("pgr-paclobutrazol", "PGR Paclobutrazol", 80, 1.8, 0.4, true),
        enhancer("terpen-spray", "Terpene Spray", 60, 1.0, 0.15, false),
        enhancer("density-booster", "Density Booster", 100, 1.4, 0.25, false),
        enhancer("rapid-bulk", "Rapid Bulk", 70, 1.3, 0.2, false),
        enhancer("sugar-water", "Sugar Water", 30, 1.15, 0.1, false),
    ]
}

fn pest(id: &str, name: &str, base_chance: f64, damage_per_tick: f64) -> Pest {
    Pest {
        id: PestId::new(id),
        name: name.to_owned(),
        base_chance,
        damage_per_tick,
    }
}

/// Pest types.
pub fn pests() -> Vec<Pest> {
    vec![
        pest("fungus-gnats", "Fungus Gnats", 0.15, 0.01),
        pest("spider-mites", "Spider Mites", 0.08, 0.03),
        pest("aphids", "Aphids", 0.12, 0.02),
        pest("powdery-mildew", "Powdery Mildew", 0.10, 0.025),
        pest("root-rot", "Root Rot", 0.05, 0.04),
    ]
}

fn treatment(id: &str, name: &str, price: u64, effectiveness: f64, targets: &[&str]) -> Treatment {
    Treatment {
        id: TreatmentId::new(id),
        name: name.to_owned(),
        price,
        effectiveness,
        targets: targets.iter().map(|t| PestId::new(*t)).collect(),
        universal: false,
    }
}

/// Pest treatments.
pub fn treatments() -> Vec<Treatment> {
    vec![
        treatment(
            "neem-oil",
            "Neem Oil",
            50,
            0.7,
            &["fungus-gnats", "aphids", "spider-mites"],
        ),
        treatment("predatory-mites", "Predatory Mites", 120, 0.9, &["spider-mites"]),
        treatment("sulfur-spray", "Sulfur Spray", 80, 0.85, &["powdery-mildew"]),
        treatment("hydrogen-peroxide", "Hydrogen Peroxide", 60, 0.75, &["root-rot"]),
        Treatment {
            universal: true,
            ..treatment("universal-treatment", "Universal Treatment", 150, 0.65, &[])
        },
    ]
}

fn upgrade(id: &str, name: &str, base_price: u64, max_level: u32, effect: UpgradeEffect) -> Upgrade {
    Upgrade {
        id: UpgradeId::new(id),
        name: name.to_owned(),
        base_price,
        max_level,
        effect,
    }
}

/// Levelled grow upgrades.
pub fn upgrades() -> Vec<Upgrade> {
    vec![
        upgrade("precision-water", "Precision Water", 150, 4, UpgradeEffect::WaterBonus(0.05)),
        upgrade("premium-nutrients", "Premium Nutrients", 250, 2, UpgradeEffect::FertilizerSafety(0.5)),
        upgrade("led-panel", "LED Panel", 300, 3, UpgradeEffect::GrowthSpeed(0.1)),
        upgrade("tent-slot", "Extra Tent", 400, 4, UpgradeEffect::ExtraSlot),
        upgrade("sticky-traps", "Sticky Traps", 200, 1, UpgradeEffect::PestProtection(0.3)),
        upgrade("auto-drip", "Auto Drip", 220, 3, UpgradeEffect::WaterBonus(0.04)),
        upgrade("climate-control", "Climate Control", 350, 3, UpgradeEffect::ClimateControl(0.08)),
        upgrade("bio-shield", "Bio Shield", 280, 2, UpgradeEffect::PestProtection(0.25)),
        upgrade("smart-nutrients", "Smart Nutrients", 300, 2, UpgradeEffect::FertilizerSafety(0.5)),
        upgrade("oscillating-fan", "Oscillating Fan", 80, 2, UpgradeEffect::GrowthSpeed(0.03)),
        upgrade("watering-can-pro", "Watering Can Pro", 90, 2, UpgradeEffect::WaterBonus(0.02)),
    ]
}

fn env_upgrade(id: &str, name: &str, price: u64, param: EnvParam, stabilization: f64) -> EnvUpgrade {
    EnvUpgrade {
        id: EnvUpgradeId::new(id),
        name: name.to_owned(),
        price,
        param,
        stabilization,
    }
}

/// One-time environment stabilizers.
pub fn env_upgrades() -> Vec<EnvUpgrade> {
    vec![
        env_upgrade("ph-controller", "pH Controller", 400, EnvParam::Ph, 0.8),
        env_upgrade("ec-meter-pro", "EC Meter Pro", 350, EnvParam::Ec, 0.7),
        env_upgrade("dehumidifier", "Dehumidifier", 450, EnvParam::Humidity, 0.85),
        env_upgrade("climate-master", "Climate Master", 500, EnvParam::Temperature, 0.9),
        env_upgrade("co2-generator", "CO2 Generator", 600, EnvParam::Co2, 0.75),
    ]
}

fn employee(
    id: &str,
    name: &str,
    specialization: Specialization,
    price: u64,
    efficiency: f64,
) -> Employee {
    Employee {
        id: EmployeeId::new(id),
        name: name.to_owned(),
        specialization,
        price,
        efficiency,
    }
}

/// Hireable staff.
pub fn employees() -> Vec<Employee> {
    vec![
        employee("gardener-tom", "Gardener Tom", Specialization::Watering, 500, 0.8),
        employee("botanist-lisa", "Botanist Lisa", Specialization::Fertilizing, 750, 0.9),
        employee("harvester-mike", "Harvester Mike", Specialization::Harvesting, 1_000, 1.0),
        employee("master-sarah", "Master Grower Sarah", Specialization::All, 2_000, 1.2),
        employee("expert-carlos", "Expert Carlos", Specialization::All, 3_500, 1.5),
    ]
}

/// Starting quests.
pub fn quests() -> Vec<QuestTemplate> {
    vec![
        QuestTemplate {
            id: QuestId::new("first-harvests"),
            kind: QuestKind::Harvest,
            target: 3,
            reward: Reward::Nugs(75),
        },
        QuestTemplate {
            id: QuestId::new("first-sales"),
            kind: QuestKind::Sell,
            target: 100,
            reward: Reward::Nugs(150),
        },
        QuestTemplate {
            id: QuestId::new("green-thumb"),
            kind: QuestKind::Water,
            target: 10,
            reward: Reward::Buds(20),
        },
    ]
}
