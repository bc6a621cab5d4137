//! Standard genetics tables: strains, phenotypes, mutation pool, name pools.

use growop_types::{
    Mutation, MutationEffect, NamePools, NameWord, Phenotype, PhenotypeId, Rarity, Strain,
    StrainId, TerpeneProfile,
};

/// Strains the player owns seeds for at the start of a new game.
pub const STARTER_STRAINS: [&str; 3] = ["green-gelato", "honey-cream", "gelato-auto"];

#[allow(clippy::too_many_arguments)]
fn strain(
    id: &str,
    name: &str,
    rarity: Rarity,
    base_yield: u32,
    time_multiplier: f64,
    water_tolerance: f64,
    nutrient_sensitivity: f64,
    seed_price: u64,
    terpenes: &[(&str, f64)],
) -> Strain {
    Strain {
        id: StrainId::new(id),
        name: name.to_owned(),
        rarity,
        base_yield,
        time_multiplier,
        water_tolerance,
        nutrient_sensitivity,
        seed_price,
        terpenes: profile(terpenes),
        generation: 0,
        parents: None,
        mutation: None,
    }
}

fn profile(entries: &[(&str, f64)]) -> TerpeneProfile {
    entries
        .iter()
        .map(|(name, value)| ((*name).to_owned(), *value))
        .collect()
}

/// The five catalog strains.
pub fn strains() -> Vec<Strain> {
    vec![
        strain(
            "green-gelato",
            "Green Gelato",
            Rarity::Common,
            80,
            1.0,
            0.8,
            0.3,
            50,
            &[("limonene", 35.0), ("caryophyllene", 25.0), ("linalool", 15.0)],
        ),
        strain(
            "blue-zushi",
            "Blue Zushi",
            Rarity::Rare,
            120,
            1.1,
            0.6,
            0.5,
            200,
            &[("myrcene", 30.0), ("limonene", 25.0), ("pinene", 20.0)],
        ),
        strain(
            "honey-cream",
            "Honey Cream",
            Rarity::Common,
            70,
            0.9,
            0.9,
            0.2,
            60,
            &[("myrcene", 40.0), ("linalool", 20.0), ("humulene", 10.0)],
        ),
        strain(
            "black-muffin",
            "Black Muffin F1",
            Rarity::Epic,
            180,
            1.2,
            0.5,
            0.7,
            350,
            &[
                ("caryophyllene", 35.0),
                ("myrcene", 30.0),
                ("terpinolene", 20.0),
            ],
        ),
        strain(
            "gelato-auto",
            "Gelato Auto",
            Rarity::Common,
            90,
            0.85,
            0.7,
            0.4,
            75,
            &[("limonene", 30.0), ("ocimene", 20.0), ("caryophyllene", 15.0)],
        ),
    ]
}

fn phenotype(id: &str, name: &str, rarity: Rarity) -> Phenotype {
    Phenotype {
        id: PhenotypeId::new(id),
        name: name.to_owned(),
        rarity,
        yield_bonus: 0.0,
        quality_bonus: 0.0,
        speed_bonus: 0.0,
        resistance_bonus: 0.0,
    }
}

/// Selectable phenotypes for mother plants.
pub fn phenotypes() -> Vec<Phenotype> {
    vec![
        Phenotype {
            quality_bonus: 0.15,
            ..phenotype("purple-pheno", "Purple Pheno", Rarity::Rare)
        },
        Phenotype {
            yield_bonus: 0.25,
            ..phenotype("beast-mode", "Beast Mode", Rarity::Rare)
        },
        Phenotype {
            speed_bonus: 0.2,
            ..phenotype("speed-demon", "Speed Demon", Rarity::Common)
        },
        Phenotype {
            resistance_bonus: 0.3,
            ..phenotype("iron-genetics", "Iron Genetics", Rarity::Common)
        },
        Phenotype {
            yield_bonus: 0.2,
            quality_bonus: 0.2,
            speed_bonus: 0.15,
            ..phenotype("unicorn", "Unicorn Cut", Rarity::Legendary)
        },
    ]
}

fn mutation(name: &str, rarity: Rarity, effect: MutationEffect) -> Mutation {
    Mutation {
        name: name.to_owned(),
        rarity,
        effect,
    }
}

/// Mutations that breeding can roll, grouped by rarity.
pub fn mutations() -> Vec<Mutation> {
    vec![
        mutation("Vigorous Roots", Rarity::Common, MutationEffect::Yield(1.15)),
        mutation("Quick Finish", Rarity::Common, MutationEffect::Speed(0.9)),
        mutation("Golden Trichomes", Rarity::Rare, MutationEffect::Quality(1.3)),
        mutation("Giant Colas", Rarity::Rare, MutationEffect::Yield(1.5)),
        mutation("Fast Flower", Rarity::Rare, MutationEffect::Speed(0.75)),
        mutation("Crystal Coat", Rarity::Epic, MutationEffect::Quality(1.8)),
        mutation("Monster Yield", Rarity::Epic, MutationEffect::Yield(2.0)),
        mutation("Lightning Growth", Rarity::Epic, MutationEffect::Speed(0.6)),
        mutation(
            "Unicorn Genetics",
            Rarity::Legendary,
            MutationEffect::Super {
                yield_bonus: 1.8,
                speed_factor: 0.7,
            },
        ),
        mutation("Titan Strain", Rarity::Legendary, MutationEffect::Yield(2.8)),
    ]
}

fn words(entries: &[(&str, f64)]) -> Vec<NameWord> {
    entries
        .iter()
        .map(|(word, weight)| NameWord {
            word: (*word).to_owned(),
            weight: *weight,
        })
        .collect()
}

/// Word pools for bred strain names.
pub fn name_pools() -> NamePools {
    NamePools {
        prefixes: words(&[
            ("Purple", 3.0),
            ("Frosty", 3.0),
            ("Lemon", 3.0),
            ("Golden", 2.0),
            ("Midnight", 2.0),
            ("Cosmic", 1.5),
            ("Electric", 1.5),
            ("Royal", 1.0),
        ]),
        cores: words(&[
            ("Haze", 3.0),
            ("Kush", 3.0),
            ("Dream", 2.0),
            ("Cookies", 2.0),
            ("Diesel", 2.0),
            ("Glue", 1.5),
            ("Runtz", 1.0),
            ("Zkittlez", 1.0),
        ]),
        suffixes: words(&[
            ("OG", 3.0),
            ("Cake", 2.0),
            ("Punch", 2.0),
            ("Breath", 2.0),
            ("Sherbet", 1.5),
            ("Auto", 1.0),
        ]),
        tags: words(&[
            ("Select", 2.0),
            ("Reserve", 2.0),
            ("Elite", 1.0),
            ("Supreme", 1.0),
            ("No. 1", 0.5),
        ]),
    }
}
