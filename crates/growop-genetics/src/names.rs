//! Procedural strain names.
//!
//! Names are built from the catalog's weighted pools in a fixed order:
//! prefix, core, then a suffix from generation 3 and a tag from
//! generation 5. A word is never used twice in one name.

use growop_types::random::pick_weighted;
use growop_types::{NamePools, NameWord};
use rand::Rng;

/// Fewest words in a bred strain's name.
pub const MIN_WORDS: u32 = 2;

/// Most words in a bred strain's name.
pub const MAX_WORDS: u32 = 4;

/// Words in the name of a strain of `generation`.
pub fn word_count(generation: u32) -> u32 {
    let extra = generation.saturating_sub(1) / 2;
    MIN_WORDS.saturating_add(extra).min(MAX_WORDS)
}

fn pick<'a>(pool: &'a [NameWord], used: &[&str], rng: &mut impl Rng) -> Option<&'a str> {
    let weights: Vec<f64> = pool
        .iter()
        .map(|w| {
            if used.contains(&w.word.as_str()) {
                0.0
            } else {
                w.weight
            }
        })
        .collect();
    pick_weighted(rng, &weights)
        .and_then(|i| pool.get(i))
        .map(|w| w.word.as_str())
}

/// Generate a name for a strain of `generation`.
///
/// Draws one roll per component. Empty pools are skipped.
pub fn generate(pools: &NamePools, generation: u32, rng: &mut impl Rng) -> String {
    let components = [&pools.prefixes, &pools.cores, &pools.suffixes, &pools.tags];
    let count = usize::try_from(word_count(generation)).unwrap_or(components.len());
    let mut used: Vec<&str> = Vec::with_capacity(count);
    for pool in components.into_iter().take(count) {
        if let Some(word) = pick(pool, &used, rng) {
            used.push(word);
        }
    }
    if used.is_empty() {
        return String::from("Unnamed Hybrid");
    }
    used.join(" ")
}
