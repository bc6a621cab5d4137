//! Terpene inheritance.

use std::collections::BTreeSet;

use growop_types::TerpeneProfile;
use growop_types::random::jitter;
use rand::Rng;

/// Relative jitter on each inherited compound.
pub const TERPENE_JITTER: f64 = 0.15;

/// Compounds weaker than this are dropped from the offspring.
pub const MIN_INTENSITY: f64 = 1.0;

/// Highest intensity of any compound.
pub const MAX_INTENSITY: f64 = 100.0;

/// Merge two parental profiles.
///
/// Every compound either parent carries is averaged (a missing compound
/// counts as zero), jittered by up to 15 %, clamped to `0..=100` and
/// dropped when it ends up below 1. One roll is drawn per compound in
/// name order.
pub fn mix(first: &TerpeneProfile, second: &TerpeneProfile, rng: &mut impl Rng) -> TerpeneProfile {
    let names: BTreeSet<&String> = first.keys().chain(second.keys()).collect();
    names
        .into_iter()
        .filter_map(|name| {
            let a = first.get(name).copied().unwrap_or(0.0);
            let b = second.get(name).copied().unwrap_or(0.0);
            let value = ((a + b) / 2.0 * (1.0 + jitter(rng, TERPENE_JITTER))).clamp(0.0, MAX_INTENSITY);
            (value >= MIN_INTENSITY).then(|| (name.clone(), value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::float_cmp)]

    use growop_types::ScriptedRng;

    use super::*;

    fn profile(entries: &[(&str, f64)]) -> TerpeneProfile {
        entries.iter().map(|(n, v)| ((*n).to_owned(), *v)).collect()
    }

    #[test]
    fn midpoint_roll_averages() {
        let a = profile(&[("limonene", 40.0), ("myrcene", 10.0)]);
        let b = profile(&[("limonene", 20.0), ("pinene", 30.0)]);
        let mut rng = ScriptedRng::constant(0.5);
        let child = mix(&a, &b, &mut rng);
        assert_eq!(child["limonene"], 30.0);
        assert_eq!(child["myrcene"], 5.0);
        assert_eq!(child["pinene"], 15.0);
    }

    #[test]
    fn faint_compounds_drop_out() {
        let a = profile(&[("ocimene", 1.5)]);
        let b = TerpeneProfile::new();
        let mut rng = ScriptedRng::constant(0.5);
        assert!(mix(&a, &b, &mut rng).is_empty());
    }

    #[test]
    fn jitter_is_bounded() {
        let a = profile(&[("myrcene", 100.0)]);
        let mut low = ScriptedRng::constant(0.0);
        let mut high = ScriptedRng::constant(0.999_999);
        assert!((mix(&a, &a, &mut low)["myrcene"] - 85.0).abs() < 1e-9);
        assert_eq!(mix(&a, &a, &mut high)["myrcene"], MAX_INTENSITY);
    }
}
