//! Micro-environment drift, player adjustment and terpene derivation.
//!
//! # Drift
//!
//! Each drift tick nudges every plant's local readings by a uniform random
//! step, scaled down by any stabilizer the player owns, then clamps:
//!
//! | Reading     | Step     | Range       |
//! |-------------|----------|-------------|
//! | pH          | ±0.15    | 4.0 – 8.0   |
//! | EC          | ±0.075   | 0.5 – 3.0   |
//! | Humidity    | ±2.5     | 30 – 80     |
//! | Temperature | ±1.25    | 15 – 35     |
//!
//! # Terpenes
//!
//! A plant's terpene profile is re-derived from its strain's baseline and
//! its current micro-environment after every drift or adjustment.

use growop_types::random::{jitter, roll};
use growop_types::{EnvParam, GlobalEnvironment, LightCycle, MicroEnvironment, Plant, TerpeneProfile};
use rand::Rng;

/// Fraction of the gap to the target closed by one adjustment.
const ADJUST_RATE: f64 = 0.6;

/// Noise added to each plant on adjustment.
const ADJUST_NOISE: f64 = 0.2;

/// Per-parameter drift suppression, `0..=1`, from owned stabilizers.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Stabilization {
    /// pH drift removed.
    pub ph: f64,
    /// EC drift removed.
    pub ec: f64,
    /// Humidity drift removed.
    pub humidity: f64,
    /// Temperature drift removed.
    pub temperature: f64,
}

impl Stabilization {
    fn factor(self, param: EnvParam) -> f64 {
        let removed = match param {
            EnvParam::Ph => self.ph,
            EnvParam::Ec => self.ec,
            EnvParam::Humidity => self.humidity,
            EnvParam::Temperature => self.temperature,
            EnvParam::Co2 => 0.0,
        };
        1.0 - removed.clamp(0.0, 1.0)
    }
}

/// Drift step and bounds for a reading.
const fn drift_spec(param: EnvParam) -> (f64, f64, f64) {
    match param {
        EnvParam::Ph => (0.15, 4.0, 8.0),
        EnvParam::Ec => (0.075, 0.5, 3.0),
        EnvParam::Humidity => (2.5, 30.0, 80.0),
        EnvParam::Temperature => (1.25, 15.0, 35.0),
        EnvParam::Co2 => (0.0, 200.0, 2_000.0),
    }
}

const PLANT_PARAMS: [EnvParam; 4] = [
    EnvParam::Ph,
    EnvParam::Ec,
    EnvParam::Humidity,
    EnvParam::Temperature,
];

fn reading_mut(env: &mut MicroEnvironment, param: EnvParam) -> Option<&mut f64> {
    match param {
        EnvParam::Ph => Some(&mut env.ph),
        EnvParam::Ec => Some(&mut env.ec),
        EnvParam::Humidity => Some(&mut env.humidity),
        EnvParam::Temperature => Some(&mut env.temperature),
        EnvParam::Co2 => None,
    }
}

/// Starting micro-environment of a freshly planted seed.
pub fn seedling_environment(rng: &mut impl Rng) -> MicroEnvironment {
    MicroEnvironment {
        ph: 6.0 + jitter(rng, 0.2),
        ec: 1.2 + jitter(rng, 0.2),
        humidity: 60.0 + jitter(rng, 5.0),
        temperature: 24.0 + jitter(rng, 1.0),
    }
}

/// Random-walk every reading of `env` by one drift step.
pub fn drift(env: &mut MicroEnvironment, stabilization: Stabilization, rng: &mut impl Rng) {
    for param in PLANT_PARAMS {
        let (step, low, high) = drift_spec(param);
        let delta = jitter(rng, step) * stabilization.factor(param);
        if let Some(value) = reading_mut(env, param) {
            *value = (*value + delta).clamp(low, high);
        }
    }
}

/// Set a room-wide target and pull every plant toward it.
///
/// Each plant closes 60 % of its gap to the target plus a small random
/// offset. CO2 is room-wide only and does not touch plants.
pub fn adjust<'a>(
    global: &mut GlobalEnvironment,
    plants: impl Iterator<Item = &'a mut Plant>,
    param: EnvParam,
    target: f64,
    rng: &mut impl Rng,
) {
    let (_, low, high) = drift_spec(param);
    let target = if target.is_nan() { low } else { target.clamp(low, high) };
    match param {
        EnvParam::Ph => global.ph = target,
        EnvParam::Ec => global.ec = target,
        EnvParam::Humidity => global.humidity = target,
        EnvParam::Temperature => global.temperature = target,
        EnvParam::Co2 => global.co2 = target,
    }

    for plant in plants {
        if let Some(value) = reading_mut(&mut plant.environment, param) {
            let gap = target - *value;
            let noise = (roll(rng) - 0.5) * ADJUST_NOISE;
            *value = gap.mul_add(ADJUST_RATE, *value + noise).clamp(low, high);
        }
    }
}

/// Switch the light schedule and return the new one.
pub const fn toggle_light_cycle(global: &mut GlobalEnvironment) -> LightCycle {
    global.light_cycle = global.light_cycle.toggled();
    global.light_cycle
}

/// Derive a plant's terpene profile from its strain baseline.
///
/// Temperature scales every compound (1.1 at 20–25 °C, 0.8 below 15 or
/// above 30, else 0.95); humidity above 60 % boosts myrcene, below 50 %
/// boosts limonene; the flowering light schedule boosts everything by 20 %.
pub fn derive_terpenes(
    baseline: &TerpeneProfile,
    env: &MicroEnvironment,
    light: LightCycle,
) -> TerpeneProfile {
    let temperature_factor = if (20.0..=25.0).contains(&env.temperature) {
        1.1
    } else if env.temperature < 15.0 || env.temperature > 30.0 {
        0.8
    } else {
        0.95
    };
    let intensity = light.intensity();
    let light_factor = if intensity >= 75.0 {
        1.2
    } else if intensity < 50.0 {
        0.9
    } else {
        1.0
    };

    baseline
        .iter()
        .map(|(compound, base)| {
            let mut value = *base;
            if compound == "myrcene" && env.humidity > 60.0 {
                value *= 1.15;
            }
            if compound == "limonene" && env.humidity < 50.0 {
                value *= 1.1;
            }
            let value = (value * temperature_factor * light_factor).clamp(0.0, 100.0);
            (compound.clone(), value)
        })
        .collect()
}

/// Sum of all terpene intensities.
pub fn total_terpenes(profile: &TerpeneProfile) -> f64 {
    profile.values().sum()
}
