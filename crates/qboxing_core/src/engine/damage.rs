//! Punch damage roll
//!
//! ```text
//! dmg = triangular(min, max, mode) * energy_mult * proximity_mult * chaos
//! ```
//!
//! - `energy_mult`: linear in the attacker's energy fraction
//! - `proximity_mult`: peaks at the class's ideal distance, clamped
//! - `chaos`: 16-bit quantized jitter in a narrow band
//!
//! With a small chance the whole roll is replaced by a flat super punch.

use serde::{Deserialize, Serialize};

use super::config::DamageConfig;
use super::fighter::PunchKind;
use super::rng::CombatRng;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageRoll {
    pub amount: f32,
    pub super_punch: bool,
}

/// Light / mid / heavy hit-sound bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitTier {
    Light,
    Mid,
    Heavy,
}

impl HitTier {
    pub fn for_damage(amount: f32, cfg: &DamageConfig) -> Self {
        if amount <= cfg.light_hit_max {
            HitTier::Light
        } else if amount >= cfg.heavy_hit_min {
            HitTier::Heavy
        } else {
            HitTier::Mid
        }
    }
}

/// Multiplier for the attacker's energy fraction.
pub fn energy_multiplier(energy_frac: f32, cfg: &DamageConfig) -> f32 {
    let e = energy_frac.clamp(0.0, 1.0);
    cfg.energy_mult_min + (cfg.energy_mult_max - cfg.energy_mult_min) * e
}

/// Multiplier for how far `distance` is from the class's ideal distance.
pub fn proximity_multiplier(distance: f32, ideal: f32, cfg: &DamageConfig) -> f32 {
    if ideal <= 0.0 {
        return cfg.prox_mult_min;
    }
    let err = (distance - ideal).abs();
    (cfg.prox_peak - err / (ideal * cfg.prox_falloff)).clamp(cfg.prox_mult_min, cfg.prox_mult_max)
}

/// Roll damage for a landed punch of `kind` thrown from `distance`
/// (center to center) with the attacker at `energy_frac`.
pub fn roll_damage(
    kind: PunchKind,
    energy_frac: f32,
    distance: f32,
    cfg: &DamageConfig,
    rng: &mut dyn CombatRng,
) -> DamageRoll {
    let range = cfg.range(kind);
    let mode = range.min + (range.max - range.min) * cfg.mode_ratio;
    let base = rng.triangular(range.min, range.max, mode);

    let chaos = cfg.chaos_min + rng.chaos_unit() * (cfg.chaos_max - cfg.chaos_min);
    let amount = base
        * energy_multiplier(energy_frac, cfg)
        * proximity_multiplier(distance, range.ideal_distance, cfg)
        * chaos;

    if rng.roll(cfg.super_punch_chance) {
        return DamageRoll {
            amount: rng.uniform(cfg.super_punch_min, cfg.super_punch_max),
            super_punch: true,
        };
    }

    DamageRoll { amount, super_punch: false }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::rng::{ScriptedEntropy, SeededEntropy};

    #[test]
    fn test_energy_multiplier_bounds() {
        let cfg = DamageConfig::default();
        assert!((energy_multiplier(0.0, &cfg) - 0.82).abs() < 1e-6);
        assert!((energy_multiplier(1.0, &cfg) - 1.18).abs() < 1e-6);
        assert!((energy_multiplier(7.0, &cfg) - 1.18).abs() < 1e-6);
        assert!((energy_multiplier(0.5, &cfg) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_proximity_peaks_at_ideal() {
        let cfg = DamageConfig::default();
        assert!((proximity_multiplier(115.0, 115.0, &cfg) - 1.08).abs() < 1e-6);
        // far away: clamped to the floor
        assert!((proximity_multiplier(600.0, 115.0, &cfg) - 0.9).abs() < 1e-6);
        // 22 px off on a 95 ideal: 1.08 - 22 / 209 = 0.9747
        let m = proximity_multiplier(117.0, 95.0, &cfg);
        assert!((m - (1.08 - 22.0 / 209.0)).abs() < 1e-5);
    }

    #[test]
    fn test_hit_tiers() {
        let cfg = DamageConfig::default();
        assert_eq!(HitTier::for_damage(9.0, &cfg), HitTier::Light);
        assert_eq!(HitTier::for_damage(9.5, &cfg), HitTier::Mid);
        assert_eq!(HitTier::for_damage(22.0, &cfg), HitTier::Heavy);
        assert_eq!(HitTier::for_damage(170.0, &cfg), HitTier::Heavy);
    }

    #[test]
    fn test_scripted_roll_hand_computed() {
        let cfg = DamageConfig { super_punch_chance: 0.0, ..DamageConfig::default() };
        // u = mode ratio -> base is the mode: 9 + 19 * 0.55 = 19.45
        // chaos unit 0.5 -> bits 32768 / 65535
        let mut rng = ScriptedEntropy::new(vec![0.55, 0.5, 0.9]);
        let roll = roll_damage(PunchKind::Medium, 0.5, 115.0, &cfg, &mut rng);

        let chaos = 0.96 + (32768.0 / 65535.0) * 0.1;
        let expected = 19.45 * 1.0 * 1.08 * chaos;
        assert!(!roll.super_punch);
        assert!((roll.amount - expected).abs() < 1e-3, "{} vs {}", roll.amount, expected);
    }

    #[test]
    fn test_super_punch_override() {
        let cfg = DamageConfig { super_punch_chance: 1.0, ..DamageConfig::default() };
        let mut rng = SeededEntropy::new(9);
        let roll = roll_damage(PunchKind::Short, 1.0, 95.0, &cfg, &mut rng);
        assert!(roll.super_punch);
        assert!((160.0..180.0).contains(&roll.amount));
    }

    #[test]
    fn test_regular_rolls_stay_in_envelope() {
        let cfg = DamageConfig { super_punch_chance: 0.0, ..DamageConfig::default() };
        let mut rng = SeededEntropy::new(1234);
        for kind in [PunchKind::Short, PunchKind::Medium, PunchKind::Long] {
            let range = *cfg.range(kind);
            for _ in 0..500 {
                let roll = roll_damage(kind, 0.7, range.ideal_distance, &cfg, &mut rng);
                assert!(roll.amount >= range.min * 0.82 * 0.9 * 0.96 - 1e-3);
                assert!(roll.amount <= range.max * 1.18 * 1.32 * 1.06 + 1e-3);
            }
        }
    }
}
