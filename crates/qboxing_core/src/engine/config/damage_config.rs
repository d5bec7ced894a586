//! Damage Roll Configuration

use serde::{Deserialize, Serialize};

use crate::engine::fighter::PunchKind;

/// Damage range and sweet-spot distance of one punch class.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DamageRange {
    pub min: f32,
    pub max: f32,
    /// Center-to-center distance at which the proximity multiplier peaks
    pub ideal_distance: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DamageConfig {
    pub short: DamageRange,
    pub medium: DamageRange,
    pub long: DamageRange,

    /// Triangular mode as a fraction of the range (default: 0.55)
    pub mode_ratio: f32,

    // === Multipliers ===
    /// Energy multiplier at zero energy (default: 0.82)
    pub energy_mult_min: f32,
    /// Energy multiplier at full energy (default: 1.18)
    pub energy_mult_max: f32,
    /// Proximity multiplier floor (default: 0.90)
    pub prox_mult_min: f32,
    /// Proximity multiplier ceiling (default: 1.32)
    pub prox_mult_max: f32,
    /// Proximity multiplier at the ideal distance before clamping (default: 1.08)
    pub prox_peak: f32,
    /// Error scale: multiplier drops by 1.0 over `ideal * this` px (default: 2.2)
    pub prox_falloff: f32,
    /// (default: 0.96)
    pub chaos_min: f32,
    /// (default: 1.06)
    pub chaos_max: f32,

    // === Super punch ===
    /// (default: 0.012)
    pub super_punch_chance: f32,
    /// (default: 160)
    pub super_punch_min: f32,
    /// (default: 180)
    pub super_punch_max: f32,

    // === Sound tiers ===
    /// Damage at or below this plays the light tier (default: 9)
    pub light_hit_max: f32,
    /// Damage at or above this plays the heavy tier (default: 22)
    pub heavy_hit_min: f32,
}

impl Default for DamageConfig {
    fn default() -> Self {
        Self {
            short: DamageRange { min: 5.0, max: 18.0, ideal_distance: 95.0 },
            medium: DamageRange { min: 9.0, max: 28.0, ideal_distance: 115.0 },
            long: DamageRange { min: 14.0, max: 40.0, ideal_distance: 140.0 },

            mode_ratio: 0.55,

            energy_mult_min: 0.82,
            energy_mult_max: 1.18,
            prox_mult_min: 0.90,
            prox_mult_max: 1.32,
            prox_peak: 1.08,
            prox_falloff: 2.2,
            chaos_min: 0.96,
            chaos_max: 1.06,

            super_punch_chance: 0.012,
            super_punch_min: 160.0,
            super_punch_max: 180.0,

            light_hit_max: 9.0,
            heavy_hit_min: 22.0,
        }
    }
}

impl DamageConfig {
    pub fn range(&self, kind: PunchKind) -> &DamageRange {
        match kind {
            PunchKind::Short => &self.short,
            PunchKind::Medium => &self.medium,
            PunchKind::Long => &self.long,
        }
    }
}
