//! Reward Shaping Configuration

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    // === Per tick ===
    /// Stalling cost every tick (default: -0.06)
    pub base: f32,
    /// Per point of damage dealt (default: 1.15)
    pub damage_dealt: f32,
    /// Per point of damage taken, subtracted (default: 1.30)
    pub damage_taken: f32,

    // === Spacing ===
    /// Per px closed when the tick started far apart (default: 0.085)
    pub close: f32,
    /// "Far" threshold for the closing bonus (default: 210)
    pub close_min_dist: f32,
    /// Flat penalty beyond the engage distance (default: -0.10)
    pub far_step: f32,
    /// Late-round penalty above the shrinking allowance (default: -0.12)
    pub late_separation: f32,

    // === Action quality ===
    /// Punch thrown out of reach that dealt nothing (default: -1.05)
    pub far_punch_miss: f32,
    /// Idling far away with energy to spare (default: -0.12)
    pub idle_far: f32,
    /// (default: 250)
    pub idle_far_dist: f32,
    /// (default: 35)
    pub idle_far_min_energy: f32,
    /// Costly action at critical energy (default: -0.12)
    pub low_energy_waste: f32,
    /// (default: 15)
    pub low_energy_below: f32,

    // === Same-side counter ===
    /// (default: 3.5)
    pub sameside_counter: f32,
    /// (default: -3.5)
    pub got_sameside_countered: f32,

    // === Real dodge / counter attack ===
    /// (default: 2.2)
    pub real_dodge: f32,
    /// (default: -2.2)
    pub got_real_dodged: f32,
    /// (default: 4.0)
    pub counter_attack_hit: f32,

    // === Terminal ===
    /// (default: 70)
    pub win: f32,
    /// (default: -70)
    pub lose: f32,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            base: -0.06,
            damage_dealt: 1.15,
            damage_taken: 1.30,

            close: 0.085,
            close_min_dist: 210.0,
            far_step: -0.10,
            late_separation: -0.12,

            far_punch_miss: -1.05,
            idle_far: -0.12,
            idle_far_dist: 250.0,
            idle_far_min_energy: 35.0,
            low_energy_waste: -0.12,
            low_energy_below: 15.0,

            sameside_counter: 3.5,
            got_sameside_countered: -3.5,

            real_dodge: 2.2,
            got_real_dodged: -2.2,
            counter_attack_hit: 4.0,

            win: 70.0,
            lose: -70.0,
        }
    }
}
