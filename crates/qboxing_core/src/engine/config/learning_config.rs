//! Q-learning Configuration
//!
//! State discretization and learning hyperparameters. The relative-direction,
//! cooldown, time and flag factors have a fixed shape (9 / 4 / 4 / 5 bits);
//! only their boundaries are tunable.

use serde::{Deserialize, Serialize};

/// Relative-direction buckets (3 x 3 sign grid).
pub const DXDY_BINS: usize = 9;
/// Punch cooldown buckets: ready / low / medium / high.
pub const CD_BINS: usize = 4;
/// Time-remaining buckets by quarter of the round.
pub const TIME_BINS: usize = 4;
/// Flag bits: punch_ready, dodge_ready, counter_window, low_energy, arm_locked.
pub const BOOL_BITS: u32 = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningConfig {
    // === Discretization ===
    /// Distance buckets over the arena diagonal (default: 10)
    pub dist_bins: usize,
    /// Energy buckets, used for both own and opponent energy (default: 6)
    pub energy_bins: usize,
    /// Dead zone for the dx/dy sign (default: 12)
    pub dxdy_dead_zone: f32,
    /// Cooldown below this (and non-zero) is "low" (default: 25)
    pub cd_low_below: u32,
    /// Cooldown below this is "medium", otherwise "high" (default: 55)
    pub cd_medium_below: u32,
    /// Absolute energy under which the low-energy flag is set (default: 18)
    pub low_energy_flag: f32,

    // === Hyperparameters ===
    /// Learning rate (default: 0.13)
    pub alpha: f32,
    /// Discount (default: 0.92)
    pub gamma: f32,
    /// (default: 0.26)
    pub epsilon_start: f32,
    /// (default: 0.06)
    pub epsilon_min: f32,
    /// Multiplicative decay per tick (default: 0.99955)
    pub epsilon_decay: f32,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            dist_bins: 10,
            energy_bins: 6,
            dxdy_dead_zone: 12.0,
            cd_low_below: 25,
            cd_medium_below: 55,
            low_energy_flag: 18.0,

            alpha: 0.13,
            gamma: 0.92,
            epsilon_start: 0.26,
            epsilon_min: 0.06,
            epsilon_decay: 0.99955,
        }
    }
}

impl LearningConfig {
    /// Total number of discrete states.
    pub fn n_states(&self) -> usize {
        self.dist_bins
            * DXDY_BINS
            * self.energy_bins
            * self.energy_bins
            * CD_BINS
            * TIME_BINS
            * (1usize << BOOL_BITS)
    }
}
