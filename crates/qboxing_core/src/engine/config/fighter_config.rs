//! Fighter Configuration
//!
//! Body, arm, punch class, dodge and regeneration constants.

use serde::{Deserialize, Serialize};

use crate::engine::fighter::PunchKind;

/// Per-class punch constants.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PunchClassConfig {
    /// Energy cost
    pub cost: f32,
    /// Punch cooldown in ticks
    pub cooldown: u32,
    /// Maximum arm extension in px
    pub reach: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FighterConfig {
    // === Body ===
    /// Head sprite size; the hit circle radius is half of it (default: 110)
    pub head_size: f32,
    /// (default: 200)
    pub max_life: f32,
    /// (default: 100)
    pub max_energy: f32,
    /// Walking speed in px per tick (default: 4.15)
    pub speed: f32,

    // === Arms ===
    /// Retracted arm length (default: 28)
    pub arm_retract: f32,
    /// Arm thickness, render only (default: 40)
    pub arm_width: f32,
    /// Ticks an arm stays extended (default: 10)
    pub punch_frames: u32,
    pub punch_short: PunchClassConfig,
    pub punch_medium: PunchClassConfig,
    pub punch_long: PunchClassConfig,

    // === Hit geometry ===
    /// Hit circle = radius * this (default: 0.92)
    pub hit_radius_mult: f32,
    /// Extra gap kept between glove tip and target when aligning (default: 3)
    pub punch_contact_gap_px: f32,
    /// Glove pushed ahead of the arm end (default: 10)
    pub glove_forward_push_px: f32,
    /// Pivot-to-tip distance of the glove sprite (default: 3.4)
    pub glove_tip_from_pivot_px: f32,

    // === Same-side counter ===
    /// Damage bonus fraction for the arm that lands first (default: 0.25)
    pub counter_damage_bonus: f32,
    /// Ticks the countered arm stays locked (default: 14)
    pub counter_arm_lock_frames: u32,

    // === Dodge ===
    /// Dodge active window in ticks (default: 14)
    pub dodge_frames: u32,
    /// Dodge cooldown in ticks (default: 180)
    pub dodge_cooldown: u32,
    /// (default: 24)
    pub dodge_cost: f32,
    /// Speed multiplier while the dodge window is active (default: 2.1)
    pub dodge_speed_mult: f32,
    /// Burst displacement in walking-speed units (default: 6.0)
    pub dodge_burst_mult: f32,
    /// Chance an incoming hit is ignored while dodging (default: 0.75)
    pub dodge_evade_prob: f32,

    // === Counter attack after a real dodge (opt-in) ===
    /// Evading a punch that would have connected opens a counter window
    /// (default: false)
    pub real_dodge_enabled: bool,
    /// (default: 36)
    pub counter_window_frames: u32,
    /// (default: 1.5)
    pub counter_attack_mult: f32,

    // === Movement ===
    /// Chance of a lateral jitter on movement actions (default: 0.08)
    pub move_jitter_chance: f32,
    /// Jitter size as a fraction of speed (default: 0.18)
    pub move_jitter_frac: f32,

    // === Regen ===
    /// (default: 0.55)
    pub regen_idle: f32,
    /// (default: 0.20)
    pub regen_move: f32,

    // === Round carry-over ===
    /// Added to carried damage on each lost round (default: 18)
    pub carry_damage_per_loss: f32,
    /// Starting life never drops below this (default: 70)
    pub min_start_life: f32,

    // === Knockout punch ===
    /// Initial knockout vulnerability (default: 0.001)
    pub knockout_punch_chance: f32,
    /// Vulnerability added per knockout suffered (default: 0.001)
    pub knockout_vulnerability_step: f32,

    // === Audio rate limit ===
    /// Ticks between two hit sounds of the same attacker (default: 10)
    pub sound_cooldown: u32,
}

impl Default for FighterConfig {
    fn default() -> Self {
        Self {
            head_size: 110.0,
            max_life: 200.0,
            max_energy: 100.0,
            speed: 4.15,

            arm_retract: 28.0,
            arm_width: 40.0,
            punch_frames: 10,
            punch_short: PunchClassConfig { cost: 20.0, cooldown: 42, reach: 82.0 },
            punch_medium: PunchClassConfig { cost: 30.0, cooldown: 68, reach: 105.0 },
            punch_long: PunchClassConfig { cost: 50.0, cooldown: 86, reach: 132.0 },

            hit_radius_mult: 0.92,
            punch_contact_gap_px: 3.0,
            glove_forward_push_px: 10.0,
            glove_tip_from_pivot_px: 3.4,

            counter_damage_bonus: 0.25,
            counter_arm_lock_frames: 14,

            dodge_frames: 14,
            dodge_cooldown: 180,
            dodge_cost: 24.0,
            dodge_speed_mult: 2.1,
            dodge_burst_mult: 6.0,
            dodge_evade_prob: 0.75,

            real_dodge_enabled: false,
            counter_window_frames: 36,
            counter_attack_mult: 1.5,

            move_jitter_chance: 0.08,
            move_jitter_frac: 0.18,

            regen_idle: 0.55,
            regen_move: 0.20,

            carry_damage_per_loss: 18.0,
            min_start_life: 70.0,

            knockout_punch_chance: 0.001,
            knockout_vulnerability_step: 0.001,

            sound_cooldown: 10,
        }
    }
}

impl FighterConfig {
    pub fn radius(&self) -> f32 {
        self.head_size / 2.0
    }

    pub fn punch(&self, kind: PunchKind) -> &PunchClassConfig {
        match kind {
            PunchKind::Short => &self.punch_short,
            PunchKind::Medium => &self.punch_medium,
            PunchKind::Long => &self.punch_long,
        }
    }

    /// How far the glove tip sits ahead of the arm end.
    pub fn glove_forward_reach(&self) -> f32 {
        self.glove_forward_push_px + self.glove_tip_from_pivot_px.max(0.0)
    }
}
