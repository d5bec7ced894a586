//! Arena / Round Configuration

use serde::{Deserialize, Serialize};

/// Ring geometry, round timing and engagement tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    // === Ring ===
    /// Arena width in px (default: 800)
    pub width: f32,
    /// Arena height in px (default: 600)
    pub height: f32,
    /// Target tick rate (default: 90)
    pub fps: u32,
    /// Horizontal spawn inset from each rope (default: 140)
    pub spawn_inset: f32,

    // === Rounds ===
    /// Rounds in a full bout (default: 12)
    pub max_rounds: u32,
    /// Round length in seconds (default: 60)
    pub round_time_sec: u32,
    /// Pause between rounds in ms (default: 1400)
    pub between_round_ms: u64,

    // === Spacing ===
    /// Minimum clear gap between two heads (default: 14)
    pub body_gap_px: f32,

    // === Engagement ===
    /// No pull inside this distance (default: 360)
    pub engage_dist: f32,
    /// Distance beyond `engage_dist` at which the pull saturates (default: 260)
    pub engage_ramp_px: f32,
    /// Pull strength after the opening window (default: 0.58)
    pub engage_force: f32,
    /// Opening window length in seconds (default: 2.0)
    pub engage_opening_sec: f32,
    /// Pull strength during the opening window (default: 0.95)
    pub engage_opening_force: f32,
    /// Engagement displacement scale relative to walking speed (default: 1.15)
    pub engage_speed_mult: f32,

    // === Anti-stalling ===
    /// Seconds left at which the late-round squeeze starts (default: 10)
    pub late_round_sec: u32,
    /// Allowed separation at round start (default: 260)
    pub stall_allowance_start: f32,
    /// Shrink per tick during the late-round window (default: 10)
    pub stall_allowance_step: f32,
    /// Floor of the allowed separation (default: 120)
    pub stall_allowance_min: f32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            fps: 90,
            spawn_inset: 140.0,

            max_rounds: 12,
            round_time_sec: 60,
            between_round_ms: 1400,

            body_gap_px: 14.0,

            engage_dist: 360.0,
            engage_ramp_px: 260.0,
            engage_force: 0.58,
            engage_opening_sec: 2.0,
            engage_opening_force: 0.95,
            engage_speed_mult: 1.15,

            late_round_sec: 10,
            stall_allowance_start: 260.0,
            stall_allowance_step: 10.0,
            stall_allowance_min: 120.0,
        }
    }
}

impl ArenaConfig {
    /// Length of the arena diagonal, used to normalize distances.
    pub fn diagonal(&self) -> f32 {
        self.width.hypot(self.height)
    }

    /// Milliseconds per tick at the target rate.
    pub fn frame_ms(&self) -> u64 {
        crate::engine::timestep::frame_ms(self.fps)
    }
}
