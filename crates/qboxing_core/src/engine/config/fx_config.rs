//! Effect Request Configuration
//!
//! Timing for decals, motion trails and HUD banners. The core only decides
//! when and where these happen; drawing them is the renderer's job.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FxConfig {
    // === Decals ===
    /// (default: 12000)
    pub decal_lifetime_ms: u64,
    /// Fade-out tail at the end of the lifetime (default: 2500)
    pub decal_fade_ms: u64,
    /// Oldest decals are evicted past this count (default: 450)
    pub max_decals: usize,
    /// Impact images offered by the asset provider; 0 disables decals (default: 4)
    pub impact_variants: usize,
    /// (default: 0.85)
    pub decal_scale_min: f32,
    /// (default: 1.12)
    pub decal_scale_max: f32,

    // === Motion trail ===
    /// Trail window after taking a hit (default: 2400)
    pub trail_duration_ms: u64,
    /// (default: 80)
    pub trail_drop_every_ms: u64,
    /// Minimum travel since the last drop (default: 14)
    pub trail_drop_min_dist: f32,
    /// Drop offset behind the direction of travel (default: 18)
    pub trail_back_offset: f32,
    /// Positional jitter of a trail drop (default: 4)
    pub trail_jitter_px: f32,

    // === Banners ===
    /// (default: 900)
    pub super_punch_msg_ms: u64,
    /// (default: 1200)
    pub knockout_punch_msg_ms: u64,
    /// (default: 900)
    pub dodge_msg_ms: u64,
}

impl Default for FxConfig {
    fn default() -> Self {
        Self {
            decal_lifetime_ms: 12_000,
            decal_fade_ms: 2_500,
            max_decals: 450,
            impact_variants: 4,
            decal_scale_min: 0.85,
            decal_scale_max: 1.12,

            trail_duration_ms: 2_400,
            trail_drop_every_ms: 80,
            trail_drop_min_dist: 14.0,
            trail_back_offset: 18.0,
            trail_jitter_px: 4.0,

            super_punch_msg_ms: 900,
            knockout_punch_msg_ms: 1_200,
            dodge_msg_ms: 900,
        }
    }
}
