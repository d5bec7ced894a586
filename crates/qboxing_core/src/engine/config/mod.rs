//! # Bout Configuration Module
//!
//! Every tuning constant of the simulation lives here, supplied once at
//! startup and treated as immutable for the lifetime of a bout.
//!
//! ## Usage
//! ```rust
//! use qboxing_core::engine::config::BoutConfig;
//!
//! let config = BoutConfig::default();
//! let quick = BoutConfig::compact();
//! assert!(quick.learning.n_states() < config.learning.n_states());
//! ```

mod arena_config;
mod damage_config;
mod fighter_config;
mod fx_config;
mod learning_config;
mod reward_config;

pub use arena_config::ArenaConfig;
pub use damage_config::{DamageConfig, DamageRange};
pub use fighter_config::{FighterConfig, PunchClassConfig};
pub use fx_config::FxConfig;
pub use learning_config::{LearningConfig, BOOL_BITS, CD_BINS, DXDY_BINS, TIME_BINS};
pub use reward_config::RewardConfig;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BoutError, ConfigError};

/// Full simulation configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BoutConfig {
    #[serde(default)]
    pub arena: ArenaConfig,
    #[serde(default)]
    pub fighter: FighterConfig,
    #[serde(default)]
    pub damage: DamageConfig,
    #[serde(default)]
    pub learning: LearningConfig,
    #[serde(default)]
    pub reward: RewardConfig,
    #[serde(default)]
    pub fx: FxConfig,
}

impl BoutConfig {
    /// Reference tuning (same as `default()`).
    pub fn standard() -> Self {
        Self::default()
    }

    /// Coarser state space for quick experiments; tables stay small.
    pub fn compact() -> Self {
        let mut cfg = Self::default();
        cfg.learning.dist_bins = 3;
        cfg.learning.energy_bins = 2;
        cfg
    }

    /// Compact tables with rare events and movement jitter switched off.
    pub fn deterministic() -> Self {
        let mut cfg = Self::compact();
        cfg.damage.super_punch_chance = 0.0;
        cfg.fighter.knockout_punch_chance = 0.0;
        cfg.fighter.move_jitter_chance = 0.0;
        cfg
    }

    /// Look a preset up by name.
    pub fn preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "standard" | "default" => Ok(Self::standard()),
            "compact" => Ok(Self::compact()),
            "deterministic" => Ok(Self::deterministic()),
            other => Err(ConfigError::UnknownPreset(other.to_string())),
        }
    }

    pub fn from_json_str(s: &str) -> Result<Self, BoutError> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self, BoutError> {
        let cfg: Self = serde_yaml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from a `.json`, `.yaml` or `.yml` file.
    pub fn load(path: &Path) -> Result<Self, BoutError> {
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&text),
            Some("json") => Self::from_json_str(&text),
            other => Err(ConfigError::UnsupportedFormat(other.unwrap_or("").to_string()).into()),
        }
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let a = &self.arena;
        positive("arena.width", a.width)?;
        positive("arena.height", a.height)?;
        positive("arena.fps", a.fps as f32)?;
        positive("arena.max_rounds", a.max_rounds as f32)?;
        positive("arena.round_time_sec", a.round_time_sec as f32)?;
        positive("arena.engage_ramp_px", a.engage_ramp_px)?;
        ordered("arena.stall_allowance", a.stall_allowance_min, a.stall_allowance_start)?;

        let f = &self.fighter;
        positive("fighter.head_size", f.head_size)?;
        positive("fighter.max_life", f.max_life)?;
        positive("fighter.max_energy", f.max_energy)?;
        ordered("fighter.min_start_life", f.min_start_life, f.max_life)?;
        for (name, class) in [
            ("fighter.punch_short", &f.punch_short),
            ("fighter.punch_medium", &f.punch_medium),
            ("fighter.punch_long", &f.punch_long),
        ] {
            ordered(name, f.arm_retract, class.reach)?;
        }
        if a.spawn_inset < f.radius() || a.spawn_inset > a.width - f.radius() {
            return Err(ConfigError::InvalidRange {
                field: "arena.spawn_inset".to_string(),
                min: f.radius(),
                max: a.width - f.radius(),
            });
        }
        probability("fighter.dodge_evade_prob", f.dodge_evade_prob)?;
        probability("fighter.move_jitter_chance", f.move_jitter_chance)?;
        probability("fighter.knockout_punch_chance", f.knockout_punch_chance)?;

        let d = &self.damage;
        for (name, range) in
            [("damage.short", &d.short), ("damage.medium", &d.medium), ("damage.long", &d.long)]
        {
            ordered(name, range.min, range.max)?;
            positive(name, range.ideal_distance)?;
        }
        probability("damage.mode_ratio", d.mode_ratio)?;
        probability("damage.super_punch_chance", d.super_punch_chance)?;
        ordered("damage.energy_mult", d.energy_mult_min, d.energy_mult_max)?;
        ordered("damage.prox_mult", d.prox_mult_min, d.prox_mult_max)?;
        ordered("damage.chaos", d.chaos_min, d.chaos_max)?;
        ordered("damage.super_punch", d.super_punch_min, d.super_punch_max)?;
        positive("damage.prox_falloff", d.prox_falloff)?;

        let l = &self.learning;
        if l.dist_bins == 0 {
            return Err(ConfigError::ZeroBins("learning.dist_bins".to_string()));
        }
        if l.energy_bins == 0 {
            return Err(ConfigError::ZeroBins("learning.energy_bins".to_string()));
        }
        probability("learning.alpha", l.alpha)?;
        probability("learning.gamma", l.gamma)?;
        probability("learning.epsilon_start", l.epsilon_start)?;
        probability("learning.epsilon_min", l.epsilon_min)?;
        probability("learning.epsilon_decay", l.epsilon_decay)?;

        let fx = &self.fx;
        positive("fx.max_decals", fx.max_decals as f32)?;
        ordered("fx.decal_scale", fx.decal_scale_min, fx.decal_scale_max)?;

        Ok(())
    }
}

fn positive(field: &str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field: field.to_string(), value })
    }
}

fn probability(field: &str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Probability { field: field.to_string(), value })
    }
}

fn ordered(field: &str, min: f32, max: f32) -> Result<(), ConfigError> {
    if min <= max {
        Ok(())
    } else {
        Err(ConfigError::InvalidRange { field: field.to_string(), min, max })
    }
}

// ========== Tests ==========
