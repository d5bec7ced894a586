//! RewardFunction - per-tick reward shaping
//!
//! Converts one fighter's view of a resolved tick into a scalar reward for
//! the Q-learning update.
//!
//! ## Components
//!
//! - `RewardFunction` trait: shared interface, thread safe
//! - `ShapedReward`: the reference shaping (damage trade, spacing,
//!   action-quality penalties, counter and dodge bonuses)
//! - `RewardContext`: everything a reward may look at for one fighter
//!
//! ## Usage
//!
//! ```rust
//! use qboxing_core::engine::config::BoutConfig;
//! use qboxing_core::engine::policy::Action;
//! use qboxing_core::engine::reward::{RewardContext, RewardFunction, ShapedReward};
//!
//! let reward = ShapedReward::new(&BoutConfig::default());
//! let ctx = RewardContext { action: Action::Idle, energy: 100.0, ..RewardContext::default() };
//! let r = reward.compute(&ctx);
//! assert!(r < 0.0);
//! ```

use super::config::{BoutConfig, RewardConfig};
use super::fighter::PunchKind;
use super::policy::Action;

// ============================================================================
// RewardContext
// ============================================================================

/// One fighter's pre/post-tick data.
#[derive(Debug, Clone, Copy)]
pub struct RewardContext {
    pub action: Action,
    pub damage_dealt: f32,
    pub damage_taken: f32,
    /// Center distance before movement this tick
    pub dist_before: f32,
    pub dist_after: f32,
    /// Round seconds left when the tick started
    pub time_left: u32,
    /// Own energy after the tick
    pub energy: f32,
    /// Own head radius
    pub radius: f32,
    /// Late-round separation allowance in force this tick
    pub distance_allowance: f32,
    pub did_counter: bool,
    pub got_countered: bool,
    pub real_dodge: bool,
    pub got_real_dodged: bool,
    pub counter_attack_hit: bool,
}

impl Default for RewardContext {
    fn default() -> Self {
        Self {
            action: Action::Idle,
            damage_dealt: 0.0,
            damage_taken: 0.0,
            dist_before: 0.0,
            dist_after: 0.0,
            time_left: 60,
            energy: 0.0,
            radius: 55.0,
            distance_allowance: 260.0,
            did_counter: false,
            got_countered: false,
            real_dodge: false,
            got_real_dodged: false,
            counter_attack_hit: false,
        }
    }
}

// ============================================================================
// RewardFunction Trait
// ============================================================================

pub trait RewardFunction: Send + Sync {
    /// Dense reward for one resolved tick.
    fn compute(&self, ctx: &RewardContext) -> f32;

    /// Terminal bonus once either fighter is down. A double knockout pays
    /// neither side.
    fn terminal(&self, own_down: bool, opponent_down: bool) -> f32 {
        let _ = (own_down, opponent_down);
        0.0
    }

    /// For logging.
    fn name(&self) -> &str;
}

// ============================================================================
// ShapedReward
// ============================================================================

#[derive(Debug, Clone)]
pub struct ShapedReward {
    weights: RewardConfig,
    /// Max arm length per punch class: short, medium, long
    reach: [f32; 3],
    engage_dist: f32,
    late_round_sec: u32,
}

impl ShapedReward {
    pub fn new(cfg: &BoutConfig) -> Self {
        let f = &cfg.fighter;
        Self {
            weights: cfg.reward.clone(),
            reach: [f.punch_short.reach, f.punch_medium.reach, f.punch_long.reach],
            engage_dist: cfg.arena.engage_dist,
            late_round_sec: cfg.arena.late_round_sec,
        }
    }

    fn reach(&self, kind: PunchKind) -> f32 {
        match kind {
            PunchKind::Short => self.reach[0],
            PunchKind::Medium => self.reach[1],
            PunchKind::Long => self.reach[2],
        }
    }
}

impl RewardFunction for ShapedReward {
    fn compute(&self, ctx: &RewardContext) -> f32 {
        let w = &self.weights;

        let mut r = w.base;
        r += w.damage_dealt * ctx.damage_dealt;
        r -= w.damage_taken * ctx.damage_taken;

        if ctx.did_counter {
            r += w.sameside_counter;
        }
        if ctx.got_countered {
            r += w.got_sameside_countered;
        }
        if ctx.real_dodge {
            r += w.real_dodge;
        }
        if ctx.got_real_dodged {
            r += w.got_real_dodged;
        }
        if ctx.counter_attack_hit {
            r += w.counter_attack_hit;
        }

        // spacing
        if ctx.dist_before > w.close_min_dist {
            r += w.close * (ctx.dist_before - ctx.dist_after).max(0.0);
        }
        if ctx.dist_before > self.engage_dist {
            r += w.far_step;
        }

        // action quality
        if let Some((kind, _)) = ctx.action.punch() {
            if ctx.damage_dealt <= 0.0 && ctx.dist_before > self.reach(kind) + ctx.radius {
                r += w.far_punch_miss;
            }
        }
        if ctx.action == Action::Idle
            && ctx.dist_before > w.idle_far_dist
            && ctx.energy > w.idle_far_min_energy
        {
            r += w.idle_far;
        }
        if ctx.energy < w.low_energy_below && ctx.action.is_costly() {
            r += w.low_energy_waste;
        }

        if ctx.time_left <= self.late_round_sec && ctx.dist_before > ctx.distance_allowance {
            r += w.late_separation;
        }

        r
    }

    fn terminal(&self, own_down: bool, opponent_down: bool) -> f32 {
        match (own_down, opponent_down) {
            (false, true) => self.weights.win,
            (true, false) => self.weights.lose,
            _ => 0.0,
        }
    }

    fn name(&self) -> &str {
        "shaped"
    }
}

// ============================================================================
// Tests
// ============================================================================
