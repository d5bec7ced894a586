//! Read-only snapshots for renderers
//!
//! Produced once per frame; a renderer or HUD draws from these and never
//! touches live bout state.
//!
//! # Example
//! ```ignore
//! let snap = bout.snapshot(clock.now_ms());
//! hud.draw(&snap.red, &snap.blue, snap.time_left);
//! for decal in &snap.decals { /* blit with decal.alpha(snap.now_ms, fade_ms) */ }
//! ```

use serde::{Deserialize, Serialize};

use super::decals::Decal;
use super::fighter::{Fighter, Side};
use super::geometry::Vec2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FighterSnapshot {
    pub name: String,
    pub side: Side,
    pub pos: Vec2,
    pub facing: f32,
    pub facing_when_ko: f32,
    pub life: f32,
    pub max_life: f32,
    pub life_fraction: f32,
    pub energy: f32,
    pub max_energy: f32,
    pub energy_fraction: f32,
    pub knocked_out: bool,
    pub left_arm_len: f32,
    pub right_arm_len: f32,
    pub dodging: bool,
    pub epsilon: f32,
}

impl From<&Fighter> for FighterSnapshot {
    fn from(f: &Fighter) -> Self {
        Self {
            name: f.name.clone(),
            side: f.side,
            pos: f.pos,
            facing: f.facing,
            facing_when_ko: f.facing_when_ko,
            life: f.life,
            max_life: f.max_life,
            life_fraction: f.life_fraction(),
            energy: f.energy,
            max_energy: f.max_energy,
            energy_fraction: f.energy_fraction(),
            knocked_out: f.knocked_out,
            left_arm_len: f.left.length,
            right_arm_len: f.right.length,
            dodging: f.is_dodging(),
            epsilon: f.policy.epsilon(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoutSnapshot {
    pub now_ms: u64,
    /// 1-based round currently shown
    pub round: u32,
    pub max_rounds: u32,
    pub red_score: u32,
    pub blue_score: u32,
    pub time_left: u32,
    pub round_over: bool,
    pub game_over: bool,
    pub super_punch_until_ms: u64,
    pub knockout_until_ms: u64,
    pub dodge_until_ms: u64,
    pub red: FighterSnapshot,
    pub blue: FighterSnapshot,
    pub decals: Vec<Decal>,
}

impl BoutSnapshot {
    pub fn super_punch_banner(&self) -> bool {
        self.now_ms < self.super_punch_until_ms
    }

    pub fn knockout_banner(&self) -> bool {
        self.now_ms < self.knockout_until_ms
    }

    pub fn dodge_banner(&self) -> bool {
        self.now_ms < self.dodge_until_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::BoutConfig;

    #[test]
    fn test_fighter_snapshot_fractions() {
        let cfg = BoutConfig::compact();
        let mut f = Fighter::new(Side::Blue, Fighter::spawn_point(Side::Blue, &cfg.arena), &cfg);
        f.life = 50.0;
        f.energy = 25.0;

        let snap = FighterSnapshot::from(&f);
        assert_eq!(snap.name, "Blue");
        assert_eq!(snap.life_fraction, 0.25);
        assert_eq!(snap.energy_fraction, 0.25);
        assert_eq!(snap.left_arm_len, 28.0);
        assert!(!snap.dodging);

        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["side"], "blue");
    }
}
