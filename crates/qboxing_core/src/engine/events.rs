//! Combat events
//!
//! Side-effect requests queued during a tick and drained by the caller:
//! hit sounds, decal spawns, HUD banners and round transitions. The core
//! never plays or draws anything itself.

use serde::{Deserialize, Serialize};

use super::damage::HitTier;
use super::decals::Decal;
use super::fighter::{Arm, Side};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundEndReason {
    Time,
    Knockout,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CombatEvent {
    /// Play a hit sound for `side`'s landed punch.
    HitSound { side: Side, tier: HitTier },
    DecalSpawned { decal: Decal },
    SuperPunch { side: Side, until_ms: u64 },
    KnockoutPunch { side: Side, until_ms: u64 },
    /// `winner` landed first with the same arm as the opponent.
    SameSideCounter { winner: Side, arm: Arm },
    RealDodge { defender: Side },
    /// `winner` is `None` for a tied or double-knockout round.
    RoundEnded { reason: RoundEndReason, winner: Option<Side> },
    GameOver,
}

impl CombatEvent {
    pub fn name(&self) -> &'static str {
        match self {
            CombatEvent::HitSound { .. } => "hit_sound",
            CombatEvent::DecalSpawned { .. } => "decal_spawned",
            CombatEvent::SuperPunch { .. } => "super_punch",
            CombatEvent::KnockoutPunch { .. } => "knockout_punch",
            CombatEvent::SameSideCounter { .. } => "same_side_counter",
            CombatEvent::RealDodge { .. } => "real_dodge",
            CombatEvent::RoundEnded { .. } => "round_ended",
            CombatEvent::GameOver => "game_over",
        }
    }
}
