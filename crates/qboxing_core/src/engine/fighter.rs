//! Fighter state
//!
//! Physical and learning state of one boxer: position, life/energy, the two
//! arms, cooldown timers, knockout state, motion-trail window and the
//! Q-learning policy. A fighter is created once per bout and reset (not
//! rebuilt) between rounds, so the learned table and epsilon survive.

use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

use super::config::{ArenaConfig, BoutConfig, FighterConfig, FxConfig};
use super::geometry::Vec2;
use super::policy::{Action, QPolicy};
use super::rng::CombatRng;

// ============================================================================
// Identity
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Red,
    Blue,
}

impl Side {
    pub fn name(self) -> &'static str {
        match self {
            Side::Red => "Red",
            Side::Blue => "Blue",
        }
    }

    pub fn opponent(self) -> Side {
        match self {
            Side::Red => Side::Blue,
            Side::Blue => Side::Red,
        }
    }

    /// Dodge burst direction relative to facing.
    pub fn dodge_turn(self) -> f32 {
        match self {
            Side::Red => FRAC_PI_2,
            Side::Blue => -FRAC_PI_2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Arm {
    Left,
    Right,
}

impl Arm {
    pub fn other(self) -> Arm {
        match self {
            Arm::Left => Arm::Right,
            Arm::Right => Arm::Left,
        }
    }

    /// Shoulder offset from facing.
    fn shoulder_turn(self) -> f32 {
        match self {
            Arm::Left => FRAC_PI_4,
            Arm::Right => -FRAC_PI_4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PunchKind {
    Short,
    Medium,
    Long,
}

// ============================================================================
// Arm state
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArmState {
    /// Current length from shoulder to arm end
    pub length: f32,
    /// Ticks left before the arm retracts (0 = idle)
    pub extend_ticks: u32,
    /// Ticks left before the arm may punch again after being countered
    pub lock_ticks: u32,
}

impl ArmState {
    fn retracted(length: f32) -> Self {
        Self { length, extend_ticks: 0, lock_ticks: 0 }
    }

    #[inline]
    pub fn is_extending(&self) -> bool {
        self.extend_ticks > 0
    }

    #[inline]
    pub fn is_locked(&self) -> bool {
        self.lock_ticks > 0
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct TrailState {
    until_ms: u64,
    next_drop_ms: u64,
    last_drop_pos: Vec2,
}

// ============================================================================
// Fighter
// ============================================================================

#[derive(Debug, Clone)]
pub struct Fighter {
    pub side: Side,
    pub name: String,

    pub pos: Vec2,
    pub prev_pos: Vec2,
    spawn: Vec2,
    pub radius: f32,
    pub facing: f32,
    pub facing_when_ko: f32,

    pub life: f32,
    pub max_life: f32,
    pub energy: f32,
    pub max_energy: f32,

    pub left: ArmState,
    pub right: ArmState,
    pub punch_cd: u32,

    pub dodge_cd: u32,
    pub dodge_ticks: u32,
    pub counter_window: u32,
    pub sound_cd: u32,

    pub knocked_out: bool,
    pub knockout_vulnerability: f32,

    pub round_lost: bool,
    pub carry_damage: f32,

    trail: TrailState,

    pub policy: QPolicy,
    pub last_action: Action,
}

impl Fighter {
    pub fn new(side: Side, spawn: Vec2, cfg: &BoutConfig) -> Self {
        let f = &cfg.fighter;
        Self {
            side,
            name: side.name().to_string(),
            pos: spawn,
            prev_pos: spawn,
            spawn,
            radius: f.radius(),
            facing: 0.0,
            facing_when_ko: 0.0,
            life: f.max_life,
            max_life: f.max_life,
            energy: f.max_energy,
            max_energy: f.max_energy,
            left: ArmState::retracted(f.arm_retract),
            right: ArmState::retracted(f.arm_retract),
            punch_cd: 0,
            dodge_cd: 0,
            dodge_ticks: 0,
            counter_window: 0,
            sound_cd: 0,
            knocked_out: false,
            knockout_vulnerability: f.knockout_punch_chance,
            round_lost: false,
            carry_damage: 0.0,
            trail: TrailState { last_drop_pos: spawn, ..TrailState::default() },
            policy: QPolicy::new(&cfg.learning),
            last_action: Action::Idle,
        }
    }

    /// Spawn point for `side`: vertically centred, inset from its rope.
    pub fn spawn_point(side: Side, arena: &ArenaConfig) -> Vec2 {
        let y = (arena.height / 2.0).floor();
        match side {
            Side::Red => Vec2::new(arena.spawn_inset, y),
            Side::Blue => Vec2::new(arena.width - arena.spawn_inset, y),
        }
    }

    pub fn spawn(&self) -> Vec2 {
        self.spawn
    }

    // ========== Status ==========

    pub fn arm(&self, arm: Arm) -> &ArmState {
        match arm {
            Arm::Left => &self.left,
            Arm::Right => &self.right,
        }
    }

    pub fn arm_mut(&mut self, arm: Arm) -> &mut ArmState {
        match arm {
            Arm::Left => &mut self.left,
            Arm::Right => &mut self.right,
        }
    }

    #[inline]
    pub fn is_dodging(&self) -> bool {
        self.dodge_ticks > 0
    }

    #[inline]
    pub fn punch_ready(&self) -> bool {
        self.punch_cd == 0
    }

    #[inline]
    pub fn dodge_ready(&self) -> bool {
        self.dodge_cd == 0
    }

    #[inline]
    pub fn counter_window_open(&self) -> bool {
        self.counter_window > 0
    }

    pub fn any_arm_extending(&self) -> bool {
        self.left.is_extending() || self.right.is_extending()
    }

    pub fn any_arm_locked(&self) -> bool {
        self.left.is_locked() || self.right.is_locked()
    }

    pub fn is_down(&self) -> bool {
        self.life <= 0.0
    }

    pub fn life_fraction(&self) -> f32 {
        (self.life / self.max_life).clamp(0.0, 1.0)
    }

    pub fn energy_fraction(&self) -> f32 {
        (self.energy / self.max_energy).clamp(0.0, 1.0)
    }

    // ========== Movement ==========

    /// Face the opponent. Coincident positions keep the current facing.
    pub fn update_facing(&mut self, target: Vec2) {
        let d = target - self.pos;
        if !d.is_zero() {
            self.facing = d.angle();
        }
    }

    /// Keep the whole head inside the ring.
    pub fn clamp_inside(&mut self, arena: &ArenaConfig) {
        let half = self.radius;
        self.pos.x = self.pos.x.clamp(half, (arena.width - half).max(half));
        self.pos.y = self.pos.y.clamp(half, (arena.height - half).max(half));
    }

    /// Start a dodge if energy and cooldown allow, bursting along
    /// `direction` (or a random perpendicular side if none is given).
    pub fn attempt_dodge(
        &mut self,
        direction: Option<Vec2>,
        cfg: &FighterConfig,
        arena: &ArenaConfig,
        rng: &mut dyn CombatRng,
    ) -> bool {
        if self.energy < cfg.dodge_cost || self.dodge_cd != 0 {
            return false;
        }

        self.energy = (self.energy - cfg.dodge_cost).max(0.0);
        self.dodge_cd = cfg.dodge_cooldown;
        self.dodge_ticks = cfg.dodge_frames;

        let dir = match direction.and_then(Vec2::try_normalize) {
            Some(d) => d,
            None => {
                let turn = if rng.next_unit() < 0.5 { FRAC_PI_2 } else { -FRAC_PI_2 };
                Vec2::from_angle(self.facing + turn)
            }
        };

        self.pos += dir * (cfg.speed * cfg.dodge_speed_mult * cfg.dodge_burst_mult);
        self.clamp_inside(arena);
        true
    }

    // ========== Punching ==========

    /// Try to start a punch. Returns the arm used, or `None` when on
    /// cooldown, short on energy, already mid-punch, or the arm is locked.
    pub fn attempt_punch(
        &mut self,
        kind: PunchKind,
        preferred: Option<Arm>,
        cfg: &FighterConfig,
        rng: &mut dyn CombatRng,
    ) -> Option<Arm> {
        if self.punch_cd != 0 {
            return None;
        }

        let class = *cfg.punch(kind);
        if self.energy < class.cost {
            return None;
        }

        // one animation in flight at a time
        if self.any_arm_extending() {
            return None;
        }

        let arm = match preferred {
            Some(arm) if self.arm(arm).is_locked() => return None,
            Some(arm) => arm,
            None => match (self.left.is_locked(), self.right.is_locked()) {
                (true, true) => return None,
                (false, true) => Arm::Left,
                (true, false) => Arm::Right,
                (false, false) => {
                    if rng.next_unit() < 0.5 {
                        Arm::Left
                    } else {
                        Arm::Right
                    }
                }
            },
        };

        self.energy = (self.energy - class.cost).max(0.0);
        self.punch_cd = class.cooldown;

        let state = self.arm_mut(arm);
        state.length = class.reach;
        state.extend_ticks = cfg.punch_frames;

        Some(arm)
    }

    /// Abort the animation on `arm` and retract it.
    pub fn cancel_punch_arm(&mut self, arm: Arm, cfg: &FighterConfig) {
        let state = self.arm_mut(arm);
        state.extend_ticks = 0;
        state.length = cfg.arm_retract;
    }

    /// Lock `arm` for at least `ticks`. Locks are exclusive: the other arm
    /// is released.
    pub fn lock_arm(&mut self, arm: Arm, ticks: u32) {
        let state = self.arm_mut(arm);
        state.lock_ticks = state.lock_ticks.max(ticks);
        self.arm_mut(arm.other()).lock_ticks = 0;
    }

    /// Shoulder anchor of `arm` on the head circle.
    pub fn shoulder(&self, arm: Arm) -> Vec2 {
        self.pos + Vec2::from_angle(self.facing + arm.shoulder_turn()) * self.radius
    }

    /// Committed arm segment (shoulder to arm end) along the facing.
    pub fn arm_segment(&self, arm: Arm) -> (Vec2, Vec2) {
        let start = self.shoulder(arm);
        let end = start + Vec2::from_angle(self.facing) * self.arm(arm).length;
        (start, end)
    }

    // ========== Damage ==========

    /// Subtract damage, flooring life at zero. Returns the damage absorbed.
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        let before = self.life;
        self.life = (self.life - amount.max(0.0)).max(0.0);
        before - self.life
    }

    /// Drop to the canvas immediately.
    pub fn knock_out(&mut self) {
        self.life = 0.0;
        self.knocked_out = true;
        self.facing_when_ko = self.facing;
    }

    pub fn regenerate(&mut self, amount: f32) {
        self.energy = (self.energy + amount).min(self.max_energy);
    }

    // ========== Timers ==========

    /// Advance every per-tick timer by one.
    pub fn tick_timers(&mut self, cfg: &FighterConfig) {
        self.punch_cd = self.punch_cd.saturating_sub(1);
        self.dodge_cd = self.dodge_cd.saturating_sub(1);
        self.dodge_ticks = self.dodge_ticks.saturating_sub(1);
        self.sound_cd = self.sound_cd.saturating_sub(1);

        for arm in [Arm::Left, Arm::Right] {
            let state = self.arm_mut(arm);
            if state.extend_ticks > 0 {
                state.extend_ticks -= 1;
                if state.extend_ticks == 0 {
                    state.length = cfg.arm_retract;
                }
            }
        }

        if self.life <= 0.0 && !self.knocked_out {
            self.knock_out();
        }

        self.left.lock_ticks = self.left.lock_ticks.saturating_sub(1);
        self.right.lock_ticks = self.right.lock_ticks.saturating_sub(1);
        self.counter_window = self.counter_window.saturating_sub(1);
    }

    // ========== Motion trail ==========

    /// Open the trail window after taking a hit.
    pub fn start_trail(&mut self, now_ms: u64, fx: &FxConfig) {
        self.trail.until_ms = now_ms + fx.trail_duration_ms;
        self.trail.next_drop_ms = now_ms;
        self.trail.last_drop_pos = self.pos;
    }

    pub fn trail_active(&self, now_ms: u64) -> bool {
        now_ms < self.trail.until_ms
    }

    /// Where to drop the next trail decal, if one is due.
    pub fn maybe_drop_trail(
        &mut self,
        now_ms: u64,
        fx: &FxConfig,
        rng: &mut dyn CombatRng,
    ) -> Option<Vec2> {
        if now_ms >= self.trail.until_ms || now_ms < self.trail.next_drop_ms {
            return None;
        }
        if self.pos.distance(self.trail.last_drop_pos) < fx.trail_drop_min_dist {
            return None;
        }

        let offset = match (self.pos - self.prev_pos).try_normalize() {
            Some(dir) => -dir * fx.trail_back_offset,
            None => Vec2::ZERO,
        };
        let jitter = Vec2::new(
            rng.uniform(-fx.trail_jitter_px, fx.trail_jitter_px),
            rng.uniform(-fx.trail_jitter_px, fx.trail_jitter_px),
        );

        self.trail.last_drop_pos = self.pos;
        self.trail.next_drop_ms = now_ms + fx.trail_drop_every_ms;
        Some(self.pos + offset + jitter)
    }

    // ========== Round lifecycle ==========

    /// Restore position, life, energy and timers for a new round. The
    /// policy, knockout vulnerability and carried damage persist; a lost
    /// round adds to the carried damage first.
    pub fn reset(&mut self, cfg: &FighterConfig) {
        if self.round_lost {
            self.carry_damage += cfg.carry_damage_per_loss;
        }
        let max_carry = (self.max_life - cfg.min_start_life).max(0.0);
        self.carry_damage = self.carry_damage.clamp(0.0, max_carry);

        self.life = cfg.min_start_life.max(self.max_life - self.carry_damage);
        self.energy = self.max_energy;
        self.knocked_out = false;

        self.pos = self.spawn;
        self.prev_pos = self.spawn;

        self.punch_cd = 0;
        self.dodge_cd = 0;
        self.dodge_ticks = 0;
        self.counter_window = 0;
        self.left = ArmState::retracted(cfg.arm_retract);
        self.right = ArmState::retracted(cfg.arm_retract);

        self.trail = TrailState { last_drop_pos: self.spawn, ..TrailState::default() };

        self.round_lost = false;
        self.facing_when_ko = self.facing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::rng::ScriptedEntropy;

    fn fighter() -> (Fighter, BoutConfig) {
        let cfg = BoutConfig::deterministic();
        let spawn = Fighter::spawn_point(Side::Red, &cfg.arena);
        (Fighter::new(Side::Red, spawn, &cfg), cfg)
    }

    #[test]
    fn test_spawn_points() {
        let arena = ArenaConfig::default();
        assert_eq!(Fighter::spawn_point(Side::Red, &arena), Vec2::new(140.0, 300.0));
        assert_eq!(Fighter::spawn_point(Side::Blue, &arena), Vec2::new(660.0, 300.0));
    }

    #[test]
    fn test_punch_start_deducts_and_extends() {
        let (mut f, cfg) = fighter();
        let mut rng = ScriptedEntropy::constant(0.3);

        let arm = f.attempt_punch(PunchKind::Medium, Some(Arm::Right), &cfg.fighter, &mut rng);

        assert_eq!(arm, Some(Arm::Right));
        assert_eq!(f.energy, 70.0);
        assert_eq!(f.punch_cd, 68);
        assert_eq!(f.right.length, 105.0);
        assert_eq!(f.right.extend_ticks, 10);
        assert_eq!(f.left.length, 28.0);
    }

    #[test]
    fn test_punch_refused_on_cooldown_energy_or_lock() {
        let (mut f, cfg) = fighter();
        let mut rng = ScriptedEntropy::constant(0.3);

        f.punch_cd = 3;
        assert_eq!(f.attempt_punch(PunchKind::Short, Some(Arm::Left), &cfg.fighter, &mut rng), None);

        f.punch_cd = 0;
        f.energy = 49.0;
        assert_eq!(f.attempt_punch(PunchKind::Long, Some(Arm::Left), &cfg.fighter, &mut rng), None);
        assert_eq!(f.energy, 49.0);

        f.lock_arm(Arm::Left, 5);
        assert_eq!(f.attempt_punch(PunchKind::Short, Some(Arm::Left), &cfg.fighter, &mut rng), None);
        assert_eq!(
            f.attempt_punch(PunchKind::Short, None, &cfg.fighter, &mut rng),
            Some(Arm::Right)
        );
    }

    #[test]
    fn test_punch_refused_while_arm_in_flight() {
        let (mut f, cfg) = fighter();
        let mut rng = ScriptedEntropy::constant(0.3);

        f.left.extend_ticks = 2;
        assert_eq!(f.attempt_punch(PunchKind::Short, Some(Arm::Right), &cfg.fighter, &mut rng), None);
    }

    #[test]
    fn test_lock_is_exclusive() {
        let (mut f, _) = fighter();
        f.lock_arm(Arm::Left, 14);
        f.lock_arm(Arm::Right, 6);
        assert_eq!(f.left.lock_ticks, 0);
        assert_eq!(f.right.lock_ticks, 6);

        f.lock_arm(Arm::Right, 3);
        assert_eq!(f.right.lock_ticks, 6);
    }

    #[test]
    fn test_timers_retract_arm_on_expiry() {
        let (mut f, cfg) = fighter();
        let mut rng = ScriptedEntropy::constant(0.3);
        f.attempt_punch(PunchKind::Short, Some(Arm::Left), &cfg.fighter, &mut rng);

        for _ in 0..9 {
            f.tick_timers(&cfg.fighter);
        }
        assert_eq!(f.left.length, 82.0);
        f.tick_timers(&cfg.fighter);
        assert_eq!(f.left.length, 28.0);
        assert_eq!(f.left.extend_ticks, 0);
        assert_eq!(f.punch_cd, 32);
    }

    #[test]
    fn test_lethal_life_flags_knockout_on_tick() {
        let (mut f, cfg) = fighter();
        f.facing = 1.25;
        f.take_damage(500.0);
        assert_eq!(f.life, 0.0);
        assert!(!f.knocked_out);

        f.tick_timers(&cfg.fighter);
        assert!(f.knocked_out);
        assert_eq!(f.facing_when_ko, 1.25);
    }

    #[test]
    fn test_dodge_requires_energy_and_cooldown() {
        let (mut f, cfg) = fighter();
        let mut rng = ScriptedEntropy::constant(0.3);
        f.energy = 10.0;
        assert!(!f.attempt_dodge(None, &cfg.fighter, &cfg.arena, &mut rng));

        f.energy = 100.0;
        f.pos = Vec2::new(400.0, 300.0);
        assert!(f.attempt_dodge(Some(Vec2::new(0.0, 1.0)), &cfg.fighter, &cfg.arena, &mut rng));
        assert_eq!(f.energy, 76.0);
        assert_eq!(f.dodge_cd, 180);
        assert_eq!(f.dodge_ticks, 14);
        let burst = 4.15 * 2.1 * 6.0;
        assert!((f.pos.y - (300.0 + burst)).abs() < 1e-3);

        assert!(!f.attempt_dodge(None, &cfg.fighter, &cfg.arena, &mut rng));
    }

    #[test]
    fn test_dodge_without_direction_goes_perpendicular() {
        let (mut f, cfg) = fighter();
        f.pos = Vec2::new(400.0, 300.0);
        f.facing = 0.0;
        let mut rng = ScriptedEntropy::constant(0.1);

        assert!(f.attempt_dodge(None, &cfg.fighter, &cfg.arena, &mut rng));
        assert!((f.pos.x - 400.0).abs() < 1e-3);
        assert!(f.pos.y > 300.0);
    }

    #[test]
    fn test_clamp_inside() {
        let (mut f, cfg) = fighter();
        f.pos = Vec2::new(-50.0, 900.0);
        f.clamp_inside(&cfg.arena);
        assert_eq!(f.pos, Vec2::new(55.0, 545.0));
    }

    #[test]
    fn test_reset_applies_carry_damage() {
        let (mut f, cfg) = fighter();
        f.round_lost = true;
        f.life = 3.0;
        f.reset(&cfg.fighter);
        assert_eq!(f.carry_damage, 18.0);
        assert_eq!(f.life, 182.0);
        assert!(!f.round_lost);
        assert_eq!(f.pos, f.spawn());
    }

    #[test]
    fn test_carry_damage_never_breaks_minimum_life() {
        let (mut f, cfg) = fighter();
        for _ in 0..20 {
            f.round_lost = true;
            f.reset(&cfg.fighter);
            assert!(f.life >= cfg.fighter.min_start_life);
            assert_eq!(f.life, cfg.fighter.min_start_life.max(f.max_life - f.carry_damage));
        }
        assert_eq!(f.carry_damage, 130.0);
        assert_eq!(f.life, 70.0);
    }

    #[test]
    fn test_reset_keeps_policy() {
        let (mut f, cfg) = fighter();
        f.policy.table_mut().set(5, Action::Dodge, 3.0);
        f.policy.set_epsilon(0.1);
        f.reset(&cfg.fighter);
        assert_eq!(f.policy.table().get(5, Action::Dodge), 3.0);
        assert_eq!(f.policy.epsilon(), 0.1);
    }

    #[test]
    fn test_trail_drop_requires_travel() {
        let (mut f, cfg) = fighter();
        let mut rng = ScriptedEntropy::constant(0.5);
        f.pos = Vec2::new(300.0, 300.0);
        f.start_trail(1_000, &cfg.fx);

        assert!(f.maybe_drop_trail(1_000, &cfg.fx, &mut rng).is_none());

        f.prev_pos = Vec2::new(310.0, 300.0);
        f.pos = Vec2::new(320.0, 300.0);
        let drop = f.maybe_drop_trail(1_000, &cfg.fx, &mut rng).unwrap();
        // behind the direction of travel, zero jitter at u = 0.5
        assert!((drop.x - 302.0).abs() < 1e-3);
        assert!((drop.y - 300.0).abs() < 1e-3);

        // rate limited
        f.pos = Vec2::new(350.0, 300.0);
        assert!(f.maybe_drop_trail(1_040, &cfg.fx, &mut rng).is_none());
        assert!(f.maybe_drop_trail(1_080, &cfg.fx, &mut rng).is_some());

        // window closed
        f.pos = Vec2::new(400.0, 300.0);
        assert!(f.maybe_drop_trail(3_400, &cfg.fx, &mut rng).is_none());
    }
}
