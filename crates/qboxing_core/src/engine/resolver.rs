//! Combat Resolver
//!
//! Advances both fighters by exactly one tick. Fixed order:
//!
//! 1. snapshot positions, encode states, pick actions, face the opponent
//! 2. movement (with lateral jitter), dodge bursts, engagement pull
//! 3. clamp to the ring, then circular separation of the two heads
//! 4. punch start with glove alignment -> one [`PunchIntent`] per fighter
//! 5. intent-ordered hit resolution with same-side counter arbitration
//! 6. trail drops, energy regen, timers
//! 7. rewards, post-tick encode, TD update, epsilon decay
//!
//! Resolution is infallible: degenerate geometry falls back to a no-op and
//! every random draw comes from the injected [`CombatRng`].

use tracing::{debug, trace};

use super::config::BoutConfig;
use super::damage::{roll_damage, HitTier};
use super::decals::DecalBuffer;
use super::events::CombatEvent;
use super::fighter::{Arm, Fighter, Side};
use super::geometry::{
    closest_point_on_segment, ray_circle_first_intersection, segment_circle_hit, Vec2, EPSILON_LEN,
};
use super::intent::{is_same_side, order_intents, PunchIntent};
use super::policy::Action;
use super::reward::{RewardContext, RewardFunction};
use super::rng::CombatRng;
use super::state_encoder::StateEncoder;

// ============================================================================
// Tick I/O
// ============================================================================

/// Banner expiry timestamps for the HUD.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Banners {
    pub super_punch_until_ms: u64,
    pub knockout_until_ms: u64,
    pub dodge_until_ms: u64,
}

/// Bout-level state a tick writes side effects into.
#[derive(Debug, Clone)]
pub struct TickEffects {
    pub decals: DecalBuffer,
    pub events: Vec<CombatEvent>,
    pub banners: Banners,
}

impl TickEffects {
    pub fn new(cfg: &BoutConfig) -> Self {
        Self {
            decals: DecalBuffer::new(cfg.fx.max_decals),
            events: Vec::new(),
            banners: Banners::default(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TickInput {
    pub now_ms: u64,
    /// Round seconds left
    pub time_left: u32,
    /// Milliseconds since the round started
    pub round_elapsed_ms: u64,
    /// Late-round separation allowance
    pub distance_allowance: f32,
}

/// What one fighter's punch did this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PunchReport {
    pub damage_dealt: f32,
    pub landed: bool,
    pub super_punch: bool,
    pub did_counter: bool,
    pub got_countered: bool,
    /// Evaded an attack that would have connected
    pub real_dodge: bool,
    pub got_real_dodged: bool,
    pub counter_attack_hit: bool,
    pub knockout_punch: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SideOutcome {
    pub action: Action,
    pub reward: f32,
    pub damage_taken: f32,
    pub punch_started: bool,
    pub punch: PunchReport,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutcome {
    /// Either fighter is down.
    pub done: bool,
    pub red: SideOutcome,
    pub blue: SideOutcome,
}

impl TickOutcome {
    pub fn side(&self, side: Side) -> &SideOutcome {
        match side {
            Side::Red => &self.red,
            Side::Blue => &self.blue,
        }
    }
}

enum HitTest {
    Miss,
    /// Dodge roll succeeded; `would_hit` tells whether the arm touched.
    Evaded { would_hit: bool },
    Hit(Vec2),
}

#[inline]
fn slot(side: Side) -> usize {
    match side {
        Side::Red => 0,
        Side::Blue => 1,
    }
}

/// (actor, target) for `actor`.
fn pair_mut<'f>(
    red: &'f mut Fighter,
    blue: &'f mut Fighter,
    actor: Side,
) -> (&'f mut Fighter, &'f mut Fighter) {
    match actor {
        Side::Red => (red, blue),
        Side::Blue => (blue, red),
    }
}

// ============================================================================
// Resolver
// ============================================================================

pub struct Resolver<'a> {
    cfg: &'a BoutConfig,
    encoder: &'a StateEncoder,
    reward: &'a dyn RewardFunction,
}

impl<'a> Resolver<'a> {
    pub fn new(cfg: &'a BoutConfig, encoder: &'a StateEncoder, reward: &'a dyn RewardFunction) -> Self {
        Self { cfg, encoder, reward }
    }

    /// Resolve one full tick.
    pub fn tick(
        &self,
        red: &mut Fighter,
        blue: &mut Fighter,
        fx: &mut TickEffects,
        rng: &mut dyn CombatRng,
        input: TickInput,
    ) -> TickOutcome {
        let cfg = self.cfg;
        let now = input.now_ms;

        red.prev_pos = red.pos;
        blue.prev_pos = blue.pos;

        let s_red = self.encoder.encode(red, blue, input.time_left);
        let s_blue = self.encoder.encode(blue, red, input.time_left);

        let a_red = red.policy.choose_action(s_red, rng);
        let a_blue = blue.policy.choose_action(s_blue, rng);
        red.last_action = a_red;
        blue.last_action = a_blue;

        red.update_facing(blue.pos);
        blue.update_facing(red.pos);

        let dist_before = red.pos.distance(blue.pos);

        // ========== Movement ==========
        let move_red = self.action_to_move(a_red, rng);
        let move_blue = self.action_to_move(a_blue, rng);

        for f in [&mut *red, &mut *blue] {
            if f.last_action == Action::Dodge {
                let dir = Vec2::from_angle(f.facing + f.side.dodge_turn());
                f.attempt_dodge(Some(dir), &cfg.fighter, &cfg.arena, rng);
            }
        }

        let eng_red = self.engagement_force(red.pos, blue.pos, input.round_elapsed_ms);
        let eng_blue = self.engagement_force(blue.pos, red.pos, input.round_elapsed_ms);

        self.apply_motion(red, move_red, eng_red);
        self.apply_motion(blue, move_blue, eng_blue);

        self.separate(red, blue);

        // ========== Punches ==========
        let red_intent = self.start_punch(red, blue, a_red, rng);
        let blue_intent = self.start_punch(blue, red, a_blue, rng);

        let red_life_before = red.life;
        let blue_life_before = blue.life;

        let reports = self.resolve_punch_intents(red, blue, [red_intent, blue_intent], fx, rng, now);

        // ========== Trail, regen, timers ==========
        for f in [&mut *red, &mut *blue] {
            if let Some(pos) = f.maybe_drop_trail(now, &cfg.fx, rng) {
                if let Some(decal) = fx.decals.spawn(pos, now, &cfg.fx, rng) {
                    fx.events.push(CombatEvent::DecalSpawned { decal });
                }
            }
        }

        let taken_red = (red_life_before - red.life).max(0.0);
        let taken_blue = (blue_life_before - blue.life).max(0.0);

        let moved_red = !move_red.is_zero() || red.is_dodging() || !eng_red.is_zero();
        let moved_blue = !move_blue.is_zero() || blue.is_dodging() || !eng_blue.is_zero();
        red.regenerate(self.regen(moved_red));
        blue.regenerate(self.regen(moved_blue));

        let dist_after = red.pos.distance(blue.pos);

        red.tick_timers(&cfg.fighter);
        blue.tick_timers(&cfg.fighter);

        // ========== Learning ==========
        let ctx = |f: &Fighter, action: Action, report: &PunchReport, taken: f32| RewardContext {
            action,
            damage_dealt: report.damage_dealt,
            damage_taken: taken,
            dist_before,
            dist_after,
            time_left: input.time_left,
            energy: f.energy,
            radius: f.radius,
            distance_allowance: input.distance_allowance,
            did_counter: report.did_counter,
            got_countered: report.got_countered,
            real_dodge: report.real_dodge,
            got_real_dodged: report.got_real_dodged,
            counter_attack_hit: report.counter_attack_hit,
        };

        let mut r_red = self.reward.compute(&ctx(red, a_red, &reports[0], taken_red));
        let mut r_blue = self.reward.compute(&ctx(blue, a_blue, &reports[1], taken_blue));

        let done = red.is_down() || blue.is_down();
        if done {
            r_red += self.reward.terminal(red.is_down(), blue.is_down());
            r_blue += self.reward.terminal(blue.is_down(), red.is_down());
        }

        let s2_red = self.encoder.encode(red, blue, input.time_left);
        let s2_blue = self.encoder.encode(blue, red, input.time_left);

        red.policy.update(s_red, a_red, r_red, s2_red, done);
        blue.policy.update(s_blue, a_blue, r_blue, s2_blue, done);
        red.policy.decay_epsilon();
        blue.policy.decay_epsilon();

        trace!(
            red_action = a_red.name(),
            blue_action = a_blue.name(),
            r_red,
            r_blue,
            dist_before,
            dist_after,
            "tick resolved"
        );

        TickOutcome {
            done,
            red: SideOutcome {
                action: a_red,
                reward: r_red,
                damage_taken: taken_red,
                punch_started: red_intent.started,
                punch: reports[0],
            },
            blue: SideOutcome {
                action: a_blue,
                reward: r_blue,
                damage_taken: taken_blue,
                punch_started: blue_intent.started,
                punch: reports[1],
            },
        }
    }

    // ========================================================================
    // Movement
    // ========================================================================

    /// Walking displacement for `action`, with an occasional lateral nudge.
    pub fn action_to_move(&self, action: Action, rng: &mut dyn CombatRng) -> Vec2 {
        let f = &self.cfg.fighter;
        let Some(dir) = action.move_dir() else {
            return Vec2::ZERO;
        };

        let mut v = dir * f.speed;
        if rng.roll(f.move_jitter_chance) {
            let nudge = f.speed * f.move_jitter_frac;
            if rng.next_unit() < 0.5 {
                v.x += rng.sign() * nudge;
            } else {
                v.y += rng.sign() * nudge;
            }
        }
        v
    }

    /// Pull toward the opponent once farther apart than the engage distance.
    pub fn engagement_force(&self, from: Vec2, to: Vec2, round_elapsed_ms: u64) -> Vec2 {
        let a = &self.cfg.arena;
        let delta = to - from;
        let d = delta.length();
        if d < EPSILON_LEN || d < a.engage_dist {
            return Vec2::ZERO;
        }

        let n = delta * (1.0 / d);
        let scale = ((d - a.engage_dist) / a.engage_ramp_px).clamp(0.0, 1.0);
        let opening = (round_elapsed_ms as f32) < a.engage_opening_sec * 1000.0;
        let force = if opening { a.engage_opening_force } else { a.engage_force };

        n * (force * scale)
    }

    fn apply_motion(&self, f: &mut Fighter, walk: Vec2, engage: Vec2) {
        let fc = &self.cfg.fighter;
        let speed_mult = if f.is_dodging() { fc.dodge_speed_mult } else { 1.0 };
        f.pos += walk * speed_mult + engage * (fc.speed * self.cfg.arena.engage_speed_mult);
        f.clamp_inside(&self.cfg.arena);
    }

    /// Push overlapping heads apart symmetrically until the body gap holds.
    pub fn separate(&self, red: &mut Fighter, blue: &mut Fighter) {
        let delta = blue.pos - red.pos;
        let d = delta.length();
        let min_d = red.radius + blue.radius + self.cfg.arena.body_gap_px;

        if d < min_d && d > EPSILON_LEN {
            let push = (min_d - d) * 0.5;
            let n = delta * (1.0 / d);
            red.pos -= n * push;
            blue.pos += n * push;
            red.clamp_inside(&self.cfg.arena);
            blue.clamp_inside(&self.cfg.arena);
        }
    }

    fn regen(&self, moved: bool) -> f32 {
        if moved {
            self.cfg.fighter.regen_move
        } else {
            self.cfg.fighter.regen_idle
        }
    }

    // ========================================================================
    // Punch start
    // ========================================================================

    /// Start `action`'s punch if possible and align the glove so its tip
    /// stops at the defender's hit circle.
    pub fn start_punch(
        &self,
        attacker: &mut Fighter,
        defender: &Fighter,
        action: Action,
        rng: &mut dyn CombatRng,
    ) -> PunchIntent {
        let fc = &self.cfg.fighter;
        let Some((kind, preferred)) = action.punch() else {
            return PunchIntent::idle(attacker.side, action);
        };
        let Some(arm) = attacker.attempt_punch(kind, Some(preferred), fc, rng) else {
            return PunchIntent::idle(attacker.side, action);
        };

        let shoulder = attacker.shoulder(arm);
        let dir = Vec2::from_angle(attacker.facing);
        let contact_r =
            defender.radius * fc.hit_radius_mult + fc.punch_contact_gap_px + fc.glove_forward_reach();

        match ray_circle_first_intersection(shoulder, dir, defender.pos, contact_r) {
            Some(t) => {
                attacker.arm_mut(arm).length = t.max(fc.arm_retract).min(fc.punch(kind).reach);
                PunchIntent::started(attacker.side, action, kind, arm, t)
            }
            None => PunchIntent::started(attacker.side, action, kind, arm, f32::INFINITY),
        }
    }

    // ========================================================================
    // Hit resolution
    // ========================================================================

    fn try_hit(
        &self,
        attacker: &Fighter,
        defender: &Fighter,
        arm: Arm,
        rng: &mut dyn CombatRng,
    ) -> HitTest {
        let fc = &self.cfg.fighter;
        let evaded = defender.is_dodging() && rng.roll(fc.dodge_evade_prob);

        let (a, b) = attacker.arm_segment(arm);
        let touches = segment_circle_hit(a, b, defender.pos, defender.radius * fc.hit_radius_mult);

        if evaded {
            HitTest::Evaded { would_hit: touches }
        } else if touches {
            HitTest::Hit(closest_point_on_segment(a, b, defender.pos))
        } else {
            HitTest::Miss
        }
    }

    /// Resolve both intents in contact order. Returns reports indexed
    /// red, blue.
    pub fn resolve_punch_intents(
        &self,
        red: &mut Fighter,
        blue: &mut Fighter,
        intents: [PunchIntent; 2],
        fx: &mut TickEffects,
        rng: &mut dyn CombatRng,
        now_ms: u64,
    ) -> [PunchReport; 2] {
        let cfg = self.cfg;
        let mut reports = [PunchReport::default(); 2];

        let same_side = is_same_side(&intents[0], &intents[1]);
        let mut ordered = order_intents(intents[0], intents[1]);

        for i in 0..ordered.len() {
            let p = ordered[i];
            if !p.is_live() {
                continue;
            }
            let (Some(arm), Some(kind)) = (p.arm, p.kind) else {
                continue;
            };

            let (actor, target) = pair_mut(&mut *red, &mut *blue, p.actor);
            if actor.is_down() || target.is_down() {
                continue;
            }

            let hit_pos = match self.try_hit(actor, target, arm, rng) {
                HitTest::Hit(pos) => pos,
                HitTest::Miss => continue,
                HitTest::Evaded { would_hit } => {
                    if would_hit && cfg.fighter.real_dodge_enabled {
                        target.counter_window = cfg.fighter.counter_window_frames;
                        reports[slot(target.side)].real_dodge = true;
                        reports[slot(actor.side)].got_real_dodged = true;
                        fx.banners.dodge_until_ms = now_ms + cfg.fx.dodge_msg_ms;
                        fx.events.push(CombatEvent::RealDodge { defender: target.side });
                        debug!(defender = target.side.name(), "real dodge");
                    }
                    continue;
                }
            };

            let dist = actor.pos.distance(target.pos);
            let roll = roll_damage(kind, actor.energy_fraction(), dist, &cfg.damage, rng);
            let mut dmg = roll.amount;

            let report = &mut reports[slot(actor.side)];
            if roll.super_punch {
                let until_ms = now_ms + cfg.fx.super_punch_msg_ms;
                fx.banners.super_punch_until_ms = until_ms;
                fx.events.push(CombatEvent::SuperPunch { side: actor.side, until_ms });
                report.super_punch = true;
            }

            // first to land with the same arm cancels the other punch
            if same_side && i == 0 {
                let other = &mut ordered[1];
                if other.started && other.arm == Some(arm) && !other.canceled {
                    dmg *= 1.0 + cfg.fighter.counter_damage_bonus;
                    target.cancel_punch_arm(arm, &cfg.fighter);
                    target.lock_arm(arm, cfg.fighter.counter_arm_lock_frames);
                    other.canceled = true;

                    report.did_counter = true;
                    fx.events.push(CombatEvent::SameSideCounter { winner: actor.side, arm });
                    debug!(winner = actor.side.name(), ?arm, "same-side counter");
                }
            }

            if cfg.fighter.real_dodge_enabled && actor.counter_window_open() {
                dmg *= cfg.fighter.counter_attack_mult;
                actor.counter_window = 0;
                report.counter_attack_hit = true;
            }

            report.damage_dealt += dmg;
            report.landed = true;

            if self.apply_damage(actor, target, dmg, hit_pos, fx, rng, now_ms) {
                reports[slot(actor.side)].knockout_punch = true;
            }
        }

        for side in [Side::Red, Side::Blue] {
            if reports[slot(side)].did_counter {
                reports[slot(side.opponent())].got_countered = true;
            }
        }

        reports
    }

    /// Apply landed damage and its side effects. Returns `true` when the
    /// knockout-vulnerability roll dropped the defender.
    #[allow(clippy::too_many_arguments)]
    fn apply_damage(
        &self,
        attacker: &mut Fighter,
        defender: &mut Fighter,
        amount: f32,
        hit_pos: Vec2,
        fx: &mut TickEffects,
        rng: &mut dyn CombatRng,
        now_ms: u64,
    ) -> bool {
        let cfg = self.cfg;
        defender.take_damage(amount);

        if let Some(decal) = fx.decals.spawn(hit_pos, now_ms, &cfg.fx, rng) {
            fx.events.push(CombatEvent::DecalSpawned { decal });
        }
        defender.start_trail(now_ms, &cfg.fx);

        if attacker.sound_cd == 0 {
            let tier = HitTier::for_damage(amount, &cfg.damage);
            fx.events.push(CombatEvent::HitSound { side: attacker.side, tier });
            attacker.sound_cd = cfg.fighter.sound_cooldown;
        }

        if rng.roll(defender.knockout_vulnerability) {
            defender.knock_out();
            let until_ms = now_ms + cfg.fx.knockout_punch_msg_ms;
            fx.banners.knockout_until_ms = until_ms;
            fx.events.push(CombatEvent::KnockoutPunch { side: attacker.side, until_ms });
            debug!(attacker = attacker.side.name(), "knockout punch");
            return true;
        }
        false
    }
}
