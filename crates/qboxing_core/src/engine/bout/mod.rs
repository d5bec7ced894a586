//! # Bout Orchestrator
//!
//! Owns both fighters, the random source, the round clock and every
//! bout-level collection (decals, events, stats).
//!
//! ## Round state machine
//!
//! ```text
//! in-round --(timeout | knockout)--> round-over --(delay)--> in-round
//!     ... --(max rounds | early victory)--> game-over
//! ```
//!
//! - timeout: higher life takes the round, a tie scores for both
//! - knockout: the fighter still standing takes the round; the loser's
//!   knockout vulnerability grows; a double knockout scores nobody
//! - early victory: one side leads by more than the rounds remaining
//!
//! ## Usage
//!
//! ```rust
//! use qboxing_core::engine::bout::Bout;
//! use qboxing_core::engine::clock::{Clock, ManualClock};
//! use qboxing_core::engine::config::BoutConfig;
//!
//! let mut cfg = BoutConfig::compact();
//! cfg.arena.max_rounds = 1;
//! cfg.arena.round_time_sec = 2;
//!
//! let mut clock = ManualClock::new(0);
//! let mut bout = Bout::seeded(cfg, 7, clock.now_ms()).unwrap();
//! bout.run_headless(&mut clock, 10_000);
//! assert!(bout.is_game_over());
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::clock::{Clock, ManualClock};
use super::config::BoutConfig;
use super::events::{CombatEvent, RoundEndReason};
use super::fighter::{Fighter, Side};
use super::resolver::{Resolver, TickEffects, TickInput, TickOutcome};
use super::reward::{RewardFunction, ShapedReward};
use super::rng::{CombatRng, SeededEntropy};
use super::snapshot::{BoutSnapshot, FighterSnapshot};
use super::state_encoder::StateEncoder;
use super::stats::BoutStats;
use super::timestep::ROUND_SECOND_MS;
use crate::error::BoutError;

/// What a call to [`Bout::step_frame`] did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameStep {
    /// One combat tick was resolved.
    Ticked(TickOutcome),
    /// Waiting out the between-round delay.
    Intermission,
    /// A new round started this frame.
    RoundReset,
    GameOver,
}

/// End-of-bout summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoutSummary {
    pub red_score: u32,
    pub blue_score: u32,
    pub rounds_played: u32,
    pub game_over: bool,
    pub winner: Option<Side>,
    pub red_epsilon: f32,
    pub blue_epsilon: f32,
    pub stats: BoutStats,
}

pub struct Bout {
    cfg: BoutConfig,
    encoder: StateEncoder,
    reward: Box<dyn RewardFunction>,
    rng: Box<dyn CombatRng>,

    red: Fighter,
    blue: Fighter,

    // ========== Scoreboard ==========
    rounds_played: u32,
    red_score: u32,
    blue_score: u32,
    game_over: bool,
    round_over: bool,
    round_over_until_ms: u64,

    // ========== Round clock ==========
    time_left: u32,
    last_second_tick_ms: u64,
    round_start_ms: u64,
    distance_allowance: f32,

    effects: TickEffects,
    stats: BoutStats,
    warned_after_game_over: bool,
}

impl Bout {
    /// Start a bout at `now_ms`. The config is validated once and frozen.
    pub fn new(cfg: BoutConfig, rng: Box<dyn CombatRng>, now_ms: u64) -> Result<Self, BoutError> {
        cfg.validate()?;

        let red = Fighter::new(Side::Red, Fighter::spawn_point(Side::Red, &cfg.arena), &cfg);
        let blue = Fighter::new(Side::Blue, Fighter::spawn_point(Side::Blue, &cfg.arena), &cfg);

        debug!(
            n_states = cfg.learning.n_states(),
            max_rounds = cfg.arena.max_rounds,
            "bout created"
        );

        Ok(Self {
            encoder: StateEncoder::new(&cfg),
            reward: Box::new(ShapedReward::new(&cfg)),
            rng,
            red,
            blue,
            rounds_played: 0,
            red_score: 0,
            blue_score: 0,
            game_over: false,
            round_over: false,
            round_over_until_ms: 0,
            time_left: cfg.arena.round_time_sec,
            last_second_tick_ms: now_ms,
            round_start_ms: now_ms,
            distance_allowance: cfg.arena.stall_allowance_start,
            effects: TickEffects::new(&cfg),
            stats: BoutStats::default(),
            warned_after_game_over: false,
            cfg,
        })
    }

    /// Reproducible bout driven by `ChaCha8` from `seed`.
    pub fn seeded(cfg: BoutConfig, seed: u64, now_ms: u64) -> Result<Self, BoutError> {
        Self::new(cfg, Box::new(SeededEntropy::new(seed)), now_ms)
    }

    /// Replace the reward shaping.
    pub fn with_reward(mut self, reward: Box<dyn RewardFunction>) -> Self {
        self.reward = reward;
        self
    }

    // ========================================================================
    // Frame driver
    // ========================================================================

    /// Advance one frame at `now_ms`: round clock, then either one combat
    /// tick or the between-round wait.
    pub fn step_frame(&mut self, now_ms: u64) -> FrameStep {
        self.update_clock(now_ms);
        self.effects.decals.prune_expired(now_ms);

        if self.game_over {
            if !self.warned_after_game_over {
                warn!(rounds = self.rounds_played, "step_frame called after game over");
                self.warned_after_game_over = true;
            }
            return FrameStep::GameOver;
        }

        if !self.round_over {
            let outcome = self.resolve_tick(now_ms);
            if outcome.done {
                self.end_round_by_ko(now_ms);
            }
            FrameStep::Ticked(outcome)
        } else if now_ms >= self.round_over_until_ms {
            self.reset_round(now_ms);
            FrameStep::RoundReset
        } else {
            FrameStep::Intermission
        }
    }

    /// Drive the bout with a manual clock, one frame period per step,
    /// until game over or `max_frames`. Returns the frames stepped.
    ///
    /// Nobody renders a headless run, so queued events are dropped each
    /// frame. Callers that consume events step frames themselves.
    pub fn run_headless(&mut self, clock: &mut ManualClock, max_frames: u64) -> u64 {
        let frame_ms = self.cfg.arena.frame_ms();
        let mut frames = 0;
        while !self.game_over && frames < max_frames {
            clock.advance(frame_ms);
            self.step_frame(clock.now_ms());
            self.effects.events.clear();
            frames += 1;
        }
        frames
    }

    /// Tick the round timer once per elapsed second; zero ends the round.
    pub fn update_clock(&mut self, now_ms: u64) {
        if self.game_over || self.round_over {
            return;
        }

        while now_ms.saturating_sub(self.last_second_tick_ms) >= ROUND_SECOND_MS {
            self.last_second_tick_ms += ROUND_SECOND_MS;
            self.time_left = self.time_left.saturating_sub(1);
            if self.time_left == 0 {
                self.end_round_by_time(now_ms);
                break;
            }
        }
    }

    /// Resolve one combat tick and fold it into the stats.
    pub fn resolve_tick(&mut self, now_ms: u64) -> TickOutcome {
        let input = TickInput {
            now_ms,
            time_left: self.time_left,
            round_elapsed_ms: now_ms.saturating_sub(self.round_start_ms),
            distance_allowance: self.distance_allowance,
        };

        let resolver = Resolver::new(&self.cfg, &self.encoder, self.reward.as_ref());
        let outcome =
            resolver.tick(&mut self.red, &mut self.blue, &mut self.effects, self.rng.as_mut(), input);
        self.stats.record_tick(&outcome);

        let a = &self.cfg.arena;
        if self.time_left <= a.late_round_sec {
            self.distance_allowance =
                (self.distance_allowance - a.stall_allowance_step).max(a.stall_allowance_min);
        }

        outcome
    }

    // ========================================================================
    // Round transitions
    // ========================================================================

    pub fn end_round_by_time(&mut self, now_ms: u64) {
        self.begin_round_over(now_ms);

        let winner = if self.red.life > self.blue.life {
            Some(Side::Red)
        } else if self.blue.life > self.red.life {
            Some(Side::Blue)
        } else {
            None
        };

        match winner {
            Some(side) => self.award_round(side),
            None => {
                self.red_score += 1;
                self.blue_score += 1;
                self.stats.red.rounds_won += 1;
                self.stats.blue.rounds_won += 1;
            }
        }

        self.finish_round(RoundEndReason::Time, winner);
    }

    pub fn end_round_by_ko(&mut self, now_ms: u64) {
        self.begin_round_over(now_ms);

        let winner = match (self.red.is_down(), self.blue.is_down()) {
            (true, false) => Some(Side::Blue),
            (false, true) => Some(Side::Red),
            _ => None,
        };

        let step = self.cfg.fighter.knockout_vulnerability_step;
        for f in [&self.red, &self.blue] {
            if f.is_down() {
                self.stats.side_mut(f.side).knockouts_suffered += 1;
            }
        }
        if let Some(side) = winner {
            self.award_round(side);
            self.fighter_mut(side.opponent()).knockout_vulnerability += step;
        }

        self.finish_round(RoundEndReason::Knockout, winner);
    }

    fn begin_round_over(&mut self, now_ms: u64) {
        self.round_over = true;
        self.round_over_until_ms = now_ms + self.cfg.arena.between_round_ms;
    }

    fn award_round(&mut self, side: Side) {
        match side {
            Side::Red => self.red_score += 1,
            Side::Blue => self.blue_score += 1,
        }
        self.stats.side_mut(side).rounds_won += 1;
        self.fighter_mut(side.opponent()).round_lost = true;
    }

    fn finish_round(&mut self, reason: RoundEndReason, winner: Option<Side>) {
        self.rounds_played += 1;
        self.effects.events.push(CombatEvent::RoundEnded { reason, winner });
        debug!(
            round = self.rounds_played,
            ?reason,
            winner = winner.map(Side::name),
            red = self.red_score,
            blue = self.blue_score,
            "round over"
        );

        if self.check_early_victory() || self.rounds_played >= self.cfg.arena.max_rounds {
            self.game_over = true;
            self.effects.events.push(CombatEvent::GameOver);
            info!(
                rounds = self.rounds_played,
                red = self.red_score,
                blue = self.blue_score,
                winner = self.winner().map(Side::name),
                "bout finished"
            );
        }
    }

    /// Catch-up is impossible once one side leads by more than the
    /// rounds remaining. Sets game over when it fires.
    pub fn check_early_victory(&mut self) -> bool {
        let rounds_left = self.cfg.arena.max_rounds.saturating_sub(self.rounds_played);
        let decided = self.red_score > self.blue_score + rounds_left
            || self.blue_score > self.red_score + rounds_left;
        if decided {
            self.game_over = true;
        }
        decided
    }

    /// Start the next round: fighters reset with carried damage, clock and
    /// stall allowance restored.
    pub fn reset_round(&mut self, now_ms: u64) {
        self.red.reset(&self.cfg.fighter);
        self.blue.reset(&self.cfg.fighter);

        self.time_left = self.cfg.arena.round_time_sec;
        self.last_second_tick_ms = now_ms;
        self.round_start_ms = now_ms;
        self.round_over = false;
        self.distance_allowance = self.cfg.arena.stall_allowance_start;

        debug!(
            round = self.rounds_played + 1,
            red_life = self.red.life,
            blue_life = self.blue.life,
            "round started"
        );
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn config(&self) -> &BoutConfig {
        &self.cfg
    }

    pub fn red(&self) -> &Fighter {
        &self.red
    }

    pub fn blue(&self) -> &Fighter {
        &self.blue
    }

    pub fn fighter(&self, side: Side) -> &Fighter {
        match side {
            Side::Red => &self.red,
            Side::Blue => &self.blue,
        }
    }

    pub fn fighter_mut(&mut self, side: Side) -> &mut Fighter {
        match side {
            Side::Red => &mut self.red,
            Side::Blue => &mut self.blue,
        }
    }

    pub fn scores(&self) -> (u32, u32) {
        (self.red_score, self.blue_score)
    }

    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn distance_allowance(&self) -> f32 {
        self.distance_allowance
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn is_round_over(&self) -> bool {
        self.round_over
    }

    pub fn stats(&self) -> &BoutStats {
        &self.stats
    }

    /// Higher score once the bout is over; `None` while running or tied.
    pub fn winner(&self) -> Option<Side> {
        if !self.game_over || self.red_score == self.blue_score {
            return None;
        }
        if self.red_score > self.blue_score {
            Some(Side::Red)
        } else {
            Some(Side::Blue)
        }
    }

    /// Take every event queued since the last drain.
    pub fn drain_events(&mut self) -> Vec<CombatEvent> {
        std::mem::take(&mut self.effects.events)
    }

    pub fn snapshot(&self, now_ms: u64) -> BoutSnapshot {
        let b = &self.effects.banners;
        BoutSnapshot {
            now_ms,
            round: (self.rounds_played + 1).min(self.cfg.arena.max_rounds),
            max_rounds: self.cfg.arena.max_rounds,
            red_score: self.red_score,
            blue_score: self.blue_score,
            time_left: self.time_left,
            round_over: self.round_over,
            game_over: self.game_over,
            super_punch_until_ms: b.super_punch_until_ms,
            knockout_until_ms: b.knockout_until_ms,
            dodge_until_ms: b.dodge_until_ms,
            red: FighterSnapshot::from(&self.red),
            blue: FighterSnapshot::from(&self.blue),
            decals: self.effects.decals.iter().copied().collect(),
        }
    }

    pub fn summary(&self) -> BoutSummary {
        BoutSummary {
            red_score: self.red_score,
            blue_score: self.blue_score,
            rounds_played: self.rounds_played,
            game_over: self.game_over,
            winner: self.winner(),
            red_epsilon: self.red.policy.epsilon(),
            blue_epsilon: self.blue.policy.epsilon(),
            stats: self.stats.clone(),
        }
    }
}

// ========== Tests ==========
