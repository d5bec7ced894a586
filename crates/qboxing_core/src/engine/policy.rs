//! Tabular Q-learning policy
//!
//! Each fighter owns a dense `[state][action]` value table and an
//! exploration rate. Action selection is epsilon-greedy; learning is the
//! one-step temporal-difference update
//!
//! ```text
//! Q[s,a] += alpha * (r + (done ? 0 : gamma * max_a' Q[s',a']) - Q[s,a])
//! ```
//!
//! The table is a single contiguous `Vec<f32>` allocated zeroed, so untouched
//! rows cost no resident memory.

use serde::{Deserialize, Serialize};

use super::config::LearningConfig;
use super::fighter::{Arm, PunchKind};
use super::geometry::Vec2;
use super::rng::CombatRng;

// ============================================================================
// Action
// ============================================================================

/// Side-aware discrete action set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    PunchShortL,
    PunchShortR,
    PunchMediumL,
    PunchMediumR,
    PunchLongL,
    PunchLongR,
    Dodge,
    Idle,
}

impl Action {
    pub const COUNT: usize = 12;

    /// Table column order.
    pub const ALL: [Action; Action::COUNT] = [
        Action::MoveUp,
        Action::MoveDown,
        Action::MoveLeft,
        Action::MoveRight,
        Action::PunchShortL,
        Action::PunchShortR,
        Action::PunchMediumL,
        Action::PunchMediumR,
        Action::PunchLongL,
        Action::PunchLongR,
        Action::Dodge,
        Action::Idle,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(idx: usize) -> Option<Action> {
        Self::ALL.get(idx).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Action::MoveUp => "move_up",
            Action::MoveDown => "move_down",
            Action::MoveLeft => "move_left",
            Action::MoveRight => "move_right",
            Action::PunchShortL => "punch_short_L",
            Action::PunchShortR => "punch_short_R",
            Action::PunchMediumL => "punch_medium_L",
            Action::PunchMediumR => "punch_medium_R",
            Action::PunchLongL => "punch_long_L",
            Action::PunchLongR => "punch_long_R",
            Action::Dodge => "dodge",
            Action::Idle => "do_nothing",
        }
    }

    /// Punch class and arm for punch variants.
    pub fn punch(self) -> Option<(PunchKind, Arm)> {
        match self {
            Action::PunchShortL => Some((PunchKind::Short, Arm::Left)),
            Action::PunchShortR => Some((PunchKind::Short, Arm::Right)),
            Action::PunchMediumL => Some((PunchKind::Medium, Arm::Left)),
            Action::PunchMediumR => Some((PunchKind::Medium, Arm::Right)),
            Action::PunchLongL => Some((PunchKind::Long, Arm::Left)),
            Action::PunchLongR => Some((PunchKind::Long, Arm::Right)),
            _ => None,
        }
    }

    /// Unit walking direction for movement actions (screen y grows down).
    pub fn move_dir(self) -> Option<Vec2> {
        match self {
            Action::MoveUp => Some(Vec2::new(0.0, -1.0)),
            Action::MoveDown => Some(Vec2::new(0.0, 1.0)),
            Action::MoveLeft => Some(Vec2::new(-1.0, 0.0)),
            Action::MoveRight => Some(Vec2::new(1.0, 0.0)),
            _ => None,
        }
    }

    #[inline]
    pub fn is_punch(self) -> bool {
        self.punch().is_some()
    }

    /// Dodge and the two expensive punch classes.
    pub fn is_costly(self) -> bool {
        matches!(
            self,
            Action::Dodge
                | Action::PunchMediumL
                | Action::PunchMediumR
                | Action::PunchLongL
                | Action::PunchLongR
        )
    }
}

// ============================================================================
// QTable
// ============================================================================

/// Dense value table, row-major by state.
#[derive(Debug, Clone)]
pub struct QTable {
    n_states: usize,
    values: Vec<f32>,
}

impl QTable {
    pub fn new(n_states: usize) -> Self {
        let n_states = n_states.max(1);
        Self { n_states, values: vec![0.0; n_states * Action::COUNT] }
    }

    pub fn n_states(&self) -> usize {
        self.n_states
    }

    #[inline]
    fn clamp_state(&self, state: usize) -> usize {
        state.min(self.n_states - 1)
    }

    pub fn row(&self, state: usize) -> &[f32] {
        let s = self.clamp_state(state);
        &self.values[s * Action::COUNT..(s + 1) * Action::COUNT]
    }

    #[inline]
    pub fn get(&self, state: usize, action: Action) -> f32 {
        self.row(state)[action.index()]
    }

    pub fn set(&mut self, state: usize, action: Action, value: f32) {
        let s = self.clamp_state(state);
        self.values[s * Action::COUNT + action.index()] = value;
    }

    pub fn max_value(&self, state: usize) -> f32 {
        self.row(state).iter().copied().fold(f32::NEG_INFINITY, f32::max)
    }

    /// Greedy action; ties go to the first maximum.
    pub fn best_action(&self, state: usize) -> Action {
        let row = self.row(state);
        let mut best = 0;
        for (i, &v) in row.iter().enumerate().skip(1) {
            if v > row[best] {
                best = i;
            }
        }
        Action::ALL[best]
    }
}

// ============================================================================
// QPolicy
// ============================================================================

/// Epsilon-greedy selector plus TD learner.
#[derive(Debug, Clone)]
pub struct QPolicy {
    table: QTable,
    epsilon: f32,
    epsilon_min: f32,
    epsilon_decay: f32,
    alpha: f32,
    gamma: f32,
}

impl QPolicy {
    pub fn new(cfg: &LearningConfig) -> Self {
        Self {
            table: QTable::new(cfg.n_states()),
            epsilon: cfg.epsilon_start,
            epsilon_min: cfg.epsilon_min,
            epsilon_decay: cfg.epsilon_decay,
            alpha: cfg.alpha,
            gamma: cfg.gamma,
        }
    }

    pub fn table(&self) -> &QTable {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut QTable {
        &mut self.table
    }

    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    pub fn set_epsilon(&mut self, epsilon: f32) {
        self.epsilon = epsilon.clamp(0.0, 1.0);
    }

    /// Random action with probability epsilon, greedy otherwise.
    pub fn choose_action(&self, state: usize, rng: &mut dyn CombatRng) -> Action {
        if rng.next_unit() < self.epsilon {
            return Action::ALL[rng.index(Action::COUNT)];
        }
        self.table.best_action(state)
    }

    /// One-step TD update of `Q[state, action]`.
    pub fn update(&mut self, state: usize, action: Action, reward: f32, next_state: usize, done: bool) {
        let old = self.table.get(state, action);
        let future = if done { 0.0 } else { self.gamma * self.table.max_value(next_state) };
        let updated = old + self.alpha * (reward + future - old);
        if updated.is_finite() {
            self.table.set(state, action, updated);
        }
    }

    /// `epsilon = max(epsilon_min, epsilon * decay)`.
    pub fn decay_epsilon(&mut self) {
        self.epsilon = (self.epsilon * self.epsilon_decay).max(self.epsilon_min);
    }
}
