//! State Encoder
//!
//! Maps (self, opponent, time left) to one discrete state index in
//! `[0, n_states)`. Factors are composed most-significant first:
//!
//! ```text
//! dist -> dxdy -> own energy -> opp energy -> cooldown -> time -> flags
//! ```
//!
//! The composition order fixes the Q-table layout; only the bucket
//! boundaries are tunable.

use super::config::{BoutConfig, BOOL_BITS, CD_BINS, DXDY_BINS, TIME_BINS};
use super::fighter::Fighter;
use super::geometry::sign3;

/// Pure encoder over a frozen copy of the relevant constants.
#[derive(Debug, Clone)]
pub struct StateEncoder {
    dist_bins: usize,
    energy_bins: usize,
    diagonal: f32,
    round_time_sec: u32,
    dead_zone: f32,
    cd_low_below: u32,
    cd_medium_below: u32,
    low_energy_flag: f32,
}

impl StateEncoder {
    pub fn new(cfg: &BoutConfig) -> Self {
        let l = &cfg.learning;
        Self {
            dist_bins: l.dist_bins.max(1),
            energy_bins: l.energy_bins.max(1),
            diagonal: cfg.arena.diagonal(),
            round_time_sec: cfg.arena.round_time_sec.max(1),
            dead_zone: l.dxdy_dead_zone,
            cd_low_below: l.cd_low_below,
            cd_medium_below: l.cd_medium_below,
            low_energy_flag: l.low_energy_flag,
        }
    }

    pub fn n_states(&self) -> usize {
        self.dist_bins
            * DXDY_BINS
            * self.energy_bins
            * self.energy_bins
            * CD_BINS
            * TIME_BINS
            * (1usize << BOOL_BITS)
    }

    /// Encode `me`'s view of the bout.
    pub fn encode(&self, me: &Fighter, opponent: &Fighter, time_left: u32) -> usize {
        let delta = opponent.pos - me.pos;

        let dist_bin = linear_bin(delta.length() / self.diagonal, self.dist_bins);

        let sx = (sign3(delta.x, self.dead_zone) + 1) as usize;
        let sy = (sign3(delta.y, self.dead_zone) + 1) as usize;
        let dxdy_bin = sy * 3 + sx;

        let e_bin = linear_bin(me.energy / me.max_energy, self.energy_bins);
        let oe_bin = linear_bin(opponent.energy / opponent.max_energy, self.energy_bins);

        let cd_bin = self.cooldown_bin(me.punch_cd);
        let t_bin = self.time_bin(time_left);
        let flags = self.flags(me);

        let mut idx = dist_bin;
        idx = idx * DXDY_BINS + dxdy_bin;
        idx = idx * self.energy_bins + e_bin;
        idx = idx * self.energy_bins + oe_bin;
        idx = idx * CD_BINS + cd_bin;
        idx = idx * TIME_BINS + t_bin;
        idx = (idx << BOOL_BITS) | flags;
        idx
    }

    fn cooldown_bin(&self, punch_cd: u32) -> usize {
        if punch_cd == 0 {
            0
        } else if punch_cd < self.cd_low_below {
            1
        } else if punch_cd < self.cd_medium_below {
            2
        } else {
            3
        }
    }

    fn time_bin(&self, time_left: u32) -> usize {
        let frac = time_left.min(self.round_time_sec) as f32 / self.round_time_sec as f32;
        if frac > 0.75 {
            0
        } else if frac > 0.50 {
            1
        } else if frac > 0.25 {
            2
        } else {
            3
        }
    }

    /// punch_ready | dodge_ready | counter_window | low_energy | arm_locked
    fn flags(&self, me: &Fighter) -> usize {
        let bit = |b: bool| b as usize;
        (bit(me.punch_ready()) << 4)
            | (bit(me.dodge_ready()) << 3)
            | (bit(me.counter_window_open()) << 2)
            | (bit(me.energy < self.low_energy_flag) << 1)
            | bit(me.any_arm_locked())
    }
}

/// `floor(frac * (bins - 1))` clamped to `[0, bins)`. NaN lands in bin 0.
fn linear_bin(frac: f32, bins: usize) -> usize {
    let raw = (frac * (bins - 1) as f32).floor();
    if raw.is_nan() || raw <= 0.0 {
        0
    } else {
        (raw as usize).min(bins - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fighter::Side;
    use crate::engine::geometry::Vec2;
    use proptest::prelude::*;

    fn pair(cfg: &BoutConfig) -> (Fighter, Fighter) {
        let red = Fighter::new(Side::Red, Fighter::spawn_point(Side::Red, &cfg.arena), cfg);
        let blue = Fighter::new(Side::Blue, Fighter::spawn_point(Side::Blue, &cfg.arena), cfg);
        (red, blue)
    }

    #[test]
    fn test_state_count_matches_learning_config() {
        let cfg = BoutConfig::default();
        assert_eq!(StateEncoder::new(&cfg).n_states(), cfg.learning.n_states());
        assert_eq!(cfg.learning.n_states(), 1_658_880);
    }

    #[test]
    fn test_spawn_state_hand_computed() {
        let cfg = BoutConfig::default();
        let enc = StateEncoder::new(&cfg);
        let (red, blue) = pair(&cfg);

        // d = 520, diag = 1000 -> dist bin floor(0.52 * 9) = 4
        // dx > 0, dy = 0 -> sx 2, sy 1 -> dxdy 5
        // full energy -> bins 5 / 5; cd ready -> 0; 60 s left -> 0
        // flags: punch_ready | dodge_ready = 0b11000
        let mut expected = 4;
        expected = expected * 9 + 5;
        expected = expected * 6 + 5;
        expected = expected * 6 + 5;
        expected = expected * 4;
        expected = expected * 4;
        expected = expected * 32 + 0b11000;

        assert_eq!(enc.encode(&red, &blue, 60), expected);
    }

    #[test]
    fn test_direction_is_mirrored_between_sides() {
        let cfg = BoutConfig::compact();
        let enc = StateEncoder::new(&cfg);
        let (red, blue) = pair(&cfg);

        let red_dxdy = (enc.encode(&red, &blue, 60) / (2 * 2 * 4 * 4 * 32)) % 9;
        let blue_dxdy = (enc.encode(&blue, &red, 60) / (2 * 2 * 4 * 4 * 32)) % 9;
        assert_eq!(red_dxdy, 5);
        assert_eq!(blue_dxdy, 3);
    }

    #[test]
    fn test_dead_zone_keeps_direction_neutral() {
        let cfg = BoutConfig::compact();
        let enc = StateEncoder::new(&cfg);
        let (mut red, mut blue) = pair(&cfg);
        red.pos = Vec2::new(400.0, 300.0);
        blue.pos = Vec2::new(410.0, 290.0);

        let dxdy = (enc.encode(&red, &blue, 60) / (2 * 2 * 4 * 4 * 32)) % 9;
        assert_eq!(dxdy, 4);
    }

    #[test]
    fn test_cooldown_and_time_bins() {
        let enc = StateEncoder::new(&BoutConfig::default());
        assert_eq!(enc.cooldown_bin(0), 0);
        assert_eq!(enc.cooldown_bin(24), 1);
        assert_eq!(enc.cooldown_bin(25), 2);
        assert_eq!(enc.cooldown_bin(54), 2);
        assert_eq!(enc.cooldown_bin(86), 3);

        assert_eq!(enc.time_bin(60), 0);
        assert_eq!(enc.time_bin(45), 1);
        assert_eq!(enc.time_bin(30), 2);
        assert_eq!(enc.time_bin(15), 3);
        assert_eq!(enc.time_bin(0), 3);
        assert_eq!(enc.time_bin(500), 0);
    }

    #[test]
    fn test_flag_bits() {
        let cfg = BoutConfig::compact();
        let enc = StateEncoder::new(&cfg);
        let (mut red, _) = pair(&cfg);

        red.punch_cd = 5;
        red.dodge_cd = 5;
        assert_eq!(enc.flags(&red), 0);

        red.counter_window = 3;
        assert_eq!(enc.flags(&red), 0b00100);
        red.energy = 10.0;
        assert_eq!(enc.flags(&red), 0b00110);
        red.right.lock_ticks = 2;
        assert_eq!(enc.flags(&red), 0b00111);
        red.punch_cd = 0;
        red.dodge_cd = 0;
        assert_eq!(enc.flags(&red), 0b11111);
    }

    #[test]
    fn test_boundary_inputs_stay_in_range() {
        let cfg = BoutConfig::default();
        let enc = StateEncoder::new(&cfg);
        let (mut red, mut blue) = pair(&cfg);

        // coincident
        red.pos = Vec2::new(55.0, 55.0);
        blue.pos = red.pos;
        red.energy = 0.0;
        assert!(enc.encode(&red, &blue, 0) < enc.n_states());

        // opposite corners, full diagonal
        blue.pos = Vec2::new(800.0, 600.0);
        red.pos = Vec2::ZERO;
        red.energy = red.max_energy;
        red.punch_cd = 1_000;
        red.counter_window = 1;
        red.left.lock_ticks = 1;
        assert!(enc.encode(&red, &blue, 60) < enc.n_states());
    }

    proptest! {
        #[test]
        fn prop_state_index_in_range(
            rx in -50.0f32..900.0, ry in -50.0f32..700.0,
            bx in -50.0f32..900.0, by in -50.0f32..700.0,
            re in 0.0f32..=100.0, be in 0.0f32..=100.0,
            cd in 0u32..200, dodge_cd in 0u32..200,
            window in 0u32..40, lock in 0u32..20,
            time_left in 0u32..90,
        ) {
            let cfg = BoutConfig::compact();
            let enc = StateEncoder::new(&cfg);
            let (mut red, mut blue) = pair(&cfg);
            red.pos = Vec2::new(rx, ry);
            blue.pos = Vec2::new(bx, by);
            red.energy = re;
            blue.energy = be;
            red.punch_cd = cd;
            red.dodge_cd = dodge_cd;
            red.counter_window = window;
            red.left.lock_ticks = lock;

            let s = enc.encode(&red, &blue, time_left);
            prop_assert!(s < enc.n_states());
            prop_assert!(enc.encode(&blue, &red, time_left) < enc.n_states());
        }
    }
}
