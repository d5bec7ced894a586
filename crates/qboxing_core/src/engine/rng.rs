//! Random sources for combat resolution
//!
//! Damage variance, rare events (super punch, knockout punch), movement
//! jitter, dodge-direction fallback, epsilon-greedy exploration and decal
//! cosmetics all draw from one injected [`CombatRng`]. Nothing in the engine
//! touches a process-wide generator, so a bout is reproducible whenever its
//! source is.
//!
//! ## Implementations
//! - [`OsEntropy`]: OS CSPRNG, the default for live bouts
//! - [`SeededEntropy`]: `ChaCha8Rng`, reproducible from a `u64` seed
//! - [`ScriptedEntropy`]: replays a fixed sequence (tests)

use rand::rngs::OsRng;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Triangular};

/// Uniform source in `[0, 1)` with derived samplers.
pub trait CombatRng: Send {
    /// Next uniform value in `[0, 1)`.
    fn next_unit(&mut self) -> f32;

    /// Uniform value in `[lo, hi)`.
    fn uniform(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.next_unit()
    }

    /// `true` with probability `chance`.
    fn roll(&mut self, chance: f32) -> bool {
        self.next_unit() < chance
    }

    /// Index in `0..len`. `len` must be non-zero.
    fn index(&mut self, len: usize) -> usize {
        let idx = (self.next_unit() * len as f32) as usize;
        idx.min(len.saturating_sub(1))
    }

    /// -1.0 or +1.0 with equal probability.
    fn sign(&mut self) -> f32 {
        if self.next_unit() < 0.5 {
            -1.0
        } else {
            1.0
        }
    }

    /// Triangular sample over `[lo, hi]` peaking at `mode`.
    ///
    /// One unit draw through the inverse CDF, the same transform
    /// `rand_distr::Triangular` applies, so scripted and seeded sources
    /// sample the same distribution.
    fn triangular(&mut self, lo: f32, hi: f32, mode: f32) -> f32 {
        triangular_from_unit(self.next_unit(), lo, hi, mode)
    }

    /// 16-bit quantized unit in `[0, 1]`, used for the damage chaos factor.
    fn chaos_unit(&mut self) -> f32 {
        let bits = (self.next_unit() * 65536.0).floor().min(65535.0);
        bits / 65535.0
    }
}

/// Inverse-CDF triangular sample for a unit draw `u`. `mode` is clamped
/// into the range; an empty range yields `lo`.
pub fn triangular_from_unit(u: f32, lo: f32, hi: f32, mode: f32) -> f32 {
    let range = hi - lo;
    if range <= 0.0 {
        return lo;
    }
    let mode = mode.clamp(lo, hi);
    if u * range < mode - lo {
        lo + (u * range * (mode - lo)).sqrt()
    } else {
        hi - ((1.0 - u) * range * (hi - mode)).sqrt()
    }
}

fn sample_triangular<R: Rng>(rng: &mut R, lo: f32, hi: f32, mode: f32) -> f32 {
    match Triangular::new(lo, hi, mode) {
        Ok(dist) => dist.sample(rng),
        Err(_) => {
            // lo == hi or mode outside the range
            let u: f32 = rng.gen();
            triangular_from_unit(u, lo, hi, mode)
        }
    }
}

// ============================================================================
// OsEntropy
// ============================================================================

/// Operating-system CSPRNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsEntropy;

impl CombatRng for OsEntropy {
    fn next_unit(&mut self) -> f32 {
        OsRng.gen::<f32>()
    }

    fn triangular(&mut self, lo: f32, hi: f32, mode: f32) -> f32 {
        sample_triangular(&mut OsRng, lo, hi, mode)
    }
}

// ============================================================================
// SeededEntropy
// ============================================================================

/// Reproducible ChaCha8 stream.
#[derive(Debug, Clone)]
pub struct SeededEntropy {
    rng: ChaCha8Rng,
    seed: u64,
}

impl SeededEntropy {
    pub fn new(seed: u64) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(seed), seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl CombatRng for SeededEntropy {
    fn next_unit(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }

    fn triangular(&mut self, lo: f32, hi: f32, mode: f32) -> f32 {
        sample_triangular(&mut self.rng, lo, hi, mode)
    }
}

// ============================================================================
// ScriptedEntropy
// ============================================================================

/// Replays a fixed sequence of unit values, cycling when exhausted.
#[derive(Debug, Clone)]
pub struct ScriptedEntropy {
    values: Vec<f32>,
    cursor: usize,
    draws: usize,
}

impl ScriptedEntropy {
    /// Values are clamped into `[0, 1)`. An empty script behaves like `[0.5]`.
    pub fn new(values: impl Into<Vec<f32>>) -> Self {
        let mut values: Vec<f32> =
            values.into().into_iter().map(|v| v.clamp(0.0, 0.999_999)).collect();
        if values.is_empty() {
            values.push(0.5);
        }
        Self { values, cursor: 0, draws: 0 }
    }

    /// Always returns `value`.
    pub fn constant(value: f32) -> Self {
        Self::new(vec![value])
    }

    /// Number of values drawn so far.
    pub fn draws(&self) -> usize {
        self.draws
    }
}

impl CombatRng for ScriptedEntropy {
    fn next_unit(&mut self) -> f32 {
        let v = self.values[self.cursor];
        self.cursor = (self.cursor + 1) % self.values.len();
        self.draws += 1;
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_is_reproducible() {
        let mut a = SeededEntropy::new(7);
        let mut b = SeededEntropy::new(7);
        for _ in 0..64 {
            assert_eq!(a.next_unit().to_bits(), b.next_unit().to_bits());
        }
        assert_eq!(a.triangular(5.0, 18.0, 12.15), b.triangular(5.0, 18.0, 12.15));
    }

    #[test]
    fn test_triangular_within_range() {
        let mut rng = SeededEntropy::new(42);
        for _ in 0..2000 {
            let v = rng.triangular(9.0, 28.0, 19.45);
            assert!((9.0..=28.0).contains(&v), "out of range: {}", v);
        }
    }

    #[test]
    fn test_triangular_unit_endpoints() {
        assert_eq!(triangular_from_unit(0.0, 10.0, 20.0, 15.0), 10.0);
        // u at the mode's CDF value lands on the mode
        assert!((triangular_from_unit(0.5, 10.0, 20.0, 15.0) - 15.0).abs() < 1e-5);
        assert!((triangular_from_unit(0.25, 9.0, 28.0, 9.0 + 19.0 * 0.55) - 9.0 - (0.25f32 * 19.0 * 10.45).sqrt()).abs() < 1e-4);
        assert!((triangular_from_unit(0.999, 10.0, 20.0, 15.0) - 20.0).abs() < 0.25);
        assert_eq!(triangular_from_unit(0.7, 12.0, 12.0, 12.0), 12.0);
    }

    #[test]
    fn test_scripted_and_seeded_share_the_triangular_law() {
        let mut seeded = SeededEntropy::new(11);
        let mut units = seeded.clone();
        for _ in 0..200 {
            let a = seeded.triangular(14.0, 40.0, 28.3);
            let mut scripted = ScriptedEntropy::constant(units.next_unit());
            let b = scripted.triangular(14.0, 40.0, 28.3);
            assert!((a - b).abs() < 1e-3, "{} vs {}", a, b);
        }
    }

    #[test]
    fn test_triangular_mean_matches_law() {
        // mean of Triangular(lo, hi, mode) is (lo + hi + mode) / 3
        let mut rng = SeededEntropy::new(5);
        let n = 20_000;
        let sum: f64 = (0..n).map(|_| rng.triangular(0.0, 10.0, 2.0) as f64).sum();
        assert!((sum / n as f64 - 4.0).abs() < 0.1);
    }

    #[test]
    fn test_degenerate_triangular_falls_back() {
        let mut rng = SeededEntropy::new(1);
        assert_eq!(rng.triangular(12.0, 12.0, 12.0), 12.0);
    }

    #[test]
    fn test_scripted_cycles() {
        let mut rng = ScriptedEntropy::new(vec![0.1, 0.9]);
        assert_eq!(rng.next_unit(), 0.1);
        assert_eq!(rng.next_unit(), 0.9);
        assert_eq!(rng.next_unit(), 0.1);
        assert_eq!(rng.draws(), 3);
    }

    #[test]
    fn test_index_stays_in_bounds() {
        let mut rng = ScriptedEntropy::constant(1.0);
        assert_eq!(rng.index(12), 11);
        let mut rng = ScriptedEntropy::constant(0.0);
        assert_eq!(rng.index(12), 0);
    }

    #[test]
    fn test_roll_extremes() {
        let mut rng = ScriptedEntropy::constant(0.0);
        assert!(rng.roll(0.001));
        assert!(!rng.roll(0.0));
        let mut rng = ScriptedEntropy::constant(0.999);
        assert!(!rng.roll(0.75));
        assert!(rng.roll(1.0));
    }

    #[test]
    fn test_chaos_unit_bounds() {
        let mut rng = ScriptedEntropy::new(vec![0.0, 0.999_999]);
        assert_eq!(rng.chaos_unit(), 0.0);
        assert_eq!(rng.chaos_unit(), 1.0);
    }

    #[test]
    fn test_os_entropy_unit_range() {
        let mut rng = OsEntropy;
        for _ in 0..256 {
            let v = rng.next_unit();
            assert!((0.0..1.0).contains(&v));
        }
    }
}
