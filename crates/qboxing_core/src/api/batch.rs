//! Parallel batch simulation
//!
//! Every bout gets its own seeded source, so results depend only on the
//! seed and never on thread scheduling.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::json_api::{run_seeded, BoutResponse, DEFAULT_MAX_FRAMES};
use crate::engine::config::BoutConfig;
use crate::engine::fighter::Side;
use crate::error::Result;

/// Aggregate over a batch of bouts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub bouts: usize,
    pub red_wins: usize,
    pub blue_wins: usize,
    /// Finished level or stopped at the frame cap
    pub undecided: usize,
    pub mean_rounds: f32,
    pub mean_red_accuracy: f32,
    pub mean_blue_accuracy: f32,
}

impl BatchSummary {
    pub fn from_responses(responses: &[BoutResponse]) -> Self {
        if responses.is_empty() {
            return Self::default();
        }
        let n = responses.len() as f32;
        let count = |side: Side| responses.iter().filter(|r| r.summary.winner == Some(side)).count();
        let mean = |f: &dyn Fn(&BoutResponse) -> f32| responses.iter().map(f).sum::<f32>() / n;

        let red_wins = count(Side::Red);
        let blue_wins = count(Side::Blue);
        Self {
            bouts: responses.len(),
            red_wins,
            blue_wins,
            undecided: responses.len() - red_wins - blue_wins,
            mean_rounds: mean(&|r| r.summary.rounds_played as f32),
            mean_red_accuracy: mean(&|r| r.summary.stats.red.accuracy()),
            mean_blue_accuracy: mean(&|r| r.summary.stats.blue.accuracy()),
        }
    }
}

/// Run one bout per seed in parallel. Output order follows `seeds`.
pub fn simulate_batch(seeds: &[u64], config: &BoutConfig) -> Result<Vec<BoutResponse>> {
    simulate_batch_capped(seeds, config, DEFAULT_MAX_FRAMES)
}

pub fn simulate_batch_capped(
    seeds: &[u64],
    config: &BoutConfig,
    max_frames: u64,
) -> Result<Vec<BoutResponse>> {
    config.validate()?;
    seeds
        .par_iter()
        .map(|&seed| run_seeded(config.clone(), seed, max_frames))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoutError;

    fn tiny() -> BoutConfig {
        let mut cfg = BoutConfig::compact();
        cfg.arena.max_rounds = 1;
        cfg.arena.round_time_sec = 2;
        cfg
    }

    #[test]
    fn test_batch_matches_sequential_runs() {
        let seeds = [1, 2, 3, 4];
        let batch = simulate_batch(&seeds, &tiny()).unwrap();

        assert_eq!(batch.len(), 4);
        for (resp, &seed) in batch.iter().zip(seeds.iter()) {
            assert_eq!(resp.seed, seed);
            let solo = run_seeded(tiny(), seed, DEFAULT_MAX_FRAMES).unwrap();
            assert_eq!(resp, &solo);
        }
    }

    #[test]
    fn test_batch_rejects_bad_config() {
        let mut cfg = tiny();
        cfg.arena.fps = 0;
        assert!(matches!(simulate_batch(&[1], &cfg), Err(BoutError::Config(_))));
    }

    #[test]
    fn test_summary_counts() {
        let batch = simulate_batch(&[10, 11, 12, 13, 14], &tiny()).unwrap();
        let summary = BatchSummary::from_responses(&batch);

        assert_eq!(summary.bouts, 5);
        assert_eq!(summary.red_wins + summary.blue_wins + summary.undecided, 5);
        assert_eq!(summary.mean_rounds, 1.0);
    }

    #[test]
    fn test_empty_summary() {
        assert_eq!(BatchSummary::from_responses(&[]), BatchSummary::default());
    }
}
