use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::bout::{Bout, BoutSummary};
use crate::engine::clock::ManualClock;
use crate::engine::config::BoutConfig;
use crate::error::{BoutError, Result};

/// Request/response schema understood by this build.
pub const SCHEMA_VERSION: u8 = 1;

/// Frame cap when a request does not set one (a full 12-round bout at
/// 90 fps needs roughly 67k frames).
pub const DEFAULT_MAX_FRAMES: u64 = 1_000_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoutRequest {
    pub schema_version: u8,
    pub seed: u64,
    /// Reference tuning when absent
    #[serde(default)]
    pub config: Option<BoutConfig>,
    #[serde(default)]
    pub max_frames: Option<u64>,
}

impl BoutRequest {
    pub fn new(seed: u64) -> Self {
        Self { schema_version: SCHEMA_VERSION, seed, config: None, max_frames: None }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoutResponse {
    pub schema_version: u8,
    pub seed: u64,
    /// Frames stepped before the bout ended or hit the cap
    pub frames: u64,
    #[serde(flatten)]
    pub summary: BoutSummary,
}

/// Run one bout described by a JSON request and return the JSON summary.
///
/// # Example
/// ```rust
/// use qboxing_core::api::simulate_bout_json;
///
/// let req = r#"{"schema_version":1,"seed":3,"max_frames":500}"#;
/// let out = simulate_bout_json(req).unwrap();
/// assert!(out.contains("\"frames\":500"));
/// ```
pub fn simulate_bout_json(request_json: &str) -> Result<String> {
    let request: BoutRequest = serde_json::from_str(request_json)?;
    let response = simulate_bout(&request)?;
    Ok(serde_json::to_string(&response)?)
}

pub fn simulate_bout(request: &BoutRequest) -> Result<BoutResponse> {
    if request.schema_version != SCHEMA_VERSION {
        return Err(BoutError::SchemaVersion {
            found: request.schema_version,
            expected: SCHEMA_VERSION,
        });
    }

    let config = request.config.clone().unwrap_or_default();
    run_seeded(config, request.seed, request.max_frames.unwrap_or(DEFAULT_MAX_FRAMES))
}

/// Headless bout on a manual clock starting at 0 ms.
pub(crate) fn run_seeded(config: BoutConfig, seed: u64, max_frames: u64) -> Result<BoutResponse> {
    let mut clock = ManualClock::new(0);
    let mut bout = Bout::seeded(config, seed, 0)?;
    let frames = bout.run_headless(&mut clock, max_frames);

    debug!(seed, frames, game_over = bout.is_game_over(), "headless bout done");

    Ok(BoutResponse {
        schema_version: SCHEMA_VERSION,
        seed,
        frames,
        summary: bout.summary(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sha2::{Digest, Sha256};

    fn quick_request(seed: u64) -> BoutRequest {
        let mut cfg = BoutConfig::compact();
        cfg.arena.max_rounds = 2;
        cfg.arena.round_time_sec = 3;
        BoutRequest { config: Some(cfg), ..BoutRequest::new(seed) }
    }

    #[test]
    fn test_schema_version_mismatch() {
        let err = simulate_bout_json(r#"{"schema_version":9,"seed":1}"#).unwrap_err();
        assert!(matches!(err, BoutError::SchemaVersion { found: 9, expected: 1 }));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_malformed_request() {
        let err = simulate_bout_json("{not json").unwrap_err();
        assert!(matches!(err, BoutError::Json(_)));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut req = quick_request(1);
        if let Some(cfg) = req.config.as_mut() {
            cfg.learning.alpha = 2.0;
        }
        assert!(matches!(simulate_bout(&req), Err(BoutError::Config(_))));
    }

    #[test]
    fn test_bout_runs_to_completion() {
        let resp = simulate_bout(&quick_request(11)).unwrap();
        assert!(resp.summary.game_over);
        assert!(resp.summary.rounds_played >= 1 && resp.summary.rounds_played <= 2);
        assert!(resp.frames > 0);
        assert!(resp.summary.stats.ticks > 0);
    }

    #[test]
    fn test_frame_cap() {
        let req = BoutRequest { max_frames: Some(50), ..BoutRequest::new(2) };
        let resp = simulate_bout(&req).unwrap();
        assert_eq!(resp.frames, 50);
        assert!(!resp.summary.game_over);
        assert_eq!(resp.summary.winner, None);
    }

    #[test]
    fn test_response_is_flat_json() {
        let json = serde_json::to_value(simulate_bout(&quick_request(4)).unwrap()).unwrap();
        assert_eq!(json["schema_version"], 1);
        assert!(json["red_score"].is_number());
        assert!(json["stats"]["red"]["punches_thrown"].is_number());
    }

    #[test]
    fn test_same_seed_same_digest() {
        let request = serde_json::to_string(&quick_request(2024)).unwrap();
        let digest = |s: String| format!("{:x}", Sha256::digest(s.as_bytes()));

        let a = digest(simulate_bout_json(&request).unwrap());
        let b = digest(simulate_bout_json(&request).unwrap());
        assert_eq!(a, b);
    }
}
