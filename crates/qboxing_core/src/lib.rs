//! # qboxing_core - Two-Agent Q-Learning Boxing Engine
//!
//! Two top-down boxers share a ring. Each runs its own tabular Q-learning
//! policy and learns online while the bout plays out.
//!
//! ## Features
//! - Deterministic under a seeded random source (same seed = same bout)
//! - Injectable random source and clock for headless runs and tests
//! - Renderer-agnostic: snapshots and a combat event queue, no media
//! - JSON API and parallel batch simulation

// Struct initialization pattern used intentionally
#![allow(clippy::field_reassign_with_default)]
// Combat resolution threads both fighters, effects and rng through
#![allow(clippy::too_many_arguments)]

pub mod api;
pub mod engine;
pub mod error;

pub use api::{
    simulate_batch, simulate_bout, simulate_bout_json, BatchSummary, BoutRequest, BoutResponse,
    SCHEMA_VERSION,
};
pub use engine::{Bout, BoutConfig, BoutSnapshot, CombatEvent, Side};
pub use error::{BoutError, ConfigError, Result};
