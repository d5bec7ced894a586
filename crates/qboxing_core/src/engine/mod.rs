pub mod bout; // Round/bout orchestration
pub mod clock; // Injectable millisecond clock
pub mod config; // Tuning configuration
pub mod damage; // Damage rolls and hit tiers
pub mod decals; // Impact decal buffer
pub mod events;
pub mod fighter;
pub mod geometry;
pub mod intent; // Punch intents and contact ordering
pub mod policy; // Tabular Q-learning
pub mod resolver; // Per-tick combat resolution
pub mod reward; // RewardFunction trait + shaped reward
pub mod rng; // CombatRng abstraction (seeded / OS / scripted)
pub mod snapshot; // Read-only renderer snapshots
pub mod state_encoder;
pub mod stats;
pub mod timestep; // Frame and round-second timing

pub use bout::{Bout, BoutSummary, FrameStep};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::BoutConfig;
pub use events::{CombatEvent, RoundEndReason};
pub use fighter::{Arm, Fighter, PunchKind, Side};
pub use policy::{Action, QPolicy, QTable};
pub use reward::{RewardContext, RewardFunction, ShapedReward};
pub use rng::{CombatRng, OsEntropy, ScriptedEntropy, SeededEntropy};
pub use snapshot::{BoutSnapshot, FighterSnapshot};
pub use stats::{BoutStats, SideStats};
