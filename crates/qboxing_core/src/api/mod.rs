pub mod batch;
pub mod json_api;

pub use batch::{simulate_batch, simulate_batch_capped, BatchSummary};
pub use json_api::{
    simulate_bout, simulate_bout_json, BoutRequest, BoutResponse, DEFAULT_MAX_FRAMES,
    SCHEMA_VERSION,
};
