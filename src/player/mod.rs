//! Request-pipeline player.
//!
//! Visualizes the request path (client -> proxy -> service -> database) as
//! four stages that progress through statuses on a timeline while one real
//! call to the catalog service runs underneath. Supports automatic timed
//! advancement, manually gated advancement, a speed multiplier, reset, and
//! an append-only trace log.

mod controller;
mod fetch;
mod gate;
pub mod mock;
mod stage;
mod trace;

pub use controller::{
    effective_wait_ms, PipelinePlayer, PlaybackMode, PlaybackState, PlayerError, MAX_SPEED,
    MIN_SPEED, MIN_WAIT_MS,
};
pub use fetch::{ApiClient, CatalogProduct, FetchError, PendingBody, ProductFetcher};
pub use gate::StepGate;
pub use stage::{initial_stages, set_all, set_status, Stage, StageStatus, STAGE_COUNT};
pub use trace::{TraceEntry, TraceLog};
