pub mod config;
pub mod data;
pub mod player;
pub mod util;
pub mod web;

pub use config::Settings;
pub use data::{Database, Product, ProductStore};
pub use player::{
    ApiClient, CatalogProduct, FetchError, PipelinePlayer, PlaybackMode, PlaybackState,
    PlayerError, Stage, StageStatus, StepGate, TraceEntry, TraceLog,
};
pub use web::{run_server, AppState, ServerConfig};
