//! Wiring between the microphone, the recipe backend and the view
//!
//! Press → record → upload → outcome → spoken reply

mod config;
mod orchestrator;

pub use config::{default_config_path, AppConfig, BACKEND_URL_ENV, DEFAULT_PORT};
pub use orchestrator::{
    run_search, Orchestrator, OrchestratorBuilder, OrchestratorCommand, OrchestratorEvent,
    OrchestratorHandle, SearchOutcome,
};
