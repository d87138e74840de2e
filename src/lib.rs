// paircheck - Batch driver for pairwise conflict analysis of automation apps
//
// This is the library crate containing the orchestration pipeline: pair
// enumeration, per-pair staging, run-profile rendering, and log-based
// result classification. The binary crate (main.rs) provides the CLI
// entry point. The model checker and the app-pair extractor toolchain are
// external collaborators invoked as black boxes.

pub mod config;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod profile;
pub mod services;

// Re-export commonly used types for convenience
pub use config::ConfigManager;
pub use models::{AppList, AppPair, ResultLabel, ResultRecord, ToolchainConfig, enumerate_pairs};
pub use profile::{RunConfiguration, RunProfile};
pub use services::BatchRunner;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
