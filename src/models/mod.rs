//! Data models for the paircheck driver.
//!
//! This module contains the core data structures used throughout the batch
//! pipeline:
//! - [`AppList`] / [`AppPair`]: app-identifier lists and the enumerated
//!   pairs submitted for analysis
//! - [`ResultLabel`] / [`ResultRecord`]: the result taxonomy and the
//!   log-list summary entries
//! - [`ToolchainConfig`]: the external-toolchain contract loaded from
//!   `paircheck.yaml` (all fields defaulted)

pub mod config;
pub mod outcome;
pub mod pair;

pub use config::{ToolchainConfig, ToolchainSettings};
pub use outcome::{ResultLabel, ResultRecord};
pub use pair::{AppList, AppPair, enumerate_pairs};
