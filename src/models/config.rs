use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Toolchain configuration from paircheck.yaml
///
/// Describes the contract with the external build/extraction toolchain and
/// the model checker: command lines, well-known file names, and staging
/// slot locations. Every field has a default matching the historical
/// infrastructure layout, so the file is optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolchainConfig {
    #[serde(rename = "Toolchain")]
    pub toolchain: ToolchainSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolchainSettings {
    /// Build/extraction step, run in the working directory for each pair.
    #[serde(rename = "Build Command", default = "default_build_command")]
    pub build_command: String,

    /// Compile step for the staged pair, run after a successful extraction.
    #[serde(rename = "Compile Command", default = "default_compile_command")]
    pub compile_command: String,

    /// Model-checker launcher, run from the checker installation directory.
    #[serde(rename = "Run Script", default = "default_run_script")]
    pub run_script: String,

    /// Run-profile file name inside the checker installation directory.
    #[serde(rename = "Profile File", default = "default_profile_file")]
    pub profile_file: String,

    /// Statistics ledger file name inside the checker installation directory.
    #[serde(rename = "Ledger File", default = "default_ledger_file")]
    pub ledger_file: String,

    /// Error-log artifact the build step leaves behind on failure.
    #[serde(rename = "Error Log", default = "default_error_log")]
    pub error_log: String,

    /// Fixed staging slot for the first app of a pair.
    #[serde(rename = "First Slot", default = "default_first_slot")]
    pub first_slot: String,

    /// Fixed staging slot for the second app of a pair.
    #[serde(rename = "Second Slot", default = "default_second_slot")]
    pub second_slot: String,

    /// Model-checker internal timeout, in minutes.
    #[serde(rename = "Timeout Minutes", default = "default_timeout_minutes")]
    pub timeout_minutes: u32,

    /// Extra run-profile options applied after the managed block,
    /// in insertion order.
    #[serde(rename = "Profile Overrides", default)]
    pub profile_overrides: IndexMap<String, String>,
}

impl Default for ToolchainSettings {
    fn default() -> Self {
        Self {
            build_command: default_build_command(),
            compile_command: default_compile_command(),
            run_script: default_run_script(),
            profile_file: default_profile_file(),
            ledger_file: default_ledger_file(),
            error_log: default_error_log(),
            first_slot: default_first_slot(),
            second_slot: default_second_slot(),
            timeout_minutes: default_timeout_minutes(),
            profile_overrides: IndexMap::new(),
        }
    }
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            toolchain: ToolchainSettings::default(),
        }
    }
}

fn default_build_command() -> String {
    "make Runner".to_string()
}

fn default_compile_command() -> String {
    "make main".to_string()
}

fn default_run_script() -> String {
    "./run.sh".to_string()
}

fn default_profile_file() -> String {
    "main.jpf".to_string()
}

fn default_ledger_file() -> String {
    "moreStatistics".to_string()
}

fn default_error_log() -> String {
    "appCreationError.log".to_string()
}

fn default_first_slot() -> String {
    "Extractor/App1/App1.groovy".to_string()
}

fn default_second_slot() -> String {
    "Extractor/App2/App2.groovy".to_string()
}

fn default_timeout_minutes() -> u32 {
    120
}
