use crate::models::ToolchainConfig;
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

/// Default toolchain settings file, looked up in the working directory.
const SETTINGS_FILE: &str = "paircheck.yaml";

/// Loads the optional toolchain settings YAML.
///
/// The settings describe the external-toolchain contract (commands, slot
/// paths, well-known file names). A missing file is not an error: every
/// field has a default matching the historical infrastructure layout.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    settings_path: Utf8PathBuf,
}

impl ConfigManager {
    /// Use the default settings file in the working directory.
    pub fn new() -> Self {
        Self {
            settings_path: Utf8PathBuf::from(SETTINGS_FILE),
        }
    }

    /// Use an explicit settings file path.
    pub fn with_path<P: AsRef<Utf8Path>>(path: P) -> Self {
        Self {
            settings_path: path.as_ref().to_path_buf(),
        }
    }

    /// Load the toolchain configuration, or defaults if the file is absent.
    pub fn load_toolchain_config(&self) -> Result<ToolchainConfig> {
        if !self.settings_path.exists() {
            tracing::debug!(
                "Toolchain settings not found at {}, using defaults",
                self.settings_path
            );
            return Ok(ToolchainConfig::default());
        }

        let file_contents = fs::read_to_string(&self.settings_path).with_context(|| {
            format!("Failed to read toolchain settings: {}", self.settings_path)
        })?;

        let config: ToolchainConfig = serde_yaml_ng::from_str(&file_contents).with_context(|| {
            format!("Failed to parse toolchain settings: {}", self.settings_path)
        })?;

        tracing::info!("Loaded toolchain settings from {}", self.settings_path);
        Ok(config)
    }

    /// Save the toolchain configuration (used to materialize a template an
    /// operator can edit).
    pub fn save_toolchain_config(&self, config: &ToolchainConfig) -> Result<()> {
        let yaml_string = serde_yaml_ng::to_string(config)
            .context("Failed to serialize toolchain settings to YAML")?;

        fs::write(&self.settings_path, yaml_string).with_context(|| {
            format!("Failed to write toolchain settings: {}", self.settings_path)
        })?;

        tracing::info!("Saved toolchain settings to {}", self.settings_path);
        Ok(())
    }

    pub fn settings_path(&self) -> &Utf8Path {
        &self.settings_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
