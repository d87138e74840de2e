use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use thiserror::Error;
use tokio::process::Command;

use crate::models::{AppPair, ToolchainSettings};

/// Outcome of staging one pair for analysis.
///
/// `Failed` carries the full text of the build step's error-log artifact;
/// it means the pair cannot be analyzed (the model checker must be skipped)
/// but the batch continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    Ready,
    Failed(String),
}

/// Errors that make staging a fatal process failure (as opposed to the
/// non-fatal error-log path captured in [`StageOutcome::Failed`]).
#[derive(Error, Debug)]
pub enum StagingError {
    #[error("App artifact not found: {0}")]
    AppNotFound(Utf8PathBuf),

    #[error("Process error: {0}")]
    ProcessError(#[from] std::io::Error),
}

/// Service that prepares the external toolchain's fixed input slots for one
/// pair and triggers its extraction/build step.
///
/// The two staging slots are overwritten on every call; the batch loop is
/// strictly sequential so no locking is needed. The build step signals a
/// per-pair failure by leaving a designated error-log artifact behind,
/// which this service reads and deletes before the next pair runs.
pub struct StagingService {
    /// Working directory the build step runs in; slot paths are relative
    /// to it.
    work_dir: Utf8PathBuf,
    first_slot: Utf8PathBuf,
    second_slot: Utf8PathBuf,
    build_command: String,
    error_log: Utf8PathBuf,
}

impl StagingService {
    pub fn new(work_dir: &Utf8Path, settings: &ToolchainSettings) -> Self {
        Self {
            work_dir: work_dir.to_path_buf(),
            first_slot: work_dir.join(&settings.first_slot),
            second_slot: work_dir.join(&settings.second_slot),
            build_command: settings.build_command.clone(),
            error_log: work_dir.join(&settings.error_log),
        }
    }

    /// Stage one pair: copy both app artifacts into the fixed slots, run
    /// the build/extraction step, then consume its error log if present.
    ///
    /// Copy and spawn failures propagate as fatal errors; only a failure
    /// reported through the error-log artifact is a normal, non-fatal
    /// outcome for the pair.
    pub async fn stage_pair(&self, app_dir: &Utf8Path, pair: &AppPair) -> Result<StageOutcome> {
        self.copy_into_slot(&app_dir.join(&pair.first), &self.first_slot)?;
        self.copy_into_slot(&app_dir.join(&pair.second), &self.second_slot)?;

        tracing::info!("Compiling the apps for pair {}", pair.name());
        self.run_build_step().await?;

        match self.consume_error_log()? {
            Some(error) => {
                tracing::warn!("Build step reported an error for pair {}", pair.name());
                Ok(StageOutcome::Failed(error))
            }
            None => Ok(StageOutcome::Ready),
        }
    }

    fn copy_into_slot(&self, source: &Utf8Path, slot: &Utf8Path) -> Result<()> {
        if !source.exists() {
            return Err(StagingError::AppNotFound(source.to_path_buf()).into());
        }
        fs::copy(source, slot)
            .with_context(|| format!("Failed to copy {} into slot {}", source, slot))?;
        tracing::debug!("Staged {} -> {}", source, slot);
        Ok(())
    }

    async fn run_build_step(&self) -> Result<()> {
        let mut cmd = if cfg!(target_os = "windows") {
            let mut c = Command::new("cmd");
            c.args(["/C", &self.build_command]);
            c
        } else {
            let mut c = Command::new("sh");
            c.args(["-c", &self.build_command]);
            c
        };
        cmd.current_dir(&self.work_dir);

        let status = cmd
            .status()
            .await
            .context("Failed to run the build/extraction step")?;

        // A failing build normally reports through the error-log artifact;
        // a bare nonzero exit is surfaced but not treated as fatal.
        if !status.success() {
            tracing::warn!("Build step exited with status {}", status);
        }

        Ok(())
    }

    /// Read and delete the error-log artifact, if the build step left one.
    /// The artifact must not leak into the next pair.
    fn consume_error_log(&self) -> Result<Option<String>> {
        if !self.error_log.exists() {
            return Ok(None);
        }

        let error = fs::read_to_string(&self.error_log)
            .with_context(|| format!("Failed to read error log: {}", self.error_log))?;
        fs::remove_file(&self.error_log)
            .with_context(|| format!("Failed to remove error log: {}", self.error_log))?;

        Ok(Some(error))
    }
}
