use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use std::time::Instant;
use thiserror::Error;
use tokio::process::Command;

use crate::models::ResultLabel;

/// Log marker the model checker prints when the search finished cleanly.
const NO_CONFLICT_MARKER: &str = "no errors detected";

/// Log marker for a detected conflict between the two staged apps.
const CONFLICT_MARKER: &str =
    "java.lang.RuntimeException: Conflict found between the two apps.";

#[derive(Error, Debug)]
pub enum CheckerError {
    #[error("Log file not found: {0}")]
    LogFileNotFound(Utf8PathBuf),

    #[error("Process error: {0}")]
    ProcessError(#[from] std::io::Error),
}

/// Service that runs the compiled pair through the external model checker
/// and classifies the outcome from its log output.
///
/// The checker is a black box: it is launched through its run script from
/// its installation directory, its standard output is captured into the
/// per-pair log artifact, and classification trusts two exact textual
/// markers in that output.
pub struct CheckerService {
    checker_dir: Utf8PathBuf,
    work_dir: Utf8PathBuf,
    compile_command: String,
    run_script: String,
    profile_file: String,
}

impl CheckerService {
    pub fn new(
        checker_dir: &Utf8Path,
        work_dir: &Utf8Path,
        compile_command: &str,
        run_script: &str,
        profile_file: &str,
    ) -> Self {
        Self {
            checker_dir: checker_dir.to_path_buf(),
            work_dir: work_dir.to_path_buf(),
            compile_command: compile_command.to_string(),
            run_script: run_script.to_string(),
            profile_file: profile_file.to_string(),
        }
    }

    /// Compile the staged pair and run the model checker, capturing its
    /// standard output into `log_path`.
    ///
    /// No timeout is enforced here; the profile's own timeout option is the
    /// only bound on a single run.
    pub async fn run(&self, log_path: &Utf8Path) -> Result<()> {
        self.compile().await?;

        tracing::info!("Calling the model checker, log: {}", log_path);
        let start = Instant::now();

        let command = format!("{} {}", self.run_script, self.profile_file);
        let output = self
            .shell(&command, &self.checker_dir)
            .output()
            .await
            .context("Failed to run the model checker")?;

        fs::write(log_path, &output.stdout)
            .with_context(|| format!("Failed to write checker log: {}", log_path))?;

        if !output.stderr.is_empty() {
            tracing::debug!(
                "Checker stderr: {}",
                String::from_utf8_lossy(&output.stderr).trim_end()
            );
        }
        tracing::info!(
            "Model checker finished in {:.1}s with status {}",
            start.elapsed().as_secs_f32(),
            output.status
        );

        Ok(())
    }

    /// Classify a per-pair log by scanning its lines in order; the first
    /// matched marker wins. A log with neither marker is reported as
    /// [`ResultLabel::Unknown`] so an operator can investigate, never
    /// silently dropped.
    pub fn classify(&self, log_path: &Utf8Path) -> Result<ResultLabel> {
        if !log_path.exists() {
            return Err(CheckerError::LogFileNotFound(log_path.to_path_buf()).into());
        }

        let contents = fs::read_to_string(log_path)
            .with_context(|| format!("Failed to read checker log: {}", log_path))?;
        Ok(Self::classify_text(&contents))
    }

    fn classify_text(contents: &str) -> ResultLabel {
        for line in contents.lines() {
            if line.contains(NO_CONFLICT_MARKER) {
                return ResultLabel::NoConflict;
            }
            if line.contains(CONFLICT_MARKER) {
                return ResultLabel::Conflict;
            }
        }
        ResultLabel::Unknown
    }

    async fn compile(&self) -> Result<()> {
        tracing::debug!("Compiling staged pair: {}", self.compile_command);
        let status = self
            .shell(&self.compile_command, &self.work_dir)
            .status()
            .await
            .context("Failed to run the compile step")?;

        if !status.success() {
            tracing::warn!("Compile step exited with status {}", status);
        }
        Ok(())
    }

    fn shell(&self, command: &str, dir: &Utf8Path) -> Command {
        let mut cmd = if cfg!(target_os = "windows") {
            let mut c = Command::new("cmd");
            c.args(["/C", command]);
            c
        } else {
            let mut c = Command::new("sh");
            c.args(["-c", command]);
            c
        };
        cmd.current_dir(dir);
        cmd
    }
}
